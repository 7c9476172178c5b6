use rand::SeedableRng;
use rand::{Rng, rngs::StdRng};

use crate::config::{GridSize, START_CELL, Settings, Topology};
use crate::error::SnakeError;
use crate::input::{Direction, DirectionQueue};
use crate::item::Item;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Crashed,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CrashCause {
    SelfCollision,
    Wall,
}

/// What a single step did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    Moved,
    Ate,
    Crashed(CrashCause),
    /// The state was already crashed; nothing changed.
    Idle,
}

/// Board shape and optional features for one game.
///
/// Only built through checked constructors, so `bounds` is never degenerate.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rules {
    bounds: GridSize,
    topology: Topology,
    items: bool,
}

impl Rules {
    /// Fails when `bounds` is outside the accepted grid range.
    pub fn new(bounds: GridSize, topology: Topology, items: bool) -> Result<Self, SnakeError> {
        bounds.validate()?;

        Ok(Self {
            bounds,
            topology,
            items,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SnakeError> {
        Self::new(settings.grid(), settings.topology, settings.items)
    }
}

/// Complete game state for one tick. Never mutated by the step function;
/// every tick derives a successor.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub directions: DirectionQueue,
    pub item: Option<Item>,
    pub status: GameStatus,
    pub tick_count: u64,
    bounds: GridSize,
    topology: Topology,
}

impl GameState {
    /// Creates a fresh game: one-cell snake heading right, item placed when
    /// the rules ask for one.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(rules: Rules, rng: &mut R) -> Self {
        let snake = Snake::new(start_position(rules.bounds));
        let item = if rules.items {
            Item::spawn(rng, rules.bounds, &snake)
        } else {
            None
        };

        Self {
            snake,
            directions: DirectionQueue::new(Direction::Right),
            item,
            status: GameStatus::Running,
            tick_count: 0,
            bounds: rules.bounds,
            topology: rules.topology,
        }
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(rules: Rules, seed: u64) -> Self {
        Self::new(rules, &mut StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Returns the state with `direction` queued, or `None` when the turn is
    /// rejected (reversal, repeat, full backlog, or game already over).
    #[must_use]
    pub fn steer(&self, direction: Direction) -> Option<Self> {
        if !self.is_running() {
            return None;
        }

        let mut directions = self.directions.clone();
        if !directions.enqueue(direction) {
            return None;
        }

        Some(Self {
            directions,
            ..self.clone()
        })
    }

    /// Advances simulation by one gameplay tick.
    #[must_use]
    pub fn advance<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        self.step(rng).0
    }

    /// Advances one tick and reports what happened.
    #[must_use]
    pub fn step<R: Rng + ?Sized>(&self, rng: &mut R) -> (Self, StepOutcome) {
        let Some(head) = self.snake.head().filter(|_| self.is_running()) else {
            return (self.clone(), StepOutcome::Idle);
        };

        let directions = self.directions.advanced();
        let tick_count = self.tick_count + 1;

        let next_head = match self.next_head(head) {
            Ok(next_head) if !self.snake.occupies(next_head) => next_head,
            Ok(_) => return self.crashed(directions, tick_count, CrashCause::SelfCollision),
            Err(cause) => return self.crashed(directions, tick_count, cause),
        };

        let ate = self.item.is_some_and(|item| item.position == next_head);
        let (snake, item) = if ate {
            let snake = self.snake.grown(next_head);
            let item = Item::spawn(rng, self.bounds, &snake);
            (snake, item)
        } else {
            (self.snake.moved(next_head), self.item)
        };

        let next = Self {
            snake,
            directions,
            item,
            status: GameStatus::Running,
            tick_count,
            ..*self
        };
        let outcome = if ate {
            StepOutcome::Ate
        } else {
            StepOutcome::Moved
        };

        (next, outcome)
    }

    fn next_head(&self, head: Position) -> Result<Position, CrashCause> {
        let next = head.stepped(self.directions.next_direction());
        match self.topology {
            Topology::Wrap => Ok(next.wrapped(self.bounds)),
            Topology::Walls if next.is_within_bounds(self.bounds) => Ok(next),
            Topology::Walls => Err(CrashCause::Wall),
        }
    }

    fn crashed(
        &self,
        directions: DirectionQueue,
        tick_count: u64,
        cause: CrashCause,
    ) -> (Self, StepOutcome) {
        let next = Self {
            snake: Snake::empty(),
            directions,
            item: self.item,
            status: GameStatus::Crashed,
            tick_count,
            ..*self
        };
        (next, StepOutcome::Crashed(cause))
    }
}

fn start_position(bounds: GridSize) -> Position {
    Position {
        x: i32::from(START_CELL.0.min(bounds.width.saturating_sub(1))),
        y: i32::from(START_CELL.1.min(bounds.height.saturating_sub(1))),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::{GridSize, Topology};
    use crate::error::SnakeError;
    use crate::input::{Direction, DirectionQueue};
    use crate::item::Item;

    use super::{CrashCause, GameState, GameStatus, Rules, StepOutcome};
    use crate::snake::{Position, Snake};

    fn rules(width: u16, height: u16, topology: Topology) -> Rules {
        Rules::new(GridSize { width, height }, topology, true).expect("test grid should be valid")
    }

    #[test]
    fn rules_reject_zero_sized_grid() {
        let zero_width = Rules::new(
            GridSize {
                width: 0,
                height: 5,
            },
            Topology::Wrap,
            true,
        );
        assert!(matches!(zero_width, Err(SnakeError::InvalidSettings(_))));

        let zero_height = Rules::new(
            GridSize {
                width: 5,
                height: 0,
            },
            Topology::Walls,
            false,
        );
        assert!(zero_height.is_err());
    }

    #[test]
    fn smallest_grid_starts_inside_bounds() {
        let state = GameState::new_with_seed(rules(2, 2, Topology::Wrap), 1);
        assert_eq!(state.snake.head(), Some(Position { x: 1, y: 1 }));
    }

    #[test]
    fn fresh_state_starts_at_six_six_heading_right() {
        let state = GameState::new_with_seed(rules(30, 20, Topology::Wrap), 1);

        assert_eq!(state.snake.head(), Some(Position { x: 6, y: 6 }));
        assert_eq!(state.directions.current(), Direction::Right);
        assert_eq!(state.status, GameStatus::Running);
        let item = state.item.expect("item should be placed");
        assert!(!state.snake.occupies(item.position));
    }

    #[test]
    fn start_is_clamped_into_small_grids() {
        let state = GameState::new_with_seed(rules(4, 3, Topology::Wrap), 1);
        assert_eq!(state.snake.head(), Some(Position { x: 3, y: 2 }));
    }

    #[test]
    fn items_can_be_disabled() {
        let rules = Rules::new(
            GridSize {
                width: 10,
                height: 10,
            },
            Topology::Wrap,
            false,
        )
        .expect("test grid should be valid");
        let state = GameState::new_with_seed(rules, 1);
        assert_eq!(state.item, None);
    }

    #[test]
    fn snake_grows_after_eating_item() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = GameState::new_with_seed(rules(10, 10, Topology::Wrap), 1);
        state.snake = Snake::new(Position { x: 1, y: 1 });
        state.item = Some(Item::new(Position { x: 3, y: 1 }));

        let (state, outcome) = state.step(&mut rng);
        assert_eq!(outcome, StepOutcome::Moved);
        assert_eq!(state.snake.len(), 1);

        let (state, outcome) = state.step(&mut rng);
        assert_eq!(outcome, StepOutcome::Ate);
        assert_eq!(state.snake.len(), 2);
        let item = state.item.expect("item should be respawned");
        assert!(!state.snake.occupies(item.position));
    }

    #[test]
    fn advance_does_not_touch_its_input() {
        let mut rng = StdRng::seed_from_u64(9);
        let state = GameState::new_with_seed(rules(10, 10, Topology::Wrap), 9);
        let before = state.clone();

        let next = state.advance(&mut rng);

        assert_eq!(state, before);
        assert_ne!(next, before);
    }

    #[test]
    fn wrap_from_left_edge_lands_on_last_column() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = GameState::new_with_seed(rules(30, 20, Topology::Wrap), 2);
        state.snake = Snake::new(Position { x: 0, y: 6 });
        state.directions = DirectionQueue::new(Direction::Left);
        state.item = None;

        let next = state.advance(&mut rng);

        assert_eq!(next.snake.head(), Some(Position { x: 29, y: 6 }));
    }

    #[test]
    fn wrap_from_right_edge_lands_on_first_column() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = GameState::new_with_seed(rules(30, 20, Topology::Wrap), 2);
        state.snake = Snake::new(Position { x: 29, y: 0 });
        state.item = None;

        let next = state.advance(&mut rng);

        assert_eq!(next.snake.head(), Some(Position { x: 0, y: 0 }));
    }

    #[test]
    fn leaving_walled_grid_crashes() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = GameState::new_with_seed(rules(4, 4, Topology::Walls), 2);
        state.snake = Snake::new(Position { x: 3, y: 1 });

        let (next, outcome) = state.step(&mut rng);

        assert_eq!(outcome, StepOutcome::Crashed(CrashCause::Wall));
        assert_eq!(next.status, GameStatus::Crashed);
        assert!(next.snake.is_empty());
    }

    #[test]
    fn self_collision_empties_snake_and_sets_crashed() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = GameState::new_with_seed(rules(6, 6, Topology::Wrap), 3);
        state.snake = Snake::from_segments(vec![
            Position { x: 2, y: 2 },
            Position { x: 1, y: 2 },
            Position { x: 1, y: 3 },
            Position { x: 2, y: 3 },
            Position { x: 3, y: 3 },
            Position { x: 3, y: 2 },
        ]);
        state.directions = DirectionQueue::new(Direction::Left);

        let (next, outcome) = state.step(&mut rng);

        assert_eq!(outcome, StepOutcome::Crashed(CrashCause::SelfCollision));
        assert_eq!(next.status, GameStatus::Crashed);
        assert!(next.snake.is_empty());
    }

    #[test]
    fn moving_onto_current_tail_counts_as_collision() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = GameState::new_with_seed(rules(6, 6, Topology::Wrap), 4);
        state.snake = Snake::from_segments(vec![
            Position { x: 2, y: 2 },
            Position { x: 2, y: 3 },
            Position { x: 1, y: 3 },
            Position { x: 1, y: 2 },
        ]);
        state.directions = DirectionQueue::new(Direction::Left);

        let next = state.advance(&mut rng);

        assert_eq!(next.status, GameStatus::Crashed);
    }

    #[test]
    fn crashed_state_is_a_fixed_point() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = GameState::new_with_seed(rules(4, 4, Topology::Walls), 5);
        state.snake = Snake::new(Position { x: 3, y: 0 });
        let crashed = state.advance(&mut rng);

        let (again, outcome) = crashed.step(&mut rng);

        assert_eq!(outcome, StepOutcome::Idle);
        assert_eq!(again, crashed);
        assert!(crashed.steer(Direction::Up).is_none());
    }

    #[test]
    fn steer_applies_turn_on_next_step() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut state = GameState::new_with_seed(rules(10, 10, Topology::Wrap), 6);
        state.snake = Snake::new(Position { x: 5, y: 5 });
        state.item = None;

        let steered = state.steer(Direction::Down).expect("turn should be accepted");
        assert_eq!(state.directions.pending_len(), 0);

        let next = steered.advance(&mut rng);
        assert_eq!(next.snake.head(), Some(Position { x: 5, y: 6 }));
        assert_eq!(next.directions.current(), Direction::Down);
        assert_eq!(next.tick_count, 1);
    }
}
