use rand::Rng;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// The single edible item on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Item {
    pub position: Position,
}

impl Item {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    /// Places an item on a random cell the snake does not occupy.
    ///
    /// Returns `None` when the snake covers the whole board.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize, snake: &Snake) -> Option<Self> {
        spawn_position(rng, bounds, snake).map(Self::new)
    }
}

/// Picks a free position uniformly among the cells not covered by the snake.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    let mut candidates = Vec::with_capacity(bounds.total_cells().saturating_sub(snake.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !snake.occupies(position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
