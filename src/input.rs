use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::MAX_PENDING_TURNS;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step in grid coordinates; y grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Quit,
    Restart,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Direction in effect plus the turns accepted but not yet applied.
///
/// Never empty: `current` always holds the direction of the last step.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DirectionQueue {
    current: Direction,
    pending: VecDeque<Direction>,
}

impl DirectionQueue {
    #[must_use]
    pub fn new(current: Direction) -> Self {
        Self {
            current,
            pending: VecDeque::new(),
        }
    }

    /// Direction of the most recent step.
    #[must_use]
    pub fn current(&self) -> Direction {
        self.current
    }

    /// Most recently accepted direction, pending or not.
    #[must_use]
    pub fn latest(&self) -> Direction {
        self.pending.back().copied().unwrap_or(self.current)
    }

    /// Direction the next step will apply.
    #[must_use]
    pub fn next_direction(&self) -> Direction {
        self.pending.front().copied().unwrap_or(self.current)
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Queues a turn. Rejects reversals and repeats of the latest accepted
    /// direction, and anything beyond `MAX_PENDING_TURNS`.
    pub fn enqueue(&mut self, direction: Direction) -> bool {
        let latest = self.latest();
        if direction == latest
            || !direction_change_is_valid(latest, direction)
            || self.pending.len() >= MAX_PENDING_TURNS
        {
            return false;
        }

        self.pending.push_back(direction);
        true
    }

    /// Returns the queue after one step: the oldest pending turn, if any,
    /// becomes current.
    #[must_use]
    pub fn advanced(&self) -> Self {
        let mut next = self.clone();
        if let Some(direction) = next.pending.pop_front() {
            next.current = direction;
        }
        next
    }
}

/// Maps a key press to a game input; unrelated keys yield `None`.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(GameInput::Quit);
    }

    match key.code {
        KeyCode::Up => Some(GameInput::Direction(Direction::Up)),
        KeyCode::Down => Some(GameInput::Direction(Direction::Down)),
        KeyCode::Left => Some(GameInput::Direction(Direction::Left)),
        KeyCode::Right => Some(GameInput::Direction(Direction::Right)),
        KeyCode::Char('p' | ' ') => Some(GameInput::Pause),
        KeyCode::Char('q') | KeyCode::Esc => Some(GameInput::Quit),
        KeyCode::Enter => Some(GameInput::Restart),
        _ => None,
    }
}

/// Waits up to `timeout` for one key press.
pub fn poll_input(timeout: Duration) -> io::Result<Option<GameInput>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(key)),
        _ => Ok(None),
    }
}
