use std::time::{Duration, Instant};

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Settings;
use crate::error::Result;
use crate::game::{GameState, Rules, StepOutcome};
use crate::input::GameInput;
use crate::ticker::{CancelToken, Ticker};

/// Owns the current game state and everything that drives it: the rng,
/// the ticker, the pause flag and the stop signal.
#[derive(Debug)]
pub struct Controller {
    state: GameState,
    rules: Rules,
    rng: StdRng,
    ticker: Ticker,
    paused: bool,
    cancel: CancelToken,
}

impl Controller {
    /// Starts a game; a configured seed makes it reproducible.
    ///
    /// Fails when the settings describe a grid the game cannot run on.
    pub fn new(settings: &Settings, now: Instant) -> Result<Self> {
        let rules = Rules::from_settings(settings)?;
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = GameState::new(rules, &mut rng);

        Ok(Self {
            state,
            rules,
            rng,
            ticker: Ticker::new(settings.tick_interval(), now),
            paused: false,
            cancel: CancelToken::new(),
        })
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Time left before the next tick is due; `None` while no tick can
    /// happen (paused, crashed or quitting).
    #[must_use]
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        if self.cancel.is_cancelled() || self.paused || !self.state.is_running() {
            return None;
        }

        Some(self.ticker.remaining(now))
    }

    /// Applies one input event.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) {
        match input {
            GameInput::Direction(direction) => {
                if self.paused {
                    return;
                }
                match self.state.steer(direction) {
                    Some(next) => self.state = next,
                    None => debug!("rejected turn {direction:?}"),
                }
            }
            GameInput::Pause => {
                if !self.state.is_running() {
                    return;
                }
                self.paused = !self.paused;
                if !self.paused {
                    self.ticker.reset(now);
                }
            }
            GameInput::Restart => {
                if self.state.is_running() {
                    return;
                }
                info!("restarting after {} ticks", self.state.tick_count);
                self.state = GameState::new(self.rules, &mut self.rng);
                self.paused = false;
                self.ticker.reset(now);
            }
            GameInput::Quit => {
                info!("quit requested");
                self.cancel.cancel();
            }
        }
    }

    /// Advances the game when a tick is due. Returns whether it did.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if self.cancel.is_cancelled() || self.paused || !self.state.is_running() {
            return false;
        }

        if !self.ticker.poll(now) {
            return false;
        }

        let (next, outcome) = self.state.step(&mut self.rng);
        match outcome {
            StepOutcome::Ate => debug!("item eaten, length {}", next.snake.len()),
            StepOutcome::Crashed(cause) => {
                info!("crashed ({cause:?}) after {} ticks", next.tick_count);
            }
            StepOutcome::Moved | StepOutcome::Idle => {}
        }
        self.state = next;
        true
    }
}
