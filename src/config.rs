use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use ratatui::style::Color;
use serde::Deserialize;

use crate::error::{Result, SnakeError};

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 30;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Smallest accepted grid side.
pub const MIN_GRID_DIMENSION: u16 = 2;

/// Largest accepted grid side.
pub const MAX_GRID_DIMENSION: u16 = 200;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Redraw/input poll cadence of the main loop.
pub const FRAME_INTERVAL_MS: u64 = 16;
pub const FRAME_INTERVAL: Duration = Duration::from_millis(FRAME_INTERVAL_MS);

/// Accepted tick interval range in milliseconds. Ticks cannot fire faster
/// than the loop polls, so the floor is one frame.
pub const MIN_TICK_INTERVAL_MS: u64 = FRAME_INTERVAL_MS;
pub const MAX_TICK_INTERVAL_MS: u64 = 10_000;

/// Terminal columns used for one grid cell, so cells render roughly square.
pub const CELL_WIDTH: u16 = 2;

/// Where a fresh snake starts, clamped into grids smaller than this.
pub const START_CELL: (u16, u16) = (6, 6);

/// Maximum number of turns waiting behind the current direction.
pub const MAX_PENDING_TURNS: usize = 2;

/// Logical grid dimensions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Rejects grids outside `MIN_GRID_DIMENSION..=MAX_GRID_DIMENSION` per side.
    pub fn validate(self) -> Result<()> {
        let grid_range = MIN_GRID_DIMENSION..=MAX_GRID_DIMENSION;
        if !grid_range.contains(&self.width) || !grid_range.contains(&self.height) {
            return Err(SnakeError::InvalidSettings(format!(
                "grid must be between {MIN_GRID_DIMENSION} and {MAX_GRID_DIMENSION} cells per side, got {}x{}",
                self.width, self.height
            )));
        }

        Ok(())
    }
}

/// What happens when the head leaves the grid.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Re-enter from the opposite edge.
    #[default]
    Wrap,
    /// Leaving the grid is a crash.
    Walls,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Classic,
    Dark,
}

impl ThemeName {
    #[must_use]
    pub fn theme(self) -> &'static Theme {
        match self {
            Self::Classic => &THEME_CLASSIC,
            Self::Dark => &THEME_DARK,
        }
    }
}

/// Colors for every painted element.
///
/// The board background is a checkerboard of `grid_even` and `grid_odd`.
#[derive(Debug)]
pub struct Theme {
    pub grid_even: Color,
    pub grid_odd: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub item: Color,
    pub border_fg: Color,
}

/// Light checkerboard with a red snake.
pub const THEME_CLASSIC: Theme = Theme {
    grid_even: Color::Rgb(0xf6, 0xf6, 0xf6),
    grid_odd: Color::Rgb(0xf0, 0xf0, 0xf0),
    snake_head: Color::Rgb(0xb0, 0x00, 0x00),
    snake_body: Color::Red,
    item: Color::Green,
    border_fg: Color::Gray,
};

pub const THEME_DARK: Theme = Theme {
    grid_even: Color::Black,
    grid_odd: Color::Rgb(0x12, 0x12, 0x12),
    snake_head: Color::White,
    snake_body: Color::Blue,
    item: Color::Red,
    border_fg: Color::DarkGray,
};

/// Runtime settings, read from the optional JSON config file and then
/// overridden by command-line flags.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub width: u16,
    pub height: u16,
    pub tick_interval_ms: u64,
    pub topology: Topology,
    /// Whether an item is placed on the board.
    pub items: bool,
    pub theme: ThemeName,
    /// Fixed rng seed for reproducible games.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            topology: Topology::Wrap,
            items: true,
            theme: ThemeName::Classic,
            seed: None,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default location when `path`
    /// is `None`.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file that was named explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => load_from_path(path, true),
            None => match default_config_path() {
                Some(path) => load_from_path(&path, false),
                None => Ok(Self::default()),
            },
        }
    }

    /// Rejects grids and intervals the game cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.grid().validate()?;

        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            return Err(SnakeError::InvalidSettings(format!(
                "tick interval must be between {MIN_TICK_INTERVAL_MS} and {MAX_TICK_INTERVAL_MS} ms, got {}",
                self.tick_interval_ms
            )));
        }

        Ok(())
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize {
            width: self.width,
            height: self.height,
        }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Returns the platform-correct config file path, if the platform has one.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

fn load_from_path(path: &Path, required: bool) -> Result<Settings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(SnakeError::ConfigRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str::<Settings>(&raw).map_err(|source| SnakeError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
