use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Startup and terminal failures. Gameplay itself never fails: a crash is a
/// state transition, not an error.
#[derive(Debug, Error)]
pub enum SnakeError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("failed to create log file {}: {source}", .path.display())]
    LogFile { path: PathBuf, source: io::Error },

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] log::SetLoggerError),

    #[error(
        "terminal is {available_width}x{available_height} but the board needs \
         {required_width}x{required_height}; enlarge the window or shrink the grid"
    )]
    SurfaceTooSmall {
        required_width: u16,
        required_height: u16,
        available_width: u16,
        available_height: u16,
    },
}

pub type Result<T> = std::result::Result<T, SnakeError>;
