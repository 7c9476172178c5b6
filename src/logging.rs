use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use crate::error::{Result, SnakeError};

/// Sends `log` output to a file; the terminal belongs to the game screen.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> Result<()> {
    let file = create_log_file(path)?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}

fn create_log_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| SnakeError::LogFile {
        path: path.to_path_buf(),
        source,
    })
}
