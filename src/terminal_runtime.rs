use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::GridSize;
use crate::error::{Result, SnakeError};
use crate::renderer::required_surface;

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns terminal lifecycle (raw mode + alternate screen) for one game session.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Checks that the terminal can hold a `grid` board, then enters raw
    /// mode, switches to the alternate screen and creates a ratatui terminal.
    pub fn enter(grid: GridSize) -> Result<Self> {
        let (available_width, available_height) = size()?;
        check_surface(grid, available_width, available_height)?;

        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error.into());
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = cleanup_terminal_best_effort();
                Err(error.into())
            }
        }
    }

    /// Returns mutable access to the inner ratatui terminal.
    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = cleanup_terminal_best_effort();
    }
}

/// Fails when a terminal of the given size cannot show the whole board.
pub fn check_surface(grid: GridSize, available_width: u16, available_height: u16) -> Result<()> {
    let (required_width, required_height) = required_surface(grid);
    if available_width < required_width || available_height < required_height {
        return Err(SnakeError::SurfaceTooSmall {
            required_width,
            required_height,
            available_width,
            available_height,
        });
    }

    Ok(())
}

/// Leaves raw mode and the alternate screen, ignoring what cannot be undone.
pub fn cleanup_terminal_best_effort() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)
}
