use std::io;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::AppResult;

pub(in crate::ui) struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        cleanup();
    }
}

/// Switches to raw mode on the alternate screen.
///
/// # Errors
///
/// Returns an error when terminal setup fails.
pub(in crate::ui) fn setup_terminal() -> AppResult<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(err.into());
    }

    let backend = CrosstermBackend::new(io::stdout());
    match Terminal::new(backend) {
        Ok(mut terminal) => {
            if let Err(err) = terminal.clear() {
                cleanup();
                return Err(err.into());
            }
            Ok(terminal)
        }
        Err(err) => {
            cleanup();
            Err(err.into())
        }
    }
}

fn cleanup() {
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();
}
