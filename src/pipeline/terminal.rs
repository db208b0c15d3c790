//! Terminal setup and teardown.
//!
//! Enters raw mode and the alternate screen with the native cursor hidden,
//! and restores all of it when dropped.

use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};

/// Terminal setup/teardown handle.
#[derive(Debug)]
pub struct TerminalSetup {
    is_fullscreen: bool,
}

impl TerminalSetup {
    /// Enter raw mode and the alternate screen.
    pub fn enter_fullscreen() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { is_fullscreen: true })
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.is_fullscreen {
            return Ok(());
        }
        self.is_fullscreen = false;
        let mut stdout = io::stdout();
        execute!(stdout, Show, LeaveAlternateScreen)?;
        stdout.flush()?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalSetup {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Current terminal size as (columns, rows), falling back to 80x24.
pub fn detect_terminal_size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}
