use crossterm::{terminal, ExecutableCommand};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use crate::error::Result;

/// Keeps raw mode and the alternate screen scoped to one UI screen, and
/// guarantees the terminal is put back even on an error path.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    released: bool,
}

impl TerminalSession {
    pub fn open() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        stdout.execute(terminal::EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        Ok(Self {
            terminal,
            released: false,
        })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Leave raw/alternate mode. Safe to call more than once; `Drop` calls
    /// it as a fallback.
    pub fn release(&mut self) -> Result<()> {
        if !self.released {
            self.terminal.show_cursor()?;
            self.terminal
                .backend_mut()
                .execute(terminal::LeaveAlternateScreen)?;
            terminal::disable_raw_mode()?;
            self.released = true;
        }
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
