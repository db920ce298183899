#![forbid(unsafe_code)]

//! RAII terminal setup for the interactive front end.
//!
//! [`TerminalGuard`] enters raw mode, switches to the alternate screen, and
//! hides the cursor. Dropping it undoes all of that in reverse order, and a
//! panic hook does the same best-effort restore before the panic message is
//! printed.

use std::io::{self, Write};
use std::sync::OnceLock;

/// Restores the terminal when dropped.
#[derive(Debug)]
pub struct TerminalGuard {
    alternate_screen: bool,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen cannot be enabled.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");
        let mut guard = Self {
            alternate_screen: false,
        };

        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        guard.alternate_screen = true;
        crossterm::execute!(stdout, crossterm::cursor::Hide)?;
        Ok(guard)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
        if self.alternate_screen {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen = false;
        }
        let _ = crossterm::terminal::disable_raw_mode();
        tracing::info!("terminal restored");
        let _ = stdout.flush();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_restore();
            previous(info);
        }));
    });
}

fn best_effort_restore() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}
