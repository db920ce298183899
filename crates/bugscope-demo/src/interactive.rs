#![forbid(unsafe_code)]

//! Interactive terminal loop.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};

use crate::app::{App, action_for_key};
use crate::render;
use crate::terminal::TerminalGuard;

/// Draw, poll input, and advance playback until the user quits or
/// `exit_after` elapses.
pub fn run(app: &mut App, frame: Duration, exit_after: Option<Duration>) -> io::Result<()> {
    let terminal = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let start = Instant::now();
    let mut last = start;

    loop {
        let (width, height) = terminal.size()?;
        let page = render::page(app);
        let top = app.viewport(page.rows.len(), page.explanation_row, usize::from(height));
        render::paint(&mut stdout, &page, top, width, height)?;

        if event::poll(frame)?
            && let Event::Key(key) = event::read()?
            && let Some(action) = action_for_key(key)
        {
            tracing::debug!(?action, "key action");
            app.apply(action);
        }

        let now = Instant::now();
        app.tick(now.duration_since(last));
        last = now;

        if app.should_quit() {
            break;
        }
        if exit_after.is_some_and(|limit| now.duration_since(start) >= limit) {
            tracing::info!("exit-after deadline reached");
            break;
        }
    }
    Ok(())
}
