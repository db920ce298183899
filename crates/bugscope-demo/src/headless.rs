#![forbid(unsafe_code)]

//! Headless playback: events printed as lines instead of a drawn page.

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use bugscope_core::{PlaybackEvent, Scenario};

use crate::app::{Action, App};

/// One report line for `event`, or `None` if it is not worth printing.
pub fn describe(event: &PlaybackEvent, scenario: &Scenario) -> Option<String> {
    match *event {
        PlaybackEvent::Reset => None,
        PlaybackEvent::PhaseEntered(phase) => {
            Some(format!("phase {phase} ({} {})", phase.glyph(), phase.label()))
        }
        PlaybackEvent::StepRevealed { visible, line } => {
            let mut out = format!("step {visible}/{}", scenario.trace.len());
            if let Some(line) = line {
                out.push_str(&format!(" line {line}"));
            }
            if let Some(step) = visible.checked_sub(1).and_then(|i| scenario.trace.get(i)) {
                if let Some(var) = &step.variable {
                    out.push_str(&format!("  {var} = {}", step.value.as_deref().unwrap_or("")));
                }
                if let Some(note) = &step.note {
                    out.push_str(&format!("  // {note}"));
                }
                if step.is_error {
                    out.push_str("  [error]");
                }
            }
            Some(out)
        }
        PlaybackEvent::FixUnlocked => Some(format!("fix: {}", scenario.fix)),
    }
}

/// Run the selected scenario in real time, writing one line per event.
///
/// Returns once playback is idle or done with nothing pending, or when
/// `exit_after` has elapsed.
pub fn run(
    app: &mut App,
    frame: Duration,
    exit_after: Option<Duration>,
    out: &mut impl Write,
) -> io::Result<()> {
    if let Some(sc) = app.current() {
        writeln!(out, "{} [{}] {}", sc.id, sc.category, sc.title)?;
    }
    let started = app.apply(Action::Run);
    write_events(app, &started, out)?;
    let start = Instant::now();
    let mut last = start;
    loop {
        {
            let ctl = app.session().controller();
            if ctl.is_quiescent() && ctl.can_run() {
                break;
            }
        }
        if exit_after.is_some_and(|limit| last.duration_since(start) >= limit) {
            tracing::info!("exit-after deadline reached");
            break;
        }

        thread::sleep(frame);
        let now = Instant::now();
        report(app, now.duration_since(last), out)?;
        last = now;
    }
    out.flush()
}

/// Advance `app` by `dt` and write a line per reported event.
pub fn report(app: &mut App, dt: Duration, out: &mut impl Write) -> io::Result<()> {
    let events = app.tick(dt);
    write_events(app, &events, out)
}

fn write_events(
    app: &App,
    events: &[(Duration, PlaybackEvent)],
    out: &mut impl Write,
) -> io::Result<()> {
    let Some(sc) = app.current() else {
        return Ok(());
    };
    let ctl = app.session().controller();
    for (at, event) in events {
        let ms = at.as_millis();
        if let Some(line) = describe(event, sc) {
            writeln!(out, "[{ms:>6}ms] {line}")?;
        }
        if *event == PlaybackEvent::FixUnlocked {
            writeln!(out, "[{ms:>6}ms] root cause: {}", ctl.narrative().visible())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugscope_core::{Catalog, Phase, TraceStep};

    fn scenario() -> Scenario {
        Scenario {
            id: "s".into(),
            trace: vec![
                TraceStep::at(3).binding("i", "0"),
                TraceStep::at(4).note("boom").error(),
            ],
            root_cause: "rc".into(),
            fix: "do better".into(),
            ..Scenario::default()
        }
    }

    #[test]
    fn describes_steps_and_phases() {
        let sc = scenario();
        assert_eq!(
            describe(&PlaybackEvent::StepRevealed { visible: 1, line: Some(3) }, &sc).as_deref(),
            Some("step 1/2 line 3  i = 0")
        );
        assert_eq!(
            describe(&PlaybackEvent::StepRevealed { visible: 2, line: Some(4) }, &sc).as_deref(),
            Some("step 2/2 line 4  // boom  [error]")
        );
        assert_eq!(
            describe(&PlaybackEvent::PhaseEntered(Phase::Explaining), &sc).as_deref(),
            Some("phase explaining (◉ ANALYZING)")
        );
        assert_eq!(describe(&PlaybackEvent::Reset, &sc), None);
    }

    #[test]
    fn report_stamps_events_with_virtual_time() {
        let mut app = App::new(Catalog::new(vec![scenario()]).unwrap());
        app.select_first();
        app.apply(Action::Run);
        let mut out = Vec::new();
        report(&mut app, Duration::from_secs(10), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[   400ms] step 1/2 line 3  i = 0");
        assert_eq!(lines[1], "[   800ms] step 2/2 line 4  // boom  [error]");
        assert_eq!(lines[2], "[  1800ms] phase matching (◉ MATCHING)");
        assert!(text.contains("fix: do better"));
        assert!(text.contains("root cause: rc"));
        assert!(text.contains("phase done"));
    }
}
