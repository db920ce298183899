#![forbid(unsafe_code)]

//! Demo application state: the session plus view-only scroll state.

use std::time::Duration;

use bugscope_core::{Catalog, Intent, Phase, PlaybackEvent, Scenario, SelectError, Session};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run,
    Reset,
    NextScenario,
    PrevScenario,
    ScrollUp,
    ScrollDown,
    TraceUp,
    TraceDown,
    Quit,
}

/// Map a key press to an action.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }
    let action = match key.code {
        KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char(' ') => Action::Run,
        KeyCode::Esc | KeyCode::Char('x') => Action::Reset,
        KeyCode::Down | KeyCode::Char('j') => Action::NextScenario,
        KeyCode::Up | KeyCode::Char('k') => Action::PrevScenario,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        KeyCode::Char('[') => Action::TraceUp,
        KeyCode::Char(']') => Action::TraceDown,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Rows moved by one page scroll.
const PAGE_STEP: usize = 10;

#[derive(Debug)]
pub struct App {
    session: Session,
    /// Top row of the page viewport.
    scroll: usize,
    /// Scroll the explanation to the top of the viewport on the next layout.
    focus_explanation: bool,
    /// First trace row shown; `None` keeps the newest steps in view.
    trace_offset: Option<usize>,
    /// Virtual time at which `matching` was entered in the current run.
    matching_at: Option<Duration>,
    quit: bool,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            session: Session::new(catalog),
            scroll: 0,
            focus_explanation: false,
            trace_offset: None,
            matching_at: None,
            quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current(&self) -> Option<&Scenario> {
        self.session.current()
    }

    pub fn select(&mut self, id: &str) -> Result<(), SelectError> {
        self.session.select(id)?;
        self.drain();
        Ok(())
    }

    /// Select the first scenario when nothing is selected.
    pub fn select_first(&mut self) {
        if self.session.current().is_none() {
            let _ = self.session.select_next();
            self.drain();
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Perform `action`, returning the playback events it caused.
    pub fn apply(&mut self, action: Action) -> Vec<(Duration, PlaybackEvent)> {
        match action {
            Action::Run => {
                if !self.session.run() {
                    tracing::debug!(
                        phase = %self.session.controller().phase(),
                        "run ignored"
                    );
                }
            }
            Action::Reset => self.session.reset(),
            Action::NextScenario => {
                let _ = self.session.select_next();
            }
            Action::PrevScenario => {
                let _ = self.session.select_prev();
            }
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(PAGE_STEP),
            Action::ScrollDown => self.scroll = self.scroll.saturating_add(PAGE_STEP),
            Action::TraceUp => {
                let visible = self.session.controller().visible_steps();
                let top = self.trace_offset.unwrap_or(visible);
                self.trace_offset = Some(top.saturating_sub(1));
            }
            Action::TraceDown => {
                if let Some(top) = self.trace_offset {
                    self.trace_offset = Some(top + 1);
                }
            }
            Action::Quit => self.quit = true,
        }
        self.drain_stamped()
    }

    /// Advance playback by `dt` and absorb its events and intents.
    ///
    /// Time moves one deadline at a time so each event is absorbed at the
    /// virtual instant it happened. Returns the events, stamped with that
    /// instant, so a caller can report them.
    pub fn tick(&mut self, dt: Duration) -> Vec<(Duration, PlaybackEvent)> {
        let mut events = Vec::new();
        let mut remaining = dt;
        loop {
            let step = match self.session.controller().next_deadline() {
                Some(due) if due <= remaining => due,
                _ => remaining,
            };
            self.session.advance(step);
            remaining -= step;
            events.extend(self.drain_stamped());
            if remaining.is_zero() {
                break;
            }
        }
        events
    }

    fn drain_stamped(&mut self) -> Vec<(Duration, PlaybackEvent)> {
        let at = self.session.controller().now();
        self.drain().into_iter().map(|event| (at, event)).collect()
    }

    fn drain(&mut self) -> Vec<PlaybackEvent> {
        let now = self.session.controller().now();
        let events = self.session.controller_mut().drain_events();
        for event in &events {
            match event {
                PlaybackEvent::Reset => {
                    self.scroll = 0;
                    self.focus_explanation = false;
                    self.trace_offset = None;
                    self.matching_at = None;
                }
                PlaybackEvent::PhaseEntered(Phase::Matching) => self.matching_at = Some(now),
                _ => {}
            }
        }
        for intent in self.session.controller_mut().drain_intents() {
            match intent {
                Intent::PinTraceToBottom => self.trace_offset = None,
                Intent::BringExplanationIntoView => self.focus_explanation = true,
            }
        }
        events
    }

    pub fn trace_offset(&self) -> Option<usize> {
        self.trace_offset
    }

    /// Time spent since `matching` was entered, if it has been this run.
    pub fn since_matching(&self) -> Option<Duration> {
        let at = self.matching_at?;
        Some(self.session.controller().now().saturating_sub(at))
    }

    /// Resolve the page viewport for a laid-out page of `rows` rows.
    ///
    /// A pending explanation focus moves the viewport to `explanation_row`.
    pub fn viewport(
        &mut self,
        rows: usize,
        explanation_row: Option<usize>,
        height: usize,
    ) -> usize {
        if self.focus_explanation
            && let Some(row) = explanation_row
        {
            self.scroll = row;
            self.focus_explanation = false;
        }
        self.scroll = self.scroll.min(rows.saturating_sub(height));
        self.scroll
    }
}
