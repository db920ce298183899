#![forbid(unsafe_code)]

//! Scenario selection bound to a single phase controller.
//!
//! A [`Session`] is what a front end holds: the catalog, the currently
//! selected scenario, and the one [`PhaseController`] that plays it. Every
//! successful selection, including reselecting the current scenario, resets
//! the controller.

use std::fmt;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::controller::PhaseController;
use crate::scenario::Scenario;

/// Errors from [`Session::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// No scenario with this id exists in the catalog.
    UnknownScenario(String),
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::UnknownScenario(id) => write!(f, "unknown scenario: {id}"),
        }
    }
}

impl std::error::Error for SelectError {}

/// Selector plus controller for one interactive session.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    selected: Option<usize>,
    controller: PhaseController,
}

impl Session {
    /// A session with nothing selected.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selected: None,
            controller: PhaseController::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The selected scenario, if any.
    pub fn current(&self) -> Option<&Scenario> {
        self.selected.and_then(|idx| self.catalog.at(idx))
    }

    /// Select `id` and reset playback.
    ///
    /// An unknown id leaves both the selection and playback untouched.
    pub fn select(&mut self, id: &str) -> Result<&Scenario, SelectError> {
        let idx = self
            .catalog
            .position(id)
            .ok_or_else(|| SelectError::UnknownScenario(id.to_string()))?;
        self.selected = Some(idx);
        self.controller.reset();
        crate::debug!(scenario = id, "scenario selected");
        self.catalog
            .at(idx)
            .ok_or_else(|| SelectError::UnknownScenario(id.to_string()))
    }

    /// Select the scenario after the current one, wrapping.
    pub fn select_next(&mut self) -> Option<&Scenario> {
        let id = self.catalog.next_id(self.current_id())?.to_string();
        self.select(&id).ok()
    }

    /// Select the scenario before the current one, wrapping.
    pub fn select_prev(&mut self) -> Option<&Scenario> {
        let id = self.catalog.prev_id(self.current_id())?.to_string();
        self.select(&id).ok()
    }

    /// Drop the selection and reset playback.
    pub fn deselect(&mut self) {
        self.selected = None;
        self.controller.reset();
    }

    fn current_id(&self) -> Option<&str> {
        self.current().map(|s| s.id.as_str())
    }

    /// Trigger a run of the selected scenario.
    ///
    /// Returns `false` when nothing is selected or a run is in progress.
    pub fn run(&mut self) -> bool {
        let Some(scenario) = self.selected.and_then(|idx| self.catalog.at(idx)) else {
            return false;
        };
        self.controller.run(scenario)
    }

    /// Reset playback, keeping the selection.
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Move virtual time forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.controller.advance(dt);
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PhaseController {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;
    use crate::scenario::TraceStep;

    fn catalog() -> Catalog {
        let make = |id: &str, steps: usize| Scenario {
            id: id.into(),
            trace: (1..=steps as u32).map(TraceStep::at).collect(),
            root_cause: "because".into(),
            ..Scenario::default()
        };
        Catalog::new(vec![make("one", 2), make("two", 3)]).unwrap()
    }

    #[test]
    fn run_without_selection_is_refused() {
        let mut session = Session::new(catalog());
        assert!(!session.run());
        assert_eq!(session.controller().phase(), Phase::Idle);
    }

    #[test]
    fn select_resets_running_playback() {
        let mut session = Session::new(catalog());
        session.select("one").unwrap();
        assert!(session.run());
        session.advance(Duration::from_millis(450));
        assert_eq!(session.controller().visible_steps(), 1);

        session.select("two").unwrap();
        assert_eq!(session.controller().phase(), Phase::Idle);
        session.advance(Duration::from_secs(10));
        assert_eq!(session.controller().visible_steps(), 0);
    }

    #[test]
    fn reselecting_same_scenario_also_resets() {
        let mut session = Session::new(catalog());
        session.select("one").unwrap();
        session.run();
        session.advance(Duration::from_millis(450));
        session.select("one").unwrap();
        assert_eq!(session.controller().phase(), Phase::Idle);
        assert!(session.controller().is_quiescent());
    }

    #[test]
    fn unknown_id_changes_nothing() {
        let mut session = Session::new(catalog());
        session.select("one").unwrap();
        session.run();
        let err = session.select("nope").unwrap_err();
        assert_eq!(err, SelectError::UnknownScenario("nope".into()));
        assert_eq!(session.current().map(|s| s.id.as_str()), Some("one"));
        assert_eq!(session.controller().phase(), Phase::Tracing);
    }

    #[test]
    fn next_and_prev_cycle() {
        let mut session = Session::new(catalog());
        assert_eq!(session.select_next().map(|s| s.id.clone()), Some("one".into()));
        assert_eq!(session.select_next().map(|s| s.id.clone()), Some("two".into()));
        assert_eq!(session.select_next().map(|s| s.id.clone()), Some("one".into()));
        assert_eq!(session.select_prev().map(|s| s.id.clone()), Some("two".into()));
        session.deselect();
        assert!(session.current().is_none());
    }
}
