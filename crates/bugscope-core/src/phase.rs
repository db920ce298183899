#![forbid(unsafe_code)]

//! Playback phases and the mutable playback state.

use std::fmt;

/// A stage of the guided reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Phase {
    #[default]
    Idle,
    Tracing,
    Matching,
    Explaining,
    Done,
}

impl Phase {
    /// The phases a run moves through, in order, after leaving `Idle`.
    pub const RUN_ORDER: [Phase; 4] = [
        Phase::Tracing,
        Phase::Matching,
        Phase::Explaining,
        Phase::Done,
    ];

    /// Whether a run may be triggered from this phase.
    pub fn can_run(self) -> bool {
        matches!(self, Phase::Idle | Phase::Done)
    }

    /// Whether a run is in progress.
    pub fn is_busy(self) -> bool {
        !self.can_run()
    }

    /// The phase a run moves to after this one.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::Tracing),
            Phase::Tracing => Some(Phase::Matching),
            Phase::Matching => Some(Phase::Explaining),
            Phase::Explaining => Some(Phase::Done),
            Phase::Done => None,
        }
    }

    /// Status label shown in the phase indicator.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "STANDBY",
            Phase::Tracing => "TRACING",
            Phase::Matching => "MATCHING",
            Phase::Explaining => "ANALYZING",
            Phase::Done => "COMPLETE",
        }
    }

    /// Status glyph shown next to the label.
    pub fn glyph(self) -> char {
        match self {
            Phase::Idle => '○',
            Phase::Done => '✓',
            _ => '◉',
        }
    }

    fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Tracing => "tracing",
            Phase::Matching => "matching",
            Phase::Explaining => "explaining",
            Phase::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress through one scenario run.
///
/// Owned by exactly one [`PhaseController`](crate::PhaseController); the
/// presentation layer reads a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub phase: Phase,
    /// Trace steps currently revealed.
    pub visible_steps: usize,
    /// Source line of the newest revealed step while tracing.
    pub active_line: Option<u32>,
    pub patterns_visible: bool,
    pub tests_visible: bool,
    pub explanation_visible: bool,
    pub fix_visible: bool,
}

impl PlaybackState {
    /// Whether any reveal flag is set.
    pub fn any_revealed(&self) -> bool {
        self.patterns_visible || self.tests_visible || self.explanation_visible || self.fix_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_order_follows_next() {
        let mut phase = Phase::Idle;
        let mut walked = Vec::new();
        while let Some(next) = phase.next() {
            walked.push(next);
            phase = next;
        }
        assert_eq!(walked, Phase::RUN_ORDER);
    }

    #[test]
    fn only_idle_and_done_accept_runs() {
        assert!(Phase::Idle.can_run());
        assert!(Phase::Done.can_run());
        assert!(Phase::Tracing.is_busy());
        assert!(Phase::Matching.is_busy());
        assert!(Phase::Explaining.is_busy());
    }

    #[test]
    fn labels_and_glyphs() {
        assert_eq!(Phase::Explaining.label(), "ANALYZING");
        assert_eq!(Phase::Idle.glyph(), '○');
        assert_eq!(Phase::Done.glyph(), '✓');
        assert_eq!(Phase::Matching.to_string(), "matching");
    }

    #[test]
    fn default_state_is_blank() {
        let state = PlaybackState::default();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.visible_steps, 0);
        assert_eq!(state.active_line, None);
        assert!(!state.any_revealed());
    }
}
