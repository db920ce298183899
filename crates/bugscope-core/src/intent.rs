#![forbid(unsafe_code)]

//! Outputs the controller queues for the presentation layer.
//!
//! Both queues are drained by the caller after each advance, in the same
//! "collect during tick, drain afterwards" style as animation callbacks.

use crate::phase::Phase;

/// Presentation-only requests. The core says what, never how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Keep the trace view scrolled to its newest step.
    PinTraceToBottom,
    /// Bring the root-cause panel into view.
    BringExplanationIntoView,
}

/// Observable milestones of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Playback state returned to idle and all timers were cancelled.
    Reset,
    /// The controller entered a new phase.
    PhaseEntered(Phase),
    /// A trace step became visible.
    StepRevealed {
        /// Steps visible after this reveal.
        visible: usize,
        line: Option<u32>,
    },
    /// The narrative finished revealing and the fix panel unlocked.
    FixUnlocked,
}
