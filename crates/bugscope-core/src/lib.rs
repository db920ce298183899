#![forbid(unsafe_code)]

//! BugScope Core
//!
//! The scenario playback engine behind the BugScope walkthroughs. A run
//! reveals a canned bug scenario in phases: the execution trace one step at a
//! time, then pattern matches and intent tests, then a typewritten root-cause
//! narrative, and finally the fix.
//!
//! # Key Components
//!
//! - [`TimerQueue`] - Deterministic virtual-clock timers with cancellation handles
//! - [`Typewriter`] - Reveals a string one grapheme at a time
//! - [`TracePlayer`] - Reveals trace steps one at a time, tracking the active line
//! - [`PhaseController`] - The `idle → tracing → … → done` phase state machine
//! - [`Session`] - Scenario selection bound to one controller
//!
//! # Time
//!
//! Nothing in this crate reads the wall clock. Callers drive time forward with
//! [`PhaseController::advance`] (or [`Session::advance`]); the demo front end
//! feeds it measured frame deltas, tests feed it exact durations.

pub mod catalog;
pub mod controller;
pub mod intent;
pub mod logging;
pub mod phase;
pub mod scenario;
pub mod session;
pub mod timer;
pub mod timing;
pub mod trace_player;
pub mod typewriter;
pub mod view;

pub use catalog::{Catalog, CatalogError};
pub use controller::PhaseController;
pub use intent::{Intent, PlaybackEvent};
pub use phase::{Phase, PlaybackState};
pub use scenario::{PatternMatch, Scenario, TestResult, TraceStep};
pub use session::{SelectError, Session};
pub use timer::{Fired, TimerId, TimerQueue};
pub use trace_player::{TracePlayer, TraceTick};
pub use typewriter::{CARET, Typewriter, TypewriterEvent};

#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace};
