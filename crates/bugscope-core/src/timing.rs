#![forbid(unsafe_code)]

//! Fixed playback cadences and dwell times.
//!
//! These are part of the walkthrough's pacing and are deliberately not
//! exposed as configuration.

use std::time::Duration;

/// Interval between trace step reveals.
pub const TRACE_STEP_INTERVAL: Duration = Duration::from_millis(400);

/// Pause after the last trace step before entering `matching`.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Dwell in `matching` before entering `explaining`.
pub const MATCHING_DWELL: Duration = Duration::from_millis(1800);

/// Dwell in `explaining` before entering `done`.
///
/// Runs independently of the narrative typewriter; a long narrative may still
/// be revealing when the run is declared done.
pub const EXPLAINING_DWELL: Duration = Duration::from_millis(2500);

/// Per-grapheme cadence of the root-cause narrative.
pub const NARRATIVE_CADENCE: Duration = Duration::from_millis(12);

/// General-purpose typewriter cadence.
pub const DEFAULT_TYPEWRITER_CADENCE: Duration = Duration::from_millis(18);

/// Base delay before the first confidence bar fills.
pub const CONFIDENCE_FILL_BASE: Duration = Duration::from_millis(300);

/// Additional delay per confidence bar.
pub const CONFIDENCE_FILL_STAGGER: Duration = Duration::from_millis(200);
