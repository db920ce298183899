#![forbid(unsafe_code)]

//! Playback logging.
//!
//! The controller logs through `crate::debug!`, `crate::trace!`, and
//! `crate::debug_span!`. With the `tracing` feature these are the `tracing`
//! macros; without it they expand to nothing, and spans to [`NoopSpan`].
//!
//! Field names used across the engine: `scenario` (id), `phase`, `from`/`to`
//! (phase transitions), `step`, `line`, `cancelled` (timers dropped on reset).

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, trace};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Expands to nothing without the `tracing` feature.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing without the `tracing` feature.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Expands to a [`NoopSpan`](crate::logging::NoopSpan) without the `tracing` feature.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Stand-in for `tracing::Span` when logging is compiled out.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;
