#![forbid(unsafe_code)]

//! Typewriter reveal: a string appears one grapheme cluster at a time.
//!
//! [`Typewriter`] owns its target text and at most one repeating timer in a
//! caller-supplied [`TimerQueue`]. Each tick of that timer reveals one more
//! grapheme; when the whole text is visible the ticker is cancelled and
//! [`TypewriterEvent::Completed`] is returned exactly once.
//!
//! # Invariants
//!
//! 1. At most one ticker per revealer. Starting or retargeting cancels the old one first.
//! 2. `revealed()` is non-decreasing between restarts and never exceeds `len()`.
//! 3. `Completed` is reported at most once per target text. Restarting clears it.
//! 4. Ticks from a timer other than the current ticker are ignored.
//!
//! # Failure Modes
//!
//! - Empty text: completes on start, with no ticker ever scheduled.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use crate::timer::{TimerId, TimerQueue};
use crate::timing::DEFAULT_TYPEWRITER_CADENCE;

/// Caret glyph appended after the visible text while the revealer is active.
pub const CARET: char = '▌';

/// Progress reported by [`Typewriter::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterEvent {
    /// One more grapheme is visible; carries the revealed count.
    Advanced(usize),
    /// The whole text is visible. Reported once per target.
    Completed,
}

/// Incremental reveal of a target string.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    /// Byte offset just past each grapheme of `text`.
    boundaries: Vec<usize>,
    cursor: usize,
    cadence: Duration,
    ticker: Option<TimerId>,
    active: bool,
    done_reported: bool,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Typewriter {
    /// Create an inactive revealer with the default 18 ms cadence.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            boundaries: Vec::new(),
            cursor: 0,
            cadence: DEFAULT_TYPEWRITER_CADENCE,
            ticker: None,
            active: false,
            done_reported: false,
        }
    }

    /// Set the per-grapheme cadence (builder). Takes effect on the next start.
    #[must_use]
    pub fn with_cadence(mut self, cadence: Duration) -> Self {
        self.cadence = cadence;
        self
    }

    /// Per-grapheme cadence.
    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Start revealing `text` from the beginning.
    ///
    /// Cancels any ticker left over from a previous target. Returns
    /// `Some(Completed)` when `text` is empty, since there is nothing to tick.
    pub fn start<K: Copy>(
        &mut self,
        text: impl Into<String>,
        timers: &mut TimerQueue<K>,
        kind: K,
    ) -> Option<TypewriterEvent> {
        self.cancel_ticker(timers);
        self.text = text.into();
        self.boundaries = self
            .text
            .grapheme_indices(true)
            .map(|(offset, grapheme)| offset + grapheme.len())
            .collect();
        self.cursor = 0;
        self.active = true;
        self.done_reported = false;

        if self.boundaries.is_empty() {
            return self.complete();
        }
        self.ticker = Some(timers.every(self.cadence, kind));
        None
    }

    /// Retarget to `text`, restarting only if it differs from the current target.
    pub fn set_text<K: Copy>(
        &mut self,
        text: &str,
        timers: &mut TimerQueue<K>,
        kind: K,
    ) -> Option<TypewriterEvent> {
        if self.active && self.text == text {
            return None;
        }
        self.start(text, timers, kind)
    }

    /// Handle a fired timer. Ignores timers that are not this revealer's ticker.
    pub fn tick<K: Copy>(
        &mut self,
        id: TimerId,
        timers: &mut TimerQueue<K>,
    ) -> Option<TypewriterEvent> {
        if self.ticker != Some(id) {
            return None;
        }
        self.cursor = (self.cursor + 1).min(self.boundaries.len());
        if self.cursor >= self.boundaries.len() {
            self.cancel_ticker(timers);
            return self.complete();
        }
        Some(TypewriterEvent::Advanced(self.cursor))
    }

    fn complete(&mut self) -> Option<TypewriterEvent> {
        if self.done_reported {
            return None;
        }
        self.done_reported = true;
        Some(TypewriterEvent::Completed)
    }

    /// Stop revealing and forget the target.
    pub fn clear<K: Copy>(&mut self, timers: &mut TimerQueue<K>) {
        self.cancel_ticker(timers);
        self.text.clear();
        self.boundaries.clear();
        self.cursor = 0;
        self.active = false;
        self.done_reported = false;
    }

    fn cancel_ticker<K: Copy>(&mut self, timers: &mut TimerQueue<K>) {
        if let Some(id) = self.ticker.take() {
            timers.cancel(id);
        }
    }

    /// The full target text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The revealed prefix.
    pub fn visible(&self) -> &str {
        match self.cursor {
            0 => "",
            n => &self.text[..self.boundaries[n - 1]],
        }
    }

    /// The revealed prefix followed by the caret while active.
    pub fn rendered(&self) -> String {
        let mut out = String::with_capacity(self.visible().len() + CARET.len_utf8());
        out.push_str(self.visible());
        if self.active {
            out.push(CARET);
        }
        out
    }

    /// Number of graphemes revealed.
    pub fn revealed(&self) -> usize {
        self.cursor
    }

    /// Number of graphemes in the target.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether the target is empty.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Whether a target has been set and not cleared.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the whole target is visible.
    pub fn is_finished(&self) -> bool {
        self.active && self.cursor >= self.boundaries.len()
    }

    /// Whether a ticker is currently scheduled.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Tick;

    fn run(
        typewriter: &mut Typewriter,
        timers: &mut TimerQueue<Tick>,
        dt: Duration,
    ) -> Vec<TypewriterEvent> {
        let deadline = timers.now() + dt;
        let mut events = Vec::new();
        while let Some(fired) = timers.pop_due(deadline) {
            events.extend(typewriter.tick(fired.id, timers));
        }
        timers.advance_to(deadline);
        events
    }

    #[test]
    fn reveals_one_grapheme_per_tick() {
        let mut timers = TimerQueue::new();
        let mut tw = Typewriter::new();
        assert_eq!(tw.start("abc", &mut timers, Tick), None);
        assert_eq!(tw.visible(), "");

        let events = run(&mut tw, &mut timers, Duration::from_millis(18));
        assert_eq!(events, vec![TypewriterEvent::Advanced(1)]);
        assert_eq!(tw.visible(), "a");
        assert_eq!(tw.rendered(), "a▌");
    }

    #[test]
    fn completes_exactly_once_and_stops_ticking() {
        let mut timers = TimerQueue::new();
        let mut tw = Typewriter::new().with_cadence(Duration::from_millis(12));
        let _ = tw.start("hey", &mut timers, Tick);
        let events = run(&mut tw, &mut timers, Duration::from_secs(1));
        assert_eq!(
            events,
            vec![
                TypewriterEvent::Advanced(1),
                TypewriterEvent::Advanced(2),
                TypewriterEvent::Completed,
            ]
        );
        assert!(tw.is_finished());
        assert!(!tw.is_ticking());
        assert!(timers.is_empty());
        assert_eq!(tw.visible(), "hey");
    }

    #[test]
    fn counts_grapheme_clusters_not_bytes() {
        let mut timers = TimerQueue::new();
        let mut tw = Typewriter::new();
        let _ = tw.start("é⚠️x", &mut timers, Tick);
        assert_eq!(tw.len(), 3);
        let _ = run(&mut tw, &mut timers, Duration::from_millis(36));
        assert_eq!(tw.visible(), "é⚠️");
    }

    #[test]
    fn empty_text_completes_on_start() {
        let mut timers = TimerQueue::new();
        let mut tw = Typewriter::new();
        assert_eq!(
            tw.start("", &mut timers, Tick),
            Some(TypewriterEvent::Completed)
        );
        assert!(timers.is_empty());
        assert!(tw.is_finished());
    }

    #[test]
    fn retarget_restarts_and_cancels_old_ticker() {
        let mut timers = TimerQueue::new();
        let mut tw = Typewriter::new();
        let _ = tw.start("first target", &mut timers, Tick);
        let _ = run(&mut tw, &mut timers, Duration::from_millis(18 * 4));
        assert_eq!(tw.revealed(), 4);

        let _ = tw.set_text("second", &mut timers, Tick);
        assert_eq!(tw.revealed(), 0);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn set_same_text_keeps_progress() {
        let mut timers = TimerQueue::new();
        let mut tw = Typewriter::new();
        let _ = tw.start("same", &mut timers, Tick);
        let _ = run(&mut tw, &mut timers, Duration::from_millis(18 * 2));
        assert_eq!(tw.set_text("same", &mut timers, Tick), None);
        assert_eq!(tw.revealed(), 2);
    }

    #[test]
    fn stale_ticker_is_ignored() {
        let mut timers = TimerQueue::new();
        let mut tw = Typewriter::new();
        let _ = tw.start("abc", &mut timers, Tick);
        let stale = timers.every(Duration::from_millis(1), Tick);
        assert_eq!(tw.tick(stale, &mut timers), None);
        assert_eq!(tw.revealed(), 0);
    }

    #[test]
    fn clear_drops_caret_and_ticker() {
        let mut timers = TimerQueue::new();
        let mut tw = Typewriter::new();
        let _ = tw.start("abc", &mut timers, Tick);
        tw.clear(&mut timers);
        assert!(timers.is_empty());
        assert_eq!(tw.rendered(), "");
        assert!(!tw.is_active());
    }
}
