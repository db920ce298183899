#![forbid(unsafe_code)]

//! Step-by-step trace reveal.
//!
//! The player copies the line numbers of the trace it is given at start, so
//! it never holds on to the scenario, and reveals one step per tick of its
//! repeating timer.

use crate::scenario::TraceStep;
use crate::timer::{TimerId, TimerQueue};
use crate::timing::TRACE_STEP_INTERVAL;

/// Result of one trace tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceTick {
    /// Steps now visible (the cursor).
    pub visible: usize,
    /// Line of the newest visible step, if it exists.
    pub active_line: Option<u32>,
    /// Whether this tick revealed the last step.
    pub finished: bool,
}

/// Reveals trace steps one at a time.
#[derive(Debug, Clone, Default)]
pub struct TracePlayer {
    lines: Vec<u32>,
    cursor: usize,
    ticker: Option<TimerId>,
    ticks: usize,
}

impl TracePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start revealing `steps` from the first one.
    ///
    /// Returns `true` if the trace is already complete (empty), in which case
    /// no ticker is scheduled.
    pub fn start<K: Copy>(
        &mut self,
        steps: &[TraceStep],
        timers: &mut TimerQueue<K>,
        kind: K,
    ) -> bool {
        self.stop(timers);
        self.lines = steps.iter().map(|step| step.line).collect();
        self.cursor = 0;
        self.ticks = 0;
        if self.lines.is_empty() {
            return true;
        }
        self.ticker = Some(timers.every(TRACE_STEP_INTERVAL, kind));
        false
    }

    /// Handle a fired timer. Ignores timers that are not this player's ticker.
    pub fn tick<K: Copy>(&mut self, id: TimerId, timers: &mut TimerQueue<K>) -> Option<TraceTick> {
        if self.ticker != Some(id) {
            return None;
        }
        self.ticks += 1;
        self.cursor += 1;
        let active_line = self.lines.get(self.cursor - 1).copied();
        let finished = self.cursor >= self.lines.len();
        if finished {
            self.stop(timers);
        }
        Some(TraceTick {
            visible: self.cursor,
            active_line,
            finished,
        })
    }

    /// Cancel the ticker, leaving the cursor where it is.
    pub fn stop<K: Copy>(&mut self, timers: &mut TimerQueue<K>) {
        if let Some(id) = self.ticker.take() {
            timers.cancel(id);
        }
    }

    /// Cancel the ticker and rewind to an empty trace.
    pub fn reset<K: Copy>(&mut self, timers: &mut TimerQueue<K>) {
        self.stop(timers);
        self.lines.clear();
        self.cursor = 0;
        self.ticks = 0;
    }

    /// Steps revealed so far.
    pub fn visible(&self) -> usize {
        self.cursor
    }

    /// Total steps in the current trace.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Ticks handled since the last start.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Clone, Copy)]
    struct Tick;

    fn steps(lines: &[u32]) -> Vec<TraceStep> {
        lines.iter().map(|&line| TraceStep::at(line)).collect()
    }

    #[test]
    fn reveals_on_cadence_and_stops() {
        let mut timers = TimerQueue::new();
        let mut player = TracePlayer::new();
        assert!(!player.start(&steps(&[1, 3, 2]), &mut timers, Tick));

        let mut ticks = Vec::new();
        while let Some(fired) = timers.pop_due(Duration::from_secs(10)) {
            ticks.extend(player.tick(fired.id, &mut timers));
        }
        assert_eq!(
            ticks.iter().map(|t| t.active_line).collect::<Vec<_>>(),
            vec![Some(1), Some(3), Some(2)]
        );
        assert!(ticks[2].finished);
        assert_eq!(timers.now(), TRACE_STEP_INTERVAL * 3);
        assert_eq!(player.ticks(), 3);
        assert!(!player.is_ticking());
    }

    #[test]
    fn empty_trace_is_complete_without_ticker() {
        let mut timers: TimerQueue<Tick> = TimerQueue::new();
        let mut player = TracePlayer::new();
        assert!(player.start(&[], &mut timers, Tick));
        assert!(timers.is_empty());
        assert_eq!(player.ticks(), 0);
    }

    #[test]
    fn restart_replaces_ticker() {
        let mut timers = TimerQueue::new();
        let mut player = TracePlayer::new();
        player.start(&steps(&[1, 2]), &mut timers, Tick);
        player.start(&steps(&[5]), &mut timers, Tick);
        assert_eq!(timers.len(), 1);
        assert_eq!(player.len(), 1);
    }

    #[test]
    fn foreign_timer_is_ignored() {
        let mut timers = TimerQueue::new();
        let mut player = TracePlayer::new();
        player.start(&steps(&[1, 2]), &mut timers, Tick);
        let other = timers.after(Duration::from_millis(1), Tick);
        assert_eq!(player.tick(other, &mut timers), None);
        assert_eq!(player.visible(), 0);
    }
}
