#![forbid(unsafe_code)]

//! Phase controller: the playback state machine.
//!
//! [`PhaseController`] owns the [`PlaybackState`], the timer queue, and the
//! two reveal components. All mutation goes through [`run`](PhaseController::run),
//! [`reset`](PhaseController::reset), and [`advance`](PhaseController::advance).
//!
//! # Run sequence
//!
//! ```text
//! run ─► tracing ──(last step)──► +1000ms ─► matching ─► +1800ms ─► explaining ─► +2500ms ─► done
//!          │ 400ms ticks                       patterns,               narrative typewriter
//!          │                                   tests shown             (12ms, unlocks fix)
//! ```
//!
//! # Invariants
//!
//! 1. Phases advance strictly in [`Phase::RUN_ORDER`]; none is skipped or repeated in a run.
//! 2. `run()` outside `Idle`/`Done` changes nothing.
//! 3. At most one pending phase transition, one trace ticker, and one
//!    narrative ticker exist at any time.
//! 4. After `reset()` no timer from the previous run can fire; every pending
//!    timer is cancelled and fired ids are checked against the live handles.
//! 5. `done` is entered on its own dwell timer, whether or not the narrative
//!    has finished; the narrative only unlocks the fix panel.

use std::mem;
use std::time::Duration;

use crate::intent::{Intent, PlaybackEvent};
use crate::phase::{Phase, PlaybackState};
use crate::scenario::Scenario;
use crate::timer::{Fired, TimerId, TimerQueue};
use crate::timing::{EXPLAINING_DWELL, MATCHING_DWELL, NARRATIVE_CADENCE, SETTLE_DELAY};
use crate::trace_player::TracePlayer;
use crate::typewriter::{Typewriter, TypewriterEvent};

/// What a fired timer means to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    TraceTick,
    NarrativeTick,
    EnterMatching,
    EnterExplaining,
    EnterDone,
}

/// Drives one scenario run at a time.
#[derive(Debug)]
pub struct PhaseController {
    state: PlaybackState,
    timers: TimerQueue<Wake>,
    trace: TracePlayer,
    narrative: Typewriter,
    /// The single pending one-shot phase transition.
    transition: Option<TimerId>,
    scenario_id: String,
    root_cause: String,
    intents: Vec<Intent>,
    events: Vec<PlaybackEvent>,
}

impl Default for PhaseController {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseController {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::default(),
            timers: TimerQueue::new(),
            trace: TracePlayer::new(),
            narrative: Typewriter::new().with_cadence(NARRATIVE_CADENCE),
            transition: None,
            scenario_id: String::new(),
            root_cause: String::new(),
            intents: Vec::new(),
            events: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Triggers
    // -----------------------------------------------------------------------

    /// Start a run over `scenario`.
    ///
    /// Returns `false`, without touching any state, when a run is already in
    /// progress. From `Idle` or `Done` the state is reset and `tracing` begins.
    pub fn run(&mut self, scenario: &Scenario) -> bool {
        if self.state.phase.is_busy() {
            crate::debug!(
                scenario = %scenario.id,
                phase = %self.state.phase,
                "run rejected while busy"
            );
            return false;
        }

        let span = crate::debug_span!("playback_run", scenario = %scenario.id);
        let _guard = span.enter();
        self.reset();
        self.scenario_id.clone_from(&scenario.id);
        self.root_cause.clone_from(&scenario.root_cause);
        crate::debug!(
            scenario = %scenario.id,
            steps = scenario.trace.len(),
            "run started"
        );

        self.enter(Phase::Tracing);
        let complete = self
            .trace
            .start(&scenario.trace, &mut self.timers, Wake::TraceTick);
        if complete {
            self.schedule_transition(SETTLE_DELAY, Wake::EnterMatching);
        }
        true
    }

    /// Cancel every pending timer and return to a blank idle state.
    pub fn reset(&mut self) {
        crate::trace!(
            scenario = %self.scenario_id,
            cancelled = self.timers.len(),
            "playback reset"
        );
        self.timers.cancel_all();
        self.transition = None;
        self.trace.reset(&mut self.timers);
        self.narrative.clear(&mut self.timers);
        self.state = PlaybackState::default();
        self.intents.clear();
        self.events.push(PlaybackEvent::Reset);
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Move virtual time forward by `dt`, firing everything that comes due.
    pub fn advance(&mut self, dt: Duration) {
        let deadline = self.timers.now().saturating_add(dt);
        while let Some(fired) = self.timers.pop_due(deadline) {
            self.dispatch(fired);
        }
        self.timers.advance_to(deadline);
    }

    /// Advance until no timers remain, returning the virtual time consumed.
    ///
    /// Every run is finite, so this always terminates.
    pub fn run_until_quiescent(&mut self) -> Duration {
        let start = self.timers.now();
        while let Some(due) = self.timers.next_due() {
            self.advance(due.saturating_sub(self.timers.now()));
        }
        self.timers.now().saturating_sub(start)
    }

    /// Time until the next timer fires, if any is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers
            .next_due()
            .map(|due| due.saturating_sub(self.timers.now()))
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    fn dispatch(&mut self, fired: Fired<Wake>) {
        match fired.kind {
            Wake::TraceTick => self.on_trace_tick(fired.id),
            Wake::NarrativeTick => self.on_narrative_tick(fired.id),
            Wake::EnterMatching | Wake::EnterExplaining | Wake::EnterDone => {
                if self.transition != Some(fired.id) {
                    return;
                }
                self.transition = None;
                self.on_transition(fired.kind);
            }
        }
    }

    fn on_trace_tick(&mut self, id: TimerId) {
        let Some(tick) = self.trace.tick(id, &mut self.timers) else {
            return;
        };
        self.state.visible_steps = tick.visible;
        if let Some(line) = tick.active_line {
            self.state.active_line = Some(line);
        }
        crate::trace!(
            scenario = %self.scenario_id,
            step = tick.visible,
            line = ?tick.active_line,
            "trace step revealed"
        );
        self.events.push(PlaybackEvent::StepRevealed {
            visible: tick.visible,
            line: tick.active_line,
        });
        self.intents.push(Intent::PinTraceToBottom);

        if tick.finished {
            self.schedule_transition(SETTLE_DELAY, Wake::EnterMatching);
        }
    }

    fn on_narrative_tick(&mut self, id: TimerId) {
        if let Some(TypewriterEvent::Completed) = self.narrative.tick(id, &mut self.timers) {
            self.unlock_fix();
        }
    }

    fn on_transition(&mut self, wake: Wake) {
        match wake {
            Wake::EnterMatching => {
                self.enter(Phase::Matching);
                self.state.patterns_visible = true;
                self.state.tests_visible = true;
                self.state.active_line = None;
                self.schedule_transition(MATCHING_DWELL, Wake::EnterExplaining);
            }
            Wake::EnterExplaining => {
                self.enter(Phase::Explaining);
                self.state.explanation_visible = true;
                let root_cause = mem::take(&mut self.root_cause);
                let started = self
                    .narrative
                    .start(root_cause, &mut self.timers, Wake::NarrativeTick);
                self.schedule_transition(EXPLAINING_DWELL, Wake::EnterDone);
                if let Some(TypewriterEvent::Completed) = started {
                    self.unlock_fix();
                }
            }
            Wake::EnterDone => {
                self.enter(Phase::Done);
                self.intents.push(Intent::BringExplanationIntoView);
            }
            Wake::TraceTick | Wake::NarrativeTick => {}
        }
    }

    fn unlock_fix(&mut self) {
        self.state.fix_visible = true;
        crate::debug!(scenario = %self.scenario_id, "fix unlocked");
        self.events.push(PlaybackEvent::FixUnlocked);
    }

    fn schedule_transition(&mut self, delay: Duration, wake: Wake) {
        if let Some(previous) = self.transition.take() {
            self.timers.cancel(previous);
        }
        self.transition = Some(self.timers.after(delay, wake));
    }

    fn enter(&mut self, phase: Phase) {
        crate::debug!(
            scenario = %self.scenario_id,
            from = %self.state.phase,
            to = %phase,
            "phase transition"
        );
        self.state.phase = phase;
        self.events.push(PlaybackEvent::PhaseEntered(phase));
    }

    // -----------------------------------------------------------------------
    // Presentation interface
    // -----------------------------------------------------------------------

    /// Snapshot of the playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn visible_steps(&self) -> usize {
        self.state.visible_steps
    }

    pub fn active_line(&self) -> Option<u32> {
        self.state.active_line
    }

    pub fn patterns_visible(&self) -> bool {
        self.state.patterns_visible
    }

    pub fn tests_visible(&self) -> bool {
        self.state.tests_visible
    }

    pub fn explanation_visible(&self) -> bool {
        self.state.explanation_visible
    }

    pub fn fix_visible(&self) -> bool {
        self.state.fix_visible
    }

    /// Whether `run()` would be accepted right now.
    pub fn can_run(&self) -> bool {
        self.state.phase.can_run()
    }

    /// The root-cause narrative revealer.
    pub fn narrative(&self) -> &Typewriter {
        &self.narrative
    }

    /// Trace ticks handled in the current run.
    pub fn trace_ticks(&self) -> usize {
        self.trace.ticks()
    }

    /// Number of timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether nothing is scheduled to happen.
    pub fn is_quiescent(&self) -> bool {
        self.timers.is_empty()
    }

    /// Id of the scenario of the current or last run.
    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    /// Take the queued presentation intents.
    pub fn drain_intents(&mut self) -> Vec<Intent> {
        mem::take(&mut self.intents)
    }

    /// Take the queued playback events.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        mem::take(&mut self.events)
    }
}
