//! Property tests for the playback state machine.

use std::time::Duration;

use bugscope_core::timing::{MATCHING_DWELL, SETTLE_DELAY, TRACE_STEP_INTERVAL};
use bugscope_core::{
    Phase, PhaseController, PlaybackEvent, PlaybackState, Scenario, TimerQueue, TraceStep,
    Typewriter,
};
use proptest::prelude::*;

fn arb_step() -> impl Strategy<Value = TraceStep> {
    (1u32..40, any::<bool>(), proptest::option::of("[a-z]{1,6}")).prop_map(
        |(line, is_error, variable)| TraceStep {
            line,
            variable,
            is_error,
            ..TraceStep::default()
        },
    )
}

fn arb_scenario() -> impl Strategy<Value = Scenario> {
    (
        proptest::collection::vec(arb_step(), 0..12),
        "[ -~]{0,80}",
    )
        .prop_map(|(trace, root_cause)| Scenario {
            id: "generated".into(),
            trace,
            root_cause,
            ..Scenario::default()
        })
}

fn phases_entered(events: &[PlaybackEvent]) -> Vec<Phase> {
    events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::PhaseEntered(p) => Some(*p),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn completed_run_shows_every_step_and_clears_active_line(sc in arb_scenario()) {
        let mut ctl = PhaseController::new();
        prop_assert!(ctl.run(&sc));
        ctl.run_until_quiescent();

        prop_assert_eq!(ctl.phase(), Phase::Done);
        prop_assert_eq!(ctl.visible_steps(), sc.trace.len());
        prop_assert_eq!(ctl.active_line(), None);
        prop_assert_eq!(ctl.trace_ticks(), sc.trace.len());
        prop_assert!(ctl.patterns_visible() && ctl.tests_visible() && ctl.explanation_visible());
        prop_assert!(ctl.fix_visible());
        prop_assert_eq!(ctl.narrative().visible(), sc.root_cause.as_str());
    }

    #[test]
    fn phases_follow_run_order_exactly_once(sc in arb_scenario()) {
        let mut ctl = PhaseController::new();
        ctl.run(&sc);
        ctl.run_until_quiescent();
        let events = ctl.drain_events();
        prop_assert_eq!(events.first(), Some(&PlaybackEvent::Reset));
        prop_assert_eq!(phases_entered(&events), Phase::RUN_ORDER.to_vec());
    }

    #[test]
    fn step_reveals_count_up_by_one(sc in arb_scenario()) {
        let mut ctl = PhaseController::new();
        ctl.run(&sc);
        ctl.run_until_quiescent();
        let visible: Vec<usize> = ctl
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                PlaybackEvent::StepRevealed { visible, .. } => Some(visible),
                _ => None,
            })
            .collect();
        prop_assert_eq!(visible, (1..=sc.trace.len()).collect::<Vec<_>>());
    }

    #[test]
    fn busy_rerun_changes_nothing(sc in arb_scenario(), offset_ms in 0u64..6000) {
        let mut ctl = PhaseController::new();
        ctl.run(&sc);
        ctl.advance(Duration::from_millis(offset_ms));
        prop_assume!(ctl.phase().is_busy());

        let before: PlaybackState = ctl.state();
        let pending = ctl.pending_timers();
        let revealed = ctl.narrative().revealed();
        let _ = ctl.drain_events();

        prop_assert!(!ctl.run(&sc));
        prop_assert_eq!(ctl.state(), before);
        prop_assert_eq!(ctl.pending_timers(), pending);
        prop_assert_eq!(ctl.narrative().revealed(), revealed);
        prop_assert!(ctl.drain_events().is_empty());
    }

    #[test]
    fn reset_silences_outstanding_timers(sc in arb_scenario(), offset_ms in 0u64..8000) {
        let mut ctl = PhaseController::new();
        ctl.run(&sc);
        ctl.advance(Duration::from_millis(offset_ms));
        ctl.reset();
        prop_assert!(ctl.drain_intents().is_empty());
        let _ = ctl.drain_events();

        ctl.advance(Duration::from_secs(60));
        prop_assert_eq!(ctl.state(), PlaybackState::default());
        prop_assert!(ctl.drain_events().is_empty());
        prop_assert!(ctl.drain_intents().is_empty());
        prop_assert_eq!(ctl.narrative().revealed(), 0);
    }

    #[test]
    fn tracing_lasts_one_interval_per_step(sc in arb_scenario()) {
        prop_assume!(!sc.trace.is_empty());
        let steps = sc.trace.len() as u32;
        let mut ctl = PhaseController::new();
        ctl.run(&sc);
        ctl.advance(TRACE_STEP_INTERVAL * steps + SETTLE_DELAY - Duration::from_millis(1));
        prop_assert_eq!(ctl.phase(), Phase::Tracing);
        ctl.advance(Duration::from_millis(1));
        prop_assert_eq!(ctl.phase(), Phase::Matching);
        ctl.advance(MATCHING_DWELL);
        prop_assert_eq!(ctl.phase(), Phase::Explaining);
    }

    #[test]
    fn typewriter_is_monotonic_and_restartable(
        text in "[ -~]{1,60}",
        other in "[ -~]{1,60}",
        steps in proptest::collection::vec(1u64..50, 1..40),
        restart_at in 0usize..40,
    ) {
        #[derive(Clone, Copy)]
        struct Tick;
        let mut timers = TimerQueue::new();
        let mut tw = Typewriter::new();
        let _ = tw.start(text.as_str(), &mut timers, Tick);
        let mut last = 0;
        for (i, ms) in steps.iter().enumerate() {
            if i == restart_at && other != text {
                let _ = tw.set_text(&other, &mut timers, Tick);
                prop_assert_eq!(tw.revealed(), 0);
                last = 0;
            }
            let deadline = timers.now() + Duration::from_millis(*ms);
            while let Some(fired) = timers.pop_due(deadline) {
                let _ = tw.tick(fired.id, &mut timers);
            }
            timers.advance_to(deadline);
            prop_assert!(tw.revealed() >= last);
            prop_assert!(tw.revealed() <= tw.len());
            prop_assert!(timers.len() <= 1);
            last = tw.revealed();
        }
    }
}

#[test]
fn empty_trace_reaches_matching_without_a_tick() {
    let sc = Scenario {
        id: "empty".into(),
        root_cause: "nothing ran".into(),
        ..Scenario::default()
    };
    let mut ctl = PhaseController::new();
    assert!(ctl.run(&sc));
    ctl.advance(SETTLE_DELAY);
    assert_eq!(ctl.phase(), Phase::Matching);
    assert_eq!(ctl.trace_ticks(), 0);
    assert!(
        !ctl.drain_events()
            .iter()
            .any(|e| matches!(e, PlaybackEvent::StepRevealed { .. }))
    );
}
