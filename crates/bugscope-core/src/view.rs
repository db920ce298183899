#![forbid(unsafe_code)]

//! Presentation view-models.
//!
//! Pure functions from a scenario and playback state to what each panel
//! should show. No styling lives here; a renderer maps roles and tiers to
//! its own colors.

use std::time::Duration;

use crate::phase::{Phase, PlaybackState};
use crate::scenario::{Scenario, TestResult, TraceStep};
use crate::timing::{CONFIDENCE_FILL_BASE, CONFIDENCE_FILL_STAGGER};

// ---------------------------------------------------------------------------
// Code panel
// ---------------------------------------------------------------------------

/// How a source line should be emphasized.
///
/// When several apply, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// The line of the newest trace step while tracing.
    Active,
    /// The scenario's error line.
    Error,
    /// One of the scenario's highlighted lines.
    Highlighted,
    Plain,
}

/// One numbered source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLine<'a> {
    /// 1-based line number.
    pub number: u32,
    pub text: &'a str,
    pub role: LineRole,
}

/// Split the source into numbered lines and assign each a role.
///
/// Line references outside the source match nothing.
pub fn code_lines<'a>(scenario: &'a Scenario, active_line: Option<u32>) -> Vec<CodeLine<'a>> {
    scenario
        .source
        .split('\n')
        .enumerate()
        .map(|(idx, text)| {
            let number = idx as u32 + 1;
            let role = if active_line == Some(number) {
                LineRole::Active
            } else if number == scenario.error_line {
                LineRole::Error
            } else if scenario.is_highlighted(number) {
                LineRole::Highlighted
            } else {
                LineRole::Plain
            };
            CodeLine { number, text, role }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Trace panel
// ---------------------------------------------------------------------------

/// The revealed prefix of the trace.
pub fn visible_trace<'a>(scenario: &'a Scenario, state: &PlaybackState) -> &'a [TraceStep] {
    let end = state.visible_steps.min(scenario.trace.len());
    &scenario.trace[..end]
}

/// `"{visible}/{total} steps captured"`.
pub fn trace_counter(visible: usize, total: usize) -> String {
    format!("{visible}/{total} steps captured")
}

/// Whether the trace panel shows its "awaiting input" placeholder.
pub fn awaiting_input(state: &PlaybackState) -> bool {
    state.phase == Phase::Idle && state.visible_steps == 0
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Where a phase stands relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Complete,
}

/// Status of each run phase for the header indicator.
pub fn phase_indicator(current: Phase) -> [(Phase, StepStatus); 4] {
    let position = Phase::RUN_ORDER.iter().position(|&p| p == current);
    let mut out = [(Phase::Tracing, StepStatus::Pending); 4];
    for (i, phase) in Phase::RUN_ORDER.into_iter().enumerate() {
        let status = match position {
            Some(pos) if i < pos => StepStatus::Complete,
            Some(pos) if i == pos => StepStatus::Active,
            _ => StepStatus::Pending,
        };
        out[i] = (phase, status);
    }
    out
}

/// The run trigger button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunButton {
    pub label: &'static str,
    pub enabled: bool,
}

impl RunButton {
    pub fn for_phase(phase: Phase) -> Self {
        let label = match phase {
            Phase::Idle => "Initialize Debug",
            Phase::Done => "Reinitialize",
            _ => "Processing...",
        };
        Self {
            label,
            enabled: phase.can_run(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern and test panels
// ---------------------------------------------------------------------------

/// Emphasis bucket for a pattern's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    /// Above 95%.
    High,
    /// Above 90%.
    Elevated,
    Moderate,
}

impl ConfidenceTier {
    pub fn for_confidence(confidence: u8) -> Self {
        match confidence {
            c if c > 95 => ConfidenceTier::High,
            c if c > 90 => ConfidenceTier::Elevated,
            _ => ConfidenceTier::Moderate,
        }
    }
}

/// Delay before the `index`th confidence bar fills.
pub fn confidence_fill_delay(index: usize) -> Duration {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    CONFIDENCE_FILL_BASE.saturating_add(CONFIDENCE_FILL_STAGGER.saturating_mul(index))
}

/// Pass/fail counts of a scenario's intent tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
}

impl TestSummary {
    pub fn of(tests: &[TestResult]) -> Self {
        let passed = tests.iter().filter(|t| t.passed).count();
        Self {
            passed,
            failed: tests.len() - passed,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}
