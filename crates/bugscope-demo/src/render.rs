#![forbid(unsafe_code)]

//! Page layout and painting.
//!
//! [`page`] turns the app state into a list of styled rows using the core
//! view-models; [`paint`] writes a window of those rows to the terminal.

use std::io::{self, Write};
use std::time::Duration;

use bugscope_core::view::{self, ConfidenceTier, LineRole, RunButton, StepStatus, TestSummary};
use bugscope_core::{Phase, PlaybackState, Scenario, Typewriter};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;

/// Trace rows shown at once.
pub const TRACE_ROWS: usize = 6;
/// Cells in a confidence bar.
pub const BAR_WIDTH: usize = 20;

/// Semantic color of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Dim,
    Title,
    Accent,
    Active,
    Error,
    Highlight,
    Pass,
    Fail,
    Tier(ConfidenceTier),
}

impl Tone {
    fn color(self) -> Color {
        match self {
            Tone::Plain => Color::Reset,
            Tone::Dim => Color::DarkGrey,
            Tone::Title => Color::White,
            Tone::Accent => Color::Cyan,
            Tone::Active => Color::Yellow,
            Tone::Error | Tone::Fail => Color::Red,
            Tone::Highlight => Color::Magenta,
            Tone::Pass => Color::Green,
            Tone::Tier(ConfidenceTier::High) => Color::Red,
            Tone::Tier(ConfidenceTier::Elevated) => Color::Yellow,
            Tone::Tier(ConfidenceTier::Moderate) => Color::Blue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub tone: Tone,
    pub text: String,
}

/// One row of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub spans: Vec<Span>,
}

impl Row {
    fn new() -> Self {
        Self::default()
    }

    fn styled(tone: Tone, text: impl Into<String>) -> Self {
        Self::new().with(tone, text)
    }

    fn with(mut self, tone: Tone, text: impl Into<String>) -> Self {
        self.spans.push(Span {
            tone,
            text: text.into(),
        });
        self
    }

    /// The row's text without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A laid-out page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub rows: Vec<Row>,
    /// Row at which the root-cause panel starts, when shown.
    pub explanation_row: Option<usize>,
}

impl Page {
    fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    fn heading(&mut self, title: &str) {
        self.rows.push(Row::new());
        self.rows.push(Row::styled(Tone::Title, format!("── {title} ")));
    }

    /// Whether any row contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.rows.iter().any(|r| r.text().contains(needle))
    }
}

/// Lay out the full page for the app's current state.
pub fn page(app: &App) -> Page {
    let session = app.session();
    let ctl = session.controller();
    let state = ctl.state();
    let mut page = Page::default();

    header(&mut page, state.phase);
    picker(&mut page, app);

    let Some(sc) = session.current() else {
        page.push(Row::new());
        page.push(Row::styled(Tone::Dim, "No scenario selected."));
        return page;
    };

    code(&mut page, sc, state.active_line);
    trace(&mut page, sc, &state, app.trace_offset());
    if state.patterns_visible {
        patterns(&mut page, sc, app.since_matching());
    }
    if state.tests_visible {
        tests(&mut page, sc);
    }
    if state.explanation_visible {
        page.explanation_row = Some(page.rows.len());
        explanation(&mut page, sc, ctl.narrative());
    }
    if state.fix_visible {
        fix(&mut page, sc);
    }
    page
}

fn header(page: &mut Page, phase: Phase) {
    let button = RunButton::for_phase(phase);
    let button_tone = if button.enabled { Tone::Accent } else { Tone::Dim };
    page.push(
        Row::styled(Tone::Title, "BugScope  ")
            .with(Tone::Dim, format!("{} {}  ", phase.glyph(), phase.label()))
            .with(button_tone, format!("[ {} ]", button.label)),
    );

    let mut steps = Row::new();
    for (i, (step, status)) in view::phase_indicator(phase).into_iter().enumerate() {
        if i > 0 {
            steps = steps.with(Tone::Dim, " ─ ");
        }
        let (glyph, tone) = match status {
            StepStatus::Complete => ('✓', Tone::Pass),
            StepStatus::Active => ('◉', Tone::Active),
            StepStatus::Pending => ('○', Tone::Dim),
        };
        steps = steps.with(tone, format!("{glyph} {}", step.label()));
    }
    page.push(steps);
}

fn picker(page: &mut Page, app: &App) {
    let current = app.current().map(|s| s.id.as_str());
    let mut row = Row::new();
    for sc in app.session().catalog().iter() {
        let selected = current == Some(sc.id.as_str());
        let tone = if selected { Tone::Accent } else { Tone::Dim };
        let mark = if selected { '▸' } else { ' ' };
        row = row.with(tone, format!("{mark}{} {}  ", sc.icon, sc.title));
    }
    page.push(row);
    if let Some(sc) = app.current() {
        page.push(Row::styled(Tone::Dim, format!("  {}", sc.category)));
    }
}

fn code(page: &mut Page, sc: &Scenario, active_line: Option<u32>) {
    page.heading("Source");
    for line in view::code_lines(sc, active_line) {
        let (marker, tone) = match line.role {
            LineRole::Active => ('▶', Tone::Active),
            LineRole::Error => ('✗', Tone::Error),
            LineRole::Highlighted => ('•', Tone::Highlight),
            LineRole::Plain => (' ', Tone::Plain),
        };
        page.push(
            Row::styled(Tone::Dim, format!("{:>3} ", line.number))
                .with(tone, format!("{marker} {}", line.text)),
        );
    }
}

fn trace(page: &mut Page, sc: &Scenario, state: &PlaybackState, offset: Option<usize>) {
    page.heading("Execution Trace");
    let steps = view::visible_trace(sc, state);
    page.push(Row::styled(
        Tone::Dim,
        view::trace_counter(steps.len(), sc.trace.len()),
    ));
    if view::awaiting_input(state) {
        page.push(Row::styled(Tone::Dim, "  awaiting input..."));
        return;
    }

    let max_top = steps.len().saturating_sub(TRACE_ROWS);
    let top = offset.map_or(max_top, |o| o.min(max_top));
    for (i, step) in steps.iter().enumerate().skip(top).take(TRACE_ROWS) {
        let tone = if step.is_error { Tone::Error } else { Tone::Plain };
        let mut row = Row::styled(Tone::Dim, format!("  #{:<2} L{:<3} ", i + 1, step.line));
        if let Some(var) = &step.variable {
            let value = step.value.as_deref().unwrap_or("");
            row = row.with(tone, format!("{var} = {value}"));
        }
        if let Some(note) = &step.note {
            row = row.with(Tone::Dim, format!("  // {note}"));
        }
        page.push(row);
    }
}

fn patterns(page: &mut Page, sc: &Scenario, since_matching: Option<Duration>) {
    page.heading("Pattern Matches");
    let elapsed = since_matching.unwrap_or_default();
    for (i, pattern) in sc.patterns.iter().enumerate() {
        let tier = ConfidenceTier::for_confidence(pattern.confidence);
        let filled = if elapsed >= view::confidence_fill_delay(i) {
            usize::from(pattern.confidence.min(100)) * BAR_WIDTH / 100
        } else {
            0
        };
        page.push(
            Row::styled(Tone::Plain, format!("  {:<28} ", pattern.name))
                .with(Tone::Tier(tier), "█".repeat(filled))
                .with(Tone::Dim, "░".repeat(BAR_WIDTH - filled))
                .with(Tone::Tier(tier), format!(" {:>3}%", pattern.confidence)),
        );
        page.push(Row::styled(Tone::Dim, format!("    {}", pattern.description)));
    }
}

fn tests(page: &mut Page, sc: &Scenario) {
    page.heading("Intent Tests");
    for test in &sc.tests {
        let (glyph, tone) = if test.passed {
            ('✓', Tone::Pass)
        } else {
            ('✗', Tone::Fail)
        };
        page.push(Row::styled(tone, format!("  {glyph} {}", test.name)));
        page.push(Row::styled(
            Tone::Dim,
            format!("      expected {}  actual {}", test.expected, test.actual),
        ));
    }
    let summary = TestSummary::of(&sc.tests);
    page.push(
        Row::styled(Tone::Pass, format!("  {} passed", summary.passed))
            .with(Tone::Dim, ", ")
            .with(Tone::Fail, format!("{} failed", summary.failed)),
    );
}

fn explanation(page: &mut Page, sc: &Scenario, narrative: &Typewriter) {
    page.heading("Root Cause");
    for line in wrap(&narrative.rendered(), 76) {
        page.push(Row::styled(Tone::Plain, format!("  {line}")));
    }
    page.push(Row::new());
    page.push(
        Row::styled(Tone::Highlight, "  False assumption: ").with(Tone::Plain, &sc.assumption),
    );
}

fn fix(page: &mut Page, sc: &Scenario) {
    page.heading("Fix");
    for line in wrap(&sc.fix, 76) {
        page.push(Row::styled(Tone::Pass, format!("  {line}")));
    }
    page.push(Row::new());
    for line in sc.fix_source.split('\n') {
        page.push(Row::styled(Tone::Plain, format!("    {line}")));
    }
}

/// Greedy word wrap by display width.
/// Word-wrap `text` to `width` cells. Words wider than a line are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for word in text.split(' ') {
        let mut rest = word;
        let mut w = rest.width();
        if current_width > 0 && current_width + 1 + w > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        while w > width {
            let (head, _) = clip(rest, width);
            let cut = if head.is_empty() {
                rest.chars().next().map_or(rest.len(), char::len_utf8)
            } else {
                head.len()
            };
            let (head, tail) = rest.split_at(cut);
            lines.push(head.to_string());
            rest = tail;
            w = rest.width();
        }
        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(rest);
        current_width += w;
    }
    lines.push(current);
    lines
}

/// Write `height` rows of `page` starting at `top`, clipped to `width` cells.
pub fn paint(
    out: &mut impl Write,
    page: &Page,
    top: usize,
    width: u16,
    height: u16,
) -> io::Result<()> {
    let width = usize::from(width);
    for y in 0..height {
        queue!(out, cursor::MoveTo(0, y), Clear(ClearType::CurrentLine))?;
        let Some(row) = page.rows.get(top + usize::from(y)) else {
            continue;
        };
        let mut used = 0;
        for span in &row.spans {
            if used >= width {
                break;
            }
            let (text, w) = clip(&span.text, width - used);
            queue!(out, SetForegroundColor(span.tone.color()), Print(text))?;
            used += w;
        }
        queue!(out, ResetColor)?;
    }
    out.flush()
}

/// Longest prefix of `s` that fits in `max` cells, and its width.
fn clip(s: &str, max: usize) -> (&str, usize) {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            return (&s[..idx], used);
        }
        used += w;
    }
    (s, used)
}
