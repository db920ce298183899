#![forbid(unsafe_code)]

//! Scenario records.
//!
//! A [`Scenario`] is static, author-supplied content: the buggy source, a
//! hypothetical execution trace through it, the bug patterns it exhibits, a
//! handful of intent tests, and the narrative that explains it. The engine
//! only reads these.
//!
//! Line numbers are 1-based and are not validated against the source. A
//! reference past the end of the source simply never matches a line.

/// One observed event in a hypothetical execution trace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceStep {
    /// 1-based source line the event happened on.
    pub line: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub variable: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub value: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub note: Option<String>,
    /// Marks the step as where the bug shows itself.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_false"))]
    pub is_error: bool,
}

impl TraceStep {
    /// A bare step on `line`.
    pub fn at(line: u32) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    /// Set the observed variable and its value (builder).
    pub fn binding(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self.value = Some(value.into());
        self
    }

    /// Set the note (builder).
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Mark the step as an error (builder).
    pub fn error(mut self) -> Self {
        self.is_error = true;
        self
    }
}

/// A recognized bug pattern and how sure the scenario author is about it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternMatch {
    pub name: String,
    /// Percentage in `0..=100`.
    pub confidence: u8,
    pub description: String,
}

/// An intent test comparing expected and actual behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestResult {
    pub name: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

/// A complete bug walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub category: String,
    pub icon: String,
    pub source: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub highlight_lines: Vec<u32>,
    pub error_line: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trace: Vec<TraceStep>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub patterns: Vec<PatternMatch>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tests: Vec<TestResult>,
    pub root_cause: String,
    /// The false assumption the bug rests on.
    pub assumption: String,
    pub fix: String,
    pub fix_source: String,
}

impl Scenario {
    /// Number of lines in the source text, counting a trailing empty line.
    pub fn line_count(&self) -> usize {
        self.source.split('\n').count()
    }

    /// Whether `line` is one of the highlighted lines.
    pub fn is_highlighted(&self, line: u32) -> bool {
        self.highlight_lines.contains(&line)
    }

    /// Line numbers of the trace steps, in order.
    pub fn trace_lines(&self) -> Vec<u32> {
        self.trace.iter().map(|step| step.line).collect()
    }
}

#[cfg(feature = "serde")]
fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_step_builder() {
        let step = TraceStep::at(4)
            .binding("arr[5]", "undefined")
            .note("Index 5 is out of bounds!")
            .error();
        assert_eq!(step.line, 4);
        assert_eq!(step.variable.as_deref(), Some("arr[5]"));
        assert_eq!(step.value.as_deref(), Some("undefined"));
        assert!(step.is_error);
    }

    #[test]
    fn line_count_and_trace_lines() {
        let scenario = Scenario {
            source: "a\nb\nc".into(),
            trace: vec![TraceStep::at(3), TraceStep::at(1)],
            highlight_lines: vec![2],
            ..Scenario::default()
        };
        assert_eq!(scenario.line_count(), 3);
        assert_eq!(scenario.trace_lines(), vec![3, 1]);
        assert!(scenario.is_highlighted(2));
        assert!(!scenario.is_highlighted(3));
    }
}
