//! Parser diagnostics.
//!
//! The chart parser is generous: it accepts any input and builds the best
//! model it can, collecting diagnostics for whatever it had to drop or
//! reinterpret along the way. There is no error level because nothing is
//! fatal.

use serde::{Deserialize, Serialize};

/// A single diagnostic produced while parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
    /// 1-based source line the diagnostic refers to.
    pub line: usize,
}

impl Feedback {
    pub fn warning(message: impl Into<String>, line: usize) -> Self {
        Feedback {
            level: FeedbackLevel::Warning,
            message: message.into(),
            line,
        }
    }

    pub fn info(message: impl Into<String>, line: usize) -> Self {
        Feedback {
            level: FeedbackLevel::Info,
            message: message.into(),
            line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackLevel {
    /// Input was dropped or reinterpreted; the model may not match intent.
    Warning,
    /// Minor observation, nothing lost.
    Info,
}

/// Collects feedback during a parse, tracking the current source line.
#[derive(Debug, Default)]
pub struct FeedbackCollector {
    feedback: Vec<Feedback>,
    current_line: usize,
}

impl FeedbackCollector {
    pub fn new() -> Self {
        FeedbackCollector {
            feedback: Vec::new(),
            current_line: 1,
        }
    }

    /// Update the 1-based line used for subsequent diagnostics.
    pub fn set_line(&mut self, line: usize) {
        self.current_line = line;
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.feedback
            .push(Feedback::warning(message, self.current_line));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.feedback.push(Feedback::info(message, self.current_line));
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn into_feedback(self) -> Vec<Feedback> {
        self.feedback
    }
}

/// A parsed value together with the diagnostics gathered on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult<T> {
    pub value: T,
    pub feedback: Vec<Feedback>,
}

impl<T> ParseResult<T> {
    pub fn new(value: T, feedback: Vec<Feedback>) -> Self {
        ParseResult { value, feedback }
    }

    pub fn ok(value: T) -> Self {
        ParseResult {
            value,
            feedback: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        self.feedback
            .iter()
            .any(|f| f.level == FeedbackLevel::Warning)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Feedback> {
        self.feedback
            .iter()
            .filter(|f| f.level == FeedbackLevel::Warning)
    }
}
