//! Result of the most recent submission attempt in a scenario
//!
//! Each scenario owns one [`OutcomeTracker`]; the submitter writes it right
//! before returning, and steps that cannot see a return value read it.

use std::fmt;

/// Tri-state outcome of the last attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    /// No attempt yet in this scenario
    #[default]
    Unknown,
    Success,
    Failure,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Unknown => write!(f, "unknown"),
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutcomeTracker {
    last: Outcome,
}

impl OutcomeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self) -> Outcome {
        self.last
    }

    pub fn is_success(&self) -> bool {
        self.last == Outcome::Success
    }

    pub fn is_failure(&self) -> bool {
        self.last == Outcome::Failure
    }

    pub fn record_success(&mut self) {
        self.last = Outcome::Success;
    }

    pub fn record_failure(&mut self) {
        self.last = Outcome::Failure;
    }

    /// Record the outcome of `result` and hand it back untouched
    pub fn record<T, E>(&mut self, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => self.record_success(),
            Err(_) => self.record_failure(),
        }
        result
    }
}
