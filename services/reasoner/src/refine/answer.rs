use crate::dsl::RuleSet;
use crate::engine::{DecisionReason, Verdict};
use serde::{Serialize, Serializer};
use std::fmt;

/// Final answer: a solver verdict, or the generator's free-text fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalAnswer {
    Yes,
    No,
    Fallback(String),
}

impl fmt::Display for FinalAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalAnswer::Yes => write!(f, "yes"),
            FinalAnswer::No => write!(f, "no"),
            FinalAnswer::Fallback(text) => write!(f, "{}", text),
        }
    }
}

impl Serialize for FinalAnswer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Malformed { error: String },
    Undecided { reason: DecisionReason },
    Decided { verdict: Verdict },
}

/// One sketch request and what came of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub iteration: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: FinalAnswer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sketch: Option<RuleSet>,
    pub attempts: Vec<Attempt>,
}

impl Answer {
    pub fn iterations(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self.answer, FinalAnswer::Fallback(_))
    }
}
