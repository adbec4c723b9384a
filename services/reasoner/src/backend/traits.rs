use super::expr::Expr;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a named boolean variable owned by a solver session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarHandle(usize);

impl VarHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Outcome of a satisfiability check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckResult {
    Sat,
    Unsat,
    Unknown,
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Sat => write!(f, "sat"),
            CheckResult::Unsat => write!(f, "unsat"),
            CheckResult::Unknown => write!(f, "unknown"),
        }
    }
}

/// Backend context: hands out fresh, independent solver sessions
pub trait ConstraintBackend {
    fn name(&self) -> &str;

    fn new_solver(&self) -> Box<dyn SolverSession>;
}

/// One incremental solver instance.
///
/// Constraints added outside any scope are permanent. Constraints added after `push`
/// are retracted by the matching `pop`.
#[async_trait(?Send)]
pub trait SolverSession {
    fn bool_var(&mut self, name: &str) -> VarHandle;

    fn add(&mut self, constraint: &Expr);

    fn push(&mut self);

    fn pop(&mut self);

    async fn check(&mut self) -> CheckResult;
}
