use super::expr::Expr;
use super::traits::{CheckResult, ConstraintBackend, SolverSession, VarHandle};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Calls observed by a scripted session, shared with the test that created it
#[derive(Debug, Default)]
pub struct SessionLog {
    pub vars: Vec<String>,
    pub constraints: Vec<Expr>,
    pub depth: usize,
    pub max_depth: usize,
    pub pushes: usize,
    pub pops: usize,
    pub checks: usize,
}

/// Backend whose `check` replays a fixed script of results.
///
/// Every session shares one script queue; an exhausted script answers `Unknown`.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Rc<RefCell<VecDeque<CheckResult>>>,
    log: Rc<RefCell<SessionLog>>,
}

impl ScriptedBackend {
    pub fn new(results: impl IntoIterator<Item = CheckResult>) -> Self {
        Self {
            script: Rc::new(RefCell::new(results.into_iter().collect())),
            log: Rc::new(RefCell::new(SessionLog::default())),
        }
    }

    pub fn log(&self) -> Rc<RefCell<SessionLog>> {
        self.log.clone()
    }
}

impl ConstraintBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn new_solver(&self) -> Box<dyn SolverSession> {
        Box::new(ScriptedSession {
            script: self.script.clone(),
            log: self.log.clone(),
        })
    }
}

pub struct ScriptedSession {
    script: Rc<RefCell<VecDeque<CheckResult>>>,
    log: Rc<RefCell<SessionLog>>,
}

#[async_trait(?Send)]
impl SolverSession for ScriptedSession {
    fn bool_var(&mut self, name: &str) -> VarHandle {
        let mut log = self.log.borrow_mut();
        log.vars.push(name.to_string());
        VarHandle::new(log.vars.len() - 1)
    }

    fn add(&mut self, constraint: &Expr) {
        self.log.borrow_mut().constraints.push(constraint.clone());
    }

    fn push(&mut self) {
        let mut log = self.log.borrow_mut();
        log.pushes += 1;
        log.depth += 1;
        log.max_depth = log.max_depth.max(log.depth);
    }

    fn pop(&mut self) {
        let mut log = self.log.borrow_mut();
        log.pops += 1;
        log.depth = log.depth.saturating_sub(1);
    }

    async fn check(&mut self) -> CheckResult {
        self.log.borrow_mut().checks += 1;
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or(CheckResult::Unknown)
    }
}
