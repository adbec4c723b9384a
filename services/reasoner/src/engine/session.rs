use crate::backend::{CheckResult, ConstraintBackend, Expr, SolverSession, VarHandle};
use std::collections::BTreeMap;

/// One solver plus the atoms created in it. Built for a single rule set, then dropped.
pub struct CompiledSession {
    solver: Box<dyn SolverSession>,
    atoms: BTreeMap<String, VarHandle>,
}

impl CompiledSession {
    pub fn new(backend: &dyn ConstraintBackend) -> Self {
        Self {
            solver: backend.new_solver(),
            atoms: BTreeMap::new(),
        }
    }

    /// Handle for `name`, creating a free variable on first use
    pub fn ensure_atom(&mut self, name: &str) -> VarHandle {
        if let Some(handle) = self.atoms.get(name) {
            return *handle;
        }
        let handle = self.solver.bool_var(name);
        self.atoms.insert(name.to_string(), handle);
        handle
    }

    pub fn assert(&mut self, constraint: &Expr) {
        self.solver.add(constraint);
    }

    /// Check satisfiability with `assumption` added inside a scope that is always closed
    pub async fn check_assuming(&mut self, assumption: &Expr) -> CheckResult {
        self.solver.push();
        self.solver.add(assumption);
        let result = self.solver.check().await;
        self.solver.pop();
        result
    }
}

#[cfg(test)]
impl CompiledSession {
    pub fn atom(&self, name: &str) -> Option<VarHandle> {
        self.atoms.get(name).copied()
    }

    pub async fn check(&mut self) -> CheckResult {
        self.solver.check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ScriptedBackend, VarisatBackend};

    #[test]
    fn test_ensure_atom_is_idempotent() {
        let backend = ScriptedBackend::default();
        let mut session = CompiledSession::new(&backend);
        let a = session.ensure_atom("a");
        let b = session.ensure_atom("b");
        assert_eq!(session.ensure_atom("a"), a);
        assert_ne!(a, b);
        assert_eq!(backend.log().borrow().vars, vec!["a", "b"]);
        assert_eq!(session.atom("b"), Some(b));
        assert_eq!(session.atom("c"), None);
    }

    #[tokio::test]
    async fn test_assumption_does_not_persist() {
        let backend = VarisatBackend::new();
        let mut session = CompiledSession::new(&backend);
        let a = session.ensure_atom("a");
        session.assert(&Expr::var(a));

        assert_eq!(session.check_assuming(&!Expr::var(a)).await, CheckResult::Unsat);
        assert_eq!(session.check().await, CheckResult::Sat);
    }
}
