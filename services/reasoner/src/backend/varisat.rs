//! `varisat` adapter
//!
//! Expressions are Tseitin-encoded into clauses. Scopes are activation literals: a
//! constraint added inside a scope is guarded by the scope's literal, `check` assumes
//! every open scope literal, and `pop` kills the literal with a unit clause so the
//! guarded clauses are satisfied vacuously from then on.

use super::expr::Expr;
use super::traits::{CheckResult, ConstraintBackend, SolverSession, VarHandle};
use async_trait::async_trait;
use varisat::{ExtendFormula, Lit, Solver, Var};

#[derive(Debug, Default, Clone, Copy)]
pub struct VarisatBackend;

impl VarisatBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintBackend for VarisatBackend {
    fn name(&self) -> &str {
        "varisat"
    }

    fn new_solver(&self) -> Box<dyn SolverSession> {
        Box::new(VarisatSession::new())
    }
}

pub struct VarisatSession {
    solver: Solver<'static>,
    true_lit: Lit,
    scopes: Vec<Lit>,
}

impl VarisatSession {
    pub fn new() -> Self {
        let mut solver = Solver::new();
        let true_lit = solver.new_var().positive();
        solver.add_clause(&[true_lit]);
        Self {
            solver,
            true_lit,
            scopes: Vec::new(),
        }
    }

    fn guarded(&mut self, mut clause: Vec<Lit>) {
        if let Some(scope) = self.scopes.last() {
            clause.push(!*scope);
        }
        self.solver.add_clause(&clause);
    }

    /// Literal equivalent to `expr`, defining fresh variables as needed
    fn encode(&mut self, expr: &Expr) -> Lit {
        match expr {
            Expr::Var(h) => Var::from_index(h.index()).positive(),
            Expr::Not(inner) => !self.encode(inner),
            Expr::And(operands) => {
                if operands.is_empty() {
                    return self.true_lit;
                }
                let lits: Vec<Lit> = operands.iter().map(|e| self.encode(e)).collect();
                let t = self.solver.new_var().positive();
                let mut back = vec![t];
                for &l in &lits {
                    self.solver.add_clause(&[!t, l]);
                    back.push(!l);
                }
                self.solver.add_clause(&back);
                t
            }
            Expr::Or(operands) => {
                if operands.is_empty() {
                    return !self.true_lit;
                }
                let lits: Vec<Lit> = operands.iter().map(|e| self.encode(e)).collect();
                let t = self.solver.new_var().positive();
                let mut forward = vec![!t];
                for &l in &lits {
                    self.solver.add_clause(&[t, !l]);
                    forward.push(l);
                }
                self.solver.add_clause(&forward);
                t
            }
        }
    }
}

impl Default for VarisatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl SolverSession for VarisatSession {
    fn bool_var(&mut self, name: &str) -> VarHandle {
        let handle = VarHandle::new(self.solver.new_var().index());
        tracing::trace!("varisat var {} for atom '{}'", handle.index(), name);
        handle
    }

    fn add(&mut self, constraint: &Expr) {
        match constraint {
            // Top-level conjunctions and disjunctions map straight onto clauses
            Expr::And(operands) => {
                for operand in operands {
                    self.add(operand);
                }
            }
            Expr::Or(operands) => {
                let clause: Vec<Lit> = operands.iter().map(|e| self.encode(e)).collect();
                if clause.is_empty() {
                    let falsum = !self.true_lit;
                    self.guarded(vec![falsum]);
                } else {
                    self.guarded(clause);
                }
            }
            other => {
                let lit = self.encode(other);
                self.guarded(vec![lit]);
            }
        }
    }

    fn push(&mut self) {
        let scope = self.solver.new_var().positive();
        if let Some(&outer) = self.scopes.last() {
            // Inner scope implies outer scope, so popping the outer one retracts both
            self.solver.add_clause(&[!scope, outer]);
        }
        self.scopes.push(scope);
    }

    fn pop(&mut self) {
        match self.scopes.pop() {
            Some(scope) => self.solver.add_clause(&[!scope]),
            None => tracing::warn!("pop called on a varisat session with no open scope"),
        }
    }

    async fn check(&mut self) -> CheckResult {
        self.solver.assume(&self.scopes);
        match self.solver.solve() {
            Ok(true) => CheckResult::Sat,
            Ok(false) => CheckResult::Unsat,
            Err(e) => {
                tracing::warn!("varisat check failed: {}", e);
                CheckResult::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_session_is_sat() {
        let mut s = VarisatSession::new();
        s.bool_var("a");
        assert_eq!(s.check().await, CheckResult::Sat);
    }

    #[tokio::test]
    async fn test_direct_contradiction_is_unsat() {
        let mut s = VarisatSession::new();
        let a = s.bool_var("a");
        s.add(&Expr::var(a));
        s.add(&!Expr::var(a));
        assert_eq!(s.check().await, CheckResult::Unsat);
    }

    #[tokio::test]
    async fn test_pop_retracts_scoped_constraints() {
        let mut s = VarisatSession::new();
        let a = s.bool_var("a");
        s.add(&Expr::var(a));

        s.push();
        s.add(&!Expr::var(a));
        assert_eq!(s.check().await, CheckResult::Unsat);
        s.pop();

        assert_eq!(s.check().await, CheckResult::Sat);
    }

    #[tokio::test]
    async fn test_nested_scopes() {
        let mut s = VarisatSession::new();
        let a = s.bool_var("a");
        let b = s.bool_var("b");

        s.push();
        s.add(&Expr::var(a));
        s.push();
        s.add(&Expr::implies(Expr::var(a), Expr::var(b)));
        s.add(&!Expr::var(b));
        assert_eq!(s.check().await, CheckResult::Unsat);
        s.pop();
        assert_eq!(s.check().await, CheckResult::Sat);
        s.pop();

        s.add(&!Expr::var(a));
        assert_eq!(s.check().await, CheckResult::Sat);
    }

    #[tokio::test]
    async fn test_nested_connectives_are_encoded() {
        let mut s = VarisatSession::new();
        let x = s.bool_var("x");
        let y = s.bool_var("y");
        let z = s.bool_var("z");

        // (x & y) -> z, x, y, !z
        s.add(&Expr::implies(Expr::and([Expr::var(x), Expr::var(y)]), Expr::var(z)));
        s.add(&Expr::var(x));
        s.add(&Expr::var(y));

        s.push();
        s.add(&!Expr::var(z));
        assert_eq!(s.check().await, CheckResult::Unsat);
        s.pop();

        s.push();
        s.add(&Expr::var(z));
        assert_eq!(s.check().await, CheckResult::Sat);
        s.pop();
    }

    #[tokio::test]
    async fn test_empty_disjunction_is_false() {
        let mut s = VarisatSession::new();
        s.push();
        s.add(&Expr::Or(vec![]));
        assert_eq!(s.check().await, CheckResult::Unsat);
        s.pop();
        assert_eq!(s.check().await, CheckResult::Sat);
    }

    #[test]
    fn test_backend_hands_out_independent_sessions() {
        let backend = VarisatBackend::new();
        assert_eq!(backend.name(), "varisat");
        let mut first = backend.new_solver();
        let mut second = backend.new_solver();
        let a1 = first.bool_var("a");
        let a2 = second.bool_var("a");
        // Fresh sessions number their variables identically
        assert_eq!(a1, a2);
    }
}
