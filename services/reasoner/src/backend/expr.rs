//! Backend-independent boolean expressions

use super::traits::VarHandle;
use std::ops::Not;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(VarHandle),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    pub fn var(handle: VarHandle) -> Self {
        Expr::Var(handle)
    }

    /// N-ary conjunction. A single operand is returned as is.
    pub fn and(operands: impl IntoIterator<Item = Expr>) -> Self {
        let mut operands: Vec<Expr> = operands.into_iter().collect();
        if operands.len() == 1 {
            return operands.remove(0);
        }
        Expr::And(operands)
    }

    /// `premise -> conclusion` as the clause `!premise | conclusion`
    pub fn implies(premise: Expr, conclusion: Expr) -> Self {
        Expr::Or(vec![!premise, conclusion])
    }

    /// The variable itself when `value` is true, its negation otherwise
    pub fn literal(handle: VarHandle, value: bool) -> Self {
        if value {
            Expr::Var(handle)
        } else {
            !Expr::Var(handle)
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        match self {
            Expr::Not(inner) => *inner,
            other => Expr::Not(Box::new(other)),
        }
    }
}
