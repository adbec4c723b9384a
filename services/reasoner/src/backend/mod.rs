//! Constraint backend capability: boolean variables, connectives, scoped assumptions
//! and satisfiability checks over an external engine.

pub mod expr;
pub mod mock;
pub mod traits;
pub mod varisat;

pub use expr::Expr;
pub use mock::{ScriptedBackend, SessionLog};
pub use traits::{CheckResult, ConstraintBackend, SolverSession, VarHandle};
pub use self::varisat::{VarisatBackend, VarisatSession};
