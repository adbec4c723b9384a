//! Sketch-guided boolean reasoning
//!
//! A generator proposes a small rule set (facts and implications over named atoms),
//! the rule compiler turns it into SAT constraints, and a two-sided satisfiability
//! probe decides whether the query atom is forced true, forced false, or undetermined.

pub mod backend;
pub mod config;
pub mod dsl;
pub mod engine;
pub mod errors;
pub mod generator;
pub mod refine;
