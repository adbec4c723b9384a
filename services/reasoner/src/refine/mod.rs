//! Generate → compile → decide loop with feedback and a bounded retry budget

pub mod answer;
pub mod refiner;

pub use answer::{Answer, Attempt, AttemptOutcome, FinalAnswer};
pub use refiner::Refiner;
