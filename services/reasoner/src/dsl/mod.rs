//! The rule language: wire format, normalization into canonical rules, and parsing of
//! generator output.

pub mod normalize;
pub mod sketch;
pub mod types;

pub use normalize::normalize_rule;
pub use sketch::parse_sketch;
pub use types::*;
