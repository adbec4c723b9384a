//! Error taxonomy for the reasoner
//!
//! Only `GeneratorError` is fatal to a refinement run. Sketch and rule errors are
//! recovered locally and end up as feedback or compile-report entries.

use thiserror::Error;

/// Failure of the external sketch generator itself (transport, API, configuration)
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generator API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("generator response contained no message content")]
    EmptyResponse,

    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("invalid generator endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("scripted generator ran out of responses after {0} requests")]
    Exhausted(usize),
}

/// Generator output that could not be read as a rule set
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("output is not valid rule-set JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("rule set has an empty query")]
    EmptyQuery,
}

/// Reason a single rule was skipped during compilation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRule {
    #[error("fact has no subject")]
    MissingSubject,

    #[error("implication needs an if/then or subject/object pair")]
    MissingImplicationFields,

    #[error("implication has no antecedents")]
    EmptyAntecedents,

    #[error("unrecognized rule kind")]
    UnknownKind,
}
