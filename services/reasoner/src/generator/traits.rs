use crate::errors::GeneratorError;
use async_trait::async_trait;

/// External source of rule-set sketches
#[async_trait]
pub trait SketchGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Raw text of a proposed rule set, optionally refined by feedback from the
    /// previous attempt
    async fn generate(&self, question: &str, feedback: Option<&str>) -> Result<String, GeneratorError>;

    /// Plain answer to the question with no rule-set scaffolding
    async fn fallback_answer(&self, question: &str) -> Result<String, GeneratorError>;
}
