//! Read generator output as a rule set

use crate::dsl::types::RuleSet;
use crate::errors::SketchError;
use regex::Regex;

/// Parse raw generator text into a rule set.
///
/// Accepts bare JSON or JSON wrapped in a Markdown code fence.
pub fn parse_sketch(text: &str) -> Result<RuleSet, SketchError> {
    let body = strip_code_fence(text);
    let sketch: RuleSet = serde_json::from_str(body)?;
    if sketch.query.trim().is_empty() {
        return Err(SketchError::EmptyQuery);
    }
    Ok(sketch)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Ok(re) = Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$") {
        if let Some(caps) = re.captures(trimmed) {
            if let Some(m) = caps.get(1) {
                return m.as_str();
            }
        }
    }
    trimmed
}
