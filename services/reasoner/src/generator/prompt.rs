//! Prompt text sent to the sketch generator

pub const SKETCH_SYSTEM: &str = "You are a logic reasoning assistant that outputs DSL in JSON.";

pub const FALLBACK_SYSTEM: &str = "You are a logic reasoning assistant.";

const SKETCH_INSTRUCTIONS: &str = r#"Generate a reasoning sketch in JSON format with keys:
- vars: list of variable names (Boolean atoms)
- rules: list of rules (kind fact or imply)
  Facts: {"kind": "fact", "subject": "atom"} asserts the atom is true;
  add "value": false to assert it is false.
  For imply rules, you can use either format:
  1. {"kind": "imply", "subject": "premise", "object": "conclusion"}
  2. {"kind": "imply", "if": ["premise1", "premise2"], "then": "conclusion"}
  Add "value": false to an imply rule to conclude that the conclusion is false.
- query: the atom to be evaluated

Example for syllogism "All humans are mortal, Socrates is human, therefore Socrates is mortal":
{
  "vars": ["human_Socrates", "mortal_Socrates"],
  "rules": [
    {"kind": "fact", "subject": "human_Socrates"},
    {"kind": "imply", "if": ["human_Socrates"], "then": "mortal_Socrates"}
  ],
  "query": "mortal_Socrates"
}

Only output valid JSON, no other text."#;

/// User message asking for a sketch, first attempt or refinement
pub fn sketch_prompt(question: &str, feedback: Option<&str>) -> String {
    match feedback {
        Some(feedback) => format!(
            "Question: {}\nBased on feedback: {}\nGenerate a reasoning sketch in JSON with keys: vars, rules, query.",
            question, feedback
        ),
        None => format!("Question: {}\n{}", question, SKETCH_INSTRUCTIONS),
    }
}
