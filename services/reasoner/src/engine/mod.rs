//! Rule compilation and entailment decision over one solver session

pub mod compiler;
pub mod decider;
pub mod session;

pub use compiler::{compile, detect_contradictions, CompileReport, CompiledQuery, SkippedRule};
pub use decider::{decide, Decision, DecisionReason, Verdict};
pub use session::CompiledSession;

use crate::backend::ConstraintBackend;
use crate::dsl::RuleSet;

/// Outcome of compiling and deciding one rule set in a fresh session
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub decision: Decision,
    pub report: CompileReport,
}

/// Compile `rule_set` into a new session from `backend` and decide its query
pub async fn evaluate(backend: &dyn ConstraintBackend, rule_set: &RuleSet) -> Evaluation {
    let mut session = CompiledSession::new(backend);
    let compiled = compile(&mut session, rule_set);
    let decision = decide(&mut session, compiled.query).await;
    Evaluation {
        decision,
        report: compiled.report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::VarisatBackend;
    use crate::dsl::parse_sketch;

    #[tokio::test]
    async fn test_evaluate_demo_rule_set() {
        let content = std::fs::read_to_string("../../demos/socrates_rules.json").unwrap();
        let rule_set = parse_sketch(&content).unwrap();
        let evaluation = evaluate(&VarisatBackend::new(), &rule_set).await;
        assert_eq!(evaluation.decision.verdict, Verdict::Yes);
        assert_eq!(evaluation.report.constraints, 2);
        assert!(evaluation.report.is_clean());
    }

    #[tokio::test]
    async fn test_fenced_rule_set_file_reads_like_generator_output() {
        let content = std::fs::read_to_string("../../demos/socrates_rules.json").unwrap();
        let fenced = format!("```json\n{}```\n", content);
        let evaluation = evaluate(&VarisatBackend::new(), &parse_sketch(&fenced).unwrap()).await;
        assert_eq!(evaluation.decision.verdict, Verdict::Yes);

        assert!(parse_sketch(r#"{"rules": [], "query": ""}"#).is_err());
    }

    #[tokio::test]
    async fn test_each_evaluation_uses_a_fresh_session() {
        let backend = VarisatBackend::new();
        let yes = RuleSet::new("a").with_rule(crate::dsl::RawRule::fact("a", true));
        let no = RuleSet::new("a").with_rule(crate::dsl::RawRule::fact("a", false));
        assert_eq!(evaluate(&backend, &yes).await.decision.verdict, Verdict::Yes);
        assert_eq!(evaluate(&backend, &no).await.decision.verdict, Verdict::No);
    }
}
