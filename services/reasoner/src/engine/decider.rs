//! Two-sided entailment check
//!
//! The query is decided only when exactly one of its polarities is consistent with the
//! registered constraints.

use crate::backend::{CheckResult, Expr, VarHandle};
use crate::engine::session::CompiledSession;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Yes,
    No,
    Unknown,
}

impl Verdict {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Verdict::Unknown)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Yes => write!(f, "yes"),
            Verdict::No => write!(f, "no"),
            Verdict::Unknown => write!(f, "unknown"),
        }
    }
}

/// Why the probes produced their verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Exactly one polarity is consistent
    Forced,
    /// Both polarities are consistent
    Underdetermined,
    /// Neither polarity is consistent: the constraints contradict each other
    Inconsistent,
    /// The solver answered unknown for at least one probe
    Indeterminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub reason: DecisionReason,
    pub assume_true: CheckResult,
    pub assume_false: CheckResult,
}

impl Decision {
    pub fn from_probes(assume_true: CheckResult, assume_false: CheckResult) -> Self {
        use CheckResult::*;
        let (verdict, reason) = match (assume_true, assume_false) {
            (Sat, Unsat) => (Verdict::Yes, DecisionReason::Forced),
            (Unsat, Sat) => (Verdict::No, DecisionReason::Forced),
            (Sat, Sat) => (Verdict::Unknown, DecisionReason::Underdetermined),
            (Unsat, Unsat) => (Verdict::Unknown, DecisionReason::Inconsistent),
            _ => (Verdict::Unknown, DecisionReason::Indeterminate),
        };
        Self {
            verdict,
            reason,
            assume_true,
            assume_false,
        }
    }
}

/// Probe `query` true, then false, each inside its own scope. Exactly two checks.
pub async fn decide(session: &mut CompiledSession, query: VarHandle) -> Decision {
    let assume_true = session.check_assuming(&Expr::var(query)).await;
    let assume_false = session.check_assuming(&!Expr::var(query)).await;
    tracing::debug!(
        "Query probes: assume true -> {}, assume false -> {}",
        assume_true,
        assume_false
    );
    Decision::from_probes(assume_true, assume_false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ScriptedBackend, VarisatBackend};
    use crate::dsl::{RawRule, RuleSet};
    use crate::engine::compiler::compile;

    async fn verdict_of(rs: &RuleSet) -> Verdict {
        let backend = VarisatBackend::new();
        let mut session = CompiledSession::new(&backend);
        let compiled = compile(&mut session, rs);
        decide(&mut session, compiled.query).await.verdict
    }

    async fn verdict_for(rs: &RuleSet, query: &str) -> Verdict {
        let mut rs = rs.clone();
        rs.query = query.to_string();
        verdict_of(&rs).await
    }

    #[test]
    fn test_decision_table() {
        use CheckResult::*;
        let cases = [
            (Sat, Unsat, Verdict::Yes, DecisionReason::Forced),
            (Unsat, Sat, Verdict::No, DecisionReason::Forced),
            (Sat, Sat, Verdict::Unknown, DecisionReason::Underdetermined),
            (Unsat, Unsat, Verdict::Unknown, DecisionReason::Inconsistent),
            (Unknown, Unsat, Verdict::Unknown, DecisionReason::Indeterminate),
            (Sat, Unknown, Verdict::Unknown, DecisionReason::Indeterminate),
            (Unknown, Unknown, Verdict::Unknown, DecisionReason::Indeterminate),
        ];
        for (t, f, verdict, reason) in cases {
            let d = Decision::from_probes(t, f);
            assert_eq!(d.verdict, verdict, "{} / {}", t, f);
            assert_eq!(d.reason, reason, "{} / {}", t, f);
            assert_eq!(d.verdict.is_decided(), reason == DecisionReason::Forced);
        }
    }

    #[tokio::test]
    async fn test_simple_entailment() {
        let rs = RuleSet::new("a").with_vars(&["a"]).with_rule(RawRule::fact("a", true));
        assert_eq!(verdict_of(&rs).await, Verdict::Yes);
    }

    #[tokio::test]
    async fn test_negated_fact() {
        let rs = RuleSet::new("b")
            .with_vars(&["a", "b"])
            .with_rule(RawRule::fact("a", true))
            .with_rule(RawRule::fact("b", false));
        assert_eq!(verdict_of(&rs).await, Verdict::No);
    }

    #[tokio::test]
    async fn test_facts_only_match_asserted_values() {
        let rs = RuleSet::new("a")
            .with_vars(&["a", "b", "c"])
            .with_rule(RawRule::fact("a", true))
            .with_rule(RawRule::fact("b", false));
        assert_eq!(verdict_for(&rs, "a").await, Verdict::Yes);
        assert_eq!(verdict_for(&rs, "b").await, Verdict::No);
        assert_eq!(verdict_for(&rs, "c").await, Verdict::Unknown);
    }

    #[tokio::test]
    async fn test_contradiction_is_unknown() {
        let rs = RuleSet::new("x")
            .with_vars(&["x"])
            .with_rule(RawRule::fact("x", true))
            .with_rule(RawRule::fact("x", false));
        let backend = VarisatBackend::new();
        let mut session = CompiledSession::new(&backend);
        let compiled = compile(&mut session, &rs);
        let d = decide(&mut session, compiled.query).await;
        assert_eq!(d.verdict, Verdict::Unknown);
        assert_eq!(d.reason, DecisionReason::Inconsistent);
    }

    #[tokio::test]
    async fn test_modus_tollens() {
        let rs = RuleSet::new("p")
            .with_vars(&["p", "q"])
            .with_rule(RawRule::if_then(&["p"], "q"))
            .with_rule(RawRule::fact("q", false));
        assert_eq!(verdict_of(&rs).await, Verdict::No);
    }

    #[tokio::test]
    async fn test_negated_implication_consequent() {
        let rs = RuleSet::new("q")
            .with_vars(&["p", "q"])
            .with_rule(RawRule::fact("p", true))
            .with_rule(RawRule::if_then(&["p"], "q").with_value(false));
        assert_eq!(verdict_of(&rs).await, Verdict::No);
    }

    #[tokio::test]
    async fn test_multi_antecedent_implication() {
        let full = RuleSet::new("z")
            .with_rule(RawRule::fact("x", true))
            .with_rule(RawRule::fact("y", true))
            .with_rule(RawRule::if_then(&["x", "y"], "z"));
        assert_eq!(verdict_of(&full).await, Verdict::Yes);

        for dropped in 0..2 {
            let mut partial = full.clone();
            partial.rules.remove(dropped);
            assert_eq!(verdict_of(&partial).await, Verdict::Unknown);
        }
    }

    #[tokio::test]
    async fn test_unmentioned_query_is_unknown() {
        let rs = RuleSet::new("ghost")
            .with_vars(&["a"])
            .with_rule(RawRule::fact("a", true));
        assert_eq!(verdict_of(&rs).await, Verdict::Unknown);
    }

    #[tokio::test]
    async fn test_legacy_shapes_agree() {
        let legacy = RuleSet::new("y")
            .with_rule(RawRule::subject_object("x", "y"))
            .with_rule(RawRule::fact("x", true));
        let modern = RuleSet::new("y")
            .with_rule(RawRule::if_then(&["x"], "y"))
            .with_rule(RawRule::fact("x", true));
        for query in ["x", "y", "w"] {
            assert_eq!(verdict_for(&legacy, query).await, verdict_for(&modern, query).await);
        }
        assert_eq!(verdict_for(&legacy, "y").await, Verdict::Yes);
    }

    #[tokio::test]
    async fn test_syllogism_chain() {
        let rs = RuleSet::new("mortal_Socrates")
            .with_vars(&["human_Socrates", "mortal_Socrates"])
            .with_rule(RawRule::fact("human_Socrates", true))
            .with_rule(RawRule::if_then(&["human_Socrates"], "mortal_Socrates"));
        assert_eq!(verdict_of(&rs).await, Verdict::Yes);
    }

    #[tokio::test]
    async fn test_skipped_rule_does_not_decide() {
        let mut broken = RawRule::subject_object("x", "y");
        broken.object = None;
        let rs = RuleSet::new("y")
            .with_rule(RawRule::fact("x", true))
            .with_rule(broken);
        assert_eq!(verdict_of(&rs).await, Verdict::Unknown);
    }

    #[tokio::test]
    async fn test_probes_are_scoped_and_counted() {
        let backend = ScriptedBackend::new([CheckResult::Unknown, CheckResult::Sat]);
        let mut session = CompiledSession::new(&backend);
        let q = session.ensure_atom("q");
        let d = decide(&mut session, q).await;
        assert_eq!(d.verdict, Verdict::Unknown);
        assert_eq!(d.reason, DecisionReason::Indeterminate);

        let log = backend.log();
        let log = log.borrow();
        assert_eq!(log.checks, 2);
        assert_eq!(log.pushes, 2);
        assert_eq!(log.pops, 2);
        assert_eq!(log.max_depth, 1);
        assert_eq!(log.constraints, vec![Expr::var(q), !Expr::var(q)]);
    }

    #[tokio::test]
    async fn test_decide_leaves_base_constraints_intact() {
        let backend = VarisatBackend::new();
        let mut session = CompiledSession::new(&backend);
        let rs = RuleSet::new("a").with_rule(RawRule::fact("a", true));
        let compiled = compile(&mut session, &rs);

        let first = decide(&mut session, compiled.query).await;
        let second = decide(&mut session, compiled.query).await;
        assert_eq!(first, second);
        assert_eq!(session.check().await, CheckResult::Sat);
    }
}
