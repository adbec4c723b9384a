//! Compile a rule set into solver constraints
//!
//! Facts become unit constraints, implications become `!(a1 & .. & an) | c`.
//! Invalid rules are skipped and fact contradictions are only reported; neither stops
//! compilation.

use crate::backend::{Expr, VarHandle};
use crate::dsl::{normalize_rule, RawRule, Rule, RuleKind, RuleSet};
use crate::engine::session::CompiledSession;
use serde::Serialize;
use std::collections::BTreeMap;

/// Diagnostics gathered while compiling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    /// Atoms asserted both true and false by facts
    pub contradictions: Vec<String>,
    /// Input index of each skipped rule, with the reason
    pub skipped: Vec<SkippedRule>,
    pub constraints: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRule {
    pub index: usize,
    pub reason: String,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.contradictions.is_empty() && self.skipped.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub query: VarHandle,
    pub report: CompileReport,
}

/// Atoms that facts assert with both polarities
pub fn detect_contradictions(rules: &[RawRule]) -> Vec<String> {
    let mut seen: BTreeMap<&str, (bool, bool)> = BTreeMap::new();
    for rule in rules {
        if rule.kind != RuleKind::Fact {
            continue;
        }
        if let Some(subject) = rule.subject.as_ref().filter(|s| !s.is_empty()) {
            let entry = seen.entry(subject.as_str()).or_insert((false, false));
            if rule.asserted_value() {
                entry.0 = true;
            } else {
                entry.1 = true;
            }
        }
    }
    seen.into_iter()
        .filter(|(_, (t, f))| *t && *f)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Register every constraint of `rule_set` on `session` and return the query handle
pub fn compile(session: &mut CompiledSession, rule_set: &RuleSet) -> CompiledQuery {
    let mut report = CompileReport::default();

    for name in &rule_set.vars {
        session.ensure_atom(name);
    }

    report.contradictions = detect_contradictions(&rule_set.rules);
    for name in &report.contradictions {
        tracing::warn!("Direct contradiction detected for atom '{}' (asserted both true and false)", name);
    }

    for (index, raw) in rule_set.rules.iter().enumerate() {
        let rule = match normalize_rule(raw) {
            Ok(rule) => rule,
            Err(reason) => {
                tracing::warn!("Skipping rule #{}: {} ({:?})", index, reason, raw);
                report.skipped.push(SkippedRule {
                    index,
                    reason: reason.to_string(),
                });
                continue;
            }
        };
        let constraint = rule_constraint(session, &rule);
        tracing::debug!("Rule #{} -> {:?}", index, constraint);
        session.assert(&constraint);
        report.constraints += 1;
    }

    let query = session.ensure_atom(&rule_set.query);

    CompiledQuery { query, report }
}

/// Build the constraint for one canonical rule, creating its atoms first
fn rule_constraint(session: &mut CompiledSession, rule: &Rule) -> Expr {
    match rule {
        Rule::Fact { subject, value } => {
            let handle = session.ensure_atom(subject);
            Expr::literal(handle, *value)
        }
        Rule::Implication { antecedents, consequent, value } => {
            let premises: Vec<Expr> = antecedents
                .iter()
                .map(|name| Expr::var(session.ensure_atom(name)))
                .collect();
            let conclusion = Expr::literal(session.ensure_atom(consequent), *value);
            Expr::implies(Expr::and(premises), conclusion)
        }
    }
}
