//! Normalize wire rules into canonical rules
//!
//! Implication precedence: a complete `if`/`then` pair wins over `subject`/`object`.

use crate::dsl::types::*;
use crate::errors::InvalidRule;

pub fn normalize_rule(raw: &RawRule) -> Result<Rule, InvalidRule> {
    match raw.kind {
        RuleKind::Fact => {
            let subject = raw
                .subject
                .as_ref()
                .filter(|s| !s.is_empty())
                .ok_or(InvalidRule::MissingSubject)?;
            Ok(Rule::Fact {
                subject: subject.clone(),
                value: raw.asserted_value(),
            })
        }
        RuleKind::Imply => {
            let (antecedents, consequent) = match (&raw.if_, &raw.then, &raw.subject, &raw.object) {
                (Some(if_), Some(then), _, _) => (if_.names(), then.clone()),
                (_, _, Some(subject), Some(object)) => (vec![subject.clone()], object.clone()),
                _ => return Err(InvalidRule::MissingImplicationFields),
            };
            if antecedents.is_empty() {
                return Err(InvalidRule::EmptyAntecedents);
            }
            Ok(Rule::Implication {
                antecedents,
                consequent,
                value: raw.asserted_value(),
            })
        }
        RuleKind::Unknown => Err(InvalidRule::UnknownKind),
    }
}
