//! Rule-set wire format and canonical rules

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

/// Rule kind as written by the generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Fact,
    Imply,
    #[default]
    #[serde(other)]
    Unknown,
}

/// `if` accepts a single atom name or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Antecedents {
    One(String),
    Many(Vec<String>),
}

impl Antecedents {
    pub fn names(&self) -> Vec<String> {
        match self {
            Antecedents::One(name) => vec![name.clone()],
            Antecedents::Many(names) => names.clone(),
        }
    }
}

/// A rule exactly as it appears on the wire. Field presence decides its shape.
///
/// Reading is lenient: a missing or unrecognized `kind` becomes `Unknown` and a field
/// of the wrong JSON type reads as absent, so a bad rule is skipped at compile time
/// instead of failing the whole rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(default, deserialize_with = "lenient_kind")]
    pub kind: RuleKind,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(
        rename = "if",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub if_: Option<Antecedents>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub then: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RuleKind, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Entries that are not JSON objects become empty `Unknown` rules
fn lenient_rules<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawRule>, D::Error> {
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .collect())
}

impl RawRule {
    pub fn fact(subject: &str, value: bool) -> Self {
        Self {
            kind: RuleKind::Fact,
            subject: Some(subject.to_string()),
            object: None,
            if_: None,
            then: None,
            value: Some(value),
        }
    }

    /// `{if: [...], then: ...}` shape
    pub fn if_then(antecedents: &[&str], consequent: &str) -> Self {
        let if_ = if antecedents.len() == 1 {
            Antecedents::One(antecedents[0].to_string())
        } else {
            Antecedents::Many(antecedents.iter().map(|s| s.to_string()).collect())
        };
        Self {
            kind: RuleKind::Imply,
            subject: None,
            object: None,
            if_: Some(if_),
            then: Some(consequent.to_string()),
            value: None,
        }
    }

    /// Legacy `{subject: ..., object: ...}` shape
    pub fn subject_object(subject: &str, object: &str) -> Self {
        Self {
            kind: RuleKind::Imply,
            subject: Some(subject.to_string()),
            object: Some(object.to_string()),
            if_: None,
            then: None,
            value: None,
        }
    }

    pub fn with_value(mut self, value: bool) -> Self {
        self.value = Some(value);
        self
    }

    /// Asserted truth value; absent means true
    pub fn asserted_value(&self) -> bool {
        self.value != Some(false)
    }
}

/// A sketch: declared atoms, rules in order, and the atom to decide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub vars: Vec<String>,
    #[serde(deserialize_with = "lenient_rules")]
    pub rules: Vec<RawRule>,
    pub query: String,
}

impl RuleSet {
    pub fn new(query: &str) -> Self {
        Self {
            vars: Vec::new(),
            rules: Vec::new(),
            query: query.to_string(),
        }
    }

    pub fn with_vars(mut self, vars: &[&str]) -> Self {
        self.vars = vars.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_rule(mut self, rule: RawRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Short content hash used to recognise a repeated sketch
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_json().as_bytes());
        format!("{:x}", hasher.finalize())[..16].to_string()
    }
}

/// Canonical rule after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Fact {
        subject: String,
        value: bool,
    },
    Implication {
        antecedents: Vec<String>,
        consequent: String,
        value: bool,
    },
}
