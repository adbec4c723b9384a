use super::traits::SketchGenerator;
use crate::errors::GeneratorError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use tokio::sync::Mutex;

/// Replay file: sketch responses in order, plus the fallback answer
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub responses: Vec<String>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_fallback() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Text(String),
    /// Simulated transport failure
    Unavailable,
}

/// Generator that replays canned replies and records what it was asked
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<ScriptedReply>>,
    fallback: ScriptedReply,
    feedback_seen: Mutex<Vec<Option<String>>>,
    fallback_calls: Mutex<usize>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<ScriptedReply>, fallback: ScriptedReply) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            fallback,
            feedback_seen: Mutex::new(Vec::new()),
            fallback_calls: Mutex::new(0),
        }
    }

    pub fn from_texts(texts: &[&str], fallback: &str) -> Self {
        Self::new(
            texts.iter().map(|t| ScriptedReply::Text(t.to_string())).collect(),
            ScriptedReply::Text(fallback.to_string()),
        )
    }

    pub fn from_script(script: Script) -> Self {
        Self::new(
            script.responses.into_iter().map(ScriptedReply::Text).collect(),
            ScriptedReply::Text(script.fallback),
        )
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read replay script {:?}", path.as_ref()))?;
        let script: Script = serde_json::from_str(&content)
            .context("Failed to parse replay script JSON")?;
        Ok(Self::from_script(script))
    }

    /// Feedback passed to each `generate` call, in order
    pub async fn feedback_seen(&self) -> Vec<Option<String>> {
        self.feedback_seen.lock().await.clone()
    }

    pub async fn generate_calls(&self) -> usize {
        self.feedback_seen.lock().await.len()
    }

    pub async fn fallback_calls(&self) -> usize {
        *self.fallback_calls.lock().await
    }
}

fn reply_to_result(reply: ScriptedReply) -> Result<String, GeneratorError> {
    match reply {
        ScriptedReply::Text(text) => Ok(text),
        ScriptedReply::Unavailable => Err(GeneratorError::Api {
            status: 503,
            body: "scripted outage".to_string(),
        }),
    }
}

#[async_trait]
impl SketchGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _question: &str, feedback: Option<&str>) -> Result<String, GeneratorError> {
        let mut seen = self.feedback_seen.lock().await;
        seen.push(feedback.map(|f| f.to_string()));
        let calls = seen.len();
        drop(seen);

        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .ok_or(GeneratorError::Exhausted(calls - 1))?;
        reply_to_result(reply)
    }

    async fn fallback_answer(&self, _question: &str) -> Result<String, GeneratorError> {
        *self.fallback_calls.lock().await += 1;
        reply_to_result(self.fallback.clone()).map(|t| t.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_replays_in_order() {
        let g = ScriptedGenerator::from_texts(&["one", "two"], " fallback \n");
        assert_eq!(g.generate("q", None).await.unwrap(), "one");
        assert_eq!(g.generate("q", Some("fb")).await.unwrap(), "two");
        assert!(matches!(g.generate("q", None).await, Err(GeneratorError::Exhausted(2))));
        assert_eq!(g.fallback_answer("q").await.unwrap(), "fallback");
        assert_eq!(g.fallback_calls().await, 1);
        assert_eq!(
            g.feedback_seen().await,
            vec![None, Some("fb".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_unavailable_reply() {
        let g = ScriptedGenerator::new(vec![ScriptedReply::Unavailable], ScriptedReply::Unavailable);
        assert!(matches!(g.generate("q", None).await, Err(GeneratorError::Api { status: 503, .. })));
        assert!(g.fallback_answer("q").await.is_err());
    }

    #[tokio::test]
    async fn test_load_script_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"responses": ["{{}}", "x"], "fallback": "No."}}"#).unwrap();
        let g = ScriptedGenerator::load(file.path()).unwrap();
        assert_eq!(g.generate("q", None).await.unwrap(), "{}");
        assert_eq!(g.fallback_answer("q").await.unwrap(), "No.");
    }
}
