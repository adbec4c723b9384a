//! OpenAI-compatible chat-completions generator

use super::prompt::{sketch_prompt, FALLBACK_SYSTEM, SKETCH_SYSTEM};
use super::traits::SketchGenerator;
use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

pub struct ChatCompletionsGenerator {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
    temperature: f32,
}

impl ChatCompletionsGenerator {
    pub fn new(config: &GeneratorConfig, api_key: String) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint()?,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Build from config, reading the API key from the configured environment variable
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| GeneratorError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, GeneratorError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.temperature,
        };

        tracing::debug!("Sending prompt to {} ({}): {}", self.endpoint, self.model, user);

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let text = extract_content(parsed)?;
        tracing::debug!("Received response text: {}", text);
        Ok(text)
    }
}

fn extract_content(response: ChatResponse) -> Result<String, GeneratorError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(GeneratorError::EmptyResponse)
}

#[async_trait]
impl SketchGenerator for ChatCompletionsGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, question: &str, feedback: Option<&str>) -> Result<String, GeneratorError> {
        let prompt = sketch_prompt(question, feedback);
        self.complete(SKETCH_SYSTEM, &prompt).await
    }

    async fn fallback_answer(&self, question: &str) -> Result<String, GeneratorError> {
        let text = self.complete(FALLBACK_SYSTEM, question).await?;
        Ok(text.trim().to_string())
    }
}
