use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub refine: RefineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefineConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;
        let config: Config = toml::from_str(&content)
            .context("Failed to parse config TOML")?;
        config.generator.endpoint()
            .with_context(|| format!("Invalid generator base_url: {}", config.generator.base_url))?;
        Ok(config)
    }

    /// Load `path` when given, otherwise fall back to built-in defaults
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

impl GeneratorConfig {
    /// Chat-completions URL under `base_url`
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        let base = format!("{}/", self.base_url.trim_end_matches('/'));
        Url::parse(&base)?.join("chat/completions")
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.0,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_iterations() -> usize {
    3
}
