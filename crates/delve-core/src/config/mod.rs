//! Configuration management for Delve.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. The file named by `DELVE_CONFIG`
//! 3. Project-local `delve.toml` file
//! 4. User config `~/.config/delve/config.toml`
//! 5. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration.
    pub llm: LLMConfig,

    /// Search/extract service configuration.
    pub search: SearchConfig,

    /// Bounds for the evidence-gathering phase.
    pub exploration: ExplorationConfig,

    /// Evidence budget handed to the summarizer.
    pub evidence: EvidenceConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `$DELVE_CONFIG`
    /// 2. `./delve.toml` (project local)
    /// 3. `~/.config/delve/config.toml` (user config)
    /// 4. Falls back to defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("DELVE_CONFIG") {
            return Self::from_file(path);
        }

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(DEFAULT_CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Checks the bounds the exploration phase depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exploration.max_urls_per_task == 0 {
            return Err(ConfigError::Invalid(
                "exploration.max_urls_per_task must be at least 1".to_string(),
            ));
        }
        if self.exploration.max_evidence_per_task == 0 {
            return Err(ConfigError::Invalid(
                "exploration.max_evidence_per_task must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides. A numeric or policy override
    /// that does not parse is an error rather than being skipped.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        // LLM overrides
        if let Ok(provider) = std::env::var("DELVE_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Ok(model) = std::env::var("DELVE_LLM_MODEL").or_else(|_| std::env::var("OPENAI_MODEL")) {
            self.llm.model = Some(model);
        }
        if let Ok(url) = std::env::var("DELVE_LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("DELVE_LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }

        // Search overrides
        if let Ok(url) = std::env::var("DELVE_SEARCH_BASE_URL") {
            self.search.base_url = url;
        }
        if let Ok(key) = std::env::var("DELVE_SEARCH_API_KEY") {
            self.search.api_key = Some(key);
        }

        // Exploration overrides
        if let Some(n) = env_parse("DELVE_MAX_URLS_PER_TASK")? {
            self.exploration.max_urls_per_task = n;
        }
        if let Some(n) = env_parse("DELVE_MAX_EVIDENCE_PER_TASK")? {
            self.exploration.max_evidence_per_task = n;
        }
        if let Some(n) = env_parse("DELVE_MAX_CONCURRENT_TASKS")? {
            self.exploration.max_concurrent_tasks = n;
        }
        if let Some(policy) = env_parse("DELVE_FAILURE_POLICY")? {
            self.exploration.failure_policy = policy;
        }

        // Server overrides
        if let Some(port) = env_parse("DELVE_PORT")? {
            self.server.port = port;
        }

        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    parse_override(name, std::env::var(name).ok())
}

fn parse_override<T: FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name}: cannot parse {value:?}"))),
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// Provider name: "openai", "anthropic", "ollama", or "openai-compatible".
    pub provider: String,

    /// Model name (provider-specific).
    pub model: Option<String>,

    /// Base URL for API (for openai-compatible providers).
    pub base_url: Option<String>,

    /// API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: u32,

    /// Timeout for one completion request.
    pub request_timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_string(),
            model: None,
            base_url: None,
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

impl LLMConfig {
    /// Get the model name, falling back to provider defaults.
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.provider.as_str() {
            "anthropic" | "claude" => DEFAULT_ANTHROPIC_MODEL.to_string(),
            "ollama" => DEFAULT_OLLAMA_MODEL.to_string(),
            _ => DEFAULT_OPENAI_MODEL.to_string(),
        })
    }

    /// Get the base URL, falling back to provider defaults.
    pub fn base_url_or_default(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| match self.provider.as_str() {
            "anthropic" | "claude" => DEFAULT_ANTHROPIC_URL.to_string(),
            "ollama" => DEFAULT_OLLAMA_URL.to_string(),
            "openrouter" => DEFAULT_OPENROUTER_URL.to_string(),
            _ => DEFAULT_OPENAI_URL.to_string(),
        })
    }

    /// Get API key from config or environment.
    pub fn api_key_or_env(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("DELVE_LLM_API_KEY").ok())
            .or_else(|| match self.provider.as_str() {
                "anthropic" | "claude" => std::env::var("ANTHROPIC_API_KEY").ok(),
                "openrouter" => std::env::var("OPENROUTER_API_KEY").ok(),
                _ => std::env::var("OPENAI_API_KEY").ok(),
            })
    }
}

/// Search/extract service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Service base URL.
    pub base_url: String,

    /// API key. Falls back to `PARALLEL_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Sent as the `parallel-beta` header.
    pub beta_version: String,

    /// Timeout for one search or extract call.
    pub request_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            api_key: None,
            beta_version: DEFAULT_SEARCH_BETA_VERSION.to_string(),
            request_timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
        }
    }
}

impl SearchConfig {
    /// Get API key from config or environment.
    pub fn api_key_or_env(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("PARALLEL_API_KEY").ok())
    }
}

/// What the orchestrator does when one task's upstream call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and keep the other tasks' results.
    #[default]
    Isolate,
    /// Fail the whole exploration phase.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "isolate" => Ok(FailurePolicy::Isolate),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(ConfigError::Invalid(format!("unknown failure policy: {other}"))),
        }
    }
}

/// Bounds for the evidence-gathering phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// URLs requested from search and kept per task.
    pub max_urls_per_task: usize,

    /// Evidence items one task may contribute.
    pub max_evidence_per_task: usize,

    /// Excerpt budget per search result.
    pub max_search_excerpt_chars: usize,

    /// Excerpt budget per extracted page.
    pub max_extract_chars: usize,

    /// In-flight task cap; 0 launches every task at once.
    pub max_concurrent_tasks: usize,

    /// Handling of per-task upstream failures.
    pub failure_policy: FailurePolicy,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            max_urls_per_task: DEFAULT_MAX_URLS_PER_TASK,
            max_evidence_per_task: DEFAULT_MAX_EVIDENCE_PER_TASK,
            max_search_excerpt_chars: DEFAULT_MAX_SEARCH_EXCERPT_CHARS,
            max_extract_chars: DEFAULT_MAX_EXTRACT_CHARS,
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Evidence budget handed to the summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceConfig {
    /// Maximum number of evidence items.
    pub max_items: usize,

    /// Maximum cumulative serialized size of the items.
    pub max_chars: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_EVIDENCE_MAX_ITEMS,
            max_chars: DEFAULT_EVIDENCE_MAX_CHARS,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, DEFAULT_LLM_PROVIDER);
        assert_eq!(config.exploration.max_urls_per_task, DEFAULT_MAX_URLS_PER_TASK);
        assert_eq!(config.exploration.failure_policy, FailurePolicy::Isolate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[llm]"));
        assert!(toml_str.contains("[search]"));
        assert!(toml_str.contains("[exploration]"));
        assert!(toml_str.contains("failure_policy = \"isolate\""));
    }

    #[test]
    fn test_api_keys_not_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());
        config.search.api_key = Some("px-secret".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("secret"));
    }

    #[test]
    fn test_zero_bounds_rejected() {
        let mut config = Config::default();
        config.exploration.max_evidence_per_task = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!("Abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::Abort);
        assert_eq!("isolate".parse::<FailurePolicy>().unwrap(), FailurePolicy::Isolate);
        assert!("ignore".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_misspelled_policy_override_rejected() {
        let err = parse_override::<FailurePolicy>("DELVE_FAILURE_POLICY", Some("abrot".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("DELVE_FAILURE_POLICY")));
    }

    #[test]
    fn test_numeric_override_parsing() {
        assert_eq!(parse_override::<usize>("N", Some(" 4 ".to_string())).unwrap(), Some(4));
        assert_eq!(parse_override::<usize>("N", None).unwrap(), None);
        assert!(parse_override::<u16>("DELVE_PORT", Some("eighty".to_string())).is_err());
    }
}
