use std::sync::Arc;
use std::time::Duration;

use super::{ClaudeClient, LLMError, OpenAIClient, LLM};
use crate::config::{
    LLMConfig, DEFAULT_ANTHROPIC_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_OLLAMA_MODEL,
    DEFAULT_OLLAMA_URL, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL,
};

/// Which model backend to talk to. Unset fields fall back to environment
/// variables, then to built-in defaults.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Any `/chat/completions` endpoint.
    OpenAI {
        base_url: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
    },
    Anthropic {
        base_url: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
    },
    Ollama {
        base_url: Option<String>,
        model: String,
    },
}

impl Default for Provider {
    fn default() -> Self {
        Provider::OpenAI {
            base_url: None,
            api_key: None,
            model: None,
        }
    }
}

impl Provider {
    /// Maps the `[llm]` section onto a provider; unknown names are treated
    /// as OpenAI-compatible.
    pub fn from_config(config: &LLMConfig) -> Self {
        match config.provider.as_str() {
            "anthropic" | "claude" => Provider::Anthropic {
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
            },
            "ollama" => Provider::Ollama {
                base_url: config.base_url.clone(),
                model: config.model_or_default(),
            },
            _ => Provider::OpenAI {
                base_url: Some(config.base_url_or_default()),
                api_key: config.api_key_or_env(),
                model: config.model.clone(),
            },
        }
    }

    /// Builds a client with the token budget and timeout from `config`.
    pub fn build_from_config(config: &LLMConfig) -> Result<Arc<dyn LLM>, LLMError> {
        Self::from_config(config).build_tuned(
            config.max_tokens,
            Some(Duration::from_secs(config.request_timeout_secs)),
        )
    }

    pub fn build(self) -> Result<Arc<dyn LLM>, LLMError> {
        self.build_tuned(DEFAULT_MAX_TOKENS, None)
    }

    fn build_tuned(self, max_tokens: u32, timeout: Option<Duration>) -> Result<Arc<dyn LLM>, LLMError> {
        let client: Arc<dyn LLM> = match self {
            Provider::OpenAI { base_url, api_key, model } => {
                let base = base_url
                    .or_else(|| env_first(&["DELVE_LLM_BASE_URL", "OPENAI_BASE_URL"]))
                    .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
                let key = api_key
                    .or_else(|| env_first(&["DELVE_LLM_API_KEY", "OPENAI_API_KEY"]))
                    .unwrap_or_default();
                let model = model
                    .or_else(|| env_first(&["DELVE_LLM_MODEL", "OPENAI_MODEL"]))
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

                let client = OpenAIClient::new(base, key, model).with_max_tokens(max_tokens);
                Arc::new(match timeout {
                    Some(timeout) => client.with_timeout(timeout)?,
                    None => client,
                })
            }

            Provider::Anthropic { base_url, api_key, model } => {
                let key = api_key
                    .or_else(|| env_first(&["ANTHROPIC_API_KEY"]))
                    .ok_or(LLMError::MissingApiKey)?;
                let model = model
                    .or_else(|| env_first(&["ANTHROPIC_MODEL"]))
                    .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string());

                let mut client = ClaudeClient::new(key)
                    .with_model(model)
                    .with_max_tokens(max_tokens);
                if let Some(url) = base_url {
                    client = client.with_api_url(url);
                }
                Arc::new(match timeout {
                    Some(timeout) => client.with_timeout(timeout)?,
                    None => client,
                })
            }

            Provider::Ollama { base_url, model } => {
                let base = base_url
                    .or_else(|| {
                        env_first(&["OLLAMA_HOST"])
                            .map(|host| format!("{}/v1", host.trim_end_matches('/')))
                    })
                    .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

                let client = OpenAIClient::new(base, "", model).with_max_tokens(max_tokens);
                Arc::new(match timeout {
                    Some(timeout) => client.with_timeout(timeout)?,
                    None => client,
                })
            }
        };

        Ok(client)
    }

    /// Picks a backend from the environment alone: `DELVE_LLM_PROVIDER` wins,
    /// then an Anthropic key, then a bare `OLLAMA_HOST`, else OpenAI-compatible.
    pub fn from_env() -> Result<Arc<dyn LLM>, LLMError> {
        let ollama_model = || {
            std::env::var("DELVE_LLM_MODEL")
                .or_else(|_| std::env::var("OLLAMA_MODEL"))
                .unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string())
        };
        let anthropic = || Provider::Anthropic {
            base_url: None,
            api_key: None,
            model: None,
        };

        if let Ok(provider) = std::env::var("DELVE_LLM_PROVIDER") {
            return match provider.to_lowercase().as_str() {
                "openai" => Provider::default().build(),
                "anthropic" | "claude" => anthropic().build(),
                "ollama" => Provider::Ollama {
                    base_url: None,
                    model: ollama_model(),
                }
                .build(),
                other => Err(LLMError::UnknownProvider(other.to_string())),
            };
        }

        if std::env::var("ANTHROPIC_API_KEY").is_ok() {
            return anthropic().build();
        }

        if std::env::var("OLLAMA_HOST").is_ok() && std::env::var("OPENAI_API_KEY").is_err() {
            return Provider::Ollama {
                base_url: None,
                model: ollama_model(),
            }
            .build();
        }

        Provider::default().build()
    }
}

/// The first of `names` that is set and non-empty.
fn env_first(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
}
