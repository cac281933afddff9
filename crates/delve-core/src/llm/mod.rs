mod claude;
mod error;
mod openai;
mod provider;

pub use claude::ClaudeClient;
pub use error::LLMError;
pub use openai::OpenAIClient;
pub use provider::Provider;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

/// A chat model that answers one prompt at a time.
///
/// The planner and the summarizer each make a single call per run, so a
/// plain completion is all the pipeline needs.
#[async_trait]
pub trait LLM: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError>;

    /// Same as [`LLM::complete`], with `system` sent as the system message.
    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError>;
}

/// Shared trait objects are what the pipeline hands to its stages.
#[async_trait]
impl LLM for Arc<dyn LLM> {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        (**self).complete(prompt).await
    }

    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt).await
    }
}

/// An HTTP client whose requests give up after `timeout`.
fn client_with_timeout(timeout: Duration) -> Result<Client, LLMError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| LLMError::Network(format!("cannot build HTTP client: {err}")))
}

/// Passes a 2xx response through; 429 and other statuses become errors.
async fn ensure_success(response: Response) -> Result<Response, LLMError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LLMError::RateLimited);
    }
    if status.is_success() {
        return Ok(response);
    }
    Err(LLMError::ApiError {
        status: status.as_u16(),
        message: response.text().await.unwrap_or_default(),
    })
}

/// Extracts JSON from a response that might be wrapped in markdown code blocks.
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // ```json ... ``` or ``` ... ```
    if trimmed.starts_with("```") {
        if let Some(start) = trimmed.find('\n') {
            let rest = &trimmed[start + 1..];
            if let Some(end) = rest.rfind("```") {
                return rest[..end].trim();
            }
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_with_timeout_builds() {
        assert!(client_with_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_fenced() {
        let response = "```json\n{\"plan\": []}\n```";
        assert_eq!(extract_json(response), "{\"plan\": []}");

        let response = "```\n[1, 2]\n```\n";
        assert_eq!(extract_json(response), "[1, 2]");
    }
}
