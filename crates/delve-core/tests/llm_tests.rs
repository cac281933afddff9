use delve_core::config::DEFAULT_OLLAMA_MODEL;
use delve_core::llm::Provider;
use delve_core::{ClaudeClient, LLMConfig, LLMError, OpenAIClient, LLM};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Claude client tests
mod claude {
    use super::*;

    #[tokio::test]
    async fn test_messages_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [
                    {"type": "text", "text": "{\"plan\": []"},
                    {"type": "tool_use", "id": "t1"},
                    {"type": "text", "text": "}"}
                ]
            })))
            .mount(&server)
            .await;

        let client = ClaudeClient::new("test-key")
            .with_api_url(format!("{}/v1/messages", server.uri()));
        let response = client.complete_with_system("system", "hello").await.unwrap();
        assert_eq!(response, "{\"plan\": []}");
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = ClaudeClient::new("test-key").with_api_url(server.uri());
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, LLMError::RateLimited));
    }
}

// OpenAI client tests
mod openai {
    use super::*;

    #[test]
    fn test_client_model() {
        let client = OpenAIClient::openai("test-key", "gpt-4o");
        assert_eq!(client.model(), "gpt-4o");

        let client = OpenAIClient::ollama("llama3");
        assert_eq!(client.model(), "llama3");
    }

    #[tokio::test]
    async fn test_chat_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "  a plan  "}}]
            })))
            .mount(&server)
            .await;

        let client = OpenAIClient::new(format!("{}/v1/", server.uri()), "test-key", "gpt-4o");
        let response = client.complete_with_system("system", "topic").await.unwrap();
        assert_eq!(response, "a plan");
    }

    #[tokio::test]
    async fn test_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = OpenAIClient::new(server.uri(), "test-key", "gpt-4o");
        let err = client.complete("topic").await.unwrap_err();
        assert!(matches!(err, LLMError::ApiError { status: 500, .. }));
    }
}

// Provider tests
mod provider {
    use super::*;

    #[test]
    fn test_default_provider() {
        let provider = Provider::default();
        assert!(matches!(provider, Provider::OpenAI { .. }));
    }

    #[test]
    fn test_ollama_provider_build() {
        let provider = Provider::Ollama {
            base_url: None,
            model: DEFAULT_OLLAMA_MODEL.to_string(),
        };
        assert!(provider.build().is_ok());
    }

    #[test]
    fn test_openai_provider_build() {
        let provider = Provider::OpenAI {
            base_url: Some("http://localhost:8080/v1".to_string()),
            api_key: Some("test".to_string()),
            model: Some("local-model".to_string()),
        };
        assert!(provider.build().is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = LLMConfig {
            provider: "ollama".to_string(),
            model: Some("codellama".to_string()),
            ..Default::default()
        };

        let provider = Provider::from_config(&config);
        assert!(matches!(provider, Provider::Ollama { model, .. } if model == "codellama"));
    }

    #[test]
    fn test_build_from_config_with_key() {
        let config = LLMConfig {
            provider: "anthropic".to_string(),
            api_key: Some("sk-test".to_string()),
            request_timeout_secs: 5,
            ..Default::default()
        };
        assert!(Provider::build_from_config(&config).is_ok());
    }
}
