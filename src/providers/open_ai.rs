use crate::config::AssistantConfig;
use crate::error::AssistantError;
use crate::providers::{ChatProvider, PromptMessage};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorRoot {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(AssistantError::MissingApiKey)?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(OpenAIProvider {
            client,
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        let defaults = AssistantConfig::default();
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: defaults.temperature,
            top_p: defaults.top_p,
            max_tokens: defaults.max_tokens,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, AssistantError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!("{} response: {}", status, String::from_utf8_lossy(&body));

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorRoot>(&body)
                .ok()
                .map(|root| root.error.message);
            return Err(AssistantError::BadResponse {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = serde_json::from_slice(&body)?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AssistantError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use mockito::{Matcher, Server};

    fn provider(url: String) -> OpenAIProvider {
        OpenAIProvider::with_base_url("fake_api_key".to_string(), url, "gpt-4".to_string())
    }

    #[tokio::test]
    async fn test_complete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .match_body(Matcher::PartialJsonString(
                r#"{"model": "gpt-4", "top_p": 0.9, "max_tokens": 2500, "stream": false}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "role": "assistant",
                            "content": "🥙 Recipe Name: Omelette\n🥬【Ingredients】\n• 2 eggs"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let messages = vec![
            PromptMessage::new(Role::System, "system"),
            PromptMessage::new(Role::User, "eggs"),
        ];
        let reply = provider(server.url()).complete(&messages).await.unwrap();
        assert!(reply.contains("Omelette"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#)
            .create_async()
            .await;

        let result = provider(server.url()).complete(&[]).await;
        match result {
            Err(AssistantError::BadResponse { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Incorrect API key provided"));
            }
            other => panic!("expected BadResponse, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_without_choices() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let result = provider(server.url()).complete(&[]).await;
        assert!(matches!(result, Err(AssistantError::EmptyCompletion)));
    }

    #[test]
    fn test_provider_name() {
        let provider = provider("http://localhost".to_string());
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = AssistantConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        // A blank configured key falls back to the environment
        if std::env::var("OPENAI_API_KEY").is_err() {
            assert!(matches!(
                OpenAIProvider::new(&config),
                Err(AssistantError::MissingApiKey)
            ));
        }
    }
}
