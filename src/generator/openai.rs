use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::LlmSettings;
use crate::generator::client::{CompletionClient, CompletionError, CompletionRequest};

/// Longest slice of an error body kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Client for any service speaking the OpenAI `chat/completions` protocol
/// (OpenAI itself, Groq, local gateways).
pub struct OpenAiCompatibleClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(client: Client, settings: &LlmSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        }
    }

    pub fn from_settings(settings: &LlmSettings) -> Result<Self, CompletionError> {
        let client = ClientBuilder::new()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| CompletionError::Init(e.to_string()))?;
        Ok(Self::new(client, settings))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(CompletionError::from_reqwest_error)?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(CompletionError::Unauthorized(status));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Http {
                status,
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Malformed("response has no message content".into()))?;

        debug!(chars = content.chars().count(), "completion received");
        Ok(content)
    }
}
