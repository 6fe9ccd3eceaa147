use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// A single prompt sent to a completion service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("no API key configured for the completion service")]
    MissingApiKey,

    #[error("completion service rejected the credentials ({0})")]
    Unauthorized(StatusCode),

    #[error("completion client could not be initialized: {0}")]
    Init(String),

    #[error("completion request timed out")]
    Timeout,

    #[error("completion transport error: {0}")]
    Transport(String),

    #[error("completion service returned {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Whether the failure is about credentials or setup rather than this
    /// particular call.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey | Self::Unauthorized(_) | Self::Init(_)
        )
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::Init(err.to_string())
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A remote service that turns a prompt into free-form text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
