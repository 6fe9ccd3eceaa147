pub mod client;
pub mod openai;
pub mod parse;
pub mod prompt;

pub use client::{CompletionClient, CompletionError, CompletionRequest};
pub use openai::OpenAiCompatibleClient;
pub use parse::parse_titles;

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Input to a single generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRequest {
    pub source_text: String,
    pub requested_count: NonZeroUsize,
    /// Detected language of `source_text`, passed through as a prompt hint.
    pub language: Option<String>,
}

impl TitleRequest {
    pub fn new(source_text: impl Into<String>, requested_count: NonZeroUsize) -> Self {
        Self {
            source_text: source_text.into(),
            requested_count,
            language: None,
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }
}

/// Titles in the order the model produced them. Never longer than the
/// requested count and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleList(Vec<String>);

impl TitleList {
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for TitleList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for TitleList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("{0}")]
    ModelUnavailable(CompletionError),

    #[error("{0}")]
    Failed(CompletionError),

    #[error("model output contained no usable titles")]
    NoTitles,
}

impl From<CompletionError> for GenerateError {
    fn from(err: CompletionError) -> Self {
        if err.is_unavailable() {
            Self::ModelUnavailable(err)
        } else {
            Self::Failed(err)
        }
    }
}

#[derive(Clone)]
pub struct TitleGenerator {
    client: Arc<dyn CompletionClient>,
    max_tokens: u32,
    temperature: f32,
}

impl TitleGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            client,
            max_tokens,
            temperature,
        }
    }

    /// Ask the model once for `requested_count` titles.
    ///
    /// A shorter list than requested is still a success; the result is never
    /// padded.
    #[instrument(skip_all, fields(requested = request.requested_count.get()))]
    pub async fn generate(&self, request: &TitleRequest) -> Result<TitleList, GenerateError> {
        let count = request.requested_count.get();

        let completion = CompletionRequest {
            prompt: prompt::build_prompt(&request.source_text, count, request.language.as_deref()),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let raw = self.client.complete(&completion).await?;

        let titles = parse_titles(&raw, count);
        if titles.is_empty() {
            warn!(raw_chars = raw.chars().count(), "no titles found in model output");
            return Err(GenerateError::NoTitles);
        }
        if titles.len() < count {
            info!(returned = titles.len(), "model returned fewer titles than requested");
        }

        Ok(TitleList(titles))
    }
}
