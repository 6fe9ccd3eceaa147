use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Plain text pulled out of a page, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub text: String,
    pub character_count: usize,
    pub language: Option<String>,
}

impl ExtractedContent {
    pub fn new(text: String, language: Option<String>) -> Self {
        Self {
            character_count: text.chars().count(),
            text,
            language,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("extracted content is too thin to title ({chars} characters, {words} words)")]
    InsufficientContent { chars: usize, words: usize },
}

/// Collapse every whitespace run (including newlines) to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}
