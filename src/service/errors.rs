use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    extractor::ExtractError,
    fetcher::FetchError,
    generator::GenerateError,
    titles::dtos::{ErrorBody, ErrorResponse},
};

/// Every way a title request can fail, one variant per reported kind.
#[derive(Error, Debug)]
pub enum TitleError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("could not retrieve page: {0}")]
    UnreachableUrl(String),

    #[error("page has too little readable content: {0}")]
    InsufficientContent(String),

    #[error("title model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("title generation failed: {0}")]
    GenerationFailed(String),

    #[error("rate limit exceeded")]
    RateLimited,
}

impl TitleError {
    /// Stable machine-readable classification.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::InvalidUrl(_) => "InvalidUrl",
            Self::UnreachableUrl(_) => "UnreachableUrl",
            Self::InsufficientContent(_) => "InsufficientContent",
            Self::ModelUnavailable(_) => "ModelUnavailable",
            Self::GenerationFailed(_) => "GenerationFailed",
            Self::RateLimited => "RateLimited",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Self::UnreachableUrl(_) | Self::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::InsufficientContent(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<FetchError> for TitleError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidUrl(reason) => Self::InvalidUrl(reason),
            other => Self::UnreachableUrl(other.to_string()),
        }
    }
}

impl From<ExtractError> for TitleError {
    fn from(err: ExtractError) -> Self {
        Self::InsufficientContent(err.to_string())
    }
}

impl From<GenerateError> for TitleError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::ModelUnavailable(inner) => Self::ModelUnavailable(inner.to_string()),
            other => Self::GenerationFailed(other.to_string()),
        }
    }
}

impl IntoResponse for TitleError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(kind = self.kind(), error = %self, "title request failed");
        } else {
            info!(kind = self.kind(), error = %self, "title request rejected");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                kind: self.kind().to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
