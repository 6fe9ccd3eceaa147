use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::DEFAULT_TITLES;

fn default_num_titles() -> usize {
    DEFAULT_TITLES
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTitlesRequest {
    /// Page to title; must be an absolute http(s) URL.
    pub url: String,
    /// How many titles to ask for (1-20, default 5).
    #[serde(default = "default_num_titles", alias = "num_titles")]
    pub num_titles: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateTitlesResponse {
    pub titles: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// One of InvalidRequest, InvalidUrl, UnreachableUrl, InsufficientContent,
    /// ModelUnavailable, GenerationFailed, RateLimited.
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}
