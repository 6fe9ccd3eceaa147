use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    app_state::AppState,
    service::TitleError,
    titles::dtos::{ErrorResponse, GenerateTitlesRequest, GenerateTitlesResponse},
};

#[utoipa::path(
    post,
    path = "/v1/titles",
    tag = "titles",
    request_body = GenerateTitlesRequest,
    responses(
        (status = 200, description = "Titles generated", body = GenerateTitlesResponse),
        (status = 400, description = "Malformed request or invalid URL", body = ErrorResponse),
        (status = 422, description = "Page has too little readable content", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Page unreachable or generation failed", body = ErrorResponse),
        (status = 503, description = "Title model unavailable", body = ErrorResponse)
    )
)]
pub async fn generate_titles(
    State(state): State<AppState>,
    payload: Result<Json<GenerateTitlesRequest>, JsonRejection>,
) -> Result<Json<GenerateTitlesResponse>, TitleError> {
    let Json(payload) =
        payload.map_err(|rejection| TitleError::InvalidRequest(rejection.body_text()))?;

    let titles = state
        .titles
        .generate_titles_from_url(&payload.url, payload.num_titles)
        .await?;

    Ok(Json(GenerateTitlesResponse {
        titles: titles.into_inner(),
    }))
}
