use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    app_state::AppState,
    health::{self, HealthResponse},
    middleware::{RateLimit, rate_limit_middleware},
    titles::{
        dtos::{ErrorBody, ErrorResponse, GenerateTitlesRequest, GenerateTitlesResponse},
        handlers,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::generate_titles, health::health_check),
    components(schemas(
        GenerateTitlesRequest,
        GenerateTitlesResponse,
        ErrorResponse,
        ErrorBody,
        HealthResponse
    )),
    tags(
        (name = "titles", description = "Title suggestions for web pages"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the service router. `rate_limit` applies to the title endpoint only.
pub fn router(state: AppState, rate_limit: Option<RateLimit>) -> Router {
    let mut titles = Router::new().route("/v1/titles", post(handlers::generate_titles));
    if let Some(limit) = rate_limit {
        titles = titles.route_layer(middleware::from_fn_with_state(limit, rate_limit_middleware));
    }

    Router::new()
        .merge(titles)
        .route("/healthz", get(health::health_check))
        .route("/openapi.json", get(openapi))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
