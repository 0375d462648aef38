use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
};
use fanout::FanoutError;
use std::sync::Arc;

use super::AppState;

/// GET /metrics
/// Prometheus scrape endpoint
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "health",
    responses(
        (status = 200, description = "Prometheus text exposition", body = String, content_type = "text/plain")
    )
)]
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, FanoutError> {
    let body = state.metrics.render()?;
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, state.metrics.content_type())],
        body,
    ))
}
