use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use fanout::{AggregateResult, FanoutError, TaskRequest};

/// Fan a task out to every peer and return one outcome per peer
#[utoipa::path(
    post,
    path = "/task",
    tag = "tasks",
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Per-peer outcomes in peer order; unreachable peers appear as {error} entries", body = AggregateResult),
        (status = 500, description = "Fan-out could not complete", body = serde_json::Value)
    )
)]
pub async fn submit_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskRequest>,
) -> Result<Json<AggregateResult>, FanoutError> {
    let result = state.coordinator.dispatch(&req.task_data).await?;
    Ok(Json(result))
}
