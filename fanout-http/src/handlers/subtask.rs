use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use fanout::{SubtaskRequest, SubtaskResponse};

/// Process one subtask sent by a coordinating peer
#[utoipa::path(
    post,
    path = "/subtask",
    tag = "tasks",
    request_body = SubtaskRequest,
    responses(
        (status = 200, description = "Processed payload with the caller's request id", body = SubtaskResponse)
    )
)]
pub async fn submit_subtask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubtaskRequest>,
) -> Json<SubtaskResponse> {
    Json(state.worker.handle(req))
}
