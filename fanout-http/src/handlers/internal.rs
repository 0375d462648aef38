use crate::handlers::AppState;
use axum::{extract::State, Json};
use fanout_dispatch::DispatchStatus;
use std::sync::Arc;

/// GET /internal/status
/// Node identity, peer list and when each peer last answered a subtask
pub async fn dispatch_status(State(state): State<Arc<AppState>>) -> Json<DispatchStatus> {
    Json(state.coordinator.status())
}
