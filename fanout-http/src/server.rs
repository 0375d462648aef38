use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use crate::handlers::{
    dispatch_status, health, metrics, submit_subtask, submit_task, AppState,
};
use crate::middleware::normalize_content_type;
use crate::openapi::ApiDoc;
use fanout::{PrometheusMetrics, SubtaskWorker, UppercaseProcessor};
use fanout_dispatch::{DispatchCoordinator, NodeConfig};

/// Wire the coordinator, the worker and the shared metrics registry for one node.
pub fn build_state(config: &NodeConfig) -> fanout::Result<Arc<AppState>> {
    config.validate()?;

    let metrics = Arc::new(PrometheusMetrics::new()?);
    let coordinator = DispatchCoordinator::from_config(config, metrics.clone());
    let worker = Arc::new(SubtaskWorker::new(
        coordinator.node(),
        Arc::new(UppercaseProcessor),
        metrics.clone(),
    ));

    Ok(Arc::new(AppState {
        coordinator,
        worker,
        metrics,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/task", post(submit_task))
        .route("/subtask", post(submit_subtask))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/internal/status", get(dispatch_status))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(middleware::from_fn(normalize_content_type))
        .layer(TraceLayer::new_for_http())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn serve(config: NodeConfig) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let state = build_state(&config)?;

    if state.coordinator.peer_count() == 0 {
        tracing::warn!("No peers configured, tasks will aggregate zero results");
    } else {
        tracing::info!(
            "Dispatching to {} peers: {:?} (timeout {}ms)",
            state.coordinator.peer_count(),
            state.coordinator.registry().peers(),
            config.subtask_timeout_ms
        );
    }

    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Node {} running on {}", state.node(), config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Node {} stopped", state.node());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
