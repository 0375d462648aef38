use fanout::{PrometheusMetrics, SubtaskWorker};
use fanout_dispatch::DispatchCoordinator;
use std::sync::Arc;

pub mod health;
pub mod internal;
pub mod metrics;
pub mod subtask;
pub mod task;

pub struct AppState {
    pub coordinator: Arc<DispatchCoordinator>,
    pub worker: Arc<SubtaskWorker>,
    pub metrics: Arc<PrometheusMetrics>,
}

impl AppState {
    pub fn node(&self) -> &str {
        self.coordinator.node()
    }
}

pub use health::health;
pub use internal::dispatch_status;
pub use metrics::metrics;
pub use subtask::submit_subtask;
pub use task::submit_task;
