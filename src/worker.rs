use crate::metrics::{MetricsRecorder, ROUTE_SUBTASK};
use crate::processor::SubtaskProcessor;
use crate::types::{SubtaskRequest, SubtaskResponse};
use std::sync::Arc;
use std::time::Instant;

/// Worker side of the protocol: runs the processor on one subtask and
/// records the call.
pub struct SubtaskWorker {
    node: String,
    processor: Arc<dyn SubtaskProcessor>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl SubtaskWorker {
    pub fn new(
        node: impl Into<String>,
        processor: Arc<dyn SubtaskProcessor>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            node: node.into(),
            processor,
            metrics,
        }
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    /// Always succeeds; the request id is echoed back unchanged.
    pub fn handle(&self, req: SubtaskRequest) -> SubtaskResponse {
        let started = Instant::now();

        tracing::info!(
            "[{}] Node {} processing subtask: {}",
            req.request_id,
            self.node,
            req.subtask_data
        );

        let processed = self.processor.process(&req.subtask_data);

        self.metrics
            .record("POST", ROUTE_SUBTASK, 200, &self.node, started.elapsed());

        SubtaskResponse {
            processed,
            request_id: req.request_id,
        }
    }
}
