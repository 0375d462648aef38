use super::config::NodeConfig;
use super::peer::{PeerClient, SubtaskTransport};
use fanout::aggregate::order_outcomes;
use fanout::metrics::ROUTE_TASK;
use fanout::{
    aggregate, AggregateResult, FanoutError, MetricsRecorder, PeerOutcome, PeerRegistry,
    RequestId, SubtaskRequest,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Fans each task out to every peer and aggregates what comes back
pub struct DispatchCoordinator {
    registry: PeerRegistry,
    /// One transport per registry entry, same order
    peers: Vec<Arc<dyn SubtaskTransport>>,
    timeout: Duration,
    metrics: Arc<dyn MetricsRecorder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeerStatus {
    pub addr: String,
    pub last_success: u64,
}

/// Snapshot of the coordinator for `GET /internal/status`
#[derive(Debug, Clone, Serialize)]
pub struct DispatchStatus {
    pub node: String,
    pub peer_count: usize,
    pub subtask_timeout_ms: u64,
    pub peers: Vec<PeerStatus>,
}

impl DispatchCoordinator {
    pub fn new(
        registry: PeerRegistry,
        timeout: Duration,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Arc<Self> {
        let peers: Vec<Arc<dyn SubtaskTransport>> = registry
            .iter()
            .map(|addr| {
                Arc::new(PeerClient::new(addr.to_string(), timeout)) as Arc<dyn SubtaskTransport>
            })
            .collect();

        Self::with_transports(registry, peers, timeout, metrics)
    }

    /// Build a coordinator over caller-supplied transports.
    ///
    /// `peers` must line up with `registry`: one transport per peer, in
    /// registry order. `timeout` is only reported here; each transport
    /// enforces its own.
    pub fn with_transports(
        registry: PeerRegistry,
        peers: Vec<Arc<dyn SubtaskTransport>>,
        timeout: Duration,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry,
            peers,
            timeout,
            metrics,
        })
    }

    pub fn from_config(config: &NodeConfig, metrics: Arc<dyn MetricsRecorder>) -> Arc<Self> {
        Self::new(config.registry(), config.subtask_timeout(), metrics)
    }

    pub fn node(&self) -> &str {
        self.registry.self_addr()
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    pub fn status(&self) -> DispatchStatus {
        DispatchStatus {
            node: self.node().to_string(),
            peer_count: self.peer_count(),
            subtask_timeout_ms: self.timeout.as_millis() as u64,
            peers: self
                .peers
                .iter()
                .map(|p| PeerStatus {
                    addr: p.peer_addr().to_string(),
                    last_success: p.last_success_timestamp(),
                })
                .collect(),
        }
    }

    /// Send one subtask per peer, wait for every call to settle, and return
    /// the outcomes in registry order.
    ///
    /// Peer failures never fail the dispatch; they become `{error}` entries.
    /// An `Err` means the fan-out itself broke (a call task panicked or was
    /// cancelled) and carries the request id for correlation.
    ///
    /// The fan-out runs in its own task, so it completes and records its
    /// `/task` observation even when the caller stops waiting for it.
    pub async fn dispatch(self: &Arc<Self>, task_data: &str) -> fanout::Result<AggregateResult> {
        let started = Instant::now();
        let request_id = RequestId::new();

        tracing::info!(
            "[{}] Node {} received task: {}",
            request_id,
            self.node(),
            task_data
        );

        let this = Arc::clone(self);
        let id = request_id.clone();
        let task_data = task_data.to_string();
        let handle = tokio::spawn(async move {
            let result = this.fan_out(&id, &task_data).await;
            this.finish(&id, &result, started);
            result
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => {
                let result = Err(FanoutError::Dispatch {
                    request_id: request_id.clone(),
                    reason: format!("Dispatch task failed: {}", e),
                });
                self.finish(&request_id, &result, started);
                result
            }
        }
    }

    /// Log the outcome of one dispatch and record its `/task` observation.
    fn finish(
        &self,
        request_id: &RequestId,
        result: &fanout::Result<AggregateResult>,
        started: Instant,
    ) {
        let status = match result {
            Ok(aggregated) => {
                tracing::info!(
                    "[{}] Node {} aggregated results: {} succeeded, {} failed",
                    request_id,
                    self.node(),
                    aggregated.succeeded(),
                    aggregated.failed()
                );
                200
            }
            Err(e) => {
                tracing::error!("[{}] Failed to distribute subtasks: {}", request_id, e);
                500
            }
        };
        self.metrics
            .record("POST", ROUTE_TASK, status, self.node(), started.elapsed());
    }

    async fn fan_out(
        &self,
        request_id: &RequestId,
        task_data: &str,
    ) -> fanout::Result<AggregateResult> {
        let subtask = SubtaskRequest::derive(task_data, request_id.clone());

        let mut join_set = JoinSet::new();
        for (idx, peer) in self.peers.iter().enumerate() {
            let peer = Arc::clone(peer);
            let subtask = subtask.clone();

            join_set.spawn(async move {
                let outcome = match peer.send(&subtask).await {
                    Ok(resp) => PeerOutcome::Success(resp),
                    Err(e) => {
                        tracing::warn!(
                            "[{}] Error from {}: {}",
                            subtask.request_id,
                            peer.peer_addr(),
                            e
                        );
                        PeerOutcome::Failure { error: e }
                    }
                };
                (idx, outcome)
            });
        }

        let mut completed: Vec<(usize, PeerOutcome)> = Vec::with_capacity(self.peers.len());
        while let Some(joined) = join_set.join_next().await {
            let entry = joined.map_err(|e| FanoutError::Dispatch {
                request_id: request_id.clone(),
                reason: format!("Task join error: {}", e),
            })?;
            completed.push(entry);
        }

        Ok(aggregate(
            request_id.clone(),
            self.node(),
            order_outcomes(self.peers.len(), completed),
        ))
    }
}
