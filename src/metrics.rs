//! Request metrics.
//!
//! Every inbound `/task` and `/subtask` call ends with exactly one
//! observation: a counter increment and a latency sample, both labelled by
//! method, route, status code and node. The core only talks to the
//! [`MetricsRecorder`] trait; [`PrometheusMetrics`] is the implementation the
//! server wires in and scrapes through `GET /metrics`. On Linux the same
//! registry also carries the standard `process_*` series (CPU time, resident
//! memory, open file descriptors).

use crate::error::Result;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Duration;

pub const ROUTE_TASK: &str = "/task";
pub const ROUTE_SUBTASK: &str = "/subtask";

/// Latency histogram bucket bounds, in milliseconds.
pub const LATENCY_BUCKETS_MS: [f64; 7] = [50.0, 100.0, 300.0, 500.0, 1000.0, 2000.0, 5000.0];

const LABELS: [&str; 4] = ["method", "route", "status_code", "node"];

/// Sink for per-request observations. Must tolerate concurrent callers.
pub trait MetricsRecorder: Send + Sync {
    fn record(&self, method: &str, route: &str, status: u16, node: &str, elapsed: Duration);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {
    fn record(&self, _method: &str, _route: &str, _status: u16, _node: &str, _elapsed: Duration) {}
}

pub struct PrometheusMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_ms: HistogramVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &LABELS,
        )?;
        let request_duration_ms = HistogramVec::new(
            HistogramOpts::new("http_request_duration_ms", "Duration of HTTP requests in ms")
                .buckets(LATENCY_BUCKETS_MS.to_vec()),
            &LABELS,
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_ms.clone()))?;
        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_ms,
        })
    }

    /// Content type of [`PrometheusMetrics::render`] output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Snapshot of every registered metric in the Prometheus text format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| crate::FanoutError::Metrics(format!("non-UTF-8 exposition: {}", e)))
    }

    pub fn request_count(&self, method: &str, route: &str, status: u16, node: &str) -> u64 {
        let status = status.to_string();
        self.requests_total
            .with_label_values(&[method, route, status.as_str(), node])
            .get()
    }

    pub fn latency_sample_count(&self, method: &str, route: &str, status: u16, node: &str) -> u64 {
        let status = status.to_string();
        self.request_duration_ms
            .with_label_values(&[method, route, status.as_str(), node])
            .get_sample_count()
    }
}

impl MetricsRecorder for PrometheusMetrics {
    fn record(&self, method: &str, route: &str, status: u16, node: &str, elapsed: Duration) {
        let status = status.to_string();
        let labels = [method, route, status.as_str(), node];
        self.requests_total.with_label_values(&labels).inc();
        self.request_duration_ms
            .with_label_values(&labels)
            .observe(elapsed.as_secs_f64() * 1000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_increments_counter_and_histogram() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record("POST", ROUTE_TASK, 200, "n1", Duration::from_millis(120));
        metrics.record("POST", ROUTE_TASK, 200, "n1", Duration::from_millis(30));
        metrics.record("POST", ROUTE_TASK, 500, "n1", Duration::from_millis(1));

        assert_eq!(metrics.request_count("POST", ROUTE_TASK, 200, "n1"), 2);
        assert_eq!(metrics.request_count("POST", ROUTE_TASK, 500, "n1"), 1);
        assert_eq!(metrics.latency_sample_count("POST", ROUTE_TASK, 200, "n1"), 2);
    }

    #[test]
    fn test_render_exposition() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record("POST", ROUTE_SUBTASK, 200, "n1", Duration::from_millis(70));

        let text = metrics.render().unwrap();
        assert!(text.contains("http_requests_total"));
        assert!(text.contains("http_request_duration_ms_bucket"));
        assert!(text.contains("route=\"/subtask\""));
        assert!(text.contains("le=\"5000\""));
        assert!(metrics.content_type().starts_with("text/plain"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_render_includes_process_metrics() {
        let metrics = PrometheusMetrics::new().unwrap();

        let text = metrics.render().unwrap();
        assert!(text.contains("process_cpu_seconds_total"));
        assert!(text.contains("process_resident_memory_bytes"));
        assert!(text.contains("process_open_fds"));
    }

    #[test]
    fn test_concurrent_recording() {
        let metrics = Arc::new(PrometheusMetrics::new().unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.record("POST", ROUTE_SUBTASK, 200, "n1", Duration::from_millis(1));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(metrics.request_count("POST", ROUTE_SUBTASK, 200, "n1"), 2000);
    }
}
