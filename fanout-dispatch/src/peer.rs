use fanout::{SubtaskRequest, SubtaskResponse};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub type SubtaskFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SubtaskResponse, String>> + Send + 'a>>;

/// One peer as the coordinator sees it: an address and a way to deliver a subtask.
///
/// Failures come back as a message that ends up verbatim in the peer's
/// `{error}` entry.
pub trait SubtaskTransport: Send + Sync {
    fn peer_addr(&self) -> &str;

    /// Unix seconds of the last successful delivery, 0 if there was none
    fn last_success_timestamp(&self) -> u64 {
        0
    }

    fn send<'a>(&'a self, req: &'a SubtaskRequest) -> SubtaskFuture<'a>;
}

/// HTTP client wrapper for sending subtasks to a single peer node
pub struct PeerClient {
    peer_addr: String,
    http_client: reqwest::Client,
    timeout: Duration,
    last_success: Arc<AtomicU64>, // Unix timestamp in seconds
}

impl PeerClient {
    pub fn new(peer_addr: String, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            peer_addr,
            http_client,
            timeout,
            last_success: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn last_success_timestamp(&self) -> u64 {
        self.last_success.load(Ordering::Relaxed)
    }

    /// POST one subtask to this peer's `/subtask` endpoint.
    ///
    /// Every failure (timeout, connection error, non-2xx status, undecodable
    /// body) comes back as a message; nothing is retried.
    pub async fn submit_subtask(&self, req: &SubtaskRequest) -> Result<SubtaskResponse, String> {
        let url = format!("{}/subtask", self.peer_addr);

        // The fallback client has no timeout of its own
        let response = self
            .http_client
            .post(&url)
            .timeout(self.timeout)
            .json(req)
            .send()
            .await
            .map_err(|e| self.describe(e, "Failed to send request to"))?;

        if !response.status().is_success() {
            return Err(format!(
                "Peer {} returned error: {}",
                self.peer_addr,
                response.status()
            ));
        }

        let resp: SubtaskResponse = response
            .json()
            .await
            .map_err(|e| self.describe(e, "Failed to parse response from"))?;

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.last_success.store(now, Ordering::Relaxed);

        Ok(resp)
    }

    fn describe(&self, e: reqwest::Error, context: &str) -> String {
        if e.is_timeout() {
            format!("timeout of {}ms exceeded", self.timeout.as_millis())
        } else {
            format!("{} {}: {}", context, self.peer_addr, e)
        }
    }
}

impl SubtaskTransport for PeerClient {
    fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    fn last_success_timestamp(&self) -> u64 {
        PeerClient::last_success_timestamp(self)
    }

    fn send<'a>(&'a self, req: &'a SubtaskRequest) -> SubtaskFuture<'a> {
        Box::pin(self.submit_subtask(req))
    }
}
