//! Static peer set of this node.
//!
//! The cluster is fixed: the full address list is known at startup, and the
//! peers of a node are simply every other address in that list. The registry
//! is built once and never mutated, so it can be shared across concurrent
//! dispatches without locking.

/// Every address in `all_addresses` except `self_addr`, in input order.
///
/// Addresses compare equal when they only differ by a trailing `/`.
/// Duplicates are kept once.
pub fn resolve_peers<S: AsRef<str>>(all_addresses: &[S], self_addr: &str) -> Vec<String> {
    let me = normalize(self_addr);
    let mut peers: Vec<String> = Vec::with_capacity(all_addresses.len());

    for addr in all_addresses {
        let addr = normalize(addr.as_ref());
        if addr.is_empty() || addr == me {
            continue;
        }
        if !peers.iter().any(|p| p == addr) {
            peers.push(addr.to_string());
        }
    }

    peers
}

fn normalize(addr: &str) -> &str {
    addr.trim().trim_end_matches('/')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRegistry {
    self_addr: String,
    peers: Vec<String>,
}

impl PeerRegistry {
    pub fn new<S: AsRef<str>>(all_addresses: &[S], self_addr: &str) -> Self {
        let peers = resolve_peers(all_addresses, self_addr);
        tracing::info!(
            "Peer registry: self={}, peers={:?}",
            normalize(self_addr),
            peers
        );
        Self {
            self_addr: normalize(self_addr).to_string(),
            peers,
        }
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.peers.iter().map(String::as_str)
    }
}
