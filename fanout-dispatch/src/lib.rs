//! Coordinator side of the cluster: node configuration, the HTTP client used
//! to reach each peer, and the dispatcher that fans a task out to all of them.

pub mod config;
pub mod coordinator;
pub mod peer;

pub use config::NodeConfig;
pub use coordinator::{DispatchCoordinator, DispatchStatus, PeerStatus};
pub use peer::{PeerClient, SubtaskFuture, SubtaskTransport};
