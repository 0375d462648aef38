//! # fanout
//!
//! Core of a peer node in a small, fixed cluster. A node that receives a task
//! fans one subtask out to every other node, waits for all of them to answer
//! or time out, and replies with one outcome per peer. A node that receives a
//! subtask transforms it and answers. Every node runs the same code and plays
//! both roles.
//!
//! This crate holds the transport-independent pieces:
//!
//! - [`registry`]: the immutable peer set (cluster minus self)
//! - [`processor`]: the pure subtask transform
//! - [`worker`]: the subtask side, processor plus metrics
//! - [`aggregate`]: assembling per-peer outcomes into the task reply
//! - [`metrics`]: the recorder trait and its Prometheus implementation
//! - [`types`]: wire types shared by both hops
//!
//! The HTTP peer client and the dispatch coordinator live in
//! `fanout-dispatch`; the axum server lives in `fanout-http`.
//!
//! ```rust
//! use fanout::registry::resolve_peers;
//!
//! let cluster = ["http://localhost:3000", "http://localhost:3001", "http://localhost:3002"];
//! let peers = resolve_peers(&cluster, "http://localhost:3000");
//! assert_eq!(peers, vec!["http://localhost:3001", "http://localhost:3002"]);
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Dependencies | Use case |
//! |---------|-------------|----------|
//! | `axum-support` | axum | [`FanoutError`] implements `IntoResponse` |
//! | `openapi` | utoipa | OpenAPI schemas for the wire types |

pub mod aggregate;
pub mod error;
pub mod metrics;
pub mod processor;
pub mod registry;
pub mod types;
pub mod worker;

pub use aggregate::aggregate;
pub use error::{FanoutError, Result};
pub use metrics::{MetricsRecorder, NoopMetrics, PrometheusMetrics};
pub use processor::{SubtaskProcessor, UppercaseProcessor};
pub use registry::{resolve_peers, PeerRegistry};
pub use types::*;
pub use worker::SubtaskWorker;
