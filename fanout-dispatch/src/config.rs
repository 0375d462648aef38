use fanout::{FanoutError, PeerRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SUBTASK_TIMEOUT_MS: u64 = 5000;

fn default_subtask_timeout_ms() -> u64 {
    DEFAULT_SUBTASK_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// This node's own address, as it appears in `cluster`.
    pub node_url: String,
    pub bind_addr: String,
    /// Every node of the cluster, self included, e.g. "http://10.0.1.2:3000".
    pub cluster: Vec<String>,
    #[serde(default = "default_subtask_timeout_ms")]
    pub subtask_timeout_ms: u64,
}

impl NodeConfig {
    /// Load node configuration from {config_dir}/node.json or fall back to the environment
    pub fn load_or_default(config_dir: &Path) -> Self {
        let node_json = config_dir.join("node.json");

        if node_json.exists() {
            match std::fs::read_to_string(&node_json) {
                Ok(content) => match serde_json::from_str::<NodeConfig>(&content) {
                    Ok(config) => {
                        tracing::info!(
                            "Loaded node config: node_url={}, cluster={}",
                            config.node_url,
                            config.cluster.len()
                        );
                        return config;
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse node.json: {}, using defaults", e);
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read node.json: {}, using defaults", e);
                }
            }
        }

        let config = Self::from_env();
        tracing::info!(
            "No usable node.json, configured from environment: node_url={}",
            config.node_url
        );
        config
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `FANOUT_*` variables resolved through `lookup`.
    ///
    /// Unset or unparseable values take their defaults: port 3000, self URL
    /// `http://localhost:<port>`, a three-node localhost cluster on ports
    /// 3000-3002, and a 5000 ms subtask timeout.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("FANOUT_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let node_url = lookup("FANOUT_NODE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        let bind_addr = lookup("FANOUT_BIND_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("127.0.0.1:{}", port));

        let cluster = match lookup("FANOUT_CLUSTER") {
            Some(list) if !list.trim().is_empty() => parse_cluster(&list),
            _ => (DEFAULT_PORT..DEFAULT_PORT + 3)
                .map(|p| format!("http://localhost:{}", p))
                .collect(),
        };

        let subtask_timeout_ms = lookup("FANOUT_SUBTASK_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SUBTASK_TIMEOUT_MS);

        NodeConfig {
            node_url,
            bind_addr,
            cluster,
            subtask_timeout_ms,
        }
    }

    pub fn validate(&self) -> fanout::Result<()> {
        if self.node_url.trim().is_empty() {
            return Err(FanoutError::Config("node_url must not be empty".into()));
        }
        if self.bind_addr.trim().is_empty() {
            return Err(FanoutError::Config("bind_addr must not be empty".into()));
        }
        if self.subtask_timeout_ms == 0 {
            return Err(FanoutError::Config(
                "subtask_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn subtask_timeout(&self) -> Duration {
        Duration::from_millis(self.subtask_timeout_ms)
    }

    pub fn registry(&self) -> PeerRegistry {
        PeerRegistry::new(&self.cluster, &self.node_url)
    }
}

/// Split a comma separated address list, dropping blanks.
pub fn parse_cluster(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
