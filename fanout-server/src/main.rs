#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use clap::Parser;
use fanout_dispatch::NodeConfig;
use fanout_http::serve;

/// Peer node of a fixed cluster: fans tasks out to every other node and
/// aggregates their answers.
///
/// Settings come from {config_dir}/node.json when present, otherwise from the
/// FANOUT_* environment. Flags given here override either source.
#[derive(Parser)]
#[command(name = "fanout")]
struct Cli {
    #[arg(long, env = "FANOUT_CONFIG_DIR", default_value = ".")]
    config_dir: String,
    /// Port of this node; also derives the self URL and bind address unless those are set
    #[arg(long)]
    port: Option<u16>,
    /// This node's own address as listed in the cluster
    #[arg(long)]
    node_url: Option<String>,
    #[arg(long)]
    bind_addr: Option<String>,
    /// Comma separated addresses of every node, self included
    #[arg(long, value_delimiter = ',')]
    cluster: Option<Vec<String>>,
    #[arg(long)]
    subtask_timeout_ms: Option<u64>,
}

impl Cli {
    fn apply(&self, mut config: NodeConfig) -> NodeConfig {
        if let Some(port) = self.port {
            config.node_url = format!("http://localhost:{}", port);
            config.bind_addr = format!("127.0.0.1:{}", port);
        }
        if let Some(ref node_url) = self.node_url {
            config.node_url = node_url.clone();
        }
        if let Some(ref bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr.clone();
        }
        if let Some(ref cluster) = self.cluster {
            config.cluster = cluster
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(ms) = self.subtask_timeout_ms {
            config.subtask_timeout_ms = ms;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = cli.apply(NodeConfig::load_or_default(std::path::Path::new(
        &cli.config_dir,
    )));

    if let Err(e) = config.validate() {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }

    serve(config).await
}
