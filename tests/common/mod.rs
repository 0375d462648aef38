use fanout_dispatch::NodeConfig;
use fanout_http::handlers::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[allow(dead_code)]
pub struct TestNode {
    pub url: String,
    pub state: Arc<AppState>,
}

/// Build the state for a node with the given cluster view, without binding a port.
#[allow(dead_code)]
pub fn node_state(node_url: &str, cluster: &[&str], timeout_ms: u64) -> Arc<AppState> {
    let config = NodeConfig {
        node_url: node_url.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        cluster: cluster.iter().map(|s| s.to_string()).collect(),
        subtask_timeout_ms: timeout_ms,
    };
    fanout_http::build_state(&config).unwrap()
}

async fn bind_local() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    (listener, url)
}

/// Spawn `n` real nodes on ephemeral ports that all know each other.
#[allow(dead_code)]
pub async fn spawn_cluster(n: usize, timeout_ms: u64) -> Vec<TestNode> {
    spawn_cluster_with_extra_peers(n, &[], timeout_ms).await
}

/// Like [`spawn_cluster`], with `extra_peers` appended to every node's cluster list.
#[allow(dead_code)]
pub async fn spawn_cluster_with_extra_peers(
    n: usize,
    extra_peers: &[String],
    timeout_ms: u64,
) -> Vec<TestNode> {
    let mut bound = Vec::with_capacity(n);
    for _ in 0..n {
        bound.push(bind_local().await);
    }

    let mut cluster: Vec<String> = bound.iter().map(|(_, url)| url.clone()).collect();
    cluster.extend(extra_peers.iter().cloned());

    let mut nodes = Vec::with_capacity(n);
    for (listener, url) in bound {
        let config = NodeConfig {
            node_url: url.clone(),
            bind_addr: listener.local_addr().unwrap().to_string(),
            cluster: cluster.clone(),
            subtask_timeout_ms: timeout_ms,
        };
        let state = fanout_http::build_state(&config).unwrap();
        let app = fanout_http::router(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        nodes.push(TestNode { url, state });
    }
    nodes
}

/// A peer that accepts connections and never answers.
#[allow(dead_code)]
pub async fn spawn_silent_peer() -> String {
    let (listener, url) = bind_local().await;
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let _held = socket;
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });
    url
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub async fn unreachable_peer() -> String {
    let (listener, url) = bind_local().await;
    drop(listener);
    url
}
