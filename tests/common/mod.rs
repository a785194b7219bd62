//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use commerce_ws::lifecycle::Shutdown;
use commerce_ws::{HttpServer, ServiceConfig};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<ServiceConfig>,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server for `config` and wait until it accepts connections.
pub async fn start_server(config: ServiceConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (updates, config_updates) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    TestServer { addr, updates, shutdown }
}

/// Set a search handler priority in `config`.
#[allow(dead_code)]
pub fn set_priority(config: &mut ServiceConfig, property: &str, priority: i64) {
    config
        .properties
        .0
        .insert(property.to_string(), toml::Value::Integer(priority));
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
