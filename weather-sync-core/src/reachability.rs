//! Network availability checks consulted before any refresh.

use std::{
    fmt::Debug,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use tokio::net::TcpStream;
use tracing::debug;

/// Answers "is the network reachable right now". Must not block.
pub trait Reachability: Send + Sync + Debug {
    fn is_connected(&self) -> bool;
}

/// Reachability backed by a flag that the owner updates.
#[derive(Debug)]
pub struct ReachabilityFlag {
    connected: AtomicBool,
}

impl ReachabilityFlag {
    pub fn new(connected: bool) -> Self {
        Self { connected: AtomicBool::new(connected) }
    }

    pub fn set(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl Default for ReachabilityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reachability for ReachabilityFlag {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Try a TCP connection to `host:port`; `false` on error or timeout.
pub async fn probe(host: &str, port: u16, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(err)) => {
            debug!(host, port, error = %err, "reachability probe failed");
            false
        }
        Err(_) => {
            debug!(host, port, "reachability probe timed out");
            false
        }
    }
}

/// Host and port of an `http(s)://` URL, for probing.
pub fn host_and_port(url: &str) -> Option<(String, u16)> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_string();
    let port = parsed.port_or_known_default()?;
    Some((host, port))
}
