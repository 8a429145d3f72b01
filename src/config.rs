//! Bridge configuration.
//!
//! The core consumes values only; how they are loaded (file, flags,
//! environment) is the host's concern. The demo binary deserializes this
//! struct from a JSON file.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use tokio::net::lookup_host;

/// Values the bridge needs to reach the downstream controller.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Hostname or IP of the downstream controller
    pub target_address: String,
    pub target_port: u16,
    /// How long to wait for an acknowledgment header after a send.
    /// `None` skips the response read entirely and leaves the connect
    /// phase unbounded.
    #[serde(default)]
    pub response_timeout_ms: Option<u64>,
}

/// A resolved downstream endpoint, fixed for the forwarder's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionTarget {
    pub addr: SocketAddr,
    pub response_timeout: Option<Duration>,
}

impl BridgeConfig {
    /// Resolve the target host once. The bridge refuses to start on an
    /// unresolvable target rather than failing on the first forward.
    pub async fn resolve(&self) -> io::Result<ConnectionTarget> {
        let mut addrs = lookup_host((self.target_address.as_str(), self.target_port)).await?;
        let addr = addrs.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {}", self.target_address),
            )
        })?;

        Ok(ConnectionTarget {
            addr,
            response_timeout: self.response_timeout_ms.map(Duration::from_millis),
        })
    }
}
