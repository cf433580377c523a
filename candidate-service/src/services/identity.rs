use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tokio::net::UdpSocket;

/// Address this process reports from the detailed liveness probe.
///
/// Resolved once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceId(Arc<str>);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(Arc::from(id.into()))
    }

    /// Lookup order: explicit override, the host name's own addresses, the
    /// address of the default outbound route, loopback.
    pub async fn resolve(override_id: Option<&str>) -> Self {
        if let Some(id) = override_id {
            tracing::info!(instance_id = %id, "Using configured instance id");
            return Self::new(id);
        }

        let address = match host_address().await {
            Some(addr) => addr,
            None => outbound_address()
                .await
                .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        };
        tracing::info!(instance_id = %address, "Resolved instance id");

        Self::new(address.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

async fn hostname() -> Option<String> {
    if let Ok(name) = env::var("HOSTNAME") {
        if !name.trim().is_empty() {
            return Some(name.trim().to_string());
        }
    }

    tokio::fs::read_to_string("/etc/hostname")
        .await
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

async fn host_address() -> Option<IpAddr> {
    let name = hostname().await?;
    let picked = match tokio::net::lookup_host((name.as_str(), 0)).await {
        Ok(addrs) => pick_address(addrs.map(|a| a.ip())),
        Err(e) => {
            tracing::debug!(hostname = %name, "Host name lookup failed: {}", e);
            None
        }
    };
    picked
}

/// Local side of a connected UDP socket. Connecting a datagram socket sends
/// nothing; it only selects a route.
async fn outbound_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await.ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).await.ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified() && !ip.is_loopback()).then_some(ip)
}

/// First non-loopback IPv4 address, then any non-loopback address.
fn pick_address(addrs: impl Iterator<Item = IpAddr>) -> Option<IpAddr> {
    let candidates: Vec<IpAddr> = addrs.filter(|ip| !ip.is_loopback()).collect();
    candidates
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
}
