//! Device discovery via UDP broadcast.

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use log::debug;
use serde_json::{Value, json};
use tokio::net::UdpSocket;
use tokio::time::Instant;

use crate::device::Device;
use crate::errors::Error;
use crate::light::Light;

type Result<T> = std::result::Result<T, Error>;

/// Something that can find lights on the local network.
pub trait Discovery: Send + Sync {
    type Device: Device;

    /// Returns the reachable devices in the order they answered.
    ///
    /// An empty list is not an error.
    fn discover(&self) -> impl Future<Output = Result<Vec<Self::Device>>> + Send;
}

/// A discovered Wiz bulb on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredBulb {
    /// IP address of the discovered bulb
    pub ip: Ipv4Addr,
    /// MAC address of the discovered bulb
    pub mac: String,
}

/// Finds Wiz bulbs by broadcasting a registration probe.
///
/// # Examples
///
/// ```ignore
/// use std::net::Ipv4Addr;
/// use std::time::Duration;
/// use wiz_bridge::BulbScanner;
///
/// let scanner = BulbScanner::new(Ipv4Addr::BROADCAST).with_window(Duration::from_secs(2));
/// for bulb in scanner.scan().await? {
///     println!("  {} - {}", bulb.ip, bulb.mac);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BulbScanner {
    broadcast: Ipv4Addr,
    port: u16,
    window: Duration,
    command_timeout: Duration,
}

impl BulbScanner {
    const WINDOW_MS: u64 = 5000;
    const COMMAND_TIMEOUT_MS: u64 = 1000;

    pub fn new(broadcast: Ipv4Addr) -> Self {
        BulbScanner {
            broadcast,
            port: Light::PORT,
            window: Duration::from_millis(Self::WINDOW_MS),
            command_timeout: Duration::from_millis(Self::COMMAND_TIMEOUT_MS),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// How long to collect replies after the probe is sent.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Reply timeout given to the [`Light`]s produced by [`Discovery::discover`].
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Broadcasts the probe and collects the bulbs that answer within the window.
    pub async fn scan(&self) -> Result<Vec<DiscoveredBulb>> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| Error::socket("bind", e))?;

        socket
            .set_broadcast(true)
            .map_err(|e| Error::socket("set_broadcast", e))?;

        let msg = json!({
            "method": "registration",
            "params": {
                "phoneMac": "AAAAAAAAAAAA",
                "register": false,
                "phoneIp": "1.2.3.4",
                "id": "1"
            }
        });
        let msg_bytes = serde_json::to_vec(&msg).map_err(Error::JsonDump)?;

        socket
            .send_to(&msg_bytes, (self.broadcast, self.port))
            .await
            .map_err(|e| Error::socket("send_to", e))?;

        let mut discovered: Vec<DiscoveredBulb> = Vec::new();
        let deadline = Instant::now() + self.window;
        let mut buffer = [0u8; 4096];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match tokio::time::timeout(remaining, socket.recv_from(&mut buffer)).await {
                Ok(Ok((size, addr))) => {
                    if let Some(bulb) = parse_reply(&buffer[..size], addr) {
                        record(&mut discovered, bulb);
                    }
                }
                Ok(Err(e)) => debug!("discovery receive error: {}", e),
                Err(_) => break,
            }
        }

        Ok(discovered)
    }
}

impl Discovery for BulbScanner {
    type Device = Light;

    async fn discover(&self) -> Result<Vec<Light>> {
        let bulbs = self.scan().await?;
        Ok(bulbs
            .into_iter()
            .map(|bulb| {
                Light::new(bulb.ip)
                    .with_port(self.port)
                    .with_mac(bulb.mac)
                    .with_timeout(self.command_timeout)
            })
            .collect())
    }
}

fn parse_reply(data: &[u8], addr: SocketAddr) -> Option<DiscoveredBulb> {
    let ip = match addr {
        SocketAddr::V4(v4) => *v4.ip(),
        SocketAddr::V6(_) => return None,
    };
    let response = std::str::from_utf8(data).ok()?;
    let json = serde_json::from_str::<Value>(response).ok()?;
    let mac = extract_mac(&json)?;
    Some(DiscoveredBulb { ip, mac })
}

/// Keeps the first reply per MAC so the list stays in arrival order.
fn record(discovered: &mut Vec<DiscoveredBulb>, bulb: DiscoveredBulb) {
    if discovered.iter().any(|known| known.mac == bulb.mac) {
        return;
    }
    debug!("discovered bulb {} ({})", bulb.ip, bulb.mac);
    discovered.push(bulb);
}

fn extract_mac(json: &Value) -> Option<String> {
    json.get("result")
        .and_then(|r| r.get("mac"))
        .and_then(|m| m.as_str())
        .map(String::from)
}
