//! Individual light control.

use std::net::Ipv4Addr;
use std::time::Duration;

use log::debug;
use serde_json::{Value, json};
use tokio::net::UdpSocket;

use crate::device::Device;
use crate::errors::Error;
use crate::payload::Pilot;
use crate::types::LightParameters;

type Result<T> = std::result::Result<T, Error>;

/// Represents a single Wiz smart light bulb.
///
/// A `Light` communicates with a physical Wiz bulb over UDP. Each command is
/// one datagram followed by one reply, bounded by the command timeout.
///
/// # Example
///
/// ```
/// use std::net::Ipv4Addr;
/// use wiz_bridge::Light;
///
/// let light = Light::new(Ipv4Addr::new(192, 168, 1, 100));
/// assert_eq!(light.port(), Light::PORT);
/// assert!(light.mac().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Light {
    ip: Ipv4Addr,
    port: u16,
    mac: Option<String>,
    timeout: Duration,
}

impl Light {
    pub const PORT: u16 = 38899;
    const TIMEOUT_MS: u64 = 1000;

    pub fn new(ip: Ipv4Addr) -> Self {
        Light {
            ip,
            port: Self::PORT,
            mac: None,
            timeout: Duration::from_millis(Self::TIMEOUT_MS),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    /// How long to wait for the bulb's reply to a command.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn mac(&self) -> Option<&str> {
        self.mac.as_deref()
    }

    /// Sends a `setPilot` command.
    pub async fn set_pilot(&self, pilot: &Pilot) -> Result<()> {
        let params = serde_json::to_value(pilot).map_err(Error::JsonDump)?;
        let response = self
            .send_command(&json!({
                "method": "setPilot",
                "params": params,
            }))
            .await?;

        debug!("UDP response from {}: {:?}", self.ip, response);
        Ok(())
    }

    async fn send_command(&self, msg: &Value) -> Result<Value> {
        let msg_str = serde_json::to_string(msg).map_err(Error::JsonDump)?;
        debug!("UDP command to {}: {}", self.ip, msg_str);

        let response = self.send_udp(&msg_str).await?;
        if let Some(err) = response.get("error") {
            return Err(Error::Rejected {
                code: err.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }
        Ok(response)
    }

    async fn send_udp(&self, msg: &str) -> Result<Value> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| Error::socket("bind", e))?;

        socket
            .connect((self.ip, self.port))
            .await
            .map_err(|e| Error::socket("connect", e))?;

        socket
            .send(msg.as_bytes())
            .await
            .map_err(|e| Error::socket("send", e))?;

        let mut buffer = [0u8; 4096];

        let bytes = tokio::time::timeout(self.timeout, socket.recv(&mut buffer))
            .await
            .map_err(|_| {
                Error::socket(
                    "receive",
                    std::io::Error::new(std::io::ErrorKind::TimedOut, "receive timeout"),
                )
            })?
            .map_err(|e| Error::socket("receive", e))?;

        let response = String::from_utf8(buffer[..bytes].to_vec()).map_err(Error::Utf8Decode)?;
        serde_json::from_str(&response).map_err(Error::JsonLoad)
    }
}

impl Device for Light {
    fn address(&self) -> Ipv4Addr {
        self.ip
    }

    async fn set_on(&self, params: &LightParameters) -> Result<()> {
        self.set_pilot(&Pilot::on(params)).await
    }

    async fn set_off(&self) -> Result<()> {
        self.set_pilot(&Pilot::off()).await
    }
}
