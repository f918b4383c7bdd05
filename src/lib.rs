//! # wiz_bridge
//!
//! A daemon library that keeps one Philips Wiz smart light in the state
//! published by a remote mood server.
//!
//! The server is polled over HTTP for its intent: whether a light should be
//! searched for (and, once bound, whether it should be on and with which color)
//! or released. The bulb is found with a UDP broadcast on the local network and
//! driven with `setPilot` commands.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//! use wiz_bridge::{Bridge, BulbScanner, RemoteClient};
//!
//! async fn bridge() -> Result<(), wiz_bridge::Error> {
//!     let remote = RemoteClient::new("https://example.com/api", "key", Duration::from_secs(10))?;
//!     let scanner = BulbScanner::new(Ipv4Addr::BROADCAST);
//!     Bridge::new(remote, scanner).run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Components
//!
//! - [`RemoteState`] / [`RemoteClient`]: reads the server's intent
//! - [`Discovery`] / [`BulbScanner`]: finds bulbs on the network
//! - [`Device`] / [`Light`]: drives a single bulb
//! - [`SearchEffect`]: the red, green, blue flash played on a newly bound bulb
//! - [`Bridge`]: the reconciliation loop tying them together
//!
//! ## Communication
//!
//! All communication with Wiz bulbs occurs over UDP on port 38899. The bulbs must
//! be on the same local network as the bridge.

mod bridge;
pub mod config;
mod device;
mod discovery;
mod effect;
mod errors;
mod light;
mod payload;
mod remote;
mod types;

#[cfg(test)]
mod testing;

// Re-export public API
pub use bridge::{Binding, Bridge, CycleOutcome};
pub use config::Config;
pub use device::Device;
pub use discovery::{BulbScanner, DiscoveredBulb, Discovery};
pub use effect::SearchEffect;
pub use errors::Error;
pub use light::Light;
pub use payload::Pilot;
pub use remote::{Endpoint, RemoteClient, RemoteState, SearchStatus};
pub use types::{Brightness, Color, Kelvin, LightParameters, Mode, PowerIntent, Tint};
