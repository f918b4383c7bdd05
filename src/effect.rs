//! Visual confirmation that a freshly bound light is the one being driven.

use std::time::Duration;

use log::debug;

use crate::device::Device;
use crate::errors::Error;
use crate::types::{Color, LightParameters};

type Result<T> = std::result::Result<T, Error>;

/// Flashes red, green and blue at full brightness, then switches the light off.
#[derive(Debug, Clone)]
pub struct SearchEffect {
    colors: [Color; 3],
    hold: Duration,
}

impl Default for SearchEffect {
    fn default() -> Self {
        SearchEffect {
            colors: [Color::RED, Color::GREEN, Color::BLUE],
            hold: Duration::from_millis(Self::HOLD_MS),
        }
    }
}

impl SearchEffect {
    const HOLD_MS: u64 = 500;

    /// Plays the sequence on `device`.
    ///
    /// Stops at the first failing command and returns its error; the light is
    /// left in whatever state that command reached.
    pub async fn run<D: Device>(&self, device: &D) -> Result<()> {
        for color in &self.colors {
            debug!("search effect: {} -> {}", device.address(), color);
            device.set_on(&LightParameters::color(*color)).await?;
            tokio::time::sleep(self.hold).await;
        }
        device.set_off().await
    }
}
