//! Command surface of a controllable light.

use std::future::Future;
use std::net::Ipv4Addr;

use crate::errors::Error;
use crate::types::LightParameters;

type Result<T> = std::result::Result<T, Error>;

/// A physical light the bridge can drive.
///
/// Every command is a single attempt: implementations report failure through
/// the returned [`Error`] and never queue or retry.
pub trait Device: Send + Sync {
    /// Network address of the light.
    fn address(&self) -> Ipv4Addr;

    /// Switch the light on with the given brightness and tint.
    fn set_on(&self, params: &LightParameters) -> impl Future<Output = Result<()>> + Send;

    /// Switch the light off.
    fn set_off(&self) -> impl Future<Output = Result<()>> + Send;
}
