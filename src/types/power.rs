//! Remote intent published by the mood server.

use serde_with::DeserializeFromStr;
use strum_macros::{Display, EnumString};

/// Whether the server wants the bridge to look for a bulb or to stand by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, DeserializeFromStr)]
pub enum Mode {
    /// Find a bulb (if none is bound) and mirror the requested light state
    #[strum(serialize = "search")]
    Searching,
    /// Release the bound bulb
    #[strum(serialize = "wait")]
    Waiting,
}

/// Requested power state for the bound light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, DeserializeFromStr)]
#[strum(serialize_all = "lowercase")]
pub enum PowerIntent {
    /// Turn the light on
    On,
    /// Turn the light off
    Off,
}
