//! Light parameters requested while the light is on.

use super::{Brightness, Color, Kelvin};

/// The color part of a light request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Rgb(Color),
    Temperature(Kelvin),
}

/// Brightness plus an optional tint, applied together in a single command.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightParameters {
    pub brightness: Brightness,
    pub tint: Option<Tint>,
}

impl LightParameters {
    /// Full brightness at the given RGB color.
    pub fn color(color: Color) -> Self {
        LightParameters {
            brightness: Brightness::FULL,
            tint: Some(Tint::Rgb(color)),
        }
    }
}

impl std::fmt::Display for LightParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "brightness={}", self.brightness.value())?;
        match &self.tint {
            Some(Tint::Rgb(color)) => write!(f, " rgb=({color})"),
            Some(Tint::Temperature(k)) => write!(f, " temp={}K", k.kelvin()),
            None => Ok(()),
        }
    }
}
