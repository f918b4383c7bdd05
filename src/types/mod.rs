//! Value types for light control parameters and remote intent.

mod brightness;
mod color;
mod kelvin;
mod params;
mod power;

pub use brightness::Brightness;
pub use color::Color;
pub use kelvin::Kelvin;
pub use params::{LightParameters, Tint};
pub use power::{Mode, PowerIntent};
