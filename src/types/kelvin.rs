//! Color temperature control.

/// Color temperature in Kelvin, kept within 1000K to 10000K.
///
/// Lower values produce warmer (more yellow/orange) light, while higher
/// values produce cooler (more blue) light. Typical values:
/// - 2700K: Warm white (incandescent-like)
/// - 4000K: Neutral white
/// - 6500K: Daylight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kelvin {
    pub(crate) kelvin: u16,
}

impl Kelvin {
    const MIN: u16 = 1000;
    const MAX: u16 = 10000;

    /// Get the kelvin value.
    pub fn kelvin(&self) -> u16 {
        self.kelvin
    }

    /// Create a Kelvin value, clamping out-of-range requests to the nearest bound.
    ///
    /// The bulb firmware ignores temperatures it cannot produce, so the remote
    /// value is pinned to the supported range instead of being rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use wiz_bridge::Kelvin;
    ///
    /// assert_eq!(Kelvin::clamped(500).kelvin(), 1000);
    /// assert_eq!(Kelvin::clamped(4000).kelvin(), 4000);
    /// assert_eq!(Kelvin::clamped(20000).kelvin(), 10000);
    /// ```
    pub fn clamped(kelvin: u32) -> Self {
        let kelvin = kelvin.clamp(u32::from(Self::MIN), u32::from(Self::MAX)) as u16;
        Kelvin { kelvin }
    }
}
