//! Brightness control for Wiz lights.

/// Brightness level from 0 to 255, as published by the remote server.
///
/// Wiz bulbs take a dimming percentage instead; see [`Brightness::percent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Default for Brightness {
    fn default() -> Self {
        Self::FULL
    }
}

impl Brightness {
    /// Full brightness (255).
    pub const FULL: Brightness = Brightness { value: u8::MAX };

    const MIN_PERCENT: u8 = 10;

    pub fn new(value: u8) -> Self {
        Brightness { value }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Dimming percentage understood by the bulb (10-100).
    ///
    /// The level is scaled to 0-100 and rounded; anything below the bulb's
    /// 10% floor is raised to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use wiz_bridge::Brightness;
    ///
    /// assert_eq!(Brightness::FULL.percent(), 100);
    /// assert_eq!(Brightness::new(100).percent(), 39);
    /// assert_eq!(Brightness::new(0).percent(), 10);
    /// ```
    pub fn percent(&self) -> u8 {
        let scaled = (u32::from(self.value) * 200 + 255) / 510;
        (scaled as u8).max(Self::MIN_PERCENT)
    }
}
