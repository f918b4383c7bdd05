//! `setPilot` parameters for Wiz lights.

use serde::Serialize;

use crate::types::{LightParameters, Tint};

/// The parameter object of a `setPilot` command.
///
/// A pilot always carries the power state; the lighting attributes are only
/// present when the light is switched on.
///
/// ```
/// use wiz_bridge::{Color, LightParameters, Pilot};
///
/// let pilot = Pilot::on(&LightParameters::color(Color::RED));
/// let json = serde_json::to_string(&pilot).unwrap();
/// assert_eq!(json, r#"{"state":true,"dimming":100,"r":255,"g":0,"b":0}"#);
/// ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Pilot {
    pub(crate) state: bool,
    pub(crate) dimming: Option<u8>,
    #[serde(rename = "r")]
    pub(crate) red: Option<u8>,
    #[serde(rename = "g")]
    pub(crate) green: Option<u8>,
    #[serde(rename = "b")]
    pub(crate) blue: Option<u8>,
    pub(crate) temp: Option<u16>,
}

impl Pilot {
    /// Switch the light on with the given parameters.
    pub fn on(params: &LightParameters) -> Self {
        let mut pilot = Pilot {
            state: true,
            dimming: Some(params.brightness.percent()),
            ..Default::default()
        };
        match &params.tint {
            Some(Tint::Rgb(color)) => {
                pilot.red = Some(color.red);
                pilot.green = Some(color.green);
                pilot.blue = Some(color.blue);
            }
            Some(Tint::Temperature(kelvin)) => pilot.temp = Some(kelvin.kelvin),
            None => {}
        }
        pilot
    }

    /// Switch the light off.
    pub fn off() -> Self {
        Pilot::default()
    }
}
