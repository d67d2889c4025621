use serde::{Deserialize, Serialize};

use crate::math::LatLon;

/// Camera destination and orientation for a fly-to.
///
/// Angles are stored in radians; the serde form uses degrees because that is
/// what people write in config files.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CameraPoseDegrees", into = "CameraPoseDegrees")]
pub struct CameraPose {
    pub position: LatLon,
    pub alt_m: f64,
    pub heading_rad: f64,
    pub pitch_rad: f64,
}

impl CameraPose {
    pub fn from_degrees(
        lat_deg: f64,
        lon_deg: f64,
        alt_m: f64,
        heading_deg: f64,
        pitch_deg: f64,
    ) -> Self {
        Self {
            position: LatLon::new(lat_deg, lon_deg),
            alt_m,
            heading_rad: heading_deg.to_radians(),
            pitch_rad: pitch_deg.to_radians(),
        }
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
struct CameraPoseDegrees {
    lat_deg: f64,
    lon_deg: f64,
    alt_m: f64,
    #[serde(default)]
    heading_deg: f64,
    #[serde(default)]
    pitch_deg: f64,
}

impl From<CameraPoseDegrees> for CameraPose {
    fn from(p: CameraPoseDegrees) -> Self {
        CameraPose::from_degrees(p.lat_deg, p.lon_deg, p.alt_m, p.heading_deg, p.pitch_deg)
    }
}

impl From<CameraPose> for CameraPoseDegrees {
    fn from(p: CameraPose) -> Self {
        CameraPoseDegrees {
            lat_deg: p.position.lat_deg,
            lon_deg: p.position.lon_deg,
            alt_m: p.alt_m,
            heading_deg: p.heading_rad.to_degrees(),
            pitch_deg: p.pitch_rad.to_degrees(),
        }
    }
}
