use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
///
/// Field order is (latitude, longitude). Tile styling expressions use
/// (longitude, latitude) order; convert with [`LatLon::lon_lat`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl LatLon {
    pub const fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    pub fn lon_lat(self) -> [f64; 2] {
        [self.lon_deg, self.lat_deg]
    }

    pub fn is_finite(self) -> bool {
        self.lat_deg.is_finite() && self.lon_deg.is_finite()
    }
}

/// Euclidean distance measured directly in degree space.
///
/// This is the metric the building distance style uses; it is not a
/// geodesic distance and grows anisotropic away from the equator.
pub fn degree_distance(a: LatLon, b: LatLon) -> f64 {
    let d_lon = a.lon_deg - b.lon_deg;
    let d_lat = a.lat_deg - b.lat_deg;
    (d_lon * d_lon + d_lat * d_lat).sqrt()
}
