// Geolocation attached to a player by the enricher

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoInfo {
    pub country: String,
    pub country_code: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoInfo {
    pub fn latlong(&self) -> String {
        format!("{}, {}", self.latitude, self.longitude)
    }
}
