//! Stop reference data.

use serde::{Deserialize, Serialize};

use super::StopId;

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A physical stop, as listed in the stop table.
///
/// Several stops may share a `stop_name` (opposite sides of a street,
/// different bays of an interchange). Routing treats a name as one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub stop_id: StopId,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

impl Stop {
    pub fn new(stop_id: StopId, stop_name: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            stop_id,
            stop_name: stop_name.into(),
            stop_lat: coords.lat,
            stop_lon: coords.lon,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.stop_lat, self.stop_lon)
    }
}
