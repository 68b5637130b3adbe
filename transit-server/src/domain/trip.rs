//! Trip reference data and stop-time records.

use serde::{Deserialize, Serialize};

use super::{RouteId, StopId, TripId};

/// One scheduled run of a vehicle along a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub service_id: String,
    pub direction_name: String,
}

/// A single stop visit on a trip.
///
/// `stop_sequence` is the 1-based position of the visit within the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub stop_sequence: u32,
    /// Cumulative distance along the trip shape, if the feed provides it.
    #[serde(default)]
    pub shape_dist_traveled: Option<f64>,
}

impl StopTime {
    pub fn new(trip_id: TripId, stop_id: StopId, stop_sequence: u32) -> Self {
        Self {
            trip_id,
            stop_id,
            stop_sequence,
            shape_dist_traveled: None,
        }
    }
}
