//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::planner::Path;
use crate::simulation::{ArrivalEvent, HistogramBin, Summary, WaitRecord};

/// Station search query.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Case-insensitive substring of the station name
    #[serde(default)]
    pub q: String,

    /// Maximum results (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// A station in search results.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Response for station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationResult>,
}

/// Neighbours of one station.
#[derive(Debug, Serialize)]
pub struct NeighborsResponse {
    pub station: String,
    /// Sorted lexically
    pub neighbors: Vec<String>,
}

/// Path query.
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub from: String,
    pub to: String,
}

/// Found path.
#[derive(Debug, Serialize)]
pub struct PathResponse {
    /// Number of station-to-station hops
    pub hops: usize,
    pub stops: Path,
}

/// One stop visit drawn on the network overview.
#[derive(Debug, Serialize)]
pub struct NetworkStop {
    pub trip_id: String,
    pub stop_sequence: u32,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

/// All stop visits of one route.
#[derive(Debug, Serialize)]
pub struct RouteLine {
    pub route_id: String,
    pub stops: Vec<NetworkStop>,
}

/// Network overview, routes in configured order.
#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub routes: Vec<RouteLine>,
}

/// Arrival simulation parameters. Missing fields use configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SimulateArrivalsRequest {
    pub tau: Option<f64>,
    pub seed: Option<u64>,
}

/// Arrival simulation result.
#[derive(Debug, Serialize)]
pub struct SimulateArrivalsResponse {
    pub tau: f64,
    pub seed: u64,
    pub arrivals: Vec<ArrivalEvent>,
    /// Summary of the interval column
    pub intervals: Option<Summary>,
    pub histogram: Vec<HistogramBin>,
}

/// Wait-time simulation parameters. Missing fields use configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SimulateWaitsRequest {
    pub tau: Option<f64>,
    pub seed: Option<u64>,
    /// Signed so a negative count is reported rather than failing to parse
    pub passengers: Option<i64>,
    /// Restrict the returned table to passengers arriving from this time
    /// ("HH:MM:SS")
    pub block_start: Option<String>,
    /// Length of the block (default 60)
    pub block_minutes: Option<i64>,
}

/// Wait-time simulation result.
///
/// `waits` and `histogram` cover every matched passenger; `records` is
/// restricted to the requested block, if any.
#[derive(Debug, Serialize)]
pub struct SimulateWaitsResponse {
    pub tau: f64,
    pub seed: u64,
    pub passengers: usize,
    pub buses: usize,
    pub records: Vec<WaitRecord>,
    /// Passengers arriving after the last bus
    pub dropped: usize,
    pub waits: Option<Summary>,
    pub histogram: Vec<HistogramBin>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
