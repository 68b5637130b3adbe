//! Path output.

use serde::Serialize;

use crate::schedule::ScheduleIndex;

/// One station on a found path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStop {
    pub stop_name: String,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
    /// 1-based position along the path.
    pub stop_num: usize,
}

/// An ordered sequence of distinct stations from a start to an end station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Path {
    stops: Vec<PathStop>,
}

impl Path {
    /// Attach coordinates and positions to a sequence of station names.
    ///
    /// A name shared by several stops takes the coordinates of its first row
    /// in the schedule index.
    pub fn from_stations(stations: &[String], schedule: &ScheduleIndex) -> Self {
        let stops = stations
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let coords = schedule.station_coordinates(name);
                PathStop {
                    stop_name: name.clone(),
                    stop_lat: coords.map(|c| c.lat),
                    stop_lon: coords.map(|c| c.lon),
                    stop_num: i + 1,
                }
            })
            .collect();
        Self { stops }
    }

    pub fn stops(&self) -> &[PathStop] {
        &self.stops
    }

    /// Station names in path order.
    pub fn station_names(&self) -> Vec<&str> {
        self.stops.iter().map(|s| s.stop_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Number of stop-to-stop hops (one less than the station count).
    pub fn hops(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }
}
