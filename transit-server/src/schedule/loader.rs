//! Raw timetable table loading.
//!
//! Reads the stop, trip and stop-time tables from CSV. Only the columns the
//! index needs are read; any others in the file are ignored.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::{Stop, StopTime, Trip};

/// File name of the stop table inside a data directory.
pub const STOPS_FILE: &str = "stations.csv";
/// File name of the trip table inside a data directory.
pub const TRIPS_FILE: &str = "routes.csv";
/// File name of the stop-time table inside a data directory.
pub const STOP_TIMES_FILE: &str = "schedule.csv";

/// Errors that can occur while loading timetable tables.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File could not be opened
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents did not match the expected columns
    #[error("failed to parse {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Read every record of a CSV table with a header row.
pub fn read_table<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect()
}

/// Read stop records (`stop_id`, `stop_name`, `stop_lat`, `stop_lon`).
pub fn read_stops<R: Read>(reader: R) -> Result<Vec<Stop>, csv::Error> {
    read_table(reader)
}

/// Read trip records (`trip_id`, `route_id`, `service_id`, `direction_name`).
pub fn read_trips<R: Read>(reader: R) -> Result<Vec<Trip>, csv::Error> {
    read_table(reader)
}

/// Read stop-time records (`trip_id`, `stop_id`, `stop_sequence`,
/// `shape_dist_traveled`).
pub fn read_stop_times<R: Read>(reader: R) -> Result<Vec<StopTime>, csv::Error> {
    read_table(reader)
}

fn load_table<T>(
    path: &Path,
    read: fn(File) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_stops(path: &Path) -> Result<Vec<Stop>, LoadError> {
    load_table(path, read_stops)
}

pub fn load_trips(path: &Path) -> Result<Vec<Trip>, LoadError> {
    load_table(path, read_trips)
}

pub fn load_stop_times(path: &Path) -> Result<Vec<StopTime>, LoadError> {
    load_table(path, read_stop_times)
}

/// The three raw tables a schedule index is built from.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub stops: Vec<Stop>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
}

impl RawTables {
    /// Load `stations.csv`, `routes.csv` and `schedule.csv` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        let stops = load_stops(&dir.join(STOPS_FILE))?;
        let trips = load_trips(&dir.join(TRIPS_FILE))?;
        let stop_times = load_stop_times(&dir.join(STOP_TIMES_FILE))?;

        info!(
            dir = %dir.display(),
            stops = stops.len(),
            trips = trips.len(),
            stop_times = stop_times.len(),
            "Loaded timetable tables"
        );

        Ok(Self {
            stops,
            trips,
            stop_times,
        })
    }
}
