//! Neighbour derivation from shared trips.
//!
//! Station B is a neighbour of station A when some trip visits A at stop
//! position `n` and B at position `n + 1`. Stations are identified by display
//! name, so stops that merely share a name are merged into one station and
//! pool their neighbours.

use std::collections::{BTreeSet, HashSet};

use crate::domain::TripId;
use crate::schedule::{DetailedScheduleRow, ScheduleIndex};

/// Source of station adjacency for path search.
///
/// Neighbour sets are `BTreeSet`s so iteration (and therefore the order in
/// which a search expands them) is lexical and reproducible.
pub trait NeighborSource {
    /// Distinct stations reachable from `station` by advancing one stop.
    ///
    /// Unknown stations have no neighbours.
    fn neighbors(&self, station: &str) -> BTreeSet<String>;
}

/// The row one stop position after `stop_sequence` in a trip's rows.
///
/// `trip_rows` must be ordered by stop sequence. Returns `None` when the
/// trip has no row at exactly `stop_sequence + 1`, which includes the
/// trip's final stop.
pub fn successor(trip_rows: &[DetailedScheduleRow], stop_sequence: u32) -> Option<&DetailedScheduleRow> {
    let next = stop_sequence.checked_add(1)?;
    let idx = trip_rows.partition_point(|r| r.stop_sequence <= stop_sequence);
    trip_rows.get(idx).filter(|r| r.stop_sequence == next)
}

/// Find the neighbours of `station` by scanning the schedule.
///
/// This rescans the whole index on every call; [`AdjacencyIndex`] holds the
/// same relation precomputed.
///
/// [`AdjacencyIndex`]: super::AdjacencyIndex
pub fn find_neighbors(station: &str, schedule: &ScheduleIndex) -> BTreeSet<String> {
    let mut seen: HashSet<&TripId> = HashSet::new();
    let trips: Vec<&TripId> = schedule
        .rows()
        .iter()
        .filter(|row| row.is_station(station))
        .map(|row| &row.trip_id)
        .filter(|trip_id| seen.insert(*trip_id))
        .collect();

    let mut neighbors = BTreeSet::new();
    for trip_id in trips {
        let rows = schedule.trip_rows(trip_id);
        for row in rows.iter().filter(|r| r.is_station(station)) {
            if let Some(name) = successor(rows, row.stop_sequence).and_then(|r| r.stop_name.as_ref())
            {
                neighbors.insert(name.clone());
            }
        }
    }
    neighbors
}

/// Neighbour source that scans the schedule on demand.
#[derive(Debug, Clone, Copy)]
pub struct ScanNeighbors<'a> {
    schedule: &'a ScheduleIndex,
}

impl<'a> ScanNeighbors<'a> {
    pub fn new(schedule: &'a ScheduleIndex) -> Self {
        Self { schedule }
    }
}

impl NeighborSource for ScanNeighbors<'_> {
    fn neighbors(&self, station: &str) -> BTreeSet<String> {
        find_neighbors(station, self.schedule)
    }
}
