//! Precomputed station adjacency.
//!
//! Scanning the schedule for every BFS expansion is
//! O(stations × rows) per query. This index walks each trip once and keeps
//! the resulting station → neighbour-set map, so lookups during search are
//! a single hash lookup.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::neighbors::{NeighborSource, successor};
use crate::schedule::ScheduleIndex;

/// Station name → neighbouring station names.
///
/// Holds exactly the relation [`find_neighbors`](super::find_neighbors)
/// computes, for every station at once.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    edges: HashMap<String, BTreeSet<String>>,
}

impl AdjacencyIndex {
    /// Build the index from a schedule.
    pub fn build(schedule: &ScheduleIndex) -> Self {
        let mut edges: HashMap<String, BTreeSet<String>> = HashMap::new();

        for trip_id in schedule.trip_ids() {
            let rows = schedule.trip_rows(trip_id);
            for row in rows {
                let Some(name) = &row.stop_name else {
                    continue;
                };
                let neighbors = edges.entry(name.clone()).or_default();
                if let Some(next) = successor(rows, row.stop_sequence).and_then(|r| r.stop_name.as_ref()) {
                    neighbors.insert(next.clone());
                }
            }
        }

        let index = Self { edges };
        debug!(
            stations = index.station_count(),
            edges = index.edge_count(),
            "Built adjacency index"
        );
        index
    }

    /// Neighbours of `station`, or `None` if it does not appear in the schedule.
    pub fn neighbors_of(&self, station: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(station)
    }

    /// Number of stations (including those with no outgoing edge).
    pub fn station_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of directed station → station edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }
}

impl NeighborSource for AdjacencyIndex {
    fn neighbors(&self, station: &str) -> BTreeSet<String> {
        self.neighbors_of(station).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::find_neighbors;
    use crate::schedule::test_support::schedule_from_trips;

    #[test]
    fn matches_scan_for_every_station() {
        let schedule = schedule_from_trips(&[
            ("T1", "30", &["A", "B", "C"]),
            ("T2", "30", &["B", "D"]),
            ("T3", "41", &["D", "A", "E", "A"]),
        ]);
        let index = AdjacencyIndex::build(&schedule);

        for station in schedule.station_names() {
            assert_eq!(
                index.neighbors(station),
                find_neighbors(station, &schedule),
                "mismatch for {station}"
            );
        }
    }

    #[test]
    fn counts() {
        let schedule = schedule_from_trips(&[
            ("T1", "30", &["A", "B", "C"]),
            ("T2", "30", &["B", "D"]),
        ]);
        let index = AdjacencyIndex::build(&schedule);

        assert_eq!(index.station_count(), 4);
        // A→B, B→C, B→D
        assert_eq!(index.edge_count(), 3);
        assert!(index.neighbors_of("C").is_some_and(BTreeSet::is_empty));
        assert!(index.neighbors_of("Z").is_none());
    }
}
