//! Breadth-first station-to-station search.
//!
//! Nodes are station names and edges come from a [`NeighborSource`]. The
//! frontier holds whole partial paths; the first path to reach the end
//! station is returned, so it has the fewest hops. Neighbours are expanded
//! in lexical order, which fixes the choice among equal-length paths.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use super::neighbors::{NeighborSource, ScanNeighbors};
use super::path::Path;
use crate::schedule::ScheduleIndex;

/// Error from path search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// One or both endpoint names do not appear in the schedule.
    ///
    /// Lists every missing name, start first.
    #[error("station not found: {}", .0.join(", "))]
    StationNotFound(Vec<String>),

    /// The stations exist but are not connected by shared-trip adjacency
    #[error("no path found from {start} to {end}")]
    NoPathFound { start: String, end: String },
}

/// Path search over a schedule.
pub struct PathFinder<'a, N: NeighborSource> {
    schedule: &'a ScheduleIndex,
    source: &'a N,
}

impl<'a, N: NeighborSource> PathFinder<'a, N> {
    /// Create a path finder.
    ///
    /// `schedule` decides which station names exist and supplies
    /// coordinates; `source` supplies adjacency.
    pub fn new(schedule: &'a ScheduleIndex, source: &'a N) -> Self {
        Self { schedule, source }
    }

    /// Find the first-discovered (fewest-hop) path from `start` to `end`.
    pub fn find_path(&self, start: &str, end: &str) -> Result<Path, PathError> {
        self.check_stations(start, end)?;
        let stations = self.search(start, end)?;
        Ok(Path::from_stations(&stations, self.schedule))
    }

    fn check_stations(&self, start: &str, end: &str) -> Result<(), PathError> {
        let mut missing: Vec<String> = Vec::new();
        for name in [start, end] {
            if !self.schedule.contains_station(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PathError::StationNotFound(missing))
        }
    }

    /// Run the BFS, returning station names in path order.
    fn search(&self, start: &str, end: &str) -> Result<Vec<String>, PathError> {
        let mut frontier: VecDeque<Vec<String>> = VecDeque::new();
        frontier.push_back(vec![start.to_string()]);
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(path) = frontier.pop_front() {
            let Some(current) = path.last() else {
                continue;
            };

            if current == end {
                debug!(
                    start,
                    end,
                    hops = path.len() - 1,
                    explored = visited.len(),
                    "Path found"
                );
                return Ok(path);
            }

            if !visited.insert(current.clone()) {
                continue;
            }

            let neighbors = self.source.neighbors(current);
            trace!(
                station = %current,
                neighbors = neighbors.len(),
                frontier = frontier.len(),
                "BFS expanding station"
            );

            for neighbor in neighbors {
                if visited.contains(&neighbor) {
                    continue;
                }
                let mut next = path.clone();
                next.push(neighbor);
                frontier.push_back(next);
            }
        }

        debug!(start, end, explored = visited.len(), "No path found");
        Err(PathError::NoPathFound {
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}

/// Find a path by scanning the schedule for neighbours at every step.
///
/// Convenient for one-off queries; long-lived callers should build an
/// [`AdjacencyIndex`](super::AdjacencyIndex) once and use [`PathFinder`].
pub fn find_path(start: &str, end: &str, schedule: &ScheduleIndex) -> Result<Path, PathError> {
    let source = ScanNeighbors::new(schedule);
    PathFinder::new(schedule, &source).find_path(start, end)
}
