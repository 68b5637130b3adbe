//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, CachedPathFinder};
use crate::planner::AdjacencyIndex;
use crate::schedule::ScheduleIndex;
use crate::simulation::SimulationConfig;

/// Shared application state.
///
/// Everything here is immutable after startup, so handlers share it freely.
#[derive(Clone)]
pub struct AppState {
    /// Joined, filtered and ordered timetable
    pub schedule: Arc<ScheduleIndex>,

    /// Station adjacency computed once at startup
    pub adjacency: Arc<AdjacencyIndex>,

    /// Path search with cached results
    pub paths: Arc<CachedPathFinder>,

    /// Simulation window and defaults
    pub simulation: Arc<SimulationConfig>,
}

impl AppState {
    /// Create a new app state, building the adjacency index from `schedule`.
    pub fn new(
        schedule: ScheduleIndex,
        cache_config: &CacheConfig,
        simulation: SimulationConfig,
    ) -> Self {
        let schedule = Arc::new(schedule);
        let adjacency = Arc::new(AdjacencyIndex::build(&schedule));
        let paths = CachedPathFinder::new(schedule.clone(), adjacency.clone(), cache_config);

        Self {
            schedule,
            adjacency,
            paths: Arc::new(paths),
            simulation: Arc::new(simulation),
        }
    }
}
