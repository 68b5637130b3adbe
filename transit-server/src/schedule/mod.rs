//! Timetable ingestion and the denormalized schedule index.

mod index;
pub mod loader;

pub use index::{DetailedScheduleRow, RouteFilter, ScheduleIndex};
pub use loader::{LoadError, RawTables};

#[cfg(test)]
pub(crate) use index::test_support;

impl ScheduleIndex {
    /// Build an index from loaded tables.
    pub fn from_tables(tables: &RawTables, filter: &RouteFilter) -> Self {
        Self::build(&tables.stop_times, &tables.stops, &tables.trips, filter)
    }
}
