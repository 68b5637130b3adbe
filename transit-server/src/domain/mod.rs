//! Domain types for the transit timetable.
//!
//! This module contains the reference data (stops, trips, stop visits) and
//! the time-of-day type used by the simulations. Identifiers and times
//! enforce their invariants at construction time.

mod ids;
mod stop;
mod time;
mod trip;

pub use ids::{InvalidId, RouteId, StopId, TripId};
pub use stop::{Coordinates, Stop};
pub use time::{ClockTime, MINUTES_PER_DAY, TimeError, round2};
pub use trip::{StopTime, Trip};
