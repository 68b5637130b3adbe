//! Bus arrival and passenger wait-time simulation.
//!
//! Every simulation takes its random source explicitly (or creates one from
//! a seed per call), so runs with the same seed are reproducible and runs
//! with different seeds never interfere.

mod arrivals;
mod config;
mod error;
pub mod report;
mod waits;

pub use arrivals::{
    ArrivalEvent, ArrivalSimulator, MAX_BUSES, bus_count, bus_times, intervals,
    simulate_bus_arrivals,
};
pub use config::SimulationConfig;
pub use error::SimulationError;
pub use report::{HistogramBin, Summary, histogram, wait_block};
pub use waits::{
    WaitOutcome, WaitRecord, WaitTimeSimulator, match_passengers, passenger_count,
    simulate_wait_times,
};
