//! Bus arrival simulation.
//!
//! Buses arrive at instants drawn uniformly over the service window, so
//! inter-arrival gaps are irregular even though their mean is close to the
//! requested interval. The bus count is fixed up front as
//! `floor(window length / tau)`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ClockTime, round2};

use super::{SimulationConfig, SimulationError};

/// One simulated bus arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalEvent {
    /// Arrival instant. Shown truncated to the second.
    #[serde(rename = "Arrival Time")]
    pub arrival_time: ClockTime,

    /// Minutes since the previous arrival (or since the window start, for
    /// the first bus), rounded to 2 decimal places.
    #[serde(rename = "Interval")]
    pub interval: f64,
}

/// Most buses one simulation may schedule.
///
/// With the default 1080 minute window this puts the smallest accepted `tau`
/// at 0.0108 minutes.
pub const MAX_BUSES: usize = 100_000;

/// Number of buses a mean interval of `tau` minutes implies for the window.
///
/// Rejects non-finite or non-positive `tau`, any `tau` longer than the
/// window (which would mean no buses at all), and any `tau` so short it
/// would schedule more than [`MAX_BUSES`].
pub fn bus_count(tau: f64, config: &SimulationConfig) -> Result<usize, SimulationError> {
    config.validate()?;
    if !tau.is_finite() || tau <= 0.0 {
        return Err(SimulationError::invalid(format!(
            "tau must be a positive number of minutes, got {tau}"
        )));
    }
    let count = (config.window_length() / tau).floor();
    if count < 1.0 {
        return Err(SimulationError::invalid(format!(
            "tau {tau} exceeds the {} minute service window",
            config.window_length()
        )));
    }
    if count > MAX_BUSES as f64 {
        return Err(SimulationError::invalid(format!(
            "tau {tau} would schedule more than {MAX_BUSES} buses"
        )));
    }
    Ok(count as usize)
}

/// Simulate bus arrivals using the supplied random source.
///
/// Draws `bus_count(tau)` instants uniformly in
/// `[window_start, window_end)`, sorts them, and derives the intervals.
pub fn simulate_bus_arrivals<R: Rng>(
    tau: f64,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<Vec<ArrivalEvent>, SimulationError> {
    let count = bus_count(tau, config)?;
    let start = config.window_start_min;
    let end = config.window_end_min;

    let mut minutes: Vec<f64> = (0..count).map(|_| rng.gen_range(start..end)).collect();
    minutes.sort_by(f64::total_cmp);

    let mut previous = start;
    let mut events = Vec::with_capacity(count);
    for m in minutes {
        events.push(ArrivalEvent {
            arrival_time: ClockTime::from_minutes(m)?,
            interval: round2(m - previous),
        });
        previous = m;
    }

    debug!(tau, buses = events.len(), "Simulated bus arrivals");
    Ok(events)
}

/// Bus arrival instants as the arrival table shows them: sorted and
/// truncated to the second.
pub fn bus_times(events: &[ArrivalEvent]) -> Vec<ClockTime> {
    let mut times: Vec<ClockTime> = events
        .iter()
        .map(|e| e.arrival_time.truncate_to_second())
        .collect();
    times.sort();
    times
}

/// Interval column of an arrival table.
pub fn intervals(events: &[ArrivalEvent]) -> Vec<f64> {
    events.iter().map(|e| e.interval).collect()
}

/// Seeded bus arrival simulator.
///
/// Every call creates its own random source from the seed, so identical
/// `(tau, seed)` pairs always reproduce identical schedules.
#[derive(Debug, Clone, Default)]
pub struct ArrivalSimulator {
    config: SimulationConfig,
}

impl ArrivalSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn simulate(&self, tau: f64, seed: u64) -> Result<Vec<ArrivalEvent>, SimulationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        simulate_bus_arrivals(tau, &self.config, &mut rng)
    }
}
