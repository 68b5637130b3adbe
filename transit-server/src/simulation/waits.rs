//! Passenger wait-time simulation.
//!
//! Passengers arrive uniformly between the window start and the last bus.
//! Each boards the first bus arriving at or after them. Matching is a
//! two-pointer merge over both sorted sequences: the bus cursor only ever
//! moves forward, so the whole pass is linear.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ClockTime, round2};

use super::arrivals::{ArrivalEvent, bus_times, simulate_bus_arrivals};
use super::{SimulationConfig, SimulationError};

/// One passenger matched to a bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitRecord {
    #[serde(rename = "Passenger Arrival Time")]
    pub passenger_arrival: ClockTime,

    #[serde(rename = "Bus Arrival Time")]
    pub bus_arrival: ClockTime,

    /// Position of the matched bus in the sorted bus sequence (0-based).
    #[serde(rename = "Bus Index")]
    pub bus_index: usize,

    /// Minutes waited, rounded to 2 decimal places. Never negative.
    #[serde(rename = "Wait Time")]
    pub wait: f64,
}

/// Result of matching passengers to buses.
///
/// Passengers arriving after the last bus get no record; they are counted in
/// `dropped` instead. This is expected truncation, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaitOutcome {
    pub records: Vec<WaitRecord>,
    pub dropped: usize,
}

impl WaitOutcome {
    /// Total passengers considered (matched plus dropped).
    pub fn passengers(&self) -> usize {
        self.records.len() + self.dropped
    }

    /// Wait Time column.
    pub fn wait_times(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.wait).collect()
    }
}

/// Match each passenger to the earliest bus arriving at or after them.
///
/// Both inputs are sorted here before matching. Once one passenger finds no
/// bus, every later passenger is dropped too.
pub fn match_passengers(buses: &[ClockTime], passengers: &[ClockTime]) -> WaitOutcome {
    let mut buses = buses.to_vec();
    buses.sort();
    let mut passengers = passengers.to_vec();
    passengers.sort();

    let mut records = Vec::with_capacity(passengers.len());
    let mut bus_idx = 0;

    for (i, &passenger) in passengers.iter().enumerate() {
        while bus_idx < buses.len() && buses[bus_idx] < passenger {
            bus_idx += 1;
        }
        let Some(&bus) = buses.get(bus_idx) else {
            return WaitOutcome {
                records,
                dropped: passengers.len() - i,
            };
        };
        records.push(WaitRecord {
            passenger_arrival: passenger,
            bus_arrival: bus,
            bus_index: bus_idx,
            wait: round2(bus.minutes() - passenger.minutes()),
        });
    }

    WaitOutcome {
        records,
        dropped: 0,
    }
}

/// Convert a caller-supplied passenger count, rejecting negative values.
pub fn passenger_count(n: i64) -> Result<usize, SimulationError> {
    usize::try_from(n)
        .map_err(|_| SimulationError::invalid(format!("passenger count must be >= 0, got {n}")))
}

/// Simulate `passengers` arrivals against a bus schedule.
///
/// Bus instants are read the way the arrival table shows them (truncated to
/// the second). Passengers are drawn uniformly in
/// `[window_start, last bus)`. With no buses, every passenger is dropped.
pub fn simulate_wait_times<R: Rng>(
    arrivals: &[ArrivalEvent],
    passengers: usize,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<WaitOutcome, SimulationError> {
    config.validate()?;
    let buses = bus_times(arrivals);
    let Some(last_bus) = buses.last() else {
        return Ok(WaitOutcome {
            records: Vec::new(),
            dropped: passengers,
        });
    };

    let start = config.window_start_min;
    let end = last_bus.minutes();
    if end < start {
        return Err(SimulationError::invalid(format!(
            "last bus at {last_bus} arrives before the window start"
        )));
    }

    let mut draws = Vec::with_capacity(passengers);
    for _ in 0..passengers {
        let m = if end > start {
            rng.gen_range(start..end)
        } else {
            start
        };
        draws.push(ClockTime::from_minutes(m)?);
    }

    let outcome = match_passengers(&buses, &draws);
    debug!(
        passengers,
        buses = buses.len(),
        matched = outcome.records.len(),
        dropped = outcome.dropped,
        "Simulated passenger waits"
    );
    Ok(outcome)
}

/// Seeded end-to-end wait-time simulator.
///
/// Draws the bus schedule and then the passengers from one random source
/// seeded per call, so a `(tau, passengers, seed)` triple is reproducible.
#[derive(Debug, Clone, Default)]
pub struct WaitTimeSimulator {
    config: SimulationConfig,
}

impl WaitTimeSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Simulate a schedule with mean interval `tau`, then `passengers`
    /// waiting for it.
    pub fn simulate(
        &self,
        tau: f64,
        passengers: usize,
        seed: u64,
    ) -> Result<(Vec<ArrivalEvent>, WaitOutcome), SimulationError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let arrivals = simulate_bus_arrivals(tau, &self.config, &mut rng)?;
        let outcome = simulate_wait_times(&arrivals, passengers, &self.config, &mut rng)?;
        Ok((arrivals, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(minutes: f64) -> ClockTime {
        ClockTime::from_minutes(minutes).unwrap()
    }

    fn event(minutes: f64) -> ArrivalEvent {
        ArrivalEvent {
            arrival_time: at(minutes),
            interval: 0.0,
        }
    }

    #[test]
    fn passenger_after_last_bus_is_dropped() {
        let outcome = match_passengers(&[at(400.0), at(420.0)], &[at(390.0), at(410.0), at(430.0)]);

        assert_eq!(outcome.wait_times(), vec![10.0, 10.0]);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.passengers(), 3);
        assert_eq!(outcome.records[0].bus_index, 0);
        assert_eq!(outcome.records[1].bus_index, 1);
    }

    #[test]
    fn passenger_arriving_with_bus_waits_zero() {
        let outcome = match_passengers(&[at(400.0)], &[at(400.0)]);
        assert_eq!(outcome.records[0].wait, 0.0);
        assert_eq!(outcome.records[0].bus_arrival, at(400.0));
    }

    #[test]
    fn several_passengers_share_a_bus() {
        let outcome = match_passengers(&[at(400.0), at(500.0)], &[at(370.0), at(380.0), at(399.0)]);
        assert!(outcome.records.iter().all(|r| r.bus_index == 0));
        assert_eq!(outcome.wait_times(), vec![30.0, 20.0, 1.0]);
    }

    #[test]
    fn unsorted_inputs_are_sorted_first() {
        let outcome = match_passengers(&[at(420.0), at(400.0)], &[at(410.0), at(390.0)]);
        assert_eq!(outcome.records[0].passenger_arrival, at(390.0));
        assert_eq!(outcome.records[0].bus_arrival, at(400.0));
        assert_eq!(outcome.records[1].bus_index, 1);
    }

    #[test]
    fn no_buses_drops_everyone() {
        let outcome = match_passengers(&[], &[at(400.0), at(410.0)]);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.dropped, 2);

        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = simulate_wait_times(&[], 5, &config, &mut rng).unwrap();
        assert_eq!(outcome.dropped, 5);
    }

    #[test]
    fn zero_passengers() {
        let outcome = WaitTimeSimulator::default().simulate(10.0, 0, 12).unwrap().1;
        assert_eq!(outcome, WaitOutcome::default());
    }

    #[test]
    fn negative_passenger_count_rejected() {
        assert_eq!(passenger_count(100).unwrap(), 100);
        assert_eq!(passenger_count(0).unwrap(), 0);
        assert!(matches!(
            passenger_count(-1),
            Err(SimulationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn bus_before_window_start_rejected() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result = simulate_wait_times(&[event(300.0)], 3, &config, &mut rng);
        assert!(matches!(result, Err(SimulationError::InvalidParameter(_))));
    }

    #[test]
    fn single_bus_at_window_start() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = simulate_wait_times(&[event(360.0)], 3, &config, &mut rng).unwrap();
        assert_eq!(outcome.wait_times(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn matched_against_truncated_bus_times() {
        // 400.999 is shown as 06:40:59; waits are measured against that.
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let outcome = simulate_wait_times(&[event(400.999)], 10, &config, &mut rng).unwrap();
        let shown = ClockTime::parse_hhmmss("06:40:59").unwrap();
        assert!(outcome.records.iter().all(|r| r.bus_arrival == shown));
    }

    #[test]
    fn seeded_simulation_is_reproducible() {
        let sim = WaitTimeSimulator::default();
        assert_eq!(sim.simulate(10.0, 200, 12).unwrap(), sim.simulate(10.0, 200, 12).unwrap());
    }

    #[test]
    fn serializes_with_table_headers() {
        let outcome = match_passengers(&[at(400.0)], &[at(390.5)]);
        let json = serde_json::to_value(&outcome.records[0]).unwrap();
        assert_eq!(json["Passenger Arrival Time"], "06:30:30");
        assert_eq!(json["Bus Arrival Time"], "06:40:00");
        assert_eq!(json["Bus Index"], 0);
        assert_eq!(json["Wait Time"], 9.5);
    }
}
