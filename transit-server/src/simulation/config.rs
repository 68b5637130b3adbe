//! Simulation configuration.

use crate::domain::MINUTES_PER_DAY;

use super::SimulationError;

/// Configuration parameters for the arrival and wait-time simulations.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Start of the service window (minutes past midnight).
    pub window_start_min: f64,

    /// End of the service window (minutes past midnight).
    pub window_end_min: f64,

    /// Seed used when a caller does not supply one.
    pub default_seed: u64,

    /// Mean inter-arrival interval used when a caller does not supply one
    /// (minutes).
    pub default_tau: f64,

    /// Passenger count used when a caller does not supply one.
    pub default_passengers: usize,
}

impl SimulationConfig {
    /// Length of the service window in minutes.
    pub fn window_length(&self) -> f64 {
        self.window_end_min - self.window_start_min
    }

    /// Check the window is a non-empty range within one day.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let in_day = |m: f64| m.is_finite() && (0.0..=MINUTES_PER_DAY).contains(&m);
        if !in_day(self.window_start_min) || !in_day(self.window_end_min) {
            return Err(SimulationError::invalid(format!(
                "service window {}-{} must lie within 0-{MINUTES_PER_DAY} minutes",
                self.window_start_min, self.window_end_min
            )));
        }
        if self.window_end_min <= self.window_start_min {
            return Err(SimulationError::invalid(format!(
                "service window end {} must be after start {}",
                self.window_end_min, self.window_start_min
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            window_start_min: 360.0, // 06:00
            window_end_min: 1440.0,  // 24:00
            default_seed: 12,
            default_tau: 10.0,
            default_passengers: 100,
        }
    }
}
