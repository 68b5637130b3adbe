//! Simulation error types.

use crate::domain::TimeError;

/// Errors from the arrival and wait-time simulations.
///
/// Simulations never fail for valid parameters. `InvalidParameter` reports
/// caller input that would produce meaningless output; `Time` means the
/// configured window produced an instant outside the day.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// A parameter is outside its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A time value could not be represented or parsed
    #[error(transparent)]
    Time(#[from] TimeError),
}

impl SimulationError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SimulationError::InvalidParameter(message.into())
    }
}
