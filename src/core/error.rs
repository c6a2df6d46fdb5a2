//! Error types for the forecast engine.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Error types for the forecasting engine.
///
/// Degenerate inputs (empty series, no usable growth transitions) are not
/// errors; the engine returns zero-valued statistics for those instead.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Invalid parameter value.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// A forecast was cancelled by its caller before completion.
    #[error("Forecast cancelled before completion")]
    Cancelled,
}

impl ForecastError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}
