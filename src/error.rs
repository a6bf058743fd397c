//! Error type shared by every filter and counting method.

use thiserror::Error;

/// Result type for counting operations
pub type CountResult<T> = Result<T, CountingError>;

/// Errors raised before any counting work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CountingError {
    /// Sequence too short, not repeating, not one-dimensional, or a bad parameter
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CountingError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CountingError::InvalidInput(message.into())
    }
}

/// Fails unless `series` holds at least `min` points.
pub(crate) fn require_len(series: &[f64], min: usize, what: &str) -> CountResult<()> {
    if series.len() < min {
        return Err(CountingError::invalid(format!(
            "{} needs at least {} points, got {}",
            what,
            min,
            series.len()
        )));
    }
    Ok(())
}
