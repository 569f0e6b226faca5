use thiserror::Error;

/// Errors raised at the API boundary for misconfigured models.
///
/// Out-of-envelope operating points are not errors; they are reported
/// through [`crate::PointStatus`] on the evaluated result.
#[derive(Debug, Error)]
pub enum PowertrainError {
    #[error("{name} must be > 0, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{name} length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("sample times must be non-decreasing (violated at index {index})")]
    TimeNotMonotonic { index: usize },

    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PowertrainError>;

/// Rejects NaN and infinities.
pub fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PowertrainError::NonFiniteParameter { name, value })
    }
}

/// Rejects non-finite values, zero and negatives.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    let value = ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(PowertrainError::NonPositiveParameter { name, value })
    }
}

/// Rejects non-finite and negative values; zero is allowed.
pub fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64> {
    ensure_in_range(name, value, 0.0, f64::INFINITY)
}

/// Rejects values outside the closed interval `[min, max]`.
pub fn ensure_in_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    let value = ensure_finite(name, value)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(PowertrainError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
