//! Validity screening for single operating points.
//!
//! Envelope scans deliberately cover infeasible corners (regeneration,
//! near-zero throttle). Those points are marked rather than rejected, so a
//! batch evaluation always returns one result per input.

use serde::{Deserialize, Serialize};

/// Numeric marker stored in every field of a masked result.
pub const NOT_APPLICABLE: f64 = f64::NAN;

/// Why an operating point was (or was not) masked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointStatus {
    #[default]
    Valid,
    /// Duty ratio is zero, negative or not finite.
    InvalidDuty,
    NegativeSpeed,
    NegativeTorque,
    /// A current that must flow from the supply came out negative.
    NegativeCurrent,
    /// Efficiency fell outside [0, 1].
    NonPhysicalEfficiency,
    /// The evaluation produced NaN or an infinity (e.g. zero back-EMF).
    NonFinite,
}

impl PointStatus {
    pub fn is_valid(self) -> bool {
        self == PointStatus::Valid
    }

    /// Runs the next check only while the point is still valid, so the
    /// first failing check wins.
    pub fn and_then(self, check: impl FnOnce() -> PointStatus) -> PointStatus {
        if self.is_valid() { check() } else { self }
    }
}

pub fn screen_duty(duty: f64) -> PointStatus {
    if duty.is_finite() && duty > 0.0 {
        PointStatus::Valid
    } else {
        PointStatus::InvalidDuty
    }
}

pub fn screen_non_negative(value: f64, failure: PointStatus) -> PointStatus {
    if value < 0.0 { failure } else { PointStatus::Valid }
}

pub fn screen_finite(values: &[f64]) -> PointStatus {
    if values.iter().all(|v| v.is_finite()) {
        PointStatus::Valid
    } else {
        PointStatus::NonFinite
    }
}

pub fn screen_efficiency(efficiency: f64) -> PointStatus {
    if (0.0..=1.0).contains(&efficiency) {
        PointStatus::Valid
    } else {
        PointStatus::NonPhysicalEfficiency
    }
}
