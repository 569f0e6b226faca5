use serde::{Deserialize, Serialize};
use simcore::{Result, ensure_positive};

/// ESC mass per watt of continuous power (kg/W), before the safety factor.
pub const MASS_PER_WATT: f64 = 2.762e-5;
/// ESC volume per watt of continuous power (m^3/W), before the safety factor.
pub const VOLUME_PER_WATT: f64 = 1.913e-8;
/// Hobby rule of thumb for ESC power headroom.
pub const DEFAULT_SAFETY_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscSize {
    /// kg
    pub mass: f64,
    /// m^3
    pub volume: f64,
}

/// Mass and volume of an ESC rated for `power` watts continuous.
///
/// Linear fit over KDE, Castle and HobbyWing catalogs, scaled by
/// `safety_factor` (see [`DEFAULT_SAFETY_FACTOR`]).
pub fn esc_size(power: f64, safety_factor: f64) -> Result<EscSize> {
    ensure_positive("power", power)?;
    ensure_positive("safety_factor", safety_factor)?;
    Ok(EscSize {
        mass: safety_factor * MASS_PER_WATT * power,
        volume: safety_factor * VOLUME_PER_WATT * power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kilowatt_esc() {
        let size = esc_size(1000.0, DEFAULT_SAFETY_FACTOR).unwrap();
        assert_relative_eq!(size.mass, 0.05524, max_relative = 1e-12);
        assert_relative_eq!(size.volume, 3.826e-5, max_relative = 1e-12);
    }

    #[test]
    fn test_scales_linearly_with_power() {
        let small = esc_size(250.0, 1.5).unwrap();
        let large = esc_size(500.0, 1.5).unwrap();
        assert_relative_eq!(large.mass, 2.0 * small.mass);
        assert_relative_eq!(large.volume, 2.0 * small.volume);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        assert!(esc_size(0.0, 2.0).is_err());
        assert!(esc_size(100.0, -1.0).is_err());
    }
}
