//! Outrunner BLDC sizing from a torque requirement
//!
//! The air-gap volume follows from torque and an assumed rotor shear
//! stress. Outer dimensions come from logarithmic fits of stator-to-outer
//! ratios against aspect ratio, masses from fixed densities for the stator,
//! rotor and end supports, and the motor constant from a power-law fit.

use serde::{Deserialize, Serialize};
use simcore::{Result, ensure_positive};
use std::f64::consts::PI;

/// Densities (kg/m^3) fitted to sub-kilogram catalog motors
pub const STATOR_DENSITY: f64 = 4757.149;
pub const ROTOR_DENSITY: f64 = 9066.827;
pub const SUPPORT_DENSITY: f64 = 855.149;

/// Cruise throttle a winding is usually chosen for.
pub const DEFAULT_NOMINAL_DUTY: f64 = 0.5;

/// Conservative air-gap shear stress for sub-500 g motors (Pa)
pub const DEFAULT_SHEAR_STRESS: f64 = 5500.0;

fn default_shear_stress() -> f64 {
    DEFAULT_SHEAR_STRESS
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorSizing {
    #[serde(default = "default_shear_stress")]
    pub shear_stress: f64,
}

impl Default for MotorSizing {
    fn default() -> Self {
        MotorSizing {
            shear_stress: DEFAULT_SHEAR_STRESS,
        }
    }
}

/// Predicted geometry of a sized motor. Lengths in m, volumes in m^3,
/// masses in kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorSize {
    pub mass: f64,
    pub volume: f64,
    pub outer_diameter: f64,
    pub outer_length: f64,
    pub stator_diameter: f64,
    pub stator_length: f64,
    /// Figure of merit k_m (N.m/sqrt(Ohm))
    pub motor_constant: f64,
}

impl MotorSizing {
    pub fn new(shear_stress: f64) -> Result<Self> {
        ensure_positive("shear_stress", shear_stress)?;
        Ok(MotorSizing { shear_stress })
    }

    /// Sizes a motor for continuous `torque` (N.m) with stator
    /// `aspect_ratio` = diameter / length.
    pub fn size(&self, torque: f64, aspect_ratio: f64) -> Result<MotorSize> {
        ensure_positive("shear_stress", self.shear_stress)?;
        ensure_positive("torque", torque)?;
        let x = ensure_positive("aspect_ratio", aspect_ratio)?;

        let air_gap_volume = torque / (2.0 * self.shear_stress);
        let stator_diameter = (4.0 * x * air_gap_volume / PI).cbrt();
        let stator_length = (4.0 * air_gap_volume / (PI * x * x)).cbrt();

        // Stator-to-outer dimension ratios
        let diameter_ratio = 0.0608 * x.ln() + 0.775;
        let length_ratio = -0.165 * x.ln() + 0.5708;
        ensure_positive("diameter_ratio", diameter_ratio)?;
        ensure_positive("length_ratio", length_ratio)?;

        let outer_diameter = stator_diameter / diameter_ratio;
        let outer_length = stator_length / length_ratio;
        let volume = 0.25 * PI * outer_length * outer_diameter.powi(2);

        let stator_volume = 0.25 * PI * stator_length * stator_diameter.powi(2);
        let rotor_volume =
            0.25 * PI * stator_length * (outer_diameter.powi(2) - stator_diameter.powi(2));
        let support_volume =
            0.25 * PI * (0.5 * (outer_length - stator_length)) * stator_diameter.powi(2);

        // One support at each end
        let mass = 2.0 * support_volume * SUPPORT_DENSITY
            + rotor_volume * ROTOR_DENSITY
            + stator_volume * STATOR_DENSITY;

        let motor_constant = 616.0 * stator_diameter.powf(0.88) * stator_volume.powf(0.54);

        Ok(MotorSize {
            mass,
            volume,
            outer_diameter,
            outer_length,
            stator_diameter,
            stator_length,
            motor_constant,
        })
    }
}

/// Electrical constants of a winding chosen for a given bus and speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorWinding {
    /// N.m/A
    pub kt: f64,
    /// Ohm
    pub resistance: f64,
}

/// Winds a motor of figure of merit `km` so that it turns at
/// `nominal_speed` (rad/s) on `bus_voltage` at `nominal_duty` throttle.
///
/// Hobby designs usually target half throttle at cruise; see
/// [`DEFAULT_NOMINAL_DUTY`].
pub fn wind_motor(
    km: f64,
    bus_voltage: f64,
    nominal_speed: f64,
    nominal_duty: f64,
) -> Result<MotorWinding> {
    ensure_positive("km", km)?;
    ensure_positive("bus_voltage", bus_voltage)?;
    ensure_positive("nominal_speed", nominal_speed)?;
    ensure_positive("nominal_duty", nominal_duty)?;

    let kt = bus_voltage * nominal_duty / nominal_speed;
    let resistance = (kt / km).powi(2);
    Ok(MotorWinding { kt, resistance })
}
