//! Empirical sizing regressions for motors, ESCs and battery packs
//!
//! Each entry point maps a required rating to mass, volume and (for motors)
//! outer dimensions. None of them depend on the performance models.

pub mod battery;
pub mod esc;
pub mod motor;

pub use battery::{BatterySize, LIPO_DENSITY, battery_size};
pub use esc::{EscSize, esc_size};
pub use motor::{DEFAULT_NOMINAL_DUTY, MotorSize, MotorSizing, MotorWinding, wind_motor};
