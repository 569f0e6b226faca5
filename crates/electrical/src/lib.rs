//! Quasi-static electrical models of a motor, ESC and battery chain
//!
//! This crate provides:
//! - The throttle (duty ratio) solver
//! - Motor and ESC loss models with PWM harmonic inflation
//! - A Peukert-corrected battery discharge model, usable in batch or one
//!   sample at a time
//! - Envelope scans and discharge analyses built on the models above

pub mod analysis;
pub mod battery;
pub mod drive;
pub mod esc;
pub mod motor;
pub mod throttle;

pub use analysis::{EnvelopeMap, MotorSweep, SweepPoint, efficiency_map, motor_contour, motor_voltage_sweep};
pub use battery::{BatteryDischarge, BatteryParameters, DischargeLimits, DischargeSample, DischargeTrajectory};
pub use drive::{DriveEvaluation, Drivetrain};
pub use esc::{EscLosses, EscParameters, EscPerformance};
pub use motor::{MotorLosses, MotorParameters, MotorPerformance};
pub use throttle::solve_duty;
