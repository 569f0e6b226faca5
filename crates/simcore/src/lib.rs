//! Shared building blocks for the powertrain models
//!
//! This crate provides:
//! - State carried between electrical model steps (`SimState`, `BatteryState`)
//! - The `Model` / `ElectricalModel` stepping traits
//! - Per-point validity screening for envelope scans (`PointStatus`)
//! - Cumulative trapezoidal integration
//! - The error type raised for misconfigured parameters

pub mod error;
pub mod integrators;
pub mod status;
pub mod traits;

pub use error::*;
pub use integrators::*;
pub use status::*;
pub use traits::*;
