//! Quasi-static mission simulation of a multirotor powertrain
//!
//! Chains the throttle, motor, ESC and battery models from `electrical`
//! over a recorded load history and stops cleanly at the first overload,
//! charge cutoff or voltage cutoff.

pub mod config;
pub mod simulator;

pub use config::SimulationConfig;
pub use simulator::{LoadSample, PowertrainSimulator, SimPhase, SimulationResult, StepRecord};
