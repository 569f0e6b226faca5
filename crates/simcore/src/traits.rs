use serde::{Deserialize, Serialize};

use crate::status::PointStatus;

// Drive Traits
/// One quasi-static evaluation point of a motor/ESC pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Shaft speed (rad/s)
    pub speed: f64,
    /// Shaft torque (N.m)
    pub torque: f64,
    /// Throttle / duty ratio, (0, 1]
    pub duty: f64,
    /// Bus voltage at the ESC input (V)
    pub bus_voltage: f64,
}

impl OperatingPoint {
    pub fn new(speed: f64, torque: f64, duty: f64, bus_voltage: f64) -> Self {
        OperatingPoint {
            speed,
            torque,
            duty,
            bus_voltage,
        }
    }

    pub fn mechanical_power(&self) -> f64 {
        self.torque * self.speed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveState {
    pub operating_point: OperatingPoint,
    pub current_ac: f64,
    pub power_ac: f64,
    pub current_dc: f64,
    pub power_dc: f64,
    pub status: PointStatus,
}

// Electrical Traits
/// Where a battery sits in its discharge lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DischargeStatus {
    #[default]
    Active,
    /// State of charge reached the configured floor on this sample.
    SocCutoff,
    /// Cell voltage reached the configured floor on this sample.
    VoltageCutoff,
    /// Discharged charge exceeded the remaining capacity on this sample.
    Depleted,
    /// A terminal sample was already produced.
    Exhausted,
}

impl DischargeStatus {
    /// Whether the sample's voltage and charge values are physically meaningful.
    pub fn is_valid(self) -> bool {
        matches!(
            self,
            DischargeStatus::Active | DischargeStatus::SocCutoff | DischargeStatus::VoltageCutoff
        )
    }

    /// Whether this sample ends the trajectory.
    pub fn is_terminal(self) -> bool {
        !matches!(self, DischargeStatus::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryState {
    /// Peukert-adjusted charge drawn since the start of the trajectory (A.hr)
    pub charge_out_ah: f64,
    pub depth_of_discharge: f64,
    pub state_of_charge: f64,
    /// Pack open-circuit voltage (V)
    pub open_circuit_voltage: f64,
    /// Pack terminal voltage under load (V)
    pub voltage: f64,
    /// Load current requested at the pack terminals (A)
    pub total_current_draw: f64,
    pub status: DischargeStatus,
}

impl Default for BatteryState {
    fn default() -> Self {
        BatteryState {
            charge_out_ah: 0.0,
            depth_of_discharge: 0.0,
            state_of_charge: 1.0,
            open_circuit_voltage: 0.0,
            voltage: 0.0,
            total_current_draw: 0.0,
            status: DischargeStatus::Active,
        }
    }
}

// General Traits
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimState {
    pub drive: DriveState,
    pub battery_state: BatteryState,
}

/// Step timing; both fields are in seconds.
#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

pub trait Model {
    fn reset(&mut self);
}

pub trait ElectricalModel: Model {
    fn step_electrical(&mut self, ctx: SimContext, state: &mut SimState);
}
