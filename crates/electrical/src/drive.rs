//! Motor and ESC evaluated as one unit

use serde::{Deserialize, Serialize};
use simcore::{ElectricalModel, Model, OperatingPoint, PointStatus, Result, SimContext, SimState};

use crate::esc::{EscParameters, EscPerformance, esc_losses};
use crate::motor::{MotorParameters, MotorPerformance, motor_losses};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drivetrain {
    pub motor: MotorParameters,
    #[serde(default)]
    pub esc: EscParameters,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveEvaluation {
    pub motor: MotorPerformance,
    pub esc: EscPerformance,
}

impl DriveEvaluation {
    /// First failure along the chain, motor first.
    pub fn status(&self) -> PointStatus {
        self.motor.status.and_then(|| self.esc.status)
    }

    pub fn efficiency(&self) -> f64 {
        self.motor.efficiency * self.esc.efficiency
    }
}

impl Drivetrain {
    pub fn new(motor: MotorParameters, esc: EscParameters) -> Result<Self> {
        motor.validate()?;
        esc.validate()?;
        Ok(Drivetrain { motor, esc })
    }

    /// Motor losses at `op`, then ESC losses while feeding that motor.
    ///
    /// A masked motor result masks the ESC with the same status.
    pub fn evaluate(&self, op: &OperatingPoint) -> DriveEvaluation {
        let motor = motor_losses(&self.motor, op);
        let esc = if motor.is_valid() {
            esc_losses(&self.esc, motor.current_ac, motor.power_ac, op.duty, op.bus_voltage)
        } else {
            EscPerformance::not_applicable(motor.status)
        };
        DriveEvaluation { motor, esc }
    }
}

impl Model for Drivetrain {
    fn reset(&mut self) {
        // Parameters only, nothing accumulates between steps
    }
}

impl ElectricalModel for Drivetrain {
    fn step_electrical(&mut self, _ctx: SimContext, state: &mut SimState) {
        let drive = &mut state.drive;
        let eval = self.evaluate(&drive.operating_point);
        drive.current_ac = eval.motor.current_ac;
        drive.power_ac = eval.motor.power_ac;
        drive.current_dc = eval.esc.current_dc;
        drive.power_dc = eval.esc.power_dc;
        drive.status = eval.status();
    }
}
