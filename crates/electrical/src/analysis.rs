//! Envelope scans and discharge analyses built on the point models
//!
//! Everything here evaluates the models in `motor`, `esc` and `battery`
//! over many inputs and hands back plain vectors or `ndarray` grids ready
//! for plotting or further numeric work.

use ndarray::{Array1, Array2};
use simcore::{
    OperatingPoint, PointStatus, Result, ensure_positive, screen_duty, screen_efficiency,
    screen_finite, screen_non_negative,
};

use crate::battery::{BatteryParameters, DischargeTrajectory, discharge_trajectory};
use crate::drive::{DriveEvaluation, Drivetrain};
use crate::motor::MotorParameters;
use crate::throttle::{is_saturated, solve_duty};

pub const RPM_TO_RAD_S: f64 = std::f64::consts::PI / 30.0;

/// Data point of a voltage-driven motor sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub speed: f64,
    pub torque: f64,
    pub current: f64,
    pub output_power: f64,
    pub input_power: f64,
    pub efficiency: f64,
    pub status: PointStatus,
}

/// Result of a voltage-driven sweep containing vectorized data
#[derive(Debug, Clone)]
pub struct MotorSweep {
    pub speeds: Vec<f64>,
    pub torques: Vec<f64>,
    pub currents: Vec<f64>,
    pub output_powers: Vec<f64>,
    pub input_powers: Vec<f64>,
    pub efficiencies: Vec<f64>,
    pub statuses: Vec<PointStatus>,
}

impl MotorParameters {
    /// Winding current (A) with `bus_voltage * duty` applied at `speed` (rad/s)
    pub fn current_at_speed(&self, bus_voltage: f64, duty: f64, speed: f64) -> f64 {
        (bus_voltage * duty - self.kt * speed) / self.resistance
    }

    /// Shaft torque (N.m) at `speed`; the no-load current produces no torque.
    pub fn torque_at_speed(&self, bus_voltage: f64, duty: f64, speed: f64) -> f64 {
        self.kt * (self.current_at_speed(bus_voltage, duty, speed) - self.no_load_current)
    }

    /// Torque at standstill: `V.d.kt/R - kt.I0`
    pub fn stall_torque(&self, bus_voltage: f64, duty: f64) -> f64 {
        self.torque_at_speed(bus_voltage, duty, 0.0)
    }

    /// Speed (rad/s) at which the shaft torque falls to zero.
    pub fn free_speed(&self, bus_voltage: f64, duty: f64) -> f64 {
        (bus_voltage * duty - self.resistance * self.no_load_current) / self.kt
    }

    pub fn sweep_point(&self, bus_voltage: f64, duty: f64, speed: f64) -> SweepPoint {
        let current = self.current_at_speed(bus_voltage, duty, speed);
        let torque = self.kt * (current - self.no_load_current);
        let output_power = torque * speed;
        let input_power = bus_voltage * duty * current;
        let efficiency = output_power / input_power;

        let status = screen_duty(duty)
            .and_then(|| screen_non_negative(speed, PointStatus::NegativeSpeed))
            .and_then(|| screen_finite(&[current, torque, efficiency]))
            .and_then(|| screen_non_negative(torque, PointStatus::NegativeTorque))
            .and_then(|| screen_non_negative(current, PointStatus::NegativeCurrent))
            .and_then(|| screen_efficiency(efficiency));

        if status.is_valid() {
            SweepPoint {
                speed,
                torque,
                current,
                output_power,
                input_power,
                efficiency,
                status,
            }
        } else {
            let na = simcore::NOT_APPLICABLE;
            SweepPoint {
                speed,
                torque: na,
                current: na,
                output_power: na,
                input_power: na,
                efficiency: na,
                status,
            }
        }
    }

    /// Torque, power and efficiency over `speeds` at a fixed applied voltage.
    ///
    /// Shares the no-load-current bias with [`crate::motor::motor_losses`]:
    /// feeding a swept torque back into the loss model reproduces the swept
    /// winding current.
    pub fn voltage_sweep(&self, bus_voltage: f64, duty: f64, speeds: &[f64]) -> MotorSweep {
        let n = speeds.len();
        let mut sweep = MotorSweep {
            speeds: Vec::with_capacity(n),
            torques: Vec::with_capacity(n),
            currents: Vec::with_capacity(n),
            output_powers: Vec::with_capacity(n),
            input_powers: Vec::with_capacity(n),
            efficiencies: Vec::with_capacity(n),
            statuses: Vec::with_capacity(n),
        };

        for &speed in speeds {
            let point = self.sweep_point(bus_voltage, duty, speed);
            sweep.speeds.push(point.speed);
            sweep.torques.push(point.torque);
            sweep.currents.push(point.current);
            sweep.output_powers.push(point.output_power);
            sweep.input_powers.push(point.input_power);
            sweep.efficiencies.push(point.efficiency);
            sweep.statuses.push(point.status);
        }

        sweep
    }
}

/// Voltage-driven sweep of `params` over `speeds` (rad/s).
pub fn motor_voltage_sweep(
    params: &MotorParameters,
    bus_voltage: f64,
    duty: f64,
    speeds: &[f64],
) -> MotorSweep {
    params.voltage_sweep(bus_voltage, duty, speeds)
}

// ============================================================================
// Operating envelope
// ============================================================================

/// Drive evaluated over a speed x torque grid.
///
/// Rows follow torque and columns follow speed.
#[derive(Debug, Clone)]
pub struct EnvelopeMap {
    pub speed: Array2<f64>,
    pub torque: Array2<f64>,
    pub duty: Array2<f64>,
    pub points: Array2<DriveEvaluation>,
}

impl EnvelopeMap {
    pub fn motor_efficiency(&self) -> Array2<f64> {
        self.points.mapv(|p| p.motor.efficiency)
    }

    pub fn esc_efficiency(&self) -> Array2<f64> {
        self.points.mapv(|p| p.esc.efficiency)
    }

    pub fn current_dc(&self) -> Array2<f64> {
        self.points.mapv(|p| p.esc.current_dc)
    }

    pub fn statuses(&self) -> Array2<PointStatus> {
        self.points.mapv(|p| p.status())
    }

    /// Cells whose speed needs more than full throttle.
    pub fn saturated(&self) -> Array2<bool> {
        self.duty.mapv(is_saturated)
    }
}

/// Throttle, motor and ESC evaluated at every (speed, torque) pair.
///
/// Infeasible cells are masked individually; the grid is always complete.
pub fn efficiency_map(
    drive: &Drivetrain,
    bus_voltage: f64,
    speeds: &[f64],
    torques: &[f64],
) -> EnvelopeMap {
    let shape = (torques.len(), speeds.len());
    let speed = Array2::from_shape_fn(shape, |(_, j)| speeds[j]);
    let torque = Array2::from_shape_fn(shape, |(i, _)| torques[i]);
    let duty = speed.mapv(|w| solve_duty(w, bus_voltage, drive.motor.kt));
    let points = Array2::from_shape_fn(shape, |(i, j)| {
        drive.evaluate(&OperatingPoint::new(speeds[j], torques[i], duty[[i, j]], bus_voltage))
    });

    EnvelopeMap {
        speed,
        torque,
        duty,
        points,
    }
}

/// Efficiency map up to a rated speed (rev/min) and rated torque (N.m).
///
/// Both axes are shifted by a thousandth of their rated value so the grid
/// never touches zero speed, where the back-EMF vanishes.
pub fn motor_contour(
    drive: &Drivetrain,
    bus_voltage: f64,
    rated_speed_rpm: f64,
    rated_torque: f64,
    n_points: usize,
) -> Result<EnvelopeMap> {
    ensure_positive("bus_voltage", bus_voltage)?;
    ensure_positive("rated_speed_rpm", rated_speed_rpm)?;
    ensure_positive("rated_torque", rated_torque)?;
    ensure_positive("n_points", n_points as f64)?;

    let rated_speed = rated_speed_rpm * RPM_TO_RAD_S;
    let speeds = Array1::linspace(0.0, rated_speed, n_points) + rated_speed / 1000.0;
    let torques = Array1::linspace(0.0, rated_torque, n_points) + rated_torque / 1000.0;

    Ok(efficiency_map(drive, bus_voltage, &speeds.to_vec(), &torques.to_vec()))
}

// ============================================================================
// Battery Analysis
// ============================================================================

/// Constant-current discharge at `c_rate` times the pack capacity, sampled
/// at `n_samples` evenly spaced instants over `duration_hr`.
pub fn constant_current_discharge(
    params: &BatteryParameters,
    c_rate: f64,
    duration_hr: f64,
    n_samples: usize,
) -> Result<DischargeTrajectory> {
    ensure_positive("c_rate", c_rate)?;
    ensure_positive("duration_hr", duration_hr)?;
    let current = c_rate * params.pack_capacity_ah();
    let times = Array1::linspace(0.0, duration_hr, n_samples).to_vec();
    let currents = vec![current; times.len()];
    discharge_trajectory(params, &currents, &times, 1.0)
}

/// Lowest terminal voltage under `peak_current` across the usable charge range.
///
/// Returns (min_voltage, soc_at_min_voltage)
pub fn voltage_sag_analysis(params: &BatteryParameters, peak_current: f64) -> (f64, f64) {
    let test_socs = [1.0, 0.8, 0.6, 0.4, 0.2, 0.1, 0.05];
    let drop = params.peukert_current(peak_current) * params.equivalent_resistance();
    let mut min_voltage = f64::MAX;
    let mut soc_at_min = 1.0;

    for &soc in &test_socs {
        let voltage = params.open_circuit_voltage(soc) - drop;
        if voltage < min_voltage {
            min_voltage = voltage;
            soc_at_min = soc;
        }
    }

    (min_voltage, soc_at_min)
}

/// Charge (A.hr) a full pack delivers at a constant `discharge_current`.
///
/// Overload currents drain `I^k` per hour, so only `Q * I^(1-k)` is
/// delivered; at or below 1C the full rated capacity is available.
pub fn effective_capacity_ah(params: &BatteryParameters, discharge_current: f64) -> f64 {
    let current = discharge_current.abs();
    let capacity = params.pack_capacity_ah();
    if current / params.rated_current() > 1.0 {
        capacity * current / params.peukert_current(current)
    } else {
        capacity
    }
}
