use log::{debug, warn};
use serde::{Deserialize, Serialize};
use simcore::{
    BatteryState, DischargeStatus, ElectricalModel, Model, NOT_APPLICABLE, PowertrainError,
    Result, SimContext, SimState, Trapezoid, ensure_finite, ensure_in_range, ensure_positive,
};

pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const DEFAULT_PEUKERT: f64 = 1.2;

/// Lithium cell open-circuit voltage (V) as a function of state of charge.
///
/// Empirical curve fit to lithium-polymer discharge data (Chen & Mora,
/// doi:10.1109/TEC.2006.874229). Every voltage prediction in the crate goes
/// through these coefficients.
pub fn cell_open_circuit_voltage(soc: f64) -> f64 {
    -1.031 * (-35.0 * soc).exp() + 3.685 + 0.2156 * soc - 0.1178 * soc.powi(2)
        + 0.3201 * soc.powi(3)
}

/// A battery unit and how many of them make up the pack.
///
/// A 6S 7.7 Ah pack modelled as one unit is `capacity_ah = 7.7` with
/// `series = 6`; four such packs in parallel set `parallel = 4`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryParameters {
    /// Rated capacity of one unit (A.hr)
    pub capacity_ah: f64,
    /// Internal resistance of one unit (Ohm)
    pub internal_resistance: f64,
    #[serde(default = "default_count")]
    pub series: u32,
    #[serde(default = "default_count")]
    pub parallel: u32,
    /// Exponent applied to overload currents
    #[serde(default = "default_peukert")]
    pub peukert: f64,
}

fn default_count() -> u32 {
    1
}

fn default_peukert() -> f64 {
    DEFAULT_PEUKERT
}

impl BatteryParameters {
    pub fn new(capacity_ah: f64, internal_resistance: f64) -> Result<Self> {
        let params = BatteryParameters {
            capacity_ah,
            internal_resistance,
            series: 1,
            parallel: 1,
            peukert: DEFAULT_PEUKERT,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_series(mut self, series: u32) -> Self {
        self.series = series;
        self
    }

    pub fn with_parallel(mut self, parallel: u32) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_peukert(mut self, peukert: f64) -> Self {
        self.peukert = peukert;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("capacity_ah", self.capacity_ah)?;
        ensure_positive("internal_resistance", self.internal_resistance)?;
        ensure_positive("series", self.series as f64)?;
        ensure_positive("parallel", self.parallel as f64)?;
        ensure_positive("peukert", self.peukert)?;
        Ok(())
    }

    /// Capacity of the whole pack (A.hr)
    pub fn pack_capacity_ah(&self) -> f64 {
        self.parallel as f64 * self.capacity_ah
    }

    /// 1C current of the whole pack (A); currents above it are overloads.
    pub fn rated_current(&self) -> f64 {
        self.parallel as f64 * self.capacity_ah
    }

    pub fn equivalent_resistance(&self) -> f64 {
        self.internal_resistance * (self.series as f64 / self.parallel as f64)
    }

    pub fn open_circuit_voltage(&self, soc: f64) -> f64 {
        cell_open_circuit_voltage(soc) * self.series as f64
    }

    /// Current as seen by the charge integral: overloads are raised to the
    /// Peukert exponent, everything else passes through unchanged.
    pub fn peukert_current(&self, load_current: f64) -> f64 {
        if load_current / self.rated_current() > 1.0 {
            load_current.powf(self.peukert)
        } else {
            load_current
        }
    }
}

/// Floors at which a discharge is considered finished.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DischargeLimits {
    pub min_soc: f64,
    /// Floor on the per-cell open-circuit voltage (V)
    pub min_cell_voltage: Option<f64>,
}

impl Default for DischargeLimits {
    fn default() -> Self {
        DischargeLimits {
            min_soc: 0.0,
            min_cell_voltage: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DischargeSample {
    pub time_hr: f64,
    pub load_current: f64,
    pub peukert_current: f64,
    pub charge_out_ah: f64,
    pub depth_of_discharge: f64,
    pub state_of_charge: f64,
    pub open_circuit_voltage: f64,
    pub terminal_voltage: f64,
    pub status: DischargeStatus,
}

impl DischargeSample {
    fn not_applicable(time_hr: f64, load_current: f64, status: DischargeStatus) -> Self {
        DischargeSample {
            time_hr,
            load_current,
            peukert_current: NOT_APPLICABLE,
            charge_out_ah: NOT_APPLICABLE,
            depth_of_discharge: NOT_APPLICABLE,
            state_of_charge: NOT_APPLICABLE,
            open_circuit_voltage: NOT_APPLICABLE,
            terminal_voltage: NOT_APPLICABLE,
            status,
        }
    }
}

/// Running discharge of one pack.
///
/// Owns its `BatteryState` for the length of one trajectory. Samples must
/// arrive in time order; each one integrates the Peukert-adjusted current
/// trapezoidally from the previous sample.
#[derive(Debug, Clone)]
pub struct BatteryDischarge {
    params: BatteryParameters,
    limits: DischargeLimits,
    initial_soc: f64,
    charge: Trapezoid,
    /// Samples accepted since the last reset
    steps: usize,
    state: BatteryState,
}

impl BatteryDischarge {
    pub fn new(params: BatteryParameters, initial_soc: f64) -> Result<Self> {
        params.validate()?;
        let initial_soc = ensure_in_range("initial_soc", initial_soc, 0.0, 1.0)?;
        ensure_positive("initial_soc", initial_soc)?;
        Ok(BatteryDischarge {
            params,
            limits: DischargeLimits::default(),
            initial_soc,
            charge: Trapezoid::new(),
            steps: 0,
            state: initial_state(&params, initial_soc),
        })
    }

    pub fn with_limits(mut self, limits: DischargeLimits) -> Result<Self> {
        ensure_in_range("min_soc", limits.min_soc, 0.0, 1.0)?;
        if let Some(v) = limits.min_cell_voltage {
            ensure_finite("min_cell_voltage", v)?;
        }
        self.limits = limits;
        Ok(self)
    }

    pub fn params(&self) -> &BatteryParameters {
        &self.params
    }

    pub fn state(&self) -> &BatteryState {
        &self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.status.is_terminal()
    }

    /// Advances the discharge to `time_hr` with `load_current` (A) flowing
    /// at that instant.
    ///
    /// The first sample anchors the integral and draws no charge. Once a
    /// terminal sample has been produced every later call returns an
    /// `Exhausted` sample without integrating.
    ///
    /// Non-finite inputs and times earlier than the previous sample are
    /// rejected with the same errors as [`BatteryDischarge::run`], leaving
    /// the discharge untouched.
    pub fn step(&mut self, time_hr: f64, load_current: f64) -> Result<DischargeSample> {
        ensure_finite("times_hr", time_hr)?;
        ensure_finite("load_currents", load_current)?;
        if self.charge.last_x().is_some_and(|last| time_hr < last) {
            return Err(PowertrainError::TimeNotMonotonic { index: self.steps });
        }
        self.steps += 1;

        if self.is_exhausted() {
            self.state.status = DischargeStatus::Exhausted;
            self.state.total_current_draw = load_current;
            return Ok(DischargeSample::not_applicable(
                time_hr,
                load_current,
                DischargeStatus::Exhausted,
            ));
        }

        let peukert_current = self.params.peukert_current(load_current);
        let charge_out_ah = self.charge.push(time_hr, peukert_current);

        let pack_capacity = self.params.pack_capacity_ah();
        if charge_out_ah > self.initial_soc * pack_capacity {
            debug!("pack depleted at t = {time_hr:.4} h ({charge_out_ah:.4} A.hr drawn)");
            self.state = BatteryState {
                charge_out_ah: NOT_APPLICABLE,
                depth_of_discharge: NOT_APPLICABLE,
                state_of_charge: NOT_APPLICABLE,
                open_circuit_voltage: NOT_APPLICABLE,
                voltage: NOT_APPLICABLE,
                total_current_draw: load_current,
                status: DischargeStatus::Depleted,
            };
            return Ok(DischargeSample::not_applicable(
                time_hr,
                load_current,
                DischargeStatus::Depleted,
            ));
        }

        let depth_of_discharge = (1.0 - self.initial_soc) + charge_out_ah / pack_capacity;
        let state_of_charge = 1.0 - depth_of_discharge;

        let cell_voltage = cell_open_circuit_voltage(state_of_charge);
        let open_circuit_voltage = cell_voltage * self.params.series as f64;
        let terminal_voltage =
            open_circuit_voltage - peukert_current * self.params.equivalent_resistance();

        let status = if state_of_charge <= self.limits.min_soc {
            DischargeStatus::SocCutoff
        } else if self.limits.min_cell_voltage.is_some_and(|floor| cell_voltage <= floor) {
            DischargeStatus::VoltageCutoff
        } else {
            DischargeStatus::Active
        };
        if status.is_terminal() {
            debug!("discharge ended with {status:?} at t = {time_hr:.4} h, soc = {state_of_charge:.4}");
        }

        self.state = BatteryState {
            charge_out_ah,
            depth_of_discharge,
            state_of_charge,
            open_circuit_voltage,
            voltage: terminal_voltage,
            total_current_draw: load_current,
            status,
        };

        Ok(DischargeSample {
            time_hr,
            load_current,
            peukert_current,
            charge_out_ah,
            depth_of_discharge,
            state_of_charge,
            open_circuit_voltage,
            terminal_voltage,
            status,
        })
    }

    /// Runs a whole load history through [`BatteryDischarge::step`].
    ///
    /// The output has one sample per input; samples after the end of the
    /// discharge are flagged `Exhausted`.
    pub fn run(&mut self, load_currents: &[f64], times_hr: &[f64]) -> Result<DischargeTrajectory> {
        validate_history(load_currents, times_hr)?;
        let samples = times_hr
            .iter()
            .zip(load_currents)
            .map(|(&t, &i)| self.step(t, i))
            .collect::<Result<Vec<DischargeSample>>>()?;
        let trajectory = DischargeTrajectory { samples };
        debug!(
            "discharge trajectory: {} samples, ended at {:?}",
            trajectory.samples.len(),
            trajectory.end_index()
        );
        Ok(trajectory)
    }
}

fn initial_state(params: &BatteryParameters, initial_soc: f64) -> BatteryState {
    let open_circuit_voltage = params.open_circuit_voltage(initial_soc);
    BatteryState {
        charge_out_ah: 0.0,
        depth_of_discharge: 1.0 - initial_soc,
        state_of_charge: initial_soc,
        open_circuit_voltage,
        voltage: open_circuit_voltage,
        total_current_draw: 0.0,
        status: DischargeStatus::Active,
    }
}

fn validate_history(load_currents: &[f64], times_hr: &[f64]) -> Result<()> {
    if times_hr.is_empty() {
        return Err(PowertrainError::EmptyInput("times_hr"));
    }
    if load_currents.len() != times_hr.len() {
        return Err(PowertrainError::LengthMismatch {
            name: "load_currents",
            expected: times_hr.len(),
            got: load_currents.len(),
        });
    }
    for (i, (&t, &current)) in times_hr.iter().zip(load_currents).enumerate() {
        ensure_finite("times_hr", t)?;
        ensure_finite("load_currents", current)?;
        if i > 0 && t < times_hr[i - 1] {
            return Err(PowertrainError::TimeNotMonotonic { index: i });
        }
    }
    Ok(())
}

impl Model for BatteryDischarge {
    fn reset(&mut self) {
        self.charge.reset();
        self.steps = 0;
        self.state = initial_state(&self.params, self.initial_soc);
    }
}

impl ElectricalModel for BatteryDischarge {
    /// Draws `state.battery_state.total_current_draw` at `ctx.t` (seconds)
    /// and writes the updated pack state back. A rejected sample leaves
    /// both the discharge and `state` unchanged.
    fn step_electrical(&mut self, ctx: SimContext, state: &mut SimState) {
        let load_current = state.battery_state.total_current_draw;
        match self.step(ctx.t / SECONDS_PER_HOUR, load_current) {
            Ok(_) => state.battery_state = self.state,
            Err(err) => warn!("battery sample at t = {:.3} s rejected: {err}", ctx.t),
        }
    }
}

/// Result of a batch discharge: one sample per input time.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeTrajectory {
    pub samples: Vec<DischargeSample>,
}

impl DischargeTrajectory {
    pub fn terminal_voltages(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.terminal_voltage).collect()
    }

    pub fn depth_of_discharge(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.depth_of_discharge).collect()
    }

    pub fn state_of_charge(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.state_of_charge).collect()
    }

    pub fn charge_out_ah(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.charge_out_ah).collect()
    }

    /// Index of the sample that ended the discharge, if it ended.
    pub fn end_index(&self) -> Option<usize> {
        self.samples.iter().position(|s| s.status.is_terminal())
    }
}

/// Terminal voltage, depth of discharge and state of charge of a pack
/// under a load history sampled at `times_hr` (hours, non-uniform spacing
/// allowed).
pub fn discharge_trajectory(
    params: &BatteryParameters,
    load_currents: &[f64],
    times_hr: &[f64],
    initial_soc: f64,
) -> Result<DischargeTrajectory> {
    BatteryDischarge::new(*params, initial_soc)?.run(load_currents, times_hr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn cell_610mah() -> BatteryParameters {
        BatteryParameters::new(0.61, 70e-3).unwrap()
    }

    fn uniform_times(duration_hr: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| duration_hr * i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn test_ocv_curve_coefficients() {
        assert_relative_eq!(
            cell_open_circuit_voltage(1.0),
            -1.031 * (-35.0_f64).exp() + 3.685 + 0.2156 - 0.1178 + 0.3201,
            max_relative = 1e-15
        );
        assert_relative_eq!(cell_open_circuit_voltage(0.0), -1.031 + 3.685, max_relative = 1e-15);
        assert_relative_eq!(
            cell_open_circuit_voltage(0.5),
            -1.031 * (-17.5_f64).exp() + 3.685 + 0.1078 - 0.02945 + 0.0400125,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_ocv_rises_with_charge() {
        let mut prev = cell_open_circuit_voltage(0.0);
        for i in 1..=100 {
            let v = cell_open_circuit_voltage(i as f64 / 100.0);
            assert!(v > prev);
            prev = v;
        }
    }

    #[test]
    fn test_defaults_and_pack_arithmetic() {
        let pack = BatteryParameters::new(6.0, 0.013).unwrap().with_series(6).with_parallel(2);
        assert_eq!(BatteryParameters::new(6.0, 0.013).unwrap().peukert, 1.2);
        assert_eq!(pack.pack_capacity_ah(), 12.0);
        assert_eq!(pack.rated_current(), 12.0);
        assert_relative_eq!(pack.equivalent_resistance(), 0.039, max_relative = 1e-12);
        assert_relative_eq!(pack.open_circuit_voltage(1.0), 6.0 * cell_open_circuit_voltage(1.0));
    }

    #[test]
    fn test_constant_current_charge_is_exact() {
        let params = BatteryParameters::new(10.0, 0.02).unwrap();
        let times = uniform_times(0.5, 31);
        let currents = vec![4.0; times.len()];
        let traj = discharge_trajectory(&params, &currents, &times, 1.0).unwrap();
        let q = traj.charge_out_ah();
        assert_eq!(q[0], 0.0);
        assert_abs_diff_eq!(q[30], 4.0 * 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(traj.state_of_charge()[30], 0.8, epsilon = 1e-12);
        assert!(traj.end_index().is_none());
    }

    #[test]
    fn test_overload_current_is_raised_to_peukert_exponent() {
        let params = BatteryParameters::new(2.0, 0.03).unwrap();
        let load = 2.0 * params.rated_current();
        assert_eq!(params.peukert_current(load), load.powf(1.2));
        assert_eq!(params.peukert_current(params.rated_current()), params.rated_current());

        let times = [0.0, 0.1, 0.2];
        let traj = discharge_trajectory(&params, &[load; 3], &times, 1.0).unwrap();
        assert_eq!(traj.samples[1].peukert_current, load.powf(1.2));
        assert_relative_eq!(traj.samples[2].charge_out_ah, load.powf(1.2) * 0.2, max_relative = 1e-12);
    }

    #[test]
    fn test_exactly_empty_pack_reads_zero_then_ends() {
        let params = BatteryParameters::new(2.0, 0.03).unwrap();
        let times = [0.0, 0.5, 1.0, 1.5];
        let traj = discharge_trajectory(&params, &[2.0; 4], &times, 1.0).unwrap();

        assert_eq!(traj.samples[2].charge_out_ah, 2.0);
        assert_eq!(traj.samples[2].state_of_charge, 0.0);
        assert_eq!(traj.samples[2].status, DischargeStatus::SocCutoff);
        assert_eq!(traj.samples[3].status, DischargeStatus::Exhausted);
        assert!(traj.samples[3].terminal_voltage.is_nan());
        assert_eq!(traj.end_index(), Some(2));
    }

    #[test]
    fn test_overdraw_is_masked_and_latches() {
        let params = BatteryParameters::new(1.0, 0.03).unwrap();
        let times = [0.0, 0.4, 0.8, 1.6, 2.0];
        let currents = [1.0, 1.0, 1.0, 1.0, 0.0];
        let traj = discharge_trajectory(&params, &currents, &times, 1.0).unwrap();
        let statuses: Vec<_> = traj.samples.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                DischargeStatus::Active,
                DischargeStatus::Active,
                DischargeStatus::Active,
                DischargeStatus::Depleted,
                DischargeStatus::Exhausted,
            ]
        );
        assert!(traj.samples[3].state_of_charge.is_nan());
    }

    #[test]
    fn test_terminal_voltage_sags_with_load() {
        let params = cell_610mah();
        let times = uniform_times(1.0, 100);
        let light = discharge_trajectory(&params, &vec![0.3; 100], &times, 1.0).unwrap();
        let heavy = discharge_trajectory(&params, &vec![1.22; 100], &times, 1.0).unwrap();
        assert_relative_eq!(
            light.samples[0].terminal_voltage - heavy.samples[0].terminal_voltage,
            (1.22_f64.powf(1.2) - 0.3) * 70e-3,
            max_relative = 1e-9
        );
        assert!(heavy.end_index().is_some());
    }

    #[test]
    fn test_partial_initial_charge_shortens_discharge() {
        let params = BatteryParameters::new(1.0, 0.03).unwrap();
        let times = [0.0, 0.25, 0.5];
        let traj = discharge_trajectory(&params, &[1.0; 3], &times, 0.5).unwrap();
        assert_relative_eq!(traj.samples[0].state_of_charge, 0.5);
        assert_relative_eq!(traj.samples[1].state_of_charge, 0.25);
        assert_eq!(traj.samples[2].state_of_charge, 0.0);
        assert_eq!(traj.samples[2].status, DischargeStatus::SocCutoff);
    }

    #[test]
    fn test_voltage_floor_ends_discharge() {
        let params = cell_610mah();
        let times = uniform_times(1.0, 200);
        let mut discharge = BatteryDischarge::new(params, 1.0)
            .unwrap()
            .with_limits(DischargeLimits {
                min_soc: 0.0,
                min_cell_voltage: Some(3.5),
            })
            .unwrap();
        let traj = discharge.run(&vec![1.22; 200], &times).unwrap();
        let end = traj.end_index().unwrap();
        assert_eq!(traj.samples[end].status, DischargeStatus::VoltageCutoff);
        assert!(cell_open_circuit_voltage(traj.samples[end].state_of_charge) <= 3.5);
        assert!(cell_open_circuit_voltage(traj.samples[end - 1].state_of_charge) > 3.5);
    }

    #[test]
    fn test_online_stepping_matches_batch() {
        let params = BatteryParameters::new(3.0, 0.02).unwrap().with_series(4);
        let mut rng = StdRng::seed_from_u64(7);
        let mut t = 0.0;
        let mut times = Vec::new();
        let mut currents = Vec::new();
        for _ in 0..300 {
            times.push(t);
            currents.push(rng.gen_range(0.0..6.0));
            t += rng.gen_range(0.0..0.004);
        }
        let batch = discharge_trajectory(&params, &currents, &times, 0.9).unwrap();

        let mut online = BatteryDischarge::new(params, 0.9).unwrap();
        for (sample, (&t, &i)) in batch.samples.iter().zip(times.iter().zip(&currents)) {
            let stepped = online.step(t, i).unwrap();
            assert_eq!(stepped.status, sample.status);
            if sample.status.is_valid() {
                assert_eq!(stepped, *sample);
            }
        }
    }

    #[test]
    fn test_online_and_batch_reject_the_same_history() {
        let params = BatteryParameters::new(1.0, 0.03).unwrap();
        let times = [0.0, 0.5, 0.1];
        let currents = [1.0; 3];
        assert!(matches!(
            discharge_trajectory(&params, &currents, &times, 1.0),
            Err(PowertrainError::TimeNotMonotonic { index: 2 })
        ));

        let mut online = BatteryDischarge::new(params, 1.0).unwrap();
        online.step(times[0], currents[0]).unwrap();
        let accepted = online.step(times[1], currents[1]).unwrap();
        assert!(matches!(
            online.step(times[2], currents[2]),
            Err(PowertrainError::TimeNotMonotonic { index: 2 })
        ));
        assert_eq!(online.state().state_of_charge, accepted.state_of_charge);

        assert!(matches!(
            online.step(0.6, f64::NAN),
            Err(PowertrainError::NonFiniteParameter {
                name: "load_currents",
                ..
            })
        ));
        assert!(online.step(f64::INFINITY, 1.0).is_err());
        assert_eq!(online.state().status, DischargeStatus::Active);
        assert_eq!(online.state().state_of_charge, accepted.state_of_charge);

        // Still usable after the rejected samples
        let next = online.step(0.6, 1.0).unwrap();
        assert_relative_eq!(next.state_of_charge, 0.4, max_relative = 1e-12);
    }

    #[test]
    fn test_electrical_model_skips_rejected_sample() {
        let params = BatteryParameters::new(2.0, 0.02).unwrap().with_series(3);
        let mut battery = BatteryDischarge::new(params, 1.0).unwrap();
        let mut state = SimState::default();
        state.battery_state.total_current_draw = 1.0;
        battery.step_electrical(SimContext { dt: 0.0, t: 10.0 }, &mut state);
        let before = state.battery_state;

        state.battery_state.total_current_draw = f64::NAN;
        battery.step_electrical(SimContext { dt: 10.0, t: 20.0 }, &mut state);
        assert_eq!(state.battery_state.state_of_charge, before.state_of_charge);
        assert_eq!(state.battery_state.voltage, before.voltage);
        assert_eq!(battery.state().status, DischargeStatus::Active);
    }

    #[test]
    fn test_electrical_model_step_matches_direct_step() {
        let params = BatteryParameters::new(2.0, 0.02).unwrap().with_series(3);
        let mut direct = BatteryDischarge::new(params, 1.0).unwrap();
        let mut stepped = BatteryDischarge::new(params, 1.0).unwrap();
        let mut state = SimState::default();

        for k in 0..50 {
            let t = k as f64 * 2.0;
            let current = 1.0 + 0.1 * k as f64;
            let expected = direct.step(t / SECONDS_PER_HOUR, current).unwrap();
            state.battery_state.total_current_draw = current;
            stepped.step_electrical(SimContext { dt: 2.0, t }, &mut state);
            assert_eq!(state.battery_state.voltage, expected.terminal_voltage);
            assert_eq!(state.battery_state.state_of_charge, expected.state_of_charge);
        }

        stepped.reset();
        assert_eq!(stepped.state().state_of_charge, 1.0);
        assert_eq!(stepped.state().charge_out_ah, 0.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(BatteryParameters::new(0.0, 0.01).is_err());
        assert!(BatteryParameters::new(1.0, -0.01).is_err());
        assert!(BatteryParameters::new(1.0, 0.01).unwrap().with_parallel(0).validate().is_err());
        let params = cell_610mah();
        assert!(BatteryDischarge::new(params, 0.0).is_err());
        assert!(BatteryDischarge::new(params, 1.5).is_err());
        assert!(matches!(
            discharge_trajectory(&params, &[1.0, 1.0], &[0.0], 1.0),
            Err(PowertrainError::LengthMismatch { .. })
        ));
        assert!(matches!(
            discharge_trajectory(&params, &[1.0, 1.0, 1.0], &[0.0, 0.2, 0.1], 1.0),
            Err(PowertrainError::TimeNotMonotonic { index: 2 })
        ));
        assert!(matches!(
            discharge_trajectory(&params, &[], &[], 1.0),
            Err(PowertrainError::EmptyInput(_))
        ));
    }
}
