//! Time-stepped battery + ESC + motor simulation over a recorded load history

use electrical::throttle::is_saturated;
use electrical::{BatteryDischarge, Drivetrain, solve_duty};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use simcore::{
    DischargeStatus, ElectricalModel, Model, NOT_APPLICABLE, OperatingPoint, PowertrainError,
    Result, SimContext, SimState, ensure_finite,
};

use crate::config::SimulationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimPhase {
    #[default]
    Running,
    /// Required throttle exceeded full scale; outputs held from the last step.
    ThrottleSaturated,
    /// Torque or speed beyond the configured limits.
    OverloadStop,
    SocCutoff,
    VoltageCutoff,
}

impl SimPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SimPhase::OverloadStop | SimPhase::SocCutoff | SimPhase::VoltageCutoff
        )
    }
}

/// Shaft load on each rotor at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadSample {
    /// s
    pub time_s: f64,
    /// rad/s
    pub speed: f64,
    /// N.m
    pub torque: f64,
}

impl LoadSample {
    pub fn new(time_s: f64, speed: f64, torque: f64) -> Self {
        LoadSample {
            time_s,
            speed,
            torque,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    pub time_s: f64,
    pub phase: SimPhase,
    pub duty: f64,
    /// DC current drawn by one ESC (A)
    pub current_dc: f64,
    /// Current drawn from the pack by all rotors (A)
    pub total_current: f64,
    pub state_of_charge: f64,
    /// Pack terminal voltage after the step (V)
    pub bus_voltage: f64,
    /// Outputs were carried over from the previous step
    pub held: bool,
}

/// Time series produced by [`PowertrainSimulator::run`].
#[derive(Debug, Clone, Default)]
pub struct SimulationResult {
    pub times: Vec<f64>,
    pub phases: Vec<SimPhase>,
    pub duties: Vec<f64>,
    pub currents_dc: Vec<f64>,
    pub total_currents: Vec<f64>,
    pub states_of_charge: Vec<f64>,
    pub bus_voltages: Vec<f64>,
}

impl SimulationResult {
    fn with_capacity(n: usize) -> Self {
        SimulationResult {
            times: Vec::with_capacity(n),
            phases: Vec::with_capacity(n),
            duties: Vec::with_capacity(n),
            currents_dc: Vec::with_capacity(n),
            total_currents: Vec::with_capacity(n),
            states_of_charge: Vec::with_capacity(n),
            bus_voltages: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, record: &StepRecord) {
        self.times.push(record.time_s);
        self.phases.push(record.phase);
        self.duties.push(record.duty);
        self.currents_dc.push(record.current_dc);
        self.total_currents.push(record.total_current);
        self.states_of_charge.push(record.state_of_charge);
        self.bus_voltages.push(record.bus_voltage);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Phase of the last simulated step.
    pub fn final_phase(&self) -> SimPhase {
        self.phases.last().copied().unwrap_or_default()
    }
}

/// Multirotor powertrain driven sample by sample.
///
/// All rotors share one motor/ESC design and one pack. Each step solves the
/// throttle from the present pack voltage, runs the motor and ESC models and
/// draws the summed DC current from the battery. The first sample only
/// anchors the battery integral.
#[derive(Debug, Clone)]
pub struct PowertrainSimulator {
    config: SimulationConfig,
    drive: Drivetrain,
    battery: BatteryDischarge,
    state: SimState,
    phase: SimPhase,
    last_time: Option<f64>,
    steps: usize,
    /// Per-rotor DC current reused by held steps (A)
    current_dc: f64,
}

impl PowertrainSimulator {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let battery = BatteryDischarge::new(config.battery, config.initial_soc)?
            .with_limits(config.discharge_limits())?;
        let state = SimState {
            battery_state: *battery.state(),
            ..SimState::default()
        };
        Ok(PowertrainSimulator {
            drive: config.drivetrain,
            config,
            battery,
            state,
            phase: SimPhase::Running,
            last_time: None,
            steps: 0,
            current_dc: 0.0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn bus_voltage(&self) -> f64 {
        self.state.battery_state.voltage
    }

    /// Advances the simulation to `sample`.
    ///
    /// Once a terminal phase is reached the state is frozen and every later
    /// call returns a record carrying that phase.
    pub fn step(&mut self, sample: &LoadSample) -> Result<StepRecord> {
        ensure_finite("time_s", sample.time_s)?;
        ensure_finite("speed", sample.speed)?;
        ensure_finite("torque", sample.torque)?;
        if let Some(prev) = self.last_time {
            if sample.time_s < prev {
                return Err(PowertrainError::TimeNotMonotonic { index: self.steps });
            }
        }

        if self.phase.is_terminal() {
            return Ok(self.record(sample.time_s, NOT_APPLICABLE, true));
        }

        let ctx = SimContext {
            dt: self.last_time.map_or(0.0, |prev| sample.time_s - prev),
            t: sample.time_s,
        };
        let first = self.last_time.is_none();
        self.last_time = Some(sample.time_s);
        self.steps += 1;

        if first {
            self.state.battery_state.total_current_draw = 0.0;
            self.battery.step_electrical(ctx, &mut self.state);
            self.phase = battery_phase(self.state.battery_state.status, SimPhase::Running);
            return Ok(self.record(sample.time_s, NOT_APPLICABLE, true));
        }

        let bus_voltage = self.bus_voltage();
        let duty = solve_duty(sample.speed, bus_voltage, self.drive.motor.kt);

        if sample.torque > self.config.max_torque || sample.speed > self.config.max_speed {
            info!(
                "t = {:.1} s: overload ({:.3} N.m at {:.1} rad/s), stopping",
                sample.time_s, sample.torque, sample.speed
            );
            self.phase = SimPhase::OverloadStop;
            return Ok(self.record(sample.time_s, duty, true));
        }

        let mut phase = SimPhase::Running;
        let mut held = true;
        if is_saturated(duty) {
            warn!(
                "t = {:.1} s: throttle {:.3} above full scale at {:.2} V, holding outputs",
                sample.time_s, duty, bus_voltage
            );
            phase = SimPhase::ThrottleSaturated;
        } else if sample.torque < 0.0 || sample.speed < 0.0 {
            warn!("t = {:.1} s: negative load, holding outputs", sample.time_s);
        } else if duty < self.config.min_duty {
            debug!("t = {:.1} s: throttle {:.3} below floor, holding outputs", sample.time_s, duty);
        } else {
            self.state.drive.operating_point =
                OperatingPoint::new(sample.speed, sample.torque, duty, bus_voltage);
            self.drive.step_electrical(ctx, &mut self.state);
            if self.state.drive.status.is_valid() {
                self.current_dc = self.state.drive.current_dc;
                held = false;
            } else {
                warn!(
                    "t = {:.1} s: drive output masked ({:?}), holding outputs",
                    sample.time_s, self.state.drive.status
                );
            }
        }

        // Held steps report the last current but draw nothing from the
        // pack; the battery still sees the timestamp.
        let current_dc = if held { 0.0 } else { self.current_dc };
        self.state.battery_state.total_current_draw = self.config.rotor_count as f64 * current_dc;
        self.battery.step_electrical(ctx, &mut self.state);
        self.phase = battery_phase(self.state.battery_state.status, phase);

        if self.phase.is_terminal() {
            info!(
                "t = {:.1} s: {:?} reached (soc = {:.3})",
                sample.time_s, self.phase, self.state.battery_state.state_of_charge
            );
        }

        Ok(self.record(sample.time_s, duty, held))
    }

    /// Steps through `samples` until they run out or a terminal phase is
    /// reached. The whole history is checked before any state changes.
    pub fn run(&mut self, samples: &[LoadSample]) -> Result<SimulationResult> {
        validate_samples(samples)?;

        let mut result = SimulationResult::with_capacity(samples.len());
        for sample in samples {
            let record = self.step(sample)?;
            result.push(&record);
            if record.phase.is_terminal() {
                break;
            }
        }

        debug!(
            "simulated {} of {} samples, final phase {:?}",
            result.len(),
            samples.len(),
            result.final_phase()
        );
        Ok(result)
    }

    fn record(&self, time_s: f64, duty: f64, held: bool) -> StepRecord {
        let battery = &self.state.battery_state;
        StepRecord {
            time_s,
            phase: self.phase,
            duty,
            current_dc: self.current_dc,
            total_current: battery.total_current_draw,
            state_of_charge: battery.state_of_charge,
            bus_voltage: battery.voltage,
            held,
        }
    }
}

fn battery_phase(status: DischargeStatus, phase: SimPhase) -> SimPhase {
    match status {
        DischargeStatus::Active => phase,
        DischargeStatus::VoltageCutoff => SimPhase::VoltageCutoff,
        DischargeStatus::SocCutoff | DischargeStatus::Depleted | DischargeStatus::Exhausted => {
            SimPhase::SocCutoff
        }
    }
}

fn validate_samples(samples: &[LoadSample]) -> Result<()> {
    if samples.is_empty() {
        return Err(PowertrainError::EmptyInput("samples"));
    }
    for (i, sample) in samples.iter().enumerate() {
        ensure_finite("time_s", sample.time_s)?;
        ensure_finite("speed", sample.speed)?;
        ensure_finite("torque", sample.torque)?;
        if i > 0 && sample.time_s < samples[i - 1].time_s {
            return Err(PowertrainError::TimeNotMonotonic { index: i });
        }
    }
    Ok(())
}

impl Model for PowertrainSimulator {
    fn reset(&mut self) {
        self.battery.reset();
        self.drive.reset();
        self.state = SimState {
            battery_state: *self.battery.state(),
            ..SimState::default()
        };
        self.phase = SimPhase::Running;
        self.last_time = None;
        self.steps = 0;
        self.current_dc = 0.0;
    }
}
