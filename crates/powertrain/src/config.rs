use electrical::{BatteryParameters, DischargeLimits, Drivetrain};
use serde::{Deserialize, Serialize};
use simcore::{Result, ensure_finite, ensure_in_range, ensure_positive};

fn default_rotor_count() -> u32 {
    4
}

fn default_initial_soc() -> f64 {
    1.0
}

fn default_soc_cutoff() -> f64 {
    0.1
}

fn default_cell_voltage_cutoff() -> f64 {
    3.3
}

fn default_min_duty() -> f64 {
    0.3
}

fn default_max_torque() -> f64 {
    2.0
}

fn default_max_speed() -> f64 {
    1000.0
}

/// Vehicle powertrain and the limits a mission simulation runs under.
///
/// Every rotor carries an identical motor and ESC, all fed from one pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub drivetrain: Drivetrain,
    pub battery: BatteryParameters,
    #[serde(default = "default_rotor_count")]
    pub rotor_count: u32,
    #[serde(default = "default_initial_soc")]
    pub initial_soc: f64,
    /// Run ends once the state of charge falls to this value.
    #[serde(default = "default_soc_cutoff")]
    pub soc_cutoff: f64,
    /// Run ends once the per-cell open-circuit voltage falls to this value (V).
    #[serde(default = "default_cell_voltage_cutoff")]
    pub cell_voltage_cutoff: f64,
    /// Below this throttle the sample is treated as unloaded and skipped.
    #[serde(default = "default_min_duty")]
    pub min_duty: f64,
    /// Shaft torque (N.m) above which the run is stopped as overloaded.
    #[serde(default = "default_max_torque")]
    pub max_torque: f64,
    /// Shaft speed (rad/s) above which the run is stopped as overloaded.
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
}

impl SimulationConfig {
    pub fn new(drivetrain: Drivetrain, battery: BatteryParameters) -> Self {
        SimulationConfig {
            drivetrain,
            battery,
            rotor_count: default_rotor_count(),
            initial_soc: default_initial_soc(),
            soc_cutoff: default_soc_cutoff(),
            cell_voltage_cutoff: default_cell_voltage_cutoff(),
            min_duty: default_min_duty(),
            max_torque: default_max_torque(),
            max_speed: default_max_speed(),
        }
    }

    pub fn with_rotor_count(mut self, rotor_count: u32) -> Self {
        self.rotor_count = rotor_count;
        self
    }

    pub fn with_initial_soc(mut self, initial_soc: f64) -> Self {
        self.initial_soc = initial_soc;
        self
    }

    pub fn with_cutoffs(mut self, soc_cutoff: f64, cell_voltage_cutoff: f64) -> Self {
        self.soc_cutoff = soc_cutoff;
        self.cell_voltage_cutoff = cell_voltage_cutoff;
        self
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.drivetrain.motor.validate()?;
        self.drivetrain.esc.validate()?;
        self.battery.validate()?;
        ensure_positive("rotor_count", self.rotor_count as f64)?;
        ensure_in_range("initial_soc", self.initial_soc, 0.0, 1.0)?;
        ensure_positive("initial_soc", self.initial_soc)?;
        ensure_in_range("soc_cutoff", self.soc_cutoff, 0.0, 1.0)?;
        ensure_finite("cell_voltage_cutoff", self.cell_voltage_cutoff)?;
        ensure_in_range("min_duty", self.min_duty, 0.0, 1.0)?;
        ensure_positive("max_torque", self.max_torque)?;
        ensure_positive("max_speed", self.max_speed)?;
        Ok(())
    }

    pub fn discharge_limits(&self) -> DischargeLimits {
        DischargeLimits {
            min_soc: self.soc_cutoff,
            min_cell_voltage: Some(self.cell_voltage_cutoff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use electrical::{EscParameters, MotorParameters};
    use simcore::PowertrainError;

    const MINIMAL: &str = r#"{
        "drivetrain": { "motor": { "kt": 0.0251, "resistance": 0.075, "no_load_current": 0.5 } },
        "battery": { "capacity_ah": 6.0, "internal_resistance": 0.013, "series": 6 }
    }"#;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = SimulationConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.rotor_count, 4);
        assert_eq!(config.initial_soc, 1.0);
        assert_eq!(config.soc_cutoff, 0.1);
        assert_eq!(config.cell_voltage_cutoff, 3.3);
        assert_eq!(config.min_duty, 0.3);
        assert_eq!(config.max_torque, 2.0);
        assert_eq!(config.max_speed, 1000.0);
        assert_eq!(config.drivetrain.esc, EscParameters::default());
        assert_eq!(config.battery.parallel, 1);
        assert_eq!(config.battery.peukert, 1.2);
    }

    #[test]
    fn test_json_round_trip_preserves_overrides() {
        let motor = MotorParameters::kde_5215xf_330();
        let drive = Drivetrain::new(motor, EscParameters::default().with_switching_frequency(24e3)).unwrap();
        let battery = BatteryParameters::new(10.0, 0.01).unwrap().with_series(12);
        let config = SimulationConfig::new(drive, battery).with_rotor_count(8).with_cutoffs(0.2, 3.5);

        let parsed = SimulationConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed.rotor_count, 8);
        assert_eq!(parsed.battery.series, 12);
        assert_eq!(parsed.drivetrain.esc.switching_frequency, 24e3);
        assert_relative_eq!(parsed.soc_cutoff, 0.2);
        assert_relative_eq!(parsed.cell_voltage_cutoff, 3.5);
        assert_relative_eq!(parsed.drivetrain.motor.kt, motor.kt);
        assert_relative_eq!(parsed.battery.internal_resistance, 0.01);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let json = MINIMAL.replace("0.075", "-0.075");
        assert!(matches!(
            SimulationConfig::from_json(&json),
            Err(PowertrainError::NonPositiveParameter {
                name: "resistance",
                ..
            })
        ));

        let mut config = SimulationConfig::from_json(MINIMAL).unwrap();
        config.initial_soc = 0.0;
        assert!(config.validate().is_err());
        config.initial_soc = 1.0;
        config.rotor_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            SimulationConfig::from_json("{ \"drivetrain\": "),
            Err(PowertrainError::Json(_))
        ));
    }

    #[test]
    fn test_limits_follow_cutoffs() {
        let config = SimulationConfig::from_json(MINIMAL).unwrap();
        let limits = config.discharge_limits();
        assert_eq!(limits.min_soc, 0.1);
        assert_eq!(limits.min_cell_voltage, Some(3.3));
    }
}
