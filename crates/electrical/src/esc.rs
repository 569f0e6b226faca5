use serde::{Deserialize, Serialize};
use simcore::{
    NOT_APPLICABLE, PointStatus, Result, ensure_non_negative, ensure_positive, screen_duty,
    screen_efficiency, screen_finite, screen_non_negative,
};

/// Number of MOSFETs conducting at once in a half-bridge leg.
const CONDUCTING_SWITCHES: f64 = 2.0;

/// Electronic speed controller constants.
///
/// Defaults describe a typical hobby-class ESC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscParameters {
    /// PWM switching frequency (Hz)
    pub switching_frequency: f64,
    /// MOSFET drain-source on-resistance (Ohm)
    pub on_resistance: f64,
    /// MOSFET switching transition time (s)
    pub transition_time: f64,
    /// Quiescent draw of the controller electronics (W)
    pub quiescent_power: f64,
}

impl Default for EscParameters {
    fn default() -> Self {
        EscParameters {
            switching_frequency: 12e3,
            on_resistance: 1e-3,
            transition_time: 1e-6,
            quiescent_power: 0.25,
        }
    }
}

impl EscParameters {
    pub fn new(
        switching_frequency: f64,
        on_resistance: f64,
        transition_time: f64,
        quiescent_power: f64,
    ) -> Result<Self> {
        let params = EscParameters {
            switching_frequency,
            on_resistance,
            transition_time,
            quiescent_power,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("switching_frequency", self.switching_frequency)?;
        ensure_positive("on_resistance", self.on_resistance)?;
        ensure_positive("transition_time", self.transition_time)?;
        ensure_non_negative("quiescent_power", self.quiescent_power)?;
        Ok(())
    }

    pub fn with_switching_frequency(mut self, hz: f64) -> Self {
        self.switching_frequency = hz;
        self
    }

    pub fn with_on_resistance(mut self, ohms: f64) -> Self {
        self.on_resistance = ohms;
        self
    }

    pub fn with_transition_time(mut self, seconds: f64) -> Self {
        self.transition_time = seconds;
        self
    }

    pub fn with_quiescent_power(mut self, watts: f64) -> Self {
        self.quiescent_power = watts;
        self
    }

    pub fn losses(&self, current_ac: f64, power_ac: f64, duty: f64, bus_voltage: f64) -> EscPerformance {
        esc_losses(self, current_ac, power_ac, duty, bus_voltage)
    }
}

/// Loss breakdown of one ESC evaluation (W).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscLosses {
    pub conduction: f64,
    pub switching: f64,
    /// Conduction plus switching loss after division by the duty ratio.
    pub harmonic: f64,
    pub quiescent: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscPerformance {
    /// Current drawn from the DC bus (A)
    pub current_dc: f64,
    /// Power drawn from the DC bus (W)
    pub power_dc: f64,
    /// Power delivered to the motor (W)
    pub power_ac: f64,
    pub efficiency: f64,
    pub losses: EscLosses,
    pub status: PointStatus,
}

impl EscPerformance {
    pub fn not_applicable(status: PointStatus) -> Self {
        EscPerformance {
            current_dc: NOT_APPLICABLE,
            power_dc: NOT_APPLICABLE,
            power_ac: NOT_APPLICABLE,
            efficiency: NOT_APPLICABLE,
            losses: EscLosses {
                conduction: NOT_APPLICABLE,
                switching: NOT_APPLICABLE,
                harmonic: NOT_APPLICABLE,
                quiescent: NOT_APPLICABLE,
                total: NOT_APPLICABLE,
            },
            status,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }
}

/// ESC losses when feeding a motor that draws `current_ac` (A) and
/// `power_ac` (W) at duty ratio `duty` from a `bus_voltage` (V) bus.
///
/// Conduction loss counts both switches of a half-bridge leg. Conduction
/// and switching losses are divided once by the duty ratio; the quiescent
/// draw is added flat.
pub fn esc_losses(
    params: &EscParameters,
    current_ac: f64,
    power_ac: f64,
    duty: f64,
    bus_voltage: f64,
) -> EscPerformance {
    let status = screen_duty(duty)
        .and_then(|| screen_finite(&[current_ac, power_ac]))
        .and_then(|| screen_non_negative(current_ac, PointStatus::NegativeCurrent))
        .and_then(|| screen_non_negative(power_ac, PointStatus::NonPhysicalEfficiency));
    if !status.is_valid() {
        return EscPerformance::not_applicable(status);
    }

    let conduction = CONDUCTING_SWITCHES * params.on_resistance * current_ac.powi(2);
    let switching = params.switching_frequency * params.transition_time * bus_voltage * current_ac;
    let harmonic = (conduction + switching) / duty;
    let quiescent = params.quiescent_power;
    let total = quiescent + harmonic;

    let power_dc = power_ac + total;
    let efficiency = power_ac / power_dc;
    let current_dc = power_dc / bus_voltage;

    let status = screen_finite(&[current_dc, power_dc, efficiency])
        .and_then(|| screen_non_negative(current_dc, PointStatus::NegativeCurrent))
        .and_then(|| screen_efficiency(efficiency));
    if !status.is_valid() {
        return EscPerformance::not_applicable(status);
    }

    EscPerformance {
        current_dc,
        power_dc,
        power_ac,
        efficiency,
        losses: EscLosses {
            conduction,
            switching,
            harmonic,
            quiescent,
            total,
        },
        status,
    }
}
