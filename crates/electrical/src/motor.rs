use serde::{Deserialize, Serialize};
use simcore::{
    NOT_APPLICABLE, OperatingPoint, PointStatus, Result, ensure_non_negative, ensure_positive,
    screen_duty, screen_efficiency, screen_finite, screen_non_negative,
};

/// Share of mechanical power charged as unmodelled (bearing, windage) loss.
const MISC_LOSS_FRACTION: f64 = 0.1;

/// Lumped constants of a brushless motor in SI units.
///
/// In SI the torque constant (N.m/A) equals the back-EMF constant (V.s/rad).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorParameters {
    /// Torque constant (N.m/A)
    pub kt: f64,
    /// Phase winding resistance (Ohm)
    pub resistance: f64,
    /// No-load current (A)
    pub no_load_current: f64,
}

impl MotorParameters {
    pub fn new(kt: f64, resistance: f64, no_load_current: f64) -> Result<Self> {
        let params = MotorParameters {
            kt,
            resistance,
            no_load_current,
        };
        params.validate()?;
        Ok(params)
    }

    /// Derives the winding resistance from the figure of merit `km`
    /// (N.m/sqrt(W)) as `R = (kt / km)^2`.
    pub fn from_motor_constant(kt: f64, km: f64, no_load_current: f64) -> Result<Self> {
        let km = ensure_positive("km", km)?;
        let kt = ensure_positive("kt", kt)?;
        MotorParameters::new(kt, (kt / km).powi(2), no_load_current)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("kt", self.kt)?;
        ensure_positive("resistance", self.resistance)?;
        ensure_non_negative("no_load_current", self.no_load_current)?;
        Ok(())
    }

    /// Figure of merit km = kt / sqrt(R) (N.m/sqrt(W))
    pub fn motor_constant(&self) -> f64 {
        self.kt / self.resistance.sqrt()
    }

    /// Speed constant in the catalog unit rev/min per volt.
    pub fn kv_rpm_per_volt(&self) -> f64 {
        30.0 / (std::f64::consts::PI * self.kt)
    }

    pub fn losses(&self, op: &OperatingPoint) -> MotorPerformance {
        motor_losses(self, op)
    }

    pub fn kde_2304xf_2350() -> Self {
        MotorParameters {
            kt: 0.0041,
            resistance: 0.091,
            no_load_current: 0.7,
        }
    }

    pub fn kde_2814xf_515() -> Self {
        MotorParameters {
            kt: 0.0185,
            resistance: 0.130,
            no_load_current: 0.3,
        }
    }

    pub fn kde_5215xf_330() -> Self {
        MotorParameters {
            kt: 0.0289,
            resistance: 0.044,
            no_load_current: 0.7,
        }
    }
}

/// Loss breakdown of one motor evaluation (W).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorLosses {
    pub copper: f64,
    pub iron: f64,
    pub misc: f64,
    /// Copper plus iron loss after division by the duty ratio.
    pub harmonic: f64,
    pub total: f64,
}

impl MotorLosses {
    fn not_applicable() -> Self {
        MotorLosses {
            copper: NOT_APPLICABLE,
            iron: NOT_APPLICABLE,
            misc: NOT_APPLICABLE,
            harmonic: NOT_APPLICABLE,
            total: NOT_APPLICABLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorPerformance {
    /// Back-EMF (V)
    pub back_emf: f64,
    /// Torque-producing current including the no-load bias (A)
    pub current: f64,
    /// Current drawn from the ESC after losses (A)
    pub current_ac: f64,
    /// Shaft power (W)
    pub power_mech: f64,
    /// Electrical power drawn from the ESC (W)
    pub power_ac: f64,
    pub efficiency: f64,
    pub losses: MotorLosses,
    pub status: PointStatus,
}

impl MotorPerformance {
    pub fn not_applicable(status: PointStatus) -> Self {
        MotorPerformance {
            back_emf: NOT_APPLICABLE,
            current: NOT_APPLICABLE,
            current_ac: NOT_APPLICABLE,
            power_mech: NOT_APPLICABLE,
            power_ac: NOT_APPLICABLE,
            efficiency: NOT_APPLICABLE,
            losses: MotorLosses::not_applicable(),
            status,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }
}

/// Steady-state motor losses at one operating point.
///
/// The no-load current is a bias on the torque current (`I = M/kt + I0`),
/// not a scale factor. Copper and iron losses are divided by the duty
/// ratio to account for PWM harmonic content; the miscellaneous loss is a
/// flat tenth of shaft power. The bus voltage of `op` is not used here.
///
/// Points outside the model's regime come back masked with a status.
pub fn motor_losses(params: &MotorParameters, op: &OperatingPoint) -> MotorPerformance {
    let status = screen_duty(op.duty)
        .and_then(|| screen_non_negative(op.speed, PointStatus::NegativeSpeed))
        .and_then(|| screen_non_negative(op.torque, PointStatus::NegativeTorque));
    if !status.is_valid() {
        return MotorPerformance::not_applicable(status);
    }

    let MotorParameters {
        kt,
        resistance,
        no_load_current,
    } = *params;

    let back_emf = kt * op.speed;
    let current = op.torque / kt + no_load_current;
    let power_mech = op.torque * op.speed;

    let copper = resistance * current.powi(2);
    let iron = kt * no_load_current * op.speed;
    let misc = MISC_LOSS_FRACTION * power_mech;
    let harmonic = (copper + iron) / op.duty;
    let total = misc + harmonic;

    let power_ac = power_mech + total;
    let efficiency = power_mech / power_ac;
    let current_ac = power_ac / back_emf;

    let status = screen_finite(&[current_ac, power_ac, efficiency])
        .and_then(|| screen_non_negative(current_ac, PointStatus::NegativeCurrent))
        .and_then(|| screen_efficiency(efficiency));
    if !status.is_valid() {
        return MotorPerformance::not_applicable(status);
    }

    MotorPerformance {
        back_emf,
        current,
        current_ac,
        power_mech,
        power_ac,
        efficiency,
        losses: MotorLosses {
            copper,
            iron,
            misc,
            harmonic,
            total,
        },
        status,
    }
}
