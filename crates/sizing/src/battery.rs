use serde::{Deserialize, Serialize};
use simcore::{Result, ensure_positive};

/// Typical lithium-polymer pack density (kg/m^3)
pub const LIPO_DENSITY: f64 = 2037.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatterySize {
    /// kg
    pub mass: f64,
    /// m^3
    pub volume: f64,
}

/// Pack needed to store `energy_wh` at a usable `specific_energy` (Wh/kg).
///
/// Reasonable usable figures are around 140 Wh/kg for high-current VTOL
/// packs and 170 Wh/kg for low-current fixed-wing packs.
pub fn battery_size(energy_wh: f64, specific_energy: f64, density: f64) -> Result<BatterySize> {
    ensure_positive("energy_wh", energy_wh)?;
    ensure_positive("specific_energy", specific_energy)?;
    ensure_positive("density", density)?;
    let mass = energy_wh / specific_energy;
    Ok(BatterySize {
        mass,
        volume: mass / density,
    })
}
