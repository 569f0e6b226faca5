/// Duty ratio needed to hold `speed` (rad/s) from a `bus_voltage` (V) bus
/// with a motor of torque constant `kt` (N.m/A).
///
/// Not clamped: a result above 1 means the bus cannot reach that speed and
/// it is up to the caller to decide what that implies.
pub fn solve_duty(speed: f64, bus_voltage: f64, kt: f64) -> f64 {
    speed * kt / bus_voltage
}

/// Whether a duty ratio asks for more than full throttle.
pub fn is_saturated(duty: f64) -> bool {
    duty > 1.0
}
