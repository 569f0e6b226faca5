/// Running trapezoidal integral over samples that arrive one at a time.
///
/// The first sample only anchors the integral (the cumulative value
/// starts at zero), matching `cumulative_trapezoid` with an initial zero.
/// Sample spacing may be non-uniform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trapezoid {
    last: Option<(f64, f64)>,
    total: f64,
}

impl Trapezoid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the sample `y` at abscissa `x` and returns the integral so far.
    pub fn push(&mut self, x: f64, y: f64) -> f64 {
        if let Some((x_prev, y_prev)) = self.last {
            self.total += (x - x_prev) * (y + y_prev) / 2.0;
        }
        self.last = Some((x, y));
        self.total
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Abscissa of the most recent sample, if any.
    pub fn last_x(&self) -> Option<f64> {
        self.last.map(|(x, _)| x)
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.total = 0.0;
    }
}

/// Cumulative trapezoidal integral of `y` over `x`, starting at zero.
///
/// Output has one entry per input sample. Extra samples in the longer slice
/// are ignored.
pub fn cumulative_trapezoid(y: &[f64], x: &[f64]) -> Vec<f64> {
    let mut integrator = Trapezoid::new();
    x.iter().zip(y).map(|(&xi, &yi)| integrator.push(xi, yi)).collect()
}
