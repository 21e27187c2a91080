//! Solver configuration and centralised numeric tolerances.

/// Threshold above which a reduced cost counts as improving.
pub const EPS_REDCOST: f64 = 1e-9;

/// Threshold below which a pivot or elimination factor is treated as zero.
/// Also the window for ratio-test ties.
pub const EPS_PIVOT: f64 = 1e-12;

/// Feasibility tolerance: artificial variables above this value at
/// optimality mean infeasibility, and integrality checks use the same bound.
pub const EPS_FEAS: f64 = 1e-6;

/// LP solver settings.
#[derive(Debug, Clone)]
pub struct SolverSettings {
    /// Maximum simplex iterations before the solve is aborted.
    pub max_iterations: usize,

    /// Scale factor for the Big-M penalty on artificial variables.
    /// The penalty is `big_m_scale * max(1, max|c|, max|b|, max|A|)`.
    pub big_m_scale: f64,

    /// Emit per-iteration progress through the `log` facade.
    pub verbose: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            big_m_scale: 1e6,
            verbose: false,
        }
    }
}

impl SolverSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        let mut s = Self::default();
        s.verbose = true;
        s
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }
}
