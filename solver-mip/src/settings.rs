//! Configuration for the integer-programming drivers.

use solver_core::{SolverSettings, EPS_FEAS};

/// Settings shared by the branch-and-bound, cutting-plane and knapsack
/// drivers.
#[derive(Debug, Clone)]
pub struct MipSettings {
    // === Termination ===
    /// Maximum number of B&B nodes to visit before the search aborts.
    pub max_nodes: usize,

    /// Maximum cutting-plane rounds.
    pub max_cut_rounds: usize,

    /// Integer feasibility tolerance: x is integral when
    /// |x - round(x)| <= int_feas_tol.
    pub int_feas_tol: f64,

    // === Output ===
    /// Emit per-node progress through the `log` facade.
    pub verbose: bool,

    // === LP layer ===
    /// Settings for every LP relaxation solve.
    pub lp_settings: SolverSettings,
}

impl Default for MipSettings {
    fn default() -> Self {
        Self {
            max_nodes: 1000,
            max_cut_rounds: 30,
            int_feas_tol: EPS_FEAS,
            verbose: false,
            lp_settings: SolverSettings::default(),
        }
    }
}

impl MipSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        let mut s = Self::default();
        s.verbose = true;
        s.lp_settings.verbose = true;
        s
    }

    /// Set the node cap.
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Set the cutting-plane round cap.
    pub fn with_max_cut_rounds(mut self, rounds: usize) -> Self {
        self.max_cut_rounds = rounds;
        self
    }
}
