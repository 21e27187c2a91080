//! Solve log: the auditable record of a simplex run.

use nalgebra::{DMatrix, DVector};

use crate::canonical::{CanonicalModel, ColumnOrigin};
use crate::model::Sense;

/// Terminal status of a simplex run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    /// All reduced costs nonpositive and no artificial basic at a positive
    /// value.
    Optimal,

    /// An improving column had no eligible leaving row.
    Unbounded,

    /// An artificial variable remained basic at a positive value.
    Infeasible,

    /// The iteration safety cap tripped.
    IterationLimit,
}

impl LpStatus {
    /// Whether the run ended with a usable primal solution.
    pub fn is_optimal(self) -> bool {
        matches!(self, LpStatus::Optimal)
    }
}

/// Price-out record from the revised engine.
#[derive(Debug, Clone)]
pub struct PriceOut {
    /// Simplex multipliers `y = B^-T c_B`.
    pub y: DVector<f64>,

    /// Reduced costs `c - A^T y` for every column.
    pub reduced: DVector<f64>,

    /// Candidate entering column, if any improves.
    pub entering: Option<usize>,

    /// Current objective `y . b` in the internal maximise convention.
    pub objective: f64,
}

/// Product-form record from the revised engine's ratio test and step.
#[derive(Debug, Clone)]
pub struct ProductForm {
    /// Direction `d = B^-1 A_entering`.
    pub direction: DVector<f64>,

    /// Basic values `x_B` before the step.
    pub basics_before: DVector<f64>,

    /// Step size theta.
    pub step: f64,

    /// Basic values after the step, with the entering variable in the
    /// leaving position.
    pub basics_after: DVector<f64>,

    /// Leaving basis position.
    pub leaving: usize,
}

/// One revised-engine log entry.
#[derive(Debug, Clone)]
pub enum RevisedEntry {
    /// Pricing step.
    PriceOut(PriceOut),
    /// Ratio test and basis step.
    ProductForm(ProductForm),
}

/// Append-only record of a simplex run.
///
/// The log owns copies of every tableau and basis snapshot; nothing aliases
/// the solver's working buffers, so it can outlive the solver and feed the
/// renderers and the sensitivity analyzer.
#[derive(Debug, Clone)]
pub struct SolveLog {
    /// Tableau snapshots, one before the first pivot and one after each.
    /// Empty for the revised engine, which never forms the full tableau.
    pub tableaus: Vec<DMatrix<f64>>,

    /// Entering column per iteration.
    pub enterings: Vec<usize>,

    /// Leaving row position per iteration.
    pub leavings: Vec<usize>,

    /// Basis snapshots, aligned with `tableaus` for the tableau engine and
    /// one per iteration (plus the start) for the revised engine.
    pub bases: Vec<Vec<usize>>,

    /// Price-out / product-form entries (revised engine only).
    pub revised: Vec<RevisedEntry>,

    /// Column names, aligned with tableau columns.
    pub names: Vec<String>,

    /// Full cost vector, aligned with tableau columns.
    pub costs: Vec<f64>,

    /// Number of constraint rows.
    pub num_rows: usize,

    /// Number of structural columns.
    pub num_cols: usize,

    /// Sense of the parsed model.
    pub sense: Sense,

    /// Origin of each decision-like column.
    pub origins: Vec<ColumnOrigin>,

    /// Number of variables in the parsed model.
    pub n_original: usize,

    /// Terminal status.
    pub status: LpStatus,

    /// Final objective in the internal maximise convention.
    pub objective: f64,

    /// Final values of the basic variables, aligned with the last basis.
    pub basic_values: Vec<f64>,
}

/// Final primal solution extracted from a solve log.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Objective value in the sense of the parsed model.
    pub objective: f64,

    /// Value per original decision variable.
    pub values: Vec<f64>,

    /// Name per original decision variable.
    pub names: Vec<String>,
}

impl SolveLog {
    /// Create an empty log seeded from a canonical model.
    pub fn started(canon: &CanonicalModel) -> Self {
        Self {
            tableaus: Vec::new(),
            enterings: Vec::new(),
            leavings: Vec::new(),
            bases: Vec::new(),
            revised: Vec::new(),
            names: canon.names.clone(),
            costs: canon.costs.clone(),
            num_rows: canon.num_rows(),
            num_cols: canon.num_cols(),
            sense: canon.sense,
            origins: canon.origins.clone(),
            n_original: canon.n_original,
            status: LpStatus::IterationLimit,
            objective: 0.0,
            basic_values: Vec::new(),
        }
    }

    /// Record a tableau + basis snapshot (tableau engine).
    pub fn snapshot(&mut self, tableau: &DMatrix<f64>, basis: &[usize]) {
        self.tableaus.push(tableau.clone());
        self.bases.push(basis.to_vec());
    }

    /// Record the pivot choice of one iteration.
    pub fn record_pivot(&mut self, entering: usize, leaving: usize) {
        self.enterings.push(entering);
        self.leavings.push(leaving);
    }

    /// Number of pivots performed.
    pub fn iterations(&self) -> usize {
        self.enterings.len()
    }

    /// The basis the run ended with.
    pub fn final_basis(&self) -> Option<&[usize]> {
        self.bases.last().map(|b| b.as_slice())
    }

    /// Final value of a column: its basic value if basic, zero otherwise.
    pub fn column_value(&self, col: usize) -> f64 {
        match self.final_basis() {
            Some(basis) => basis
                .iter()
                .position(|&j| j == col)
                .and_then(|i| self.basic_values.get(i).copied())
                .unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// Objective value in the sense of the parsed model.
    pub fn reported_objective(&self) -> f64 {
        match self.sense {
            Sense::Maximize => self.objective,
            Sense::Minimize => -self.objective,
        }
    }

    /// Recombine decision columns into per-original-variable values and
    /// report the objective in the parsed model's sense.
    pub fn final_solution(&self) -> Solution {
        let mut values = vec![0.0; self.n_original];
        for (col, origin) in self.origins.iter().enumerate() {
            values[origin.var] += origin.scale * self.column_value(col);
        }
        let names = (0..self.n_original).map(|j| format!("x{}", j + 1)).collect();
        Solution {
            objective: self.reported_objective(),
            values,
            names,
        }
    }
}
