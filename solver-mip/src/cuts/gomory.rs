//! Rounding-cut loop.
//!
//! Solves the LP relaxation, picks the most fractional integer-restricted
//! variable x_j with value v, appends the bound cut `x_j <= floor(v)` to
//! the model, re-canonicalises, and repeats up to the round cap.
//!
//! The bound cut only trims the chosen variable's range, so it can cut off
//! integer optima that rounding down does not reach, and it does not
//! guarantee termination on its own (hence the cap).
// TODO: derive the cut from the final tableau row of x_j (fractional-part
// Gomory cut) instead of the plain floor bound; the driver loop stays the
// same.

use solver_core::{
    canonicalize, solve_tableau, Constraint, Model, Relation, SignRestriction, SolverError,
};

use crate::error::{MipError, MipResult};
use crate::settings::MipSettings;
use crate::solution::{MipSolution, MipStatus};

/// One appended cut.
#[derive(Debug, Clone)]
pub struct CutRecord {
    /// Cutting round, starting at 0.
    pub round: usize,

    /// Variable the cut bounds.
    pub var: usize,

    /// Floor bound imposed.
    pub bound: f64,

    /// Relaxation objective that triggered the cut, in the parsed model's
    /// sense.
    pub objective: f64,
}

/// Cutting-plane driver.
pub struct CuttingPlane {
    settings: MipSettings,
}

impl CuttingPlane {
    /// Create a driver with the given settings.
    pub fn new(settings: MipSettings) -> Self {
        Self { settings }
    }

    /// Iterate relaxation-and-cut until integral, infeasible, or capped.
    pub fn solve(&self, model: &Model) -> MipResult<MipSolution> {
        model
            .validate()
            .map_err(|e| MipError::InvalidProblem(e.to_string()))?;
        let integer_vars = model.integer_vars();
        if integer_vars.is_empty() {
            return Err(MipError::InvalidProblem(
                "no integer-restricted variables to cut on".into(),
            ));
        }

        let mut work = model.clone();
        for (j, sign) in model.signs.iter().enumerate() {
            if matches!(sign, SignRestriction::Binary) {
                let mut coeffs = vec![0.0; model.num_vars()];
                coeffs[j] = 1.0;
                work.constraints.push(Constraint {
                    coeffs,
                    relation: Relation::Le,
                    rhs: 1.0,
                });
            }
        }

        let mut cuts: Vec<CutRecord> = Vec::new();
        let mut last_solution = None;

        for round in 0..=self.settings.max_cut_rounds {
            let canon = canonicalize(&work, &self.settings.lp_settings)?;
            let log = match solve_tableau(&canon, &self.settings.lp_settings) {
                Ok(log) => log,
                Err(SolverError::Infeasible(_)) | Err(SolverError::Unbounded(_)) => {
                    return Ok(MipSolution::infeasible(Vec::new(), cuts));
                }
                Err(e) => return Err(MipError::Relaxation(e)),
            };
            let solution = log.final_solution();

            let fractional = integer_vars
                .iter()
                .map(|&j| (j, solution.values[j]))
                .filter(|(_, v)| (v - v.round()).abs() > self.settings.int_feas_tol)
                .max_by(|(_, a), (_, b)| {
                    let fa = (a - a.round()).abs();
                    let fb = (b - b.round()).abs();
                    fa.partial_cmp(&fb).expect("fractionality is finite")
                });

            match fractional {
                None => {
                    let mut values = solution.values;
                    for &j in &integer_vars {
                        values[j] = values[j].round();
                    }
                    return Ok(MipSolution {
                        status: MipStatus::Optimal,
                        objective: solution.objective,
                        values,
                        nodes: Vec::new(),
                        cuts,
                    });
                }
                Some((var, value)) if round < self.settings.max_cut_rounds => {
                    let bound = value.floor();
                    if self.settings.verbose {
                        log::info!(
                            "round {}: cutting x{} = {:.6} down to {}",
                            round,
                            var + 1,
                            value,
                            bound
                        );
                    }
                    let mut coeffs = vec![0.0; model.num_vars()];
                    coeffs[var] = 1.0;
                    work.constraints.push(Constraint {
                        coeffs,
                        relation: Relation::Le,
                        rhs: bound,
                    });
                    cuts.push(CutRecord {
                        round,
                        var,
                        bound,
                        objective: solution.objective,
                    });
                    last_solution = Some(solution);
                }
                Some(_) => {
                    last_solution = Some(solution);
                }
            }
        }

        // Round cap reached with a still-fractional relaxation.
        let solution = last_solution.expect("at least one relaxation was solved");
        Ok(MipSolution {
            status: MipStatus::CutLimit,
            objective: solution.objective,
            values: solution.values,
            nodes: Vec::new(),
            cuts,
        })
    }
}
