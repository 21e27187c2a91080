//! Revised primal simplex with an explicit basis inverse.
//!
//! Same contract and pivot policy as the tableau engine, but carries
//! `B^-1` instead of the full tableau and re-inverts after every basis
//! change. Each iteration appends a Price-Out entry (multipliers, reduced
//! costs, entering candidate) and, when a pivot happens, a Product-Form
//! entry (direction, step, updated basics) to the log.

use nalgebra::{DMatrix, DVector};

use crate::canonical::CanonicalModel;
use crate::error::{SolverError, SolverResult};
use crate::linalg;
use crate::settings::{SolverSettings, EPS_FEAS, EPS_PIVOT, EPS_REDCOST};
use crate::solve_log::{LpStatus, PriceOut, ProductForm, RevisedEntry, SolveLog};

/// Solve a canonical model with the revised engine.
pub fn solve(canon: &CanonicalModel, settings: &SolverSettings) -> SolverResult<SolveLog> {
    let m = canon.num_rows();
    let n = canon.num_cols();

    let a = canon.constraint_matrix();
    let b = canon.rhs();

    let mut basis = canon.basis.clone();
    let mut basis_inv = linalg::invert(&canon.basis_matrix(&basis))?;
    let mut log = SolveLog::started(canon);
    log.bases.push(basis.clone());

    for iter in 0..settings.max_iterations {
        // Price out: y = B^-T c_B, r = c - A^T y.
        let c_basic = DVector::from_iterator(m, basis.iter().map(|&j| canon.costs[j]));
        let y = basis_inv.transpose() * c_basic;
        let mut reduced = DVector::<f64>::zeros(n);
        for j in 0..n {
            reduced[j] = canon.costs[j] - a.column(j).dot(&y);
        }
        let objective = y.dot(&b);

        let entering = super::first_improving(
            (0..n)
                .filter(|j| !basis.contains(j))
                .map(|j| (j, reduced[j])),
        );
        log.revised.push(RevisedEntry::PriceOut(PriceOut {
            y: y.clone(),
            reduced: reduced.clone(),
            entering,
            objective,
        }));

        let basics = &basis_inv * &b;
        let entering = match entering {
            Some(j) => j,
            None => return finish(canon, &basis, objective, basics, log),
        };

        let direction = &basis_inv * a.column(entering);
        let leaving = match ratio_test(&direction, &basics, &basis) {
            Some(i) => i,
            None => {
                log.objective = objective;
                log.basic_values = basics.iter().copied().collect();
                log.status = LpStatus::Unbounded;
                return Err(SolverError::Unbounded(Box::new(log)));
            }
        };

        let step = basics[leaving] / direction[leaving];
        let mut basics_after = &basics - &direction * step;
        basics_after[leaving] = step;
        log.revised.push(RevisedEntry::ProductForm(ProductForm {
            direction: direction.clone(),
            basics_before: basics.clone(),
            step,
            basics_after,
            leaving,
        }));

        if settings.verbose {
            log::debug!(
                "iteration {}: {} enters for {} (theta {:.6})",
                iter + 1,
                canon.names[entering],
                canon.names[basis[leaving]],
                step
            );
        }

        log.record_pivot(entering, leaving);
        basis[leaving] = entering;
        basis_inv = linalg::invert(&canon.basis_matrix(&basis))?;
        log.bases.push(basis.clone());
    }

    log.status = LpStatus::IterationLimit;
    Err(SolverError::IterationLimit(Box::new(log)))
}

/// Minimum-ratio test over the step direction; ties within [`EPS_PIVOT`]
/// go to the row whose basic variable has the lowest index (Bland).
fn ratio_test(direction: &DVector<f64>, basics: &DVector<f64>, basis: &[usize]) -> Option<usize> {
    let mut leaving: Option<usize> = None;
    let mut best_ratio = f64::INFINITY;
    for i in 0..direction.len() {
        if direction[i] <= EPS_REDCOST {
            continue;
        }
        let ratio = basics[i] / direction[i];
        match leaving {
            None => {
                best_ratio = ratio;
                leaving = Some(i);
            }
            Some(current) => {
                if ratio < best_ratio - EPS_PIVOT {
                    best_ratio = ratio;
                    leaving = Some(i);
                } else if (ratio - best_ratio).abs() <= EPS_PIVOT && basis[i] < basis[current] {
                    leaving = Some(i);
                }
            }
        }
    }
    leaving
}

fn finish(
    canon: &CanonicalModel,
    basis: &[usize],
    objective: f64,
    basics: DVector<f64>,
    mut log: SolveLog,
) -> SolverResult<SolveLog> {
    log.objective = objective;
    log.basic_values = basics.iter().copied().collect();
    for (i, &col) in basis.iter().enumerate() {
        if canon.is_artificial(col) && basics[i] > EPS_FEAS {
            log.status = LpStatus::Infeasible;
            return Err(SolverError::Infeasible(Box::new(log)));
        }
    }
    log.status = LpStatus::Optimal;
    Ok(log)
}
