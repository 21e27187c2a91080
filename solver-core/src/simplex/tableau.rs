//! Tableau-form primal simplex.

use nalgebra::DMatrix;

use crate::canonical::CanonicalModel;
use crate::error::{SolverError, SolverResult};
use crate::settings::{SolverSettings, EPS_FEAS, EPS_PIVOT, EPS_REDCOST};
use crate::solve_log::{LpStatus, SolveLog};

/// Solve a canonical model with the dense tableau engine.
///
/// Returns the solve log on optimality; `Unbounded`, `Infeasible` and
/// `IterationLimit` failures carry the log accumulated so far.
pub fn solve(canon: &CanonicalModel, settings: &SolverSettings) -> SolverResult<SolveLog> {
    let m = canon.num_rows();
    let n = canon.num_cols();

    let mut tableau = canon.tableau.clone();
    let mut basis = canon.basis.clone();
    let mut log = SolveLog::started(canon);
    log.snapshot(&tableau, &basis);

    for iter in 0..settings.max_iterations {
        let entering = super::first_improving((0..n).map(|j| (j, tableau[(m, j)])));
        let entering = match entering {
            Some(j) => j,
            None => {
                capture_final(&mut log, &tableau);
                return finish_optimal(canon, &tableau, &basis, log);
            }
        };

        let leaving = match ratio_test(&tableau, m, n, entering) {
            Some(i) => i,
            None => {
                capture_final(&mut log, &tableau);
                log.status = LpStatus::Unbounded;
                return Err(SolverError::Unbounded(Box::new(log)));
            }
        };

        if settings.verbose {
            log::debug!(
                "iteration {}: {} enters, row {} ({}) leaves",
                iter + 1,
                canon.names[entering],
                leaving,
                canon.names[basis[leaving]]
            );
        }

        pivot(&mut tableau, &canon.costs, &mut basis, entering, leaving);
        log.record_pivot(entering, leaving);
        log.snapshot(&tableau, &basis);
    }

    capture_final(&mut log, &tableau);
    log.status = LpStatus::IterationLimit;
    Err(SolverError::IterationLimit(Box::new(log)))
}

/// Minimum-ratio leaving row among rows with a positive entering
/// coefficient; ties within [`EPS_PIVOT`] keep the lowest row index.
fn ratio_test(tableau: &DMatrix<f64>, m: usize, n: usize, entering: usize) -> Option<usize> {
    let mut leaving = None;
    let mut best_ratio = f64::INFINITY;
    for i in 0..m {
        let coeff = tableau[(i, entering)];
        if coeff > EPS_REDCOST {
            let ratio = tableau[(i, n)] / coeff;
            if ratio < best_ratio - EPS_PIVOT {
                best_ratio = ratio;
                leaving = Some(i);
            }
        }
    }
    leaving
}

/// Gauss-Jordan pivot on `(leaving, entering)`: scale the pivot row to a
/// unit pivot, eliminate the entering column from every other row
/// (including the z-row), then refresh the objective cell from `c_B . x_B`
/// so `T[m, n]` always equals the current objective.
fn pivot(
    tableau: &mut DMatrix<f64>,
    costs: &[f64],
    basis: &mut [usize],
    entering: usize,
    leaving: usize,
) {
    let rows = tableau.nrows();
    let cols = tableau.ncols();
    let m = rows - 1;
    let n = cols - 1;

    let pivot_val = tableau[(leaving, entering)];
    for j in 0..cols {
        tableau[(leaving, j)] /= pivot_val;
    }

    for r in 0..rows {
        if r == leaving {
            continue;
        }
        let factor = tableau[(r, entering)];
        if factor.abs() <= EPS_PIVOT {
            continue;
        }
        for j in 0..cols {
            tableau[(r, j)] -= factor * tableau[(leaving, j)];
        }
    }

    basis[leaving] = entering;
    let mut z = 0.0;
    for i in 0..m {
        z += costs[basis[i]] * tableau[(i, n)];
    }
    tableau[(m, n)] = z;
}

/// Copy the terminal objective and basic values into the log.
fn capture_final(log: &mut SolveLog, tableau: &DMatrix<f64>) {
    let m = tableau.nrows() - 1;
    let n = tableau.ncols() - 1;
    log.objective = tableau[(m, n)];
    log.basic_values = (0..m).map(|i| tableau[(i, n)]).collect();
}

/// At optimality, an artificial still basic above [`EPS_FEAS`] means the
/// original constraints cannot be met.
fn finish_optimal(
    canon: &CanonicalModel,
    tableau: &DMatrix<f64>,
    basis: &[usize],
    mut log: SolveLog,
) -> SolverResult<SolveLog> {
    let m = canon.num_rows();
    let n = canon.num_cols();
    for i in 0..m {
        if canon.is_artificial(basis[i]) && tableau[(i, n)] > EPS_FEAS {
            log.status = LpStatus::Infeasible;
            return Err(SolverError::Infeasible(Box::new(log)));
        }
    }
    log.status = LpStatus::Optimal;
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;
    use crate::model::{Constraint, Model, Relation, Sense, SignRestriction};
    use approx::assert_relative_eq;

    fn solve_model(model: &Model) -> SolverResult<SolveLog> {
        let settings = SolverSettings::default();
        let canon = canonicalize(model, &settings)?;
        solve(&canon, &settings)
    }

    fn le(coeffs: Vec<f64>, rhs: f64) -> Constraint {
        Constraint {
            coeffs,
            relation: Relation::Le,
            rhs,
        }
    }

    #[test]
    fn test_product_mix_optimum() {
        let model = Model::new(
            Sense::Maximize,
            vec![3.0, 5.0],
            vec![
                le(vec![1.0, 0.0], 4.0),
                le(vec![0.0, 2.0], 12.0),
                le(vec![3.0, 2.0], 18.0),
            ],
            vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
        )
        .unwrap();

        let log = solve_model(&model).unwrap();
        assert_eq!(log.status, LpStatus::Optimal);
        let sol = log.final_solution();
        assert_relative_eq!(sol.objective, 36.0, epsilon = 1e-6);
        assert_relative_eq!(sol.values[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(sol.values[1], 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unbounded() {
        let model = Model::new(
            Sense::Maximize,
            vec![1.0, 0.0],
            vec![le(vec![-1.0, 1.0], 1.0)],
            vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
        )
        .unwrap();

        match solve_model(&model) {
            Err(SolverError::Unbounded(log)) => {
                assert_eq!(log.status, LpStatus::Unbounded);
                assert!(!log.tableaus.is_empty());
            }
            other => panic!("expected Unbounded, got {:?}", other.map(|l| l.status)),
        }
    }

    #[test]
    fn test_infeasible() {
        let model = Model::new(
            Sense::Maximize,
            vec![1.0, 1.0],
            vec![
                le(vec![1.0, 1.0], 1.0),
                Constraint {
                    coeffs: vec![1.0, 1.0],
                    relation: Relation::Ge,
                    rhs: 3.0,
                },
            ],
            vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
        )
        .unwrap();

        match solve_model(&model) {
            Err(SolverError::Infeasible(log)) => {
                assert_eq!(log.status, LpStatus::Infeasible);
            }
            other => panic!("expected Infeasible, got {:?}", other.map(|l| l.status)),
        }
    }

    #[test]
    fn test_iteration_limit() {
        let model = Model::new(
            Sense::Maximize,
            vec![3.0, 5.0],
            vec![
                le(vec![1.0, 0.0], 4.0),
                le(vec![0.0, 2.0], 12.0),
                le(vec![3.0, 2.0], 18.0),
            ],
            vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
        )
        .unwrap();
        let settings = SolverSettings::default().with_max_iterations(1);
        let canon = canonicalize(&model, &settings).unwrap();
        match solve(&canon, &settings) {
            Err(SolverError::IterationLimit(log)) => {
                assert_eq!(log.iterations(), 1);
            }
            other => panic!("expected IterationLimit, got {:?}", other.map(|l| l.status)),
        }
    }

    #[test]
    fn test_basis_columns_are_unit_after_each_pivot() {
        let model = Model::new(
            Sense::Maximize,
            vec![3.0, 5.0],
            vec![
                le(vec![1.0, 0.0], 4.0),
                le(vec![0.0, 2.0], 12.0),
                le(vec![3.0, 2.0], 18.0),
            ],
            vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
        )
        .unwrap();
        let log = solve_model(&model).unwrap();

        for (snapshot, basis) in log.tableaus.iter().zip(&log.bases) {
            for (i, &col) in basis.iter().enumerate() {
                for r in 0..snapshot.nrows() {
                    let expected = if r == i { 1.0 } else { 0.0 };
                    assert!(
                        (snapshot[(r, col)] - expected).abs() < 1e-9,
                        "column {} not unit at snapshot",
                        col
                    );
                }
            }
        }
    }

    #[test]
    fn test_objective_monotone_and_rhs_feasible() {
        let model = Model::new(
            Sense::Maximize,
            vec![3.0, 5.0],
            vec![
                le(vec![1.0, 0.0], 4.0),
                le(vec![0.0, 2.0], 12.0),
                le(vec![3.0, 2.0], 18.0),
            ],
            vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
        )
        .unwrap();
        let log = solve_model(&model).unwrap();

        let m = log.num_rows;
        let n = log.num_cols;
        let mut prev = f64::NEG_INFINITY;
        for snapshot in &log.tableaus {
            assert!(snapshot[(m, n)] >= prev - 1e-9);
            prev = snapshot[(m, n)];
            for i in 0..m {
                assert!(snapshot[(i, n)] >= -1e-9);
            }
        }
    }

    #[test]
    fn test_optimality_certificate() {
        let model = Model::new(
            Sense::Maximize,
            vec![3.0, 5.0],
            vec![
                le(vec![1.0, 0.0], 4.0),
                le(vec![0.0, 2.0], 12.0),
                le(vec![3.0, 2.0], 18.0),
            ],
            vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
        )
        .unwrap();
        let log = solve_model(&model).unwrap();
        let last = log.tableaus.last().unwrap();
        for j in 0..log.num_cols {
            assert!(last[(log.num_rows, j)] <= 1e-9);
        }
    }
}
