//! Post-optimality sensitivity analysis on the final basis.
//!
//! Reconstructs `A`, `b`, `c` from the canonical tableau, recovers the
//! basis inverse, and computes shadow prices plus one-at-a-time ranging on
//! objective coefficients and right-hand sides. Ranges are reported as
//! allowable deltas from the current data, in the internal maximise
//! convention.

use nalgebra::DVector;

use crate::canonical::CanonicalModel;
use crate::error::{SolverError, SolverResult};
use crate::linalg;
use crate::settings::EPS_PIVOT;

/// Allowable one-at-a-time change, as nonnegative magnitudes.
/// Either side may be unbounded (`f64::INFINITY`).
#[derive(Debug, Clone, Copy)]
pub struct Range {
    /// How far the datum may decrease before the basis changes.
    pub decrease: f64,

    /// How far the datum may increase before the basis changes.
    pub increase: f64,
}

/// Objective-coefficient range for one column.
#[derive(Debug, Clone)]
pub struct CostRange {
    /// Tableau column index.
    pub col: usize,

    /// Column name.
    pub name: String,

    /// Whether the column is basic in the final basis.
    pub basic: bool,

    /// Allowable change of the cost coefficient.
    pub range: Range,
}

/// Right-hand-side range for one constraint row.
#[derive(Debug, Clone)]
pub struct RhsRange {
    /// Constraint row index.
    pub row: usize,

    /// Allowable change of the right-hand side.
    pub range: Range,
}

/// Full sensitivity report for a solved model.
#[derive(Debug, Clone)]
pub struct SensitivityReport {
    /// Shadow price per constraint row: `y = B^-T c_B`.
    pub shadow_prices: Vec<f64>,

    /// Objective ranging per structural column.
    pub cost_ranges: Vec<CostRange>,

    /// RHS ranging per constraint row.
    pub rhs_ranges: Vec<RhsRange>,
}

/// Analyze the final basis of a solved canonical model.
pub fn analyze(canon: &CanonicalModel, basis: &[usize]) -> SolverResult<SensitivityReport> {
    let m = canon.num_rows();
    let n = canon.num_cols();
    if basis.len() != m {
        return Err(SolverError::InvalidModel(format!(
            "basis has {} entries for {} rows",
            basis.len(),
            m
        )));
    }

    let a = canon.constraint_matrix();
    let b = canon.rhs();
    let basis_inv = linalg::invert(&canon.basis_matrix(basis))?;
    let c_basic = DVector::from_iterator(m, basis.iter().map(|&j| canon.costs[j]));
    let y = basis_inv.transpose() * c_basic;
    let x_basic = &basis_inv * &b;

    let mut cost_ranges = Vec::with_capacity(n);
    for j in 0..n {
        let range = match basis.iter().position(|&k| k == j) {
            Some(pos) => basic_cost_range(canon, &a, &basis_inv, basis, &y, pos),
            None => {
                // Nonbasic: the reduced cost r_j <= 0 may rise to zero, so
                // c_j can grow by -r_j; any decrease keeps it unattractive.
                let r = canon.costs[j] - a.column(j).dot(&y);
                Range {
                    decrease: f64::INFINITY,
                    increase: -r,
                }
            }
        };
        cost_ranges.push(CostRange {
            col: j,
            name: canon.names[j].clone(),
            basic: basis.contains(&j),
            range,
        });
    }

    let mut rhs_ranges = Vec::with_capacity(m);
    for row in 0..m {
        rhs_ranges.push(RhsRange {
            row,
            range: rhs_range(&basis_inv, &x_basic, row),
        });
    }

    Ok(SensitivityReport {
        shadow_prices: y.iter().copied().collect(),
        cost_ranges,
        rhs_ranges,
    })
}

/// Range on the cost of the basic variable at basis position `pos`.
///
/// Perturbing `c_B[pos]` by delta moves every nonbasic reduced cost by
/// `-delta * (A_j . w)` with `w = B^-T e_pos`; keeping them nonpositive
/// bounds delta from below where `A_j . w` is positive and from above where
/// it is negative.
fn basic_cost_range(
    canon: &CanonicalModel,
    a: &nalgebra::DMatrix<f64>,
    basis_inv: &nalgebra::DMatrix<f64>,
    basis: &[usize],
    y: &DVector<f64>,
    pos: usize,
) -> Range {
    let n = canon.num_cols();
    let w = basis_inv.row(pos).transpose();

    let mut lower = f64::NEG_INFINITY;
    let mut upper = f64::INFINITY;
    for j in 0..n {
        if basis.contains(&j) {
            continue;
        }
        let col = a.column(j);
        let alpha = col.dot(&w);
        let r = canon.costs[j] - col.dot(y);
        if alpha > EPS_PIVOT {
            lower = lower.max(r / alpha);
        } else if alpha < -EPS_PIVOT {
            upper = upper.min(r / alpha);
        }
    }

    Range {
        decrease: -lower,
        increase: upper,
    }
}

/// Range on the right-hand side of `row`, bounded by the basic values that
/// would be driven negative.
fn rhs_range(
    basis_inv: &nalgebra::DMatrix<f64>,
    x_basic: &DVector<f64>,
    row: usize,
) -> Range {
    let m = x_basic.len();
    let mut decrease = f64::INFINITY;
    let mut increase = f64::INFINITY;
    for r in 0..m {
        let v = basis_inv[(r, row)];
        if v > EPS_PIVOT {
            decrease = decrease.min(x_basic[r] / v);
        } else if v < -EPS_PIVOT {
            increase = increase.min(-x_basic[r] / v);
        }
    }
    Range { decrease, increase }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;
    use crate::model::{Constraint, Model, Relation, Sense, SignRestriction};
    use crate::settings::SolverSettings;
    use crate::simplex::solve_tableau;
    use approx::assert_relative_eq;

    fn product_mix() -> Model {
        Model::new(
            Sense::Maximize,
            vec![3.0, 5.0],
            vec![
                Constraint {
                    coeffs: vec![1.0, 0.0],
                    relation: Relation::Le,
                    rhs: 4.0,
                },
                Constraint {
                    coeffs: vec![0.0, 2.0],
                    relation: Relation::Le,
                    rhs: 12.0,
                },
                Constraint {
                    coeffs: vec![3.0, 2.0],
                    relation: Relation::Le,
                    rhs: 18.0,
                },
            ],
            vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
        )
        .unwrap()
    }

    fn solved_report() -> SensitivityReport {
        let settings = SolverSettings::default();
        let canon = canonicalize(&product_mix(), &settings).unwrap();
        let log = solve_tableau(&canon, &settings).unwrap();
        analyze(&canon, log.final_basis().unwrap()).unwrap()
    }

    #[test]
    fn test_shadow_prices() {
        let report = solved_report();
        assert_relative_eq!(report.shadow_prices[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(report.shadow_prices[1], 1.5, epsilon = 1e-9);
        assert_relative_eq!(report.shadow_prices[2], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_basic_cost_ranges() {
        let report = solved_report();
        // c1 = 3 may move within [0, 7.5].
        let c1 = &report.cost_ranges[0];
        assert!(c1.basic);
        assert_relative_eq!(c1.range.decrease, 3.0, epsilon = 1e-9);
        assert_relative_eq!(c1.range.increase, 4.5, epsilon = 1e-9);
        // c2 = 5 may drop to 2 and grow without bound.
        let c2 = &report.cost_ranges[1];
        assert!(c2.basic);
        assert_relative_eq!(c2.range.decrease, 3.0, epsilon = 1e-9);
        assert_eq!(c2.range.increase, f64::INFINITY);
    }

    #[test]
    fn test_nonbasic_cost_range() {
        let report = solved_report();
        // Slack s2 is nonbasic with reduced cost -1.5.
        let s2 = &report.cost_ranges[3];
        assert!(!s2.basic);
        assert_eq!(s2.range.decrease, f64::INFINITY);
        assert_relative_eq!(s2.range.increase, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_rhs_ranges() {
        let report = solved_report();
        // b1 = 4: slack of 2, unbounded increase.
        assert_relative_eq!(report.rhs_ranges[0].range.decrease, 2.0, epsilon = 1e-9);
        assert_eq!(report.rhs_ranges[0].range.increase, f64::INFINITY);
        // b2 = 12: [6, 18].
        assert_relative_eq!(report.rhs_ranges[1].range.decrease, 6.0, epsilon = 1e-9);
        assert_relative_eq!(report.rhs_ranges[1].range.increase, 6.0, epsilon = 1e-9);
        // b3 = 18: [12, 24].
        assert_relative_eq!(report.rhs_ranges[2].range.decrease, 6.0, epsilon = 1e-9);
        assert_relative_eq!(report.rhs_ranges[2].range.increase, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_wrong_basis_length() {
        let settings = SolverSettings::default();
        let canon = canonicalize(&product_mix(), &settings).unwrap();
        assert!(matches!(
            analyze(&canon, &[0]),
            Err(SolverError::InvalidModel(_))
        ));
    }
}
