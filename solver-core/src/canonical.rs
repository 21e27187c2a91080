//! Canonical-form construction.
//!
//! Translates a parsed [`Model`] into a standard-form maximisation tableau
//! with explicit slack and artificial columns, a Big-M-adjusted reduced-cost
//! row, and a known basic-feasible starting point.

use nalgebra::{DMatrix, DVector};

use crate::error::SolverResult;
use crate::linalg;
use crate::model::{Model, Relation, Sense, SignRestriction};
use crate::settings::SolverSettings;

/// Where a decision-like tableau column came from.
///
/// Free variables split into two pieces and NonPos variables are negated, so
/// the value of original variable `var` is the sum of `scale * column value`
/// over all columns with that `var`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnOrigin {
    /// Index of the variable in the parsed model.
    pub var: usize,

    /// Contribution of this column to the original variable's value.
    pub scale: f64,
}

/// A model in canonical maximisation form with a starting basis.
///
/// Column order is `[decision-like | slacks | artificials | RHS]`, where the
/// decision-like block includes split pieces of free variables and negated
/// pieces of NonPos variables.
#[derive(Debug, Clone)]
pub struct CanonicalModel {
    /// Dense tableau of shape `(m+1) x (n+1)`. Row `m` is the reduced-cost
    /// row, column `n` the right-hand side.
    pub tableau: DMatrix<f64>,

    /// Column index of the basic variable in each constraint row.
    pub basis: Vec<usize>,

    /// Cost vector aligned with tableau columns (length `n`).
    pub costs: Vec<f64>,

    /// Human-readable column names (length `n`).
    pub names: Vec<String>,

    /// Origin of each decision-like column (length `n_decision`).
    pub origins: Vec<ColumnOrigin>,

    /// Number of decision-like columns.
    pub n_decision: usize,

    /// Number of slack columns.
    pub n_slack: usize,

    /// Number of artificial columns.
    pub n_artificial: usize,

    /// Number of variables in the parsed model.
    pub n_original: usize,

    /// Sense of the parsed model; reports re-negate objectives for Minimize.
    pub sense: Sense,

    /// Big-M penalty applied to artificial columns.
    pub big_m: f64,
}

impl CanonicalModel {
    /// Number of constraint rows.
    pub fn num_rows(&self) -> usize {
        self.basis.len()
    }

    /// Number of structural columns (the RHS column sits at this index).
    pub fn num_cols(&self) -> usize {
        self.costs.len()
    }

    /// Whether a column is an artificial variable.
    pub fn is_artificial(&self, col: usize) -> bool {
        col >= self.n_decision + self.n_slack && col < self.num_cols()
    }

    /// The constraint matrix `A` (rows `0..m`, columns `0..n`).
    pub fn constraint_matrix(&self) -> DMatrix<f64> {
        let m = self.num_rows();
        let n = self.num_cols();
        DMatrix::from_fn(m, n, |i, j| self.tableau[(i, j)])
    }

    /// The right-hand-side vector `b`.
    pub fn rhs(&self) -> DVector<f64> {
        let m = self.num_rows();
        let n = self.num_cols();
        DVector::from_fn(m, |i, _| self.tableau[(i, n)])
    }

    /// The `m x m` matrix formed by the given basis columns.
    pub fn basis_matrix(&self, basis: &[usize]) -> DMatrix<f64> {
        let m = self.num_rows();
        DMatrix::from_fn(m, m, |i, k| self.tableau[(i, basis[k])])
    }
}

/// Build the canonical form of a model.
///
/// Steps: sense normalisation to internal maximise form, per-variable sign
/// transforms (NonPos negation, free splits), RHS normalisation, slack and
/// artificial introduction, Big-M costing, and the reduced-cost row derived
/// from the starting basis inverse.
pub fn canonicalize(model: &Model, settings: &SolverSettings) -> SolverResult<CanonicalModel> {
    model.validate()?;

    let n0 = model.num_vars();
    let m = model.num_constraints();

    let base_costs: Vec<f64> = match model.sense {
        Sense::Maximize => model.costs.clone(),
        Sense::Minimize => model.costs.iter().map(|c| -c).collect(),
    };

    // Sign transforms, column by column. Each original variable expands to
    // one or two decision-like columns.
    let mut dec_cols: Vec<Vec<f64>> = Vec::with_capacity(n0);
    let mut dec_costs: Vec<f64> = Vec::with_capacity(n0);
    let mut names: Vec<String> = Vec::with_capacity(n0);
    let mut origins: Vec<ColumnOrigin> = Vec::with_capacity(n0);

    for j in 0..n0 {
        let col: Vec<f64> = model.constraints.iter().map(|c| c.coeffs[j]).collect();
        match model.signs[j] {
            SignRestriction::NonNeg | SignRestriction::Integer | SignRestriction::Binary => {
                dec_cols.push(col);
                dec_costs.push(base_costs[j]);
                names.push(format!("x{}", j + 1));
                origins.push(ColumnOrigin { var: j, scale: 1.0 });
            }
            SignRestriction::NonPos => {
                // Substitute x = -x' with x' >= 0.
                dec_cols.push(col.iter().map(|a| -a).collect());
                dec_costs.push(-base_costs[j]);
                names.push(format!("x{}'", j + 1));
                origins.push(ColumnOrigin { var: j, scale: -1.0 });
            }
            SignRestriction::Free => {
                // Split x = x+ - x-, both nonnegative.
                dec_cols.push(col.clone());
                dec_costs.push(base_costs[j]);
                names.push(format!("x{}+", j + 1));
                origins.push(ColumnOrigin { var: j, scale: 1.0 });

                dec_cols.push(col.iter().map(|a| -a).collect());
                dec_costs.push(-base_costs[j]);
                names.push(format!("x{}-", j + 1));
                origins.push(ColumnOrigin { var: j, scale: -1.0 });
            }
        }
    }
    let n_decision = dec_cols.len();

    // RHS normalisation: rows with a negative right-hand side are negated
    // and their relation flipped.
    let mut relations: Vec<Relation> = model.constraints.iter().map(|c| c.relation).collect();
    let mut rhs: Vec<f64> = model.constraints.iter().map(|c| c.rhs).collect();
    for i in 0..m {
        if rhs[i] < 0.0 {
            rhs[i] = -rhs[i];
            for col in dec_cols.iter_mut() {
                col[i] = -col[i];
            }
            relations[i] = relations[i].flipped();
        }
    }

    // Slack/artificial layout. `<=` rows get a basic +1 slack, `=` rows a
    // basic artificial, `>=` rows a nonbasic -1 slack plus a basic
    // artificial.
    let n_slack = relations
        .iter()
        .filter(|r| matches!(r, Relation::Le | Relation::Ge))
        .count();
    let n_artificial = relations
        .iter()
        .filter(|r| matches!(r, Relation::Eq | Relation::Ge))
        .count();
    let n = n_decision + n_slack + n_artificial;

    // Big-M: large enough to dominate every cost, RHS and matrix entry.
    let max_cost = dec_costs.iter().fold(0.0_f64, |acc, c| acc.max(c.abs()));
    let max_rhs = rhs.iter().fold(0.0_f64, |acc, b| acc.max(b.abs()));
    let max_coeff = dec_cols
        .iter()
        .flat_map(|col| col.iter())
        .fold(0.0_f64, |acc, a| acc.max(a.abs()));
    let big_m = settings.big_m_scale * 1.0_f64.max(max_cost).max(max_rhs).max(max_coeff);

    let mut costs = vec![0.0; n];
    costs[..n_decision].copy_from_slice(&dec_costs);

    let mut tableau = DMatrix::<f64>::zeros(m + 1, n + 1);
    for (j, col) in dec_cols.iter().enumerate() {
        for i in 0..m {
            tableau[(i, j)] = col[i];
        }
    }
    for i in 0..m {
        tableau[(i, n)] = rhs[i];
    }

    let mut basis = vec![0_usize; m];
    let mut next_slack = n_decision;
    let mut next_artificial = n_decision + n_slack;
    for i in 0..m {
        match relations[i] {
            Relation::Le => {
                tableau[(i, next_slack)] = 1.0;
                names.push(format!("s{}", next_slack - n_decision + 1));
                basis[i] = next_slack;
                next_slack += 1;
            }
            Relation::Ge => {
                tableau[(i, next_slack)] = -1.0;
                names.push(format!("s{}", next_slack - n_decision + 1));
                next_slack += 1;

                tableau[(i, next_artificial)] = 1.0;
                basis[i] = next_artificial;
                next_artificial += 1;
            }
            Relation::Eq => {
                tableau[(i, next_artificial)] = 1.0;
                basis[i] = next_artificial;
                next_artificial += 1;
            }
        }
    }
    for k in 0..n_artificial {
        let col = n_decision + n_slack + k;
        costs[col] = -big_m;
        names.push(format!("a{}", k + 1));
    }
    debug_assert_eq!(names.len(), n);

    let canon = CanonicalModel {
        tableau,
        basis,
        costs,
        names,
        origins,
        n_decision,
        n_slack,
        n_artificial,
        n_original: n0,
        sense: model.sense,
        big_m,
    };

    reduced_cost_row(canon)
}

/// Fill in the reduced-cost row `T[m, .]` from the starting basis.
///
/// `y = (c_B)^T B^-1`, `T[m, j] = c_j - y . A_j`, `T[m, n] = y . b`.
/// Basic columns end up with a zero reduced cost by construction.
fn reduced_cost_row(mut canon: CanonicalModel) -> SolverResult<CanonicalModel> {
    let m = canon.num_rows();
    let n = canon.num_cols();

    let basis_mat = canon.basis_matrix(&canon.basis);
    let basis_inv = linalg::invert(&basis_mat)?;
    let c_basic = DVector::from_iterator(m, canon.basis.iter().map(|&j| canon.costs[j]));
    let y = basis_inv.transpose() * c_basic;

    for j in 0..n {
        let mut dot = 0.0;
        for i in 0..m {
            dot += y[i] * canon.tableau[(i, j)];
        }
        canon.tableau[(m, j)] = canon.costs[j] - dot;
    }
    let mut z = 0.0;
    for i in 0..m {
        z += y[i] * canon.tableau[(i, n)];
    }
    canon.tableau[(m, n)] = z;

    log::debug!(
        "canonical form: {} rows, {} columns ({} decision, {} slack, {} artificial), M = {:.3e}",
        m,
        n,
        canon.n_decision,
        canon.n_slack,
        canon.n_artificial,
        canon.big_m
    );

    Ok(canon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Constraint;
    use approx::assert_relative_eq;

    fn settings() -> SolverSettings {
        SolverSettings::default()
    }

    fn all_le_model() -> Model {
        // max 3 x1 + 5 x2, the classic product-mix problem.
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

    #[test]
    fn test_all_le_layout() {
        let canon = canonicalize(&all_le_model(), &settings()).unwrap();
        assert_eq!(canon.n_decision, 2);
        assert_eq!(canon.n_slack, 3);
        assert_eq!(canon.n_artificial, 0);
        assert_eq!(canon.basis, vec![2, 3, 4]);
        assert_eq!(canon.names, vec!["x1", "x2", "s1", "s2", "s3"]);

        // Slack basis means y = 0, so the z-row is just the cost vector.
        let m = canon.num_rows();
        assert_relative_eq!(canon.tableau[(m, 0)], 3.0, epsilon = 1e-12);
        assert_relative_eq!(canon.tableau[(m, 1)], 5.0, epsilon = 1e-12);
        assert_relative_eq!(canon.tableau[(m, 5)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_minimize_negates_costs() {
        let model = Model::new(
            Sense::Minimize,
            vec![2.0, 3.0],
            vec![Constraint {
                coeffs: vec![1.0, 1.0],
                relation: Relation::Le,
                rhs: 10.0,
            }],
            vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
        )
        .unwrap();
        let canon = canonicalize(&model, &settings()).unwrap();
        assert_relative_eq!(canon.costs[0], -2.0, epsilon = 1e-12);
        assert_relative_eq!(canon.costs[1], -3.0, epsilon = 1e-12);
        assert_eq!(canon.sense, Sense::Minimize);
    }

    #[test]
    fn test_ge_row_gets_slack_and_artificial() {
        let model = Model::new(
            Sense::Maximize,
            vec![1.0],
            vec![Constraint {
                coeffs: vec![1.0],
                relation: Relation::Ge,
                rhs: 2.0,
            }],
            vec![SignRestriction::NonNeg],
        )
        .unwrap();
        let canon = canonicalize(&model, &settings()).unwrap();
        assert_eq!(canon.n_slack, 1);
        assert_eq!(canon.n_artificial, 1);
        // Surplus slack enters with -1 and stays nonbasic.
        assert_relative_eq!(canon.tableau[(0, 1)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(canon.tableau[(0, 2)], 1.0, epsilon = 1e-12);
        assert_eq!(canon.basis, vec![2]);
        assert!(canon.is_artificial(2));
        assert_relative_eq!(canon.costs[2], -canon.big_m, epsilon = 1e-6);
        // z-row is zero on the basic artificial column.
        assert_relative_eq!(canon.tableau[(1, 2)], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_rhs_flips_row() {
        // x1 >= -4 becomes -x1 <= 4.
        let model = Model::new(
            Sense::Maximize,
            vec![1.0],
            vec![Constraint {
                coeffs: vec![1.0],
                relation: Relation::Ge,
                rhs: -4.0,
            }],
            vec![SignRestriction::NonNeg],
        )
        .unwrap();
        let canon = canonicalize(&model, &settings()).unwrap();
        assert_eq!(canon.n_artificial, 0);
        assert_relative_eq!(canon.tableau[(0, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(canon.tableau[(0, canon.num_cols())], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_free_variable_splits() {
        let model = Model::new(
            Sense::Maximize,
            vec![1.0, 2.0],
            vec![Constraint {
                coeffs: vec![1.0, 1.0],
                relation: Relation::Le,
                rhs: 5.0,
            }],
            vec![SignRestriction::Free, SignRestriction::NonNeg],
        )
        .unwrap();
        let canon = canonicalize(&model, &settings()).unwrap();
        assert_eq!(canon.n_decision, 3);
        assert_eq!(canon.names[..3], ["x1+", "x1-", "x2"]);
        assert_relative_eq!(canon.tableau[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(canon.tableau[(0, 1)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(canon.costs[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(canon.costs[1], -1.0, epsilon = 1e-12);
        assert_eq!(
            canon.origins,
            vec![
                ColumnOrigin { var: 0, scale: 1.0 },
                ColumnOrigin { var: 0, scale: -1.0 },
                ColumnOrigin { var: 1, scale: 1.0 },
            ]
        );
    }

    #[test]
    fn test_nonpos_variable_negates() {
        let model = Model::new(
            Sense::Maximize,
            vec![-2.0],
            vec![Constraint {
                coeffs: vec![1.0],
                relation: Relation::Ge,
                rhs: -4.0,
            }],
            vec![SignRestriction::NonPos],
        )
        .unwrap();
        let canon = canonicalize(&model, &settings()).unwrap();
        assert_eq!(canon.names[0], "x1'");
        assert_relative_eq!(canon.costs[0], 2.0, epsilon = 1e-12);
        assert_eq!(canon.origins[0], ColumnOrigin { var: 0, scale: -1.0 });
    }

    #[test]
    fn test_big_m_scales_with_data() {
        let model = Model::new(
            Sense::Maximize,
            vec![250.0],
            vec![Constraint {
                coeffs: vec![1.0],
                relation: Relation::Eq,
                rhs: 3.0,
            }],
            vec![SignRestriction::NonNeg],
        )
        .unwrap();
        let canon = canonicalize(&model, &settings()).unwrap();
        assert_relative_eq!(canon.big_m, 1e6 * 250.0, epsilon = 1e-6);
    }

    #[test]
    fn test_objective_cell_matches_basis_cost() {
        // With a basic artificial, T[m, n] = y . b = -M * b.
        let model = Model::new(
            Sense::Maximize,
            vec![1.0],
            vec![Constraint {
                coeffs: vec![1.0],
                relation: Relation::Eq,
                rhs: 3.0,
            }],
            vec![SignRestriction::NonNeg],
        )
        .unwrap();
        let canon = canonicalize(&model, &settings()).unwrap();
        let m = canon.num_rows();
        let n = canon.num_cols();
        assert_relative_eq!(canon.tableau[(m, n)], -canon.big_m * 3.0, epsilon = 1e-3);
    }
}
