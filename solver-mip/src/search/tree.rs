//! Depth-first branch-and-bound driver.
//!
//! Every node rebuilds the canonical form of the augmented model from
//! scratch and solves the full LP relaxation; there is no dual warm start,
//! so total work is bounded by the node cap times one Big-M solve.

use solver_core::{
    canonicalize, solve_tableau, Constraint, Model, Relation, Sense, SolverError, EPS_REDCOST,
};

use crate::error::{MipError, MipResult};
use crate::settings::MipSettings;
use crate::solution::{MipSolution, MipStatus};

use super::{BranchConstraint, NodeRecord, NodeStatus};

/// Branch-and-bound over LP relaxations.
pub struct BranchAndBound {
    settings: MipSettings,
    nodes: Vec<NodeRecord>,

    /// Incumbent objective in the internal maximise convention.
    best_obj: f64,
    best_values: Option<Vec<f64>>,
    hit_node_cap: bool,
}

impl BranchAndBound {
    /// Create a driver with the given settings.
    pub fn new(settings: MipSettings) -> Self {
        Self {
            settings,
            nodes: Vec::new(),
            best_obj: f64::NEG_INFINITY,
            best_values: None,
            hit_node_cap: false,
        }
    }

    /// Solve an integer program by depth-first search.
    pub fn solve(mut self, model: &Model) -> MipResult<MipSolution> {
        model
            .validate()
            .map_err(|e| MipError::InvalidProblem(e.to_string()))?;
        let integer_vars = model.integer_vars();
        if integer_vars.is_empty() {
            return Err(MipError::InvalidProblem(
                "no integer-restricted variables to branch on".into(),
            ));
        }

        // Binary variables carry a permanent upper-bound row so that up
        // branches above 1 come out infeasible rather than unexplored.
        let mut base = model.clone();
        for (j, sign) in model.signs.iter().enumerate() {
            if matches!(sign, solver_core::SignRestriction::Binary) {
                let mut coeffs = vec![0.0; model.num_vars()];
                coeffs[j] = 1.0;
                base.constraints.push(Constraint {
                    coeffs,
                    relation: Relation::Le,
                    rhs: 1.0,
                });
            }
        }

        self.explore(&base, &integer_vars, &[], 0)?;

        let status = if self.hit_node_cap {
            MipStatus::NodeLimit
        } else if self.best_values.is_none() {
            MipStatus::Infeasible
        } else {
            MipStatus::Optimal
        };
        let objective = match (self.best_values.as_ref(), model.sense) {
            (None, _) => f64::NEG_INFINITY,
            (Some(_), Sense::Maximize) => self.best_obj,
            (Some(_), Sense::Minimize) => -self.best_obj,
        };

        Ok(MipSolution {
            status,
            objective,
            values: self.best_values.unwrap_or_default(),
            nodes: self.nodes,
            cuts: Vec::new(),
        })
    }

    fn explore(
        &mut self,
        base: &Model,
        integer_vars: &[usize],
        branches: &[BranchConstraint],
        depth: usize,
    ) -> MipResult<()> {
        if self.nodes.len() >= self.settings.max_nodes {
            self.hit_node_cap = true;
            return Ok(());
        }
        let id = self.nodes.len();

        // Rebuild the augmented model for this node from scratch.
        let mut model = base.clone();
        for bc in branches {
            model.constraints.push(bc.as_constraint(base.num_vars()));
        }
        let canon = canonicalize(&model, &self.settings.lp_settings)?;
        let log = match solve_tableau(&canon, &self.settings.lp_settings) {
            Ok(log) => log,
            Err(SolverError::Infeasible(_)) | Err(SolverError::Unbounded(_)) => {
                self.nodes.push(NodeRecord {
                    id,
                    depth,
                    branches: branches.to_vec(),
                    status: NodeStatus::Infeasible,
                    objective: None,
                });
                return Ok(());
            }
            Err(e) => return Err(MipError::Relaxation(e)),
        };

        let obj = log.objective;
        let reported = log.reported_objective();

        if obj < self.best_obj - EPS_REDCOST {
            self.nodes.push(NodeRecord {
                id,
                depth,
                branches: branches.to_vec(),
                status: NodeStatus::FathomedByBound,
                objective: Some(reported),
            });
            return Ok(());
        }

        let solution = log.final_solution();
        let branch_var = self.most_fractional(&solution.values, integer_vars);

        match branch_var {
            None => {
                self.nodes.push(NodeRecord {
                    id,
                    depth,
                    branches: branches.to_vec(),
                    status: NodeStatus::Integral,
                    objective: Some(reported),
                });
                if obj > self.best_obj + EPS_REDCOST {
                    let mut values = solution.values;
                    for &j in integer_vars {
                        values[j] = values[j].round();
                    }
                    self.best_obj = obj;
                    self.best_values = Some(values);
                    if self.settings.verbose {
                        log::info!("node {}: new incumbent, objective {:.6}", id, reported);
                    }
                }
                Ok(())
            }
            Some((var, value)) => {
                self.nodes.push(NodeRecord {
                    id,
                    depth,
                    branches: branches.to_vec(),
                    status: NodeStatus::Branched,
                    objective: Some(reported),
                });
                if self.settings.verbose {
                    log::info!(
                        "node {}: branching on x{} = {:.6} at depth {}",
                        id,
                        var + 1,
                        value,
                        depth
                    );
                }

                let mut down = branches.to_vec();
                down.push(BranchConstraint::down(var, value));
                self.explore(base, integer_vars, &down, depth + 1)?;

                let mut up = branches.to_vec();
                up.push(BranchConstraint::up(var, value));
                self.explore(base, integer_vars, &up, depth + 1)
            }
        }
    }

    /// The integer-restricted variable farthest from an integer value, if
    /// any exceeds the integrality tolerance.
    fn most_fractional(&self, values: &[f64], integer_vars: &[usize]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        let mut best_frac = self.settings.int_feas_tol;
        for &j in integer_vars {
            let value = values[j];
            let frac = (value - value.round()).abs();
            if frac > best_frac {
                best_frac = frac;
                best = Some((j, value));
            }
        }
        best
    }
}
