//! Solution types shared by the integer-programming drivers.

use crate::cuts::CutRecord;
use crate::search::NodeRecord;

/// Status of an integer-programming solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipStatus {
    /// Integer optimum found and proven within the search limits.
    Optimal,

    /// No integer-feasible point exists (or every relaxation failed).
    Infeasible,

    /// Node cap reached; the incumbent, if any, is returned.
    NodeLimit,

    /// Cutting-plane round cap reached without an integral relaxation.
    CutLimit,
}

impl MipStatus {
    /// Whether a feasible solution accompanies this status.
    pub fn has_solution(self) -> bool {
        matches!(self, MipStatus::Optimal)
    }
}

/// Result of an integer-programming solve, with the audit trail of the
/// driver that produced it.
#[derive(Debug, Clone)]
pub struct MipSolution {
    /// Solve status.
    pub status: MipStatus,

    /// Best objective in the sense of the parsed model.
    pub objective: f64,

    /// Value per original decision variable (empty when no solution).
    pub values: Vec<f64>,

    /// Visited-node table (branch-and-bound driver).
    pub nodes: Vec<NodeRecord>,

    /// Cut table (cutting-plane driver).
    pub cuts: Vec<CutRecord>,
}

impl MipSolution {
    /// A solution indicating infeasibility.
    pub fn infeasible(nodes: Vec<NodeRecord>, cuts: Vec<CutRecord>) -> Self {
        Self {
            status: MipStatus::Infeasible,
            objective: f64::NEG_INFINITY,
            values: Vec::new(),
            nodes,
            cuts,
        }
    }
}
