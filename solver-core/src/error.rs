//! Error types for the LP solver.

use thiserror::Error;

use crate::solve_log::SolveLog;

/// Errors that can occur while building or solving a linear program.
///
/// The three terminal simplex outcomes (`Unbounded`, `Infeasible`,
/// `IterationLimit`) carry the solve log accumulated up to the failure so
/// callers can render or audit the partial run.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Model validation failed
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Basis matrix could not be inverted
    #[error("Singular basis matrix")]
    SingularBasis,

    /// No eligible leaving row for the chosen entering column
    #[error("Problem is unbounded")]
    Unbounded(Box<SolveLog>),

    /// An artificial variable remains basic at a positive value
    #[error("Problem is infeasible")]
    Infeasible(Box<SolveLog>),

    /// Safety cap on simplex iterations tripped
    #[error("Iteration limit reached")]
    IterationLimit(Box<SolveLog>),
}

impl SolverError {
    /// The partial solve log attached to a terminal simplex failure.
    pub fn log(&self) -> Option<&SolveLog> {
        match self {
            SolverError::Unbounded(log)
            | SolverError::Infeasible(log)
            | SolverError::IterationLimit(log) => Some(log),
            _ => None,
        }
    }
}

/// Result type for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;
