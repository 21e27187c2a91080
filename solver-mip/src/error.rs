//! Error types for the integer-programming layer.

use solver_core::SolverError;
use thiserror::Error;

/// Errors that can occur during an integer-programming solve.
///
/// LP-level `Infeasible`/`Unbounded` failures are caught inside the drivers
/// and turned into pruned nodes; only genuinely fatal conditions surface
/// here.
#[derive(Error, Debug)]
pub enum MipError {
    /// Problem validation failed
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// Model shape does not fit the requested driver
    #[error("Unsupported model: {0}")]
    Domain(String),

    /// A relaxation solve failed for a non-prunable reason
    #[error("Relaxation solve failed: {0}")]
    Relaxation(#[from] SolverError),
}

/// Result type for MIP operations.
pub type MipResult<T> = Result<T, MipError>;
