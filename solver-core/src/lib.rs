//! Primal simplex engine for linear programs.
//!
//! The pipeline: a parsed [`Model`] is translated by
//! [`canonical::canonicalize`] into a standard-form maximisation tableau
//! with explicit slack/artificial columns and a Big-M reduced-cost row;
//! the tableau or revised engine pivots it to optimality under Bland's
//! rule, emitting an auditable [`SolveLog`]; [`sensitivity::analyze`]
//! computes shadow prices and one-at-a-time ranging from the final basis.
//!
//! Sign restrictions, relations and solve statuses are closed enums;
//! numeric comparisons go through the three centralised tolerances
//! [`EPS_REDCOST`], [`EPS_PIVOT`] and [`EPS_FEAS`].
//!
//! # Example
//!
//! ```
//! use solver_core::{
//!     canonicalize, solve_tableau, Constraint, Model, Relation, Sense,
//!     SignRestriction, SolverSettings,
//! };
//!
//! // max 3 x1 + 5 x2  s.t.  x1 <= 4, 2 x2 <= 12, 3 x1 + 2 x2 <= 18
//! let model = Model::new(
//!     Sense::Maximize,
//!     vec![3.0, 5.0],
//!     vec![
//!         Constraint { coeffs: vec![1.0, 0.0], relation: Relation::Le, rhs: 4.0 },
//!         Constraint { coeffs: vec![0.0, 2.0], relation: Relation::Le, rhs: 12.0 },
//!         Constraint { coeffs: vec![3.0, 2.0], relation: Relation::Le, rhs: 18.0 },
//!     ],
//!     vec![SignRestriction::NonNeg, SignRestriction::NonNeg],
//! )?;
//!
//! let settings = SolverSettings::default();
//! let canon = canonicalize(&model, &settings)?;
//! let log = solve_tableau(&canon, &settings)?;
//! let solution = log.final_solution();
//! assert!((solution.objective - 36.0).abs() < 1e-6);
//! # Ok::<(), solver_core::SolverError>(())
//! ```

pub mod canonical;
pub mod error;
pub mod linalg;
pub mod model;
pub mod sensitivity;
pub mod settings;
pub mod simplex;
pub mod solve_log;

pub use canonical::{canonicalize, CanonicalModel, ColumnOrigin};
pub use error::{SolverError, SolverResult};
pub use model::{Constraint, Model, Relation, Sense, SignRestriction};
pub use sensitivity::{analyze, CostRange, Range, RhsRange, SensitivityReport};
pub use settings::{SolverSettings, EPS_FEAS, EPS_PIVOT, EPS_REDCOST};
pub use simplex::{solve_revised, solve_tableau};
pub use solve_log::{LpStatus, PriceOut, ProductForm, RevisedEntry, Solution, SolveLog};
