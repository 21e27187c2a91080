//! Parsed model representation and validation.

use crate::error::{SolverError, SolverResult};

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// Maximize the objective.
    Maximize,
    /// Minimize the objective.
    Minimize,
}

/// Constraint relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl Relation {
    /// The relation after multiplying both sides by -1.
    pub fn flipped(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }
}

/// Per-variable sign restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignRestriction {
    /// x >= 0
    NonNeg,

    /// x <= 0
    NonPos,

    /// Unrestricted in sign; split into two nonnegative pieces when
    /// canonicalising.
    Free,

    /// Integer variable. Behaves as NonNeg in the LP relaxation; the
    /// integrality restriction is the IP layer's business.
    Integer,

    /// Binary (0 or 1) variable. Behaves as NonNeg in the LP relaxation.
    Binary,
}

impl SignRestriction {
    /// Whether this restriction demands integrality from the IP layer.
    pub fn is_integer(self) -> bool {
        matches!(self, SignRestriction::Integer | SignRestriction::Binary)
    }
}

/// A single linear constraint `coeffs . x  REL  rhs`.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Coefficient per decision variable.
    pub coeffs: Vec<f64>,

    /// Comparison relation.
    pub relation: Relation,

    /// Right-hand side.
    pub rhs: f64,
}

/// A parsed linear (or integer) program.
///
/// Invariants, enforced by [`Model::validate`]: every constraint coefficient
/// vector and the sign vector have the same length as the cost vector.
#[derive(Debug, Clone)]
pub struct Model {
    /// Optimization direction.
    pub sense: Sense,

    /// Objective coefficients, one per decision variable.
    pub costs: Vec<f64>,

    /// Ordered constraint rows.
    pub constraints: Vec<Constraint>,

    /// Sign restriction per decision variable.
    pub signs: Vec<SignRestriction>,
}

impl Model {
    /// Create a model and validate its dimensions.
    pub fn new(
        sense: Sense,
        costs: Vec<f64>,
        constraints: Vec<Constraint>,
        signs: Vec<SignRestriction>,
    ) -> SolverResult<Self> {
        let model = Self {
            sense,
            costs,
            constraints,
            signs,
        };
        model.validate()?;
        Ok(model)
    }

    /// Number of decision variables.
    pub fn num_vars(&self) -> usize {
        self.costs.len()
    }

    /// Number of constraint rows.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check the dimension invariants.
    pub fn validate(&self) -> SolverResult<()> {
        let n = self.num_vars();
        if n == 0 {
            return Err(SolverError::InvalidModel(
                "model has no decision variables".into(),
            ));
        }
        if self.signs.len() != n {
            return Err(SolverError::InvalidModel(format!(
                "{} sign restrictions for {} variables",
                self.signs.len(),
                n
            )));
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if c.coeffs.len() != n {
                return Err(SolverError::InvalidModel(format!(
                    "constraint {} has {} coefficients, expected {}",
                    i + 1,
                    c.coeffs.len(),
                    n
                )));
            }
            if !c.rhs.is_finite() {
                return Err(SolverError::InvalidModel(format!(
                    "constraint {} has a non-finite right-hand side",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    /// Indices of variables with an Integer or Binary restriction.
    pub fn integer_vars(&self) -> Vec<usize> {
        self.signs
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_integer())
            .map(|(j, _)| j)
            .collect()
    }
}
