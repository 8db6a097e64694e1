//! Linear programming by the two-phase tableau Simplex method.
//!
//! ```
//! use numlab::optim::linprog::{simplex, ConstraintKind::*, LinearProgram, LpStatus, SimplexSettings};
//!
//! // maximize 3x₁ + 5x₂
//! let lp = LinearProgram::maximize([3.0, 5.0])
//!     .subject_to([2.0, 3.0], LessEq, 8.0)
//!     .subject_to([2.0, 1.0], LessEq, 4.0)
//!     .subject_to([1.0, 2.0], LessEq, 5.0);
//! let sol = simplex(&lp, &SimplexSettings::default()).unwrap();
//! assert_eq!(sol.status, LpStatus::Optimal);
//! assert!((sol.objective - 13.0).abs() < 1e-9);
//! assert!((sol.x[0] - 1.0).abs() < 1e-9 && (sol.x[1] - 2.0).abs() < 1e-9);
//! ```

mod simplex;
mod tableau;

pub use simplex::{simplex, Phase, PivotRecord, SimplexSolution};
pub use tableau::Tableau;

use alloc::vec::Vec;

use num_traits::Float;

use super::Goal;

/// Structural problems with a linear program, detected before any pivot.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LpError {
    #[error("objective has no variables")]
    EmptyObjective,
    #[error("constraint {constraint} has {got} coefficients, expected {expected}")]
    DimensionMismatch {
        constraint: usize,
        expected: usize,
        got: usize,
    },
    #[error("problem data contains NaN or infinite values")]
    NonFinite,
}

/// Terminal state of a Simplex run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    MaxIterationsExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    LessEq,
    Equal,
    GreaterEq,
}

impl ConstraintKind {
    fn flipped(self) -> Self {
        match self {
            Self::LessEq => Self::GreaterEq,
            Self::Equal => Self::Equal,
            Self::GreaterEq => Self::LessEq,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub coefficients: Vec<f64>,
    pub kind: ConstraintKind,
    pub rhs: f64,
}

impl Constraint {
    /// Multiply by −1 if needed so the right-hand side is non-negative.
    pub fn normalized(&self) -> Self {
        if self.rhs < 0.0 {
            Self {
                coefficients: self.coefficients.iter().map(|&a| -a).collect(),
                kind: self.kind.flipped(),
                rhs: -self.rhs,
            }
        } else {
            self.clone()
        }
    }
}

/// Optimize `c·x` subject to linear constraints and `x ≥ 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    pub objective: Vec<f64>,
    pub goal: Goal,
    pub constraints: Vec<Constraint>,
}

impl LinearProgram {
    pub fn maximize(c: impl Into<Vec<f64>>) -> Self {
        Self {
            objective: c.into(),
            goal: Goal::Maximize,
            constraints: Vec::new(),
        }
    }

    pub fn minimize(c: impl Into<Vec<f64>>) -> Self {
        Self {
            objective: c.into(),
            goal: Goal::Minimize,
            constraints: Vec::new(),
        }
    }

    pub fn subject_to(mut self, coefficients: impl Into<Vec<f64>>, kind: ConstraintKind, rhs: f64) -> Self {
        self.constraints.push(Constraint {
            coefficients: coefficients.into(),
            kind,
            rhs,
        });
        self
    }

    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    pub fn validate(&self) -> Result<(), LpError> {
        let n = self.num_vars();
        if n == 0 {
            return Err(LpError::EmptyObjective);
        }
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err(LpError::NonFinite);
        }
        for (i, row) in self.constraints.iter().enumerate() {
            if row.coefficients.len() != n {
                return Err(LpError::DimensionMismatch {
                    constraint: i,
                    expected: n,
                    got: row.coefficients.len(),
                });
            }
            if !row.rhs.is_finite() || row.coefficients.iter().any(|a| !a.is_finite()) {
                return Err(LpError::NonFinite);
            }
        }
        Ok(())
    }

    /// `true` when `x ≥ 0` satisfies every constraint within `tol`.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        x.len() == self.num_vars()
            && x.iter().all(|&v| v >= -tol)
            && self.constraints.iter().all(|c| {
                let lhs: f64 = c.coefficients.iter().zip(x).map(|(a, v)| a * v).sum();
                match c.kind {
                    ConstraintKind::LessEq => lhs <= c.rhs + tol,
                    ConstraintKind::Equal => Float::abs(lhs - c.rhs) <= tol,
                    ConstraintKind::GreaterEq => lhs >= c.rhs - tol,
                }
            })
    }

    pub fn objective_at(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }
}

/// Settings for [`simplex`].
#[derive(Debug, Clone, Copy)]
pub struct SimplexSettings {
    /// Pivot budget shared by both phases.
    pub max_iter: usize,
    /// Reduced costs above `-eps` count as non-negative; ratio-test entries
    /// must exceed `eps`.
    pub eps: f64,
}

impl Default for SimplexSettings {
    fn default() -> Self {
        Self {
            max_iter: 100,
            eps: 1e-9,
        }
    }
}
