//! Root finding, unconstrained optimization, and linear programming.
//!
//! # Root finding
//!
//! - [`false_position`] / [`false_position_auto`]: regula falsi on a sign-change bracket
//! - [`newton_raphson`]: Newton's method with a derivative handle
//! - [`secant`]: derivative-free two-point iteration
//! - [`fixed_point`] / [`fixed_point_candidates`]: `x = g(x)` iteration, optionally over
//!   several rearrangements
//!
//! Every root finder records one row per iteration. The `error` column is the
//! relative percentage change of the new iterate against the previous row's
//! new iterate ([`relative_error_pct`](crate::relative_error_pct)); the first
//! row has no predecessor and reports `+∞`. Tolerances are in percent.
//!
//! # Optimization
//!
//! - [`gradient_method`]: steepest ascent/descent with Armijo backtracking
//! - [`critical_point`]: Newton's method on `f'` with min/max/saddle classification
//!
//! # Linear programming
//!
//! - [`linprog::simplex`]: two-phase tableau Simplex

mod fixed_point;
mod gradient;
mod line_search;
pub mod linprog;
mod root;
mod stationary;

#[cfg(test)]
mod tests;

pub use fixed_point::{
    fixed_point, fixed_point_candidates, relaxation_candidates, CandidateRun, CandidateStatus,
    FixedPointRecord, FixedPointReport, Rearrangement, RELAXATION_FACTORS,
};
pub use gradient::{gradient_method, gradient_step, GradientRecord, GradientResult, GradientSettings, GradientStatus};
pub use line_search::{backtracking_armijo, ArmijoSettings, ArmijoStep};
pub use root::{
    false_position, false_position_auto, false_position_step, newton_raphson, newton_step,
    scan_brackets, secant, secant_step, Bracket, FalsePositionRecord, NewtonRecord, RootSettings,
    SecantRecord, BRACKET_SCAN_RANGE,
};
pub use stationary::{
    critical_point, CriticalPoint, CriticalPointKind, StationaryRecord, StationarySettings,
};

use crate::expr::EvalError;
use crate::trace::Trace;

/// Errors from root finding and optimization.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimError {
    #[error("f(a) and f(b) must have opposite signs: f({a}) = {fa}, f({b}) = {fb}")]
    NoSignChange { a: f64, b: f64, fa: f64, fb: f64 },
    #[error("no sign change on any unit interval in [{lo}, {hi}]")]
    NoBracketFound { lo: i32, hi: i32 },
    #[error("invalid bracket: {a} is not below {b}")]
    InvalidBracket { a: f64, b: f64 },
    #[error("derivative is zero at x = {x} (iteration {iteration})")]
    ZeroDerivative { iteration: usize, x: f64 },
    #[error("second derivative is zero at x = {x} (iteration {iteration})")]
    ZeroSecondDerivative { iteration: usize, x: f64 },
    #[error("secant seeds must differ")]
    DegenerateSeeds,
    #[error("secant denominator f(x_k) - f(x_k-1) vanished at iteration {iteration}")]
    ZeroDenominator { iteration: usize },
    #[error("non-finite value encountered at iteration {iteration}")]
    NonFinite { iteration: usize },
    #[error("fixed-point iteration diverged at iteration {iteration}")]
    Diverged { iteration: usize },
    #[error("no fixed-point rearrangements supplied")]
    NoCandidates,
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Direction of an optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Goal {
    #[default]
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStatus {
    Converged,
    /// Iteration budget exhausted; `root` is the last iterate.
    NotConverged,
}

/// Result of a root finder.
#[derive(Debug, Clone)]
pub struct RootSolution<T, R> {
    pub root: T,
    /// `f(root)` for root finders, `g(root) - root` for fixed-point iteration.
    pub residual: T,
    pub iterations: usize,
    pub status: RootStatus,
    pub trace: Trace<R>,
}

impl<T, R> RootSolution<T, R> {
    pub fn converged(&self) -> bool {
        self.status == RootStatus::Converged
    }
}
