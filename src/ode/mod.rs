//! Fixed-step initial-value solvers for `dy/dx = f(x, y)`.
//!
//! All solvers implement the [`FixedStep`] trait, whose
//! [`integrate`](FixedStep::integrate) method walks from `x0` to `x_final`
//! with step `h`, shortening the last step so it lands exactly on `x_final`.
//!
//! | Solver       | Stages | Order | Update                                        |
//! |--------------|--------|-------|-----------------------------------------------|
//! | [`Euler`]    |      1 | 1     | `y + h·f(x, y)`                               |
//! | [`Heun`]     |      2 | 2     | `y + h/2·(f(x, y) + f(x + h, y*))`            |
//! | [`Midpoint`] |      2 | 2     | `y + h·f(x + h/2, y + h/2·k₁)`                |
//!
//! # Example
//!
//! ```
//! use numlab::ode::{FixedStep, Heun, OdeSettings};
//!
//! // dy/dx = x + y, y(0) = 1; exact solution 2eˣ − x − 1
//! let sol = Heun::integrate(|x: f64, y: f64| x + y, 0.0, 1.0, 0.1, 1.0, &OdeSettings::default())
//!     .unwrap();
//! let exact = 2.0 * 1.0_f64.exp() - 2.0;
//! assert_eq!(sol.x, 1.0);
//! assert!((sol.y - exact).abs() < 1e-2);
//! ```

mod euler;
mod fixed;
mod heun;
mod midpoint;

#[cfg(test)]
mod tests;

pub use euler::Euler;
pub use fixed::FixedStep;
pub use heun::Heun;
pub use midpoint::Midpoint;

use alloc::vec::Vec;

use crate::expr::{BivariateFn, EvalError};
use crate::trace::Trace;
use crate::traits::FloatScalar;

/// Errors from ODE integration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OdeError {
    #[error("step size must be positive and finite, got {h}")]
    InvalidStep { h: f64 },
    #[error("x_final ({x_final}) must exceed x0 ({x0})")]
    InvalidInterval { x0: f64, x_final: f64 },
    #[error("solution became non-finite at step {step}")]
    NonFinite { step: usize },
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Settings shared by the fixed-step solvers.
#[derive(Debug, Clone, Copy)]
pub struct OdeSettings {
    /// Hard cap on the number of steps.
    pub max_steps: usize,
}

impl Default for OdeSettings {
    fn default() -> Self {
        Self { max_steps: 10_000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdeStatus {
    /// Reached `x_final`.
    Completed,
    /// Stopped at `max_steps` before reaching `x_final`.
    StepLimitReached,
}

/// One step from `(x, y)` to `(x_next, y_next)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord<T> {
    /// 1-based step number.
    pub step: usize,
    pub x: T,
    pub y: T,
    pub h: T,
    /// `f(x, y)`
    pub k1: T,
    /// Second slope (Heun: at the predictor, Midpoint: at the midpoint).
    pub k2: Option<T>,
    /// Heun predictor `y*`.
    pub predictor: Option<T>,
    pub x_next: T,
    pub y_next: T,
}

#[derive(Debug, Clone)]
pub struct OdeSolution<T> {
    pub x0: T,
    pub y0: T,
    /// Last abscissa reached.
    pub x: T,
    /// Approximation at `x`.
    pub y: T,
    pub steps: usize,
    /// Calls to `f`.
    pub evals: usize,
    pub status: OdeStatus,
    pub trace: Trace<StepRecord<T>>,
}

impl<T: FloatScalar> OdeSolution<T> {
    /// `(xᵢ, yᵢ)` from the initial condition to the last step.
    pub fn points(&self) -> Vec<(T, T)> {
        core::iter::once((self.x0, self.y0))
            .chain(self.trace.iter().map(|r| (r.x_next, r.y_next)))
            .collect()
    }

    pub fn completed(&self) -> bool {
        self.status == OdeStatus::Completed
    }
}

/// Runtime choice of solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Euler,
    Heun,
    Midpoint,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Euler, Method::Heun, Method::Midpoint];

    pub fn name(self) -> &'static str {
        match self {
            Method::Euler => Euler::NAME,
            Method::Heun => Heun::NAME,
            Method::Midpoint => Midpoint::NAME,
        }
    }

    pub fn integrate<T: FloatScalar>(
        self,
        f: impl BivariateFn<T>,
        x0: T,
        y0: T,
        h: T,
        x_final: T,
        settings: &OdeSettings,
    ) -> Result<OdeSolution<T>, OdeError> {
        match self {
            Method::Euler => Euler::integrate(f, x0, y0, h, x_final, settings),
            Method::Heun => Heun::integrate(f, x0, y0, h, x_final, settings),
            Method::Midpoint => Midpoint::integrate(f, x0, y0, h, x_final, settings),
        }
    }
}
