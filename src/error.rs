//! Crate-wide error type.

use crate::expr::EvalError;
use crate::interp::InterpError;
use crate::linalg::LinalgError;
use crate::matrix::ShapeError;
use crate::precision::PrecisionError;

/// Result alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Any error produced by this crate.
///
/// Every module-level error converts into it, so `?` works across algorithm
/// families.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Linalg(#[from] LinalgError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[cfg(feature = "optim")]
    #[error(transparent)]
    Optim(#[from] crate::optim::OptimError),

    #[cfg(feature = "optim")]
    #[error(transparent)]
    LinearProgram(#[from] crate::optim::linprog::LpError),

    #[error(transparent)]
    Interp(#[from] InterpError),

    #[cfg(feature = "ode")]
    #[error(transparent)]
    Ode(#[from] crate::ode::OdeError),

    #[error(transparent)]
    Precision(#[from] PrecisionError),
}
