//! # numlab
//!
//! Classical numerical methods that show their work. Every solver returns, next
//! to its answer, an ordered trace of the steps it took: pivots and row
//! operations for the direct linear solvers, one record per iteration for the
//! iterative methods, one record per pivot for the Simplex method.
//!
//! ## Quick start
//!
//! ```
//! use numlab::linalg::{gauss_elimination, LinalgSettings};
//! use numlab::{Matrix, Vector};
//!
//! let a = Matrix::from_rows(&[
//!     [2.0_f64, 1.0, -1.0],
//!     [-3.0, -1.0, 2.0],
//!     [-2.0, 1.0, 2.0],
//! ]);
//! let b = Vector::from_slice(&[8.0, -11.0, -3.0]);
//! let sol = gauss_elimination(&a.augment(&b).unwrap(), &LinalgSettings::default()).unwrap();
//! assert!((sol.x[0] - 2.0).abs() < 1e-12);
//! assert!((sol.x[1] - 3.0).abs() < 1e-12);
//! assert!((sol.x[2] + 1.0).abs() < 1e-12);
//! assert!(!sol.trace.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: heap-allocated row-major `Matrix<T>` and `Vector<T>`.
//! - [`linalg`]: Gauss, Gauss-Jordan, LU (`PA = LU`), Cholesky, Jacobi and
//!   Gauss-Seidel.
//! - [`optim`]: false position, Newton-Raphson, secant and fixed-point root
//!   finding; gradient ascent/descent with Armijo backtracking; Newton's
//!   method for critical points; two-phase Simplex in [`optim::linprog`].
//!   Requires the `optim` feature.
//! - [`interp`]: Lagrange and Newton divided-difference interpolation,
//!   polynomial algebra, least-squares line fit.
//! - [`ode`]: Euler, Heun and midpoint integrators. Requires the `ode` feature.
//! - [`precision`]: error measures and toy floating-point systems.
//! - [`expr`]: the interface to an external expression engine, and the
//!   function-handle traits every algorithm consumes. Plain closures
//!   implement them directly.
//! - [`trace`]: the step-record container returned by every solver.
//!
//! ## Errors
//!
//! Each module has its own error enum; all of them convert into [`Error`].
//! Running out of iterations is not an error. Iterative methods report it
//! through a status field of their `Ok` result.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: `warn` for
//! advisory conditions, `debug` for per-solve summaries, `trace` for
//! individual steps. The library installs no logger.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | `std` support in `num-traits`, `thiserror` and `log` |
//! | `optim` | yes     | Root finding, optimization, linear programming |
//! | `ode`   | yes     | ODE integrators |
//! | `all`   | no      | All features |
//!
//! Without `std` the crate is `no_std` and needs `alloc`; float math falls back
//! to `libm`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
pub mod expr;
pub mod interp;
pub mod linalg;
pub mod matrix;
#[cfg(feature = "ode")]
pub mod ode;
#[cfg(feature = "optim")]
pub mod optim;
pub mod precision;
pub mod trace;
pub mod traits;

pub use error::{Error, Result};
pub use matrix::{Matrix, Vector};
pub use trace::Trace;
pub use traits::{relative_error_pct, FloatScalar, Scalar};
