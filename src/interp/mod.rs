//! Polynomial interpolation and least-squares line fitting.
//!
//! - [`lagrange`]: standard-form polynomial `Σ yᵢ·Lᵢ(x)` built from the
//!   Lagrange basis polynomials
//! - [`newton_divided`]: Newton form from a divided-difference table,
//!   evaluated by nested multiplication
//! - [`fit_linear`]: least-squares line `y = b₀ + b₁x`
//!
//! Both interpolants need at least two points with pairwise-distinct
//! abscissas, in any order. Through `n` points they produce the same
//! polynomial of degree at most `n − 1`.
//!
//! # Examples
//!
//! ```
//! use numlab::interp::{lagrange, newton_divided};
//!
//! let xs = [0.0_f64, 1.0, 2.0];
//! let ys = [1.0, 3.0, 7.0]; // 1 + x + x²
//! let l = lagrange(&xs, &ys).unwrap();
//! let n = newton_divided(&xs, &ys).unwrap();
//! assert!((l.eval(1.5) - 4.75).abs() < 1e-12);
//! assert!((n.eval(1.5) - 4.75).abs() < 1e-12);
//! assert_eq!(format!("{}", l.polynomial()), "1 + x + x^2");
//! ```

mod lagrange;
mod newton;
mod polynomial;
mod regression;


pub use lagrange::{lagrange, LagrangeInterpolant};
pub use newton::{newton_divided, NewtonPolynomial};
pub use polynomial::{Polynomial, DEGREE_TOL};
pub use regression::{fit_linear, LinearFit};

use crate::traits::FloatScalar;

/// Errors from interpolant construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InterpError {
    #[error("need at least {needed} data points, got {got}")]
    TooFewPoints { needed: usize, got: usize },
    #[error("xs has {xs} values but ys has {ys}")]
    LengthMismatch { xs: usize, ys: usize },
    #[error("abscissas {first} and {second} coincide")]
    DuplicateAbscissas { first: usize, second: usize },
    #[error("data contains NaN or infinite values")]
    NonFinite,
    #[error("abscissas do not vary; the fit is undetermined")]
    DegenerateAbscissas,
}

/// Length, count and finiteness checks shared by every constructor.
fn validate_data<T: FloatScalar>(xs: &[T], ys: &[T], needed: usize) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.len() < needed {
        return Err(InterpError::TooFewPoints {
            needed,
            got: xs.len(),
        });
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(InterpError::NonFinite);
    }
    Ok(())
}

/// [`validate_data`] plus pairwise-distinct abscissas.
fn validate_nodes<T: FloatScalar>(xs: &[T], ys: &[T]) -> Result<(), InterpError> {
    validate_data(xs, ys, 2)?;
    for i in 0..xs.len() {
        for j in i + 1..xs.len() {
            if xs[i] == xs[j] {
                return Err(InterpError::DuplicateAbscissas {
                    first: i,
                    second: j,
                });
            }
        }
    }
    Ok(())
}
