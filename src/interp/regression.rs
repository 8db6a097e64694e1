use crate::traits::FloatScalar;

use super::polynomial::Polynomial;
use super::{validate_data, InterpError};

/// Least-squares line `y = intercept + slope·x`, with the sums it was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit<T> {
    pub intercept: T,
    pub slope: T,
    pub n: usize,
    pub sum_x: T,
    pub sum_y: T,
    pub sum_xy: T,
    pub sum_x2: T,
}

impl<T: FloatScalar> LinearFit<T> {
    pub fn eval(&self, x: T) -> T {
        self.intercept + self.slope * x
    }

    pub fn to_polynomial(&self) -> Polynomial<T> {
        Polynomial::new(alloc::vec![self.intercept, self.slope])
    }
}

/// Fit a straight line by least squares.
///
/// `b₁ = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)`, `b₀ = (Σy − b₁Σx) / n`.
///
/// # Errors
///
/// - [`InterpError::TooFewPoints`] below two points
/// - [`InterpError::DegenerateAbscissas`] when all `xs` are equal
///
/// ```
/// use numlab::interp::fit_linear;
///
/// let fit = fit_linear(&[1.0_f64, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// ```
pub fn fit_linear<T: FloatScalar>(xs: &[T], ys: &[T]) -> Result<LinearFit<T>, InterpError> {
    validate_data(xs, ys, 2)?;
    let n = T::lit(xs.len() as f64);
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (T::zero(), T::zero(), T::zero(), T::zero());
    for (&x, &y) in xs.iter().zip(ys) {
        sum_x = sum_x + x;
        sum_y = sum_y + y;
        sum_xy = sum_xy + x * y;
        sum_x2 = sum_x2 + x * x;
    }

    // The denominator is n² times the variance of xs.
    let denom = n * sum_x2 - sum_x * sum_x;
    if denom <= T::lit(64.0) * T::epsilon() * n * sum_x2 {
        return Err(InterpError::DegenerateAbscissas);
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;

    Ok(LinearFit {
        intercept,
        slope,
        n: xs.len(),
        sum_x,
        sum_y,
        sum_xy,
        sum_x2,
    })
}
