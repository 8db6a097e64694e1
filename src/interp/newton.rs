use alloc::vec::Vec;
use core::fmt;

use crate::traits::FloatScalar;

use super::polynomial::{write_magnitude, write_sign, Polynomial, DEGREE_TOL};
use super::{validate_nodes, InterpError};

/// Newton-form interpolating polynomial
/// `a₀ + a₁(x − x₀) + a₂(x − x₀)(x − x₁) + …`.
#[derive(Debug, Clone)]
pub struct NewtonPolynomial<T> {
    xs: Vec<T>,
    /// `table[i][j]` is the divided difference `f[xᵢ, …, xᵢ₊ⱼ]`; row `i` has
    /// `n − i` entries.
    table: Vec<Vec<T>>,
}

impl<T: FloatScalar> NewtonPolynomial<T> {
    /// Divided-difference table, one row per node.
    pub fn table(&self) -> &[Vec<T>] {
        &self.table
    }

    /// Newton coefficients `aⱼ = f[x₀, …, xⱼ]`, the first row of the table.
    pub fn coefficients(&self) -> &[T] {
        &self.table[0]
    }

    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Nested multiplication without expanding to standard form.
    pub fn eval(&self, x: T) -> T {
        let a = self.coefficients();
        let n = a.len();
        (0..n - 1)
            .rev()
            .fold(a[n - 1], |acc, k| acc * (x - self.xs[k]) + a[k])
    }

    /// Expand to standard-form coefficients.
    pub fn to_standard(&self) -> Polynomial<T> {
        let mut result = Polynomial::zero();
        let mut product = Polynomial::constant(T::one());
        for (k, &a) in self.coefficients().iter().enumerate() {
            result = &result + &(&product * a);
            product = &product * &Polynomial::linear_factor(self.xs[k]);
        }
        result
    }
}

/// Build the Newton divided-difference interpolant through `(xs[i], ys[i])`.
///
/// `table[i][0] = yᵢ` and
/// `table[i][j] = (table[i+1][j−1] − table[i][j−1]) / (xᵢ₊ⱼ − xᵢ)`.
///
/// # Errors
///
/// Same input validation as [`lagrange`](super::lagrange).
///
/// ```
/// use numlab::interp::newton_divided;
///
/// let p = newton_divided(&[1.0_f64, 2.0, 4.0], &[1.0, 4.0, 16.0]).unwrap();
/// assert_eq!(p.coefficients(), &[1.0, 3.0, 1.0]);
/// assert_eq!(format!("{p}"), "1 + 3(x - 1) + (x - 1)(x - 2)");
/// ```
pub fn newton_divided<T: FloatScalar>(xs: &[T], ys: &[T]) -> Result<NewtonPolynomial<T>, InterpError> {
    validate_nodes(xs, ys)?;
    let n = xs.len();

    let mut table: Vec<Vec<T>> = ys.iter().map(|&y| alloc::vec![y]).collect();
    for j in 1..n {
        for i in 0..n - j {
            let d = (table[i + 1][j - 1] - table[i][j - 1]) / (xs[i + j] - xs[i]);
            table[i].push(d);
        }
    }

    Ok(NewtonPolynomial {
        xs: xs.to_vec(),
        table,
    })
}

impl<T: FloatScalar> fmt::Display for NewtonPolynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tol = T::lit(DEGREE_TOL);
        let mut first = true;
        for (k, &a) in self.coefficients().iter().enumerate() {
            if a.abs() <= tol {
                continue;
            }
            write_sign(f, a, first)?;
            first = false;
            if k == 0 || a.abs() != T::one() {
                write_magnitude(f, a)?;
            }
            for &xj in &self.xs[..k] {
                if xj == T::zero() {
                    f.write_str("x")?;
                } else {
                    f.write_str(if xj < T::zero() { "(x + " } else { "(x - " })?;
                    write_magnitude(f, xj)?;
                    f.write_str(")")?;
                }
            }
        }
        if first {
            f.write_str("0")?;
        }
        Ok(())
    }
}
