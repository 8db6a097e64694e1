use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{Add, Mul};

use crate::traits::FloatScalar;

/// Coefficients at or below this magnitude do not count toward the degree
/// and are omitted from the printed form.
pub const DEGREE_TOL: f64 = 1e-12;

/// Polynomial in standard form, coefficients lowest power first.
///
/// ```
/// use numlab::interp::Polynomial;
///
/// let p = Polynomial::new(vec![1.5, 2.0, 0.0, -1.0]);
/// assert_eq!(p.degree(), 3);
/// assert_eq!(p.eval(2.0), -2.5);
/// assert_eq!(format!("{p}"), "1.5 + 2x - x^3");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<T> {
    coeffs: Vec<T>,
}

impl<T: FloatScalar> Polynomial<T> {
    /// An empty coefficient list is the zero polynomial.
    pub fn new(coeffs: Vec<T>) -> Self {
        if coeffs.is_empty() {
            return Self::zero();
        }
        Self { coeffs }
    }

    pub fn zero() -> Self {
        Self {
            coeffs: vec![T::zero()],
        }
    }

    pub fn constant(c: T) -> Self {
        Self { coeffs: vec![c] }
    }

    /// `x − r`
    pub fn linear_factor(r: T) -> Self {
        Self {
            coeffs: vec![-r, T::one()],
        }
    }

    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    pub fn into_coeffs(self) -> Vec<T> {
        self.coeffs
    }

    /// Coefficient of `x^k`, zero beyond the stored length.
    pub fn coeff(&self, k: usize) -> T {
        self.coeffs.get(k).copied().unwrap_or_else(T::zero)
    }

    /// Highest power whose coefficient exceeds [`DEGREE_TOL`]; 0 for the
    /// zero polynomial.
    pub fn degree(&self) -> usize {
        let tol = T::lit(DEGREE_TOL);
        self.coeffs
            .iter()
            .rposition(|c| c.abs() > tol)
            .unwrap_or(0)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: T) -> T {
        self.coeffs
            .iter()
            .rev()
            .fold(T::zero(), |acc, &c| acc * x + c)
    }

    pub fn derivative(&self) -> Self {
        let coeffs: Vec<T> = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, &c)| c * T::lit(k as f64))
            .collect();
        Self::new(coeffs)
    }

    /// Drop trailing coefficients at or below [`DEGREE_TOL`].
    pub fn trimmed(&self) -> Self {
        Self {
            coeffs: self.coeffs[..=self.degree()].to_vec(),
        }
    }
}

impl<T: FloatScalar> Add for &Polynomial<T> {
    type Output = Polynomial<T>;

    /// Component-wise sum; the shorter operand is zero-padded.
    fn add(self, rhs: Self) -> Polynomial<T> {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..len).map(|k| self.coeff(k) + rhs.coeff(k)).collect();
        Polynomial { coeffs }
    }
}

impl<T: FloatScalar> Mul for &Polynomial<T> {
    type Output = Polynomial<T>;

    /// Coefficient convolution.
    fn mul(self, rhs: Self) -> Polynomial<T> {
        let mut coeffs = vec![T::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] = coeffs[i + j] + a * b;
            }
        }
        Polynomial { coeffs }
    }
}

impl<T: FloatScalar> Mul<T> for &Polynomial<T> {
    type Output = Polynomial<T>;

    fn mul(self, rhs: T) -> Polynomial<T> {
        Polynomial {
            coeffs: self.coeffs.iter().map(|&c| c * rhs).collect(),
        }
    }
}

/// Writes `|c|` honoring the formatter's precision.
pub(super) fn write_magnitude<T: FloatScalar>(f: &mut fmt::Formatter<'_>, c: T) -> fmt::Result {
    match f.precision() {
        Some(p) => write!(f, "{:.*}", p, c.abs()),
        None => write!(f, "{}", c.abs()),
    }
}

/// Writes the sign joining a term: leading `-` for the first term,
/// ` + ` or ` - ` afterwards.
pub(super) fn write_sign<T: FloatScalar>(f: &mut fmt::Formatter<'_>, c: T, first: bool) -> fmt::Result {
    match (first, c < T::zero()) {
        (true, true) => f.write_str("-"),
        (true, false) => Ok(()),
        (false, true) => f.write_str(" - "),
        (false, false) => f.write_str(" + "),
    }
}

impl<T: FloatScalar> fmt::Display for Polynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tol = T::lit(DEGREE_TOL);
        let mut first = true;
        for (k, &c) in self.coeffs.iter().enumerate() {
            if c.abs() <= tol {
                continue;
            }
            write_sign(f, c, first)?;
            first = false;
            if k == 0 || c.abs() != T::one() {
                write_magnitude(f, c)?;
            }
            match k {
                0 => {}
                1 => f.write_str("x")?,
                _ => write!(f, "x^{k}")?,
            }
        }
        if first {
            f.write_str("0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn add_pads_shorter_operand() {
        let a = Polynomial::new(vec![1.0, 2.0]);
        let b = Polynomial::new(vec![0.5, 0.0, 3.0]);
        assert_eq!((&a + &b).coeffs(), &[1.5, 2.0, 3.0]);
    }

    #[test]
    fn mul_convolves() {
        // (x - 1)(x + 1) = x² - 1
        let p = &Polynomial::linear_factor(1.0) * &Polynomial::linear_factor(-1.0);
        assert_eq!(p.coeffs(), &[-1.0, 0.0, 1.0]);
        assert_eq!((&p * 2.0).coeffs(), &[-2.0, 0.0, 2.0]);
    }

    #[test]
    fn degree_ignores_rounding_residue() {
        let p = Polynomial::new(vec![1.0, 2.0, 1e-15]);
        assert_eq!(p.degree(), 1);
        assert_eq!(p.trimmed().coeffs(), &[1.0, 2.0]);
        assert_eq!(Polynomial::<f64>::zero().degree(), 0);
    }

    #[test]
    fn derivative_and_eval() {
        let p = Polynomial::new(vec![1.0, -3.0, 0.0, 2.0]);
        assert_eq!(p.eval(2.0), 11.0);
        assert_eq!(p.derivative().coeffs(), &[-3.0, 0.0, 6.0]);
        assert_eq!(Polynomial::constant(4.0).derivative(), Polynomial::zero());
    }

    #[test]
    fn display_forms() {
        assert_eq!(format!("{}", Polynomial::new(vec![0.0, -1.0, 2.0])), "-x + 2x^2");
        assert_eq!(format!("{}", Polynomial::<f64>::zero()), "0");
        assert_eq!(format!("{:.2}", Polynomial::new(vec![1.0, 0.5])), "1.00 + 0.50x");
        assert_eq!(format!("{}", Polynomial::new(vec![-2.0, 1.0])), "-2 + x");
    }
}
