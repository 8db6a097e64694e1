use alloc::vec::Vec;

use crate::traits::FloatScalar;

use super::polynomial::Polynomial;
use super::{validate_nodes, InterpError};

/// Lagrange interpolating polynomial in standard form.
///
/// Keeps the individual basis polynomials `Lᵢ` alongside their weighted sum.
#[derive(Debug, Clone)]
pub struct LagrangeInterpolant<T> {
    xs: Vec<T>,
    ys: Vec<T>,
    basis: Vec<Polynomial<T>>,
    polynomial: Polynomial<T>,
}

impl<T: FloatScalar> LagrangeInterpolant<T> {
    pub fn polynomial(&self) -> &Polynomial<T> {
        &self.polynomial
    }

    /// `Lᵢ(x) = Π_{j≠i} (x − xⱼ)/(xᵢ − xⱼ)`, one per node.
    pub fn basis(&self) -> &[Polynomial<T>] {
        &self.basis
    }

    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    pub fn eval(&self, x: T) -> T {
        self.polynomial.eval(x)
    }
}

/// Build the Lagrange interpolant through `(xs[i], ys[i])`.
///
/// Each basis polynomial is a product of linear factors, and the result is
/// `Σ yᵢ·Lᵢ` accumulated coefficient-wise.
///
/// # Errors
///
/// - [`InterpError::LengthMismatch`] / [`InterpError::TooFewPoints`] for bad input sizes
/// - [`InterpError::DuplicateAbscissas`] if two `xs` coincide
/// - [`InterpError::NonFinite`] for NaN or infinite data
pub fn lagrange<T: FloatScalar>(xs: &[T], ys: &[T]) -> Result<LagrangeInterpolant<T>, InterpError> {
    validate_nodes(xs, ys)?;

    let basis: Vec<Polynomial<T>> = (0..xs.len())
        .map(|i| {
            xs.iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(Polynomial::constant(T::one()), |acc, (_, &xj)| {
                    let d = xs[i] - xj;
                    let factor = Polynomial::new(alloc::vec![-xj / d, T::one() / d]);
                    &acc * &factor
                })
        })
        .collect();

    let polynomial = basis
        .iter()
        .zip(ys)
        .fold(Polynomial::zero(), |acc, (l, &y)| &acc + &(l * y));

    Ok(LagrangeInterpolant {
        xs: xs.to_vec(),
        ys: ys.to_vec(),
        basis,
        polynomial,
    })
}
