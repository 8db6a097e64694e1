use alloc::vec::Vec;

use crate::matrix::{Matrix, ShapeError, Vector};
use crate::trace::Trace;
use crate::traits::FloatScalar;

use super::{pivot_row, LinalgError, LinalgSettings, SolveStep};

/// Doolittle LU decomposition with partial pivoting: `PA = LU`.
///
/// `L` is unit lower triangular, `U` upper triangular. The permutation is
/// kept as a vector: row `i` of `PA` is row `perm[i]` of `A`.
///
/// # Example
///
/// ```
/// use numlab::{Matrix, Vector};
/// use numlab::linalg::{LuDecomposition, LinalgSettings};
///
/// let a = Matrix::from_rows(&[[0.0_f64, 1.0], [2.0, 3.0]]);
/// let lu = LuDecomposition::new(&a, &LinalgSettings::default()).unwrap();
/// assert_eq!(lu.perm(), &[1, 0]);
///
/// let x = lu.solve(&Vector::from_slice(&[1.0, 8.0])).unwrap();
/// assert!((x[0] - 2.5).abs() < 1e-12);
/// assert!((x[1] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition<T> {
    l: Matrix<T>,
    u: Matrix<T>,
    perm: Vec<usize>,
    swaps: usize,
    trace: Trace<SolveStep<T>>,
}

impl<T: FloatScalar> LuDecomposition<T> {
    /// Factor a square matrix.
    ///
    /// # Errors
    ///
    /// [`LinalgError::Singular`] if some column has no pivot above
    /// `settings.pivot_eps`; shape and finiteness errors otherwise.
    pub fn new(a: &Matrix<T>, settings: &LinalgSettings<T>) -> Result<Self, LinalgError> {
        let n = a.check_square()?;
        if !a.is_finite() {
            return Err(LinalgError::NonFinite);
        }

        let mut w = a.clone();
        let mut l = Matrix::zeros(n, n);
        let mut u = Matrix::zeros(n, n);
        let mut perm: Vec<usize> = (0..n).collect();
        let mut swaps = 0;
        let mut trace = Trace::new();

        for k in 0..n {
            let (p, mag) = pivot_row(&w, k, k);
            if mag < settings.pivot_eps {
                return Err(LinalgError::Singular {
                    column: k,
                    pivot: mag.as_f64(),
                });
            }
            trace.push(SolveStep::Pivot {
                column: k,
                row: p,
                value: w[(p, k)],
            });

            if p != k {
                w.swap_rows(p, k);
                perm.swap(p, k);
                // Only the multipliers already computed move with the row.
                for j in 0..k {
                    let tmp = l[(k, j)];
                    l[(k, j)] = l[(p, j)];
                    l[(p, j)] = tmp;
                }
                swaps += 1;
                trace.push(SolveStep::Swap { a: k, b: p });
            }

            l[(k, k)] = T::one();
            for j in k..n {
                u[(k, j)] = w[(k, j)];
            }

            for i in (k + 1)..n {
                let factor = w[(i, k)] / u[(k, k)];
                l[(i, k)] = factor;
                if factor == T::zero() {
                    continue;
                }
                for j in k..n {
                    w[(i, j)] = w[(i, j)] - factor * u[(k, j)];
                }
                trace.push(SolveStep::Eliminate {
                    target: i,
                    source: k,
                    factor,
                });
            }
        }

        log::debug!("LU factored {n}x{n} matrix with {swaps} row swaps");
        Ok(Self {
            l,
            u,
            perm,
            swaps,
            trace,
        })
    }

    pub fn l(&self) -> &Matrix<T> {
        &self.l
    }

    pub fn u(&self) -> &Matrix<T> {
        &self.u
    }

    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    /// Factorization steps (pivots, swaps, eliminations).
    pub fn trace(&self) -> &Trace<SolveStep<T>> {
        &self.trace
    }

    pub fn dim(&self) -> usize {
        self.perm.len()
    }

    /// Explicit permutation matrix `P`.
    pub fn p(&self) -> Matrix<T> {
        let n = self.dim();
        Matrix::from_fn(n, n, |i, j| if self.perm[i] == j { T::one() } else { T::zero() })
    }

    /// `PA`, obtained by reordering the rows of `a`.
    pub fn permute(&self, a: &Matrix<T>) -> Matrix<T> {
        Matrix::from_fn(a.nrows(), a.ncols(), |i, j| a[(self.perm[i], j)])
    }

    /// `L·U`, which equals `PA` up to rounding.
    pub fn reconstruct(&self) -> Matrix<T> {
        &self.l * &self.u
    }

    /// `det(A) = (-1)^swaps · Π U[i][i]`.
    pub fn det(&self) -> T {
        let d = (0..self.dim()).fold(T::one(), |acc, i| acc * self.u[(i, i)]);
        if self.swaps % 2 == 0 {
            d
        } else {
            -d
        }
    }

    /// Forward substitution `Ly = Pb`.
    pub fn forward(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let n = self.dim();
        if b.len() != n {
            return Err(ShapeError::DimensionMismatch {
                expected: (n, 1),
                got: (b.len(), 1),
            }
            .into());
        }
        let mut y = Vector::zeros(n);
        for i in 0..n {
            let mut sum = b[self.perm[i]];
            for j in 0..i {
                sum = sum - self.l[(i, j)] * y[j];
            }
            y[i] = sum;
        }
        Ok(y)
    }

    /// Back substitution `Ux = y`.
    pub fn backward(&self, y: &Vector<T>) -> Vector<T> {
        let n = self.dim();
        let mut x = Vector::zeros(n);
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum = sum - self.u[(i, j)] * x[j];
            }
            x[i] = sum / self.u[(i, i)];
        }
        x
    }

    /// Solve `Ax = b`.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let y = self.forward(b)?;
        Ok(self.backward(&y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn settings() -> LinalgSettings<f64> {
        LinalgSettings::default()
    }

    #[test]
    fn factors_are_triangular() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]);
        let lu = LuDecomposition::new(&a, &settings()).unwrap();
        for i in 0..3 {
            assert_eq!(lu.l()[(i, i)], 1.0);
            for j in (i + 1)..3 {
                assert_eq!(lu.l()[(i, j)], 0.0);
                assert_eq!(lu.u()[(j, i)], 0.0);
            }
        }
        // Multipliers are bounded by one under partial pivoting.
        for i in 0..3 {
            for j in 0..i {
                assert!(lu.l()[(i, j)].abs() <= 1.0);
            }
        }
        assert!(lu.reconstruct().max_abs_diff(&lu.permute(&a)) < 1e-12);
        assert!((&lu.p() * &a).max_abs_diff(&lu.permute(&a)) < 1e-15);
    }

    #[test]
    fn determinant() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]);
        let lu = LuDecomposition::new(&a, &settings()).unwrap();
        assert_relative_eq!(lu.det(), -3.0, epsilon = 1e-12);
    }

    #[test]
    fn solve_with_intermediate() {
        let a = Matrix::from_rows(&[[2.0, 1.0, 1.0], [4.0, -6.0, 0.0], [-2.0, 7.0, 2.0]]);
        let b = Vector::from_slice(&[5.0, -2.0, 9.0]);
        let lu = LuDecomposition::new(&a, &settings()).unwrap();
        let y = lu.forward(&b).unwrap();
        // L·y reproduces the permuted right-hand side.
        let ly = lu.l() * &y;
        for i in 0..3 {
            assert_relative_eq!(ly[i], b[lu.perm()[i]], epsilon = 1e-12);
        }
        let x = lu.solve(&b).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn singular_matrix() {
        let a = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]);
        assert!(matches!(
            LuDecomposition::new(&a, &settings()),
            Err(LinalgError::Singular { column: 1, .. })
        ));
    }

    #[test]
    fn rhs_length_checked() {
        let lu = Matrix::<f64>::eye(2).lu().unwrap();
        assert!(matches!(
            lu.solve(&Vector::from_slice(&[1.0])),
            Err(LinalgError::Shape(_))
        ));
    }
}
