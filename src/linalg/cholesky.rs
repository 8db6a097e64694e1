use crate::matrix::{Matrix, ShapeError, Vector};
use crate::traits::FloatScalar;

use super::{LinalgError, LinalgSettings};

/// Cholesky decomposition `A = L·Lᵀ` of a symmetric positive-definite matrix.
///
/// ```
/// use numlab::{Matrix, Vector};
///
/// let a = Matrix::from_rows(&[[4.0_f64, 2.0], [2.0, 3.0]]);
/// let chol = a.cholesky().unwrap();
/// assert!((chol.l()[(0, 0)] - 2.0).abs() < 1e-12);
/// assert!((chol.l()[(1, 0)] - 1.0).abs() < 1e-12);
///
/// let x = chol.solve(&Vector::from_slice(&[2.0, 1.0])).unwrap();
/// assert!((x[0] - 0.5).abs() < 1e-12);
/// assert!(x[1].abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    l: Matrix<T>,
}

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Factor a square matrix.
    ///
    /// # Errors
    ///
    /// - [`LinalgError::NotSymmetric`] for the first pair `(i, j)`, `i < j`,
    ///   with `|A[i][j] - A[j][i]| > settings.symmetry_tol`
    /// - [`LinalgError::NotPositiveDefinite`] when a diagonal pivot
    ///   `A[i][i] - Σ L[i][k]²` is not above `settings.cholesky_eps`
    pub fn new(a: &Matrix<T>, settings: &LinalgSettings<T>) -> Result<Self, LinalgError> {
        let n = a.check_square()?;
        if !a.is_finite() {
            return Err(LinalgError::NonFinite);
        }
        if let Some((row, col)) = a.first_asymmetry(settings.symmetry_tol) {
            return Err(LinalgError::NotSymmetric { row, col });
        }

        let mut l = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..=i {
                let mut sum = T::zero();
                for k in 0..j {
                    sum = sum + l[(i, k)] * l[(j, k)];
                }
                if i == j {
                    let d = a[(i, i)] - sum;
                    if d <= settings.cholesky_eps {
                        return Err(LinalgError::NotPositiveDefinite {
                            row: i,
                            pivot: d.as_f64(),
                        });
                    }
                    l[(i, i)] = d.sqrt();
                } else {
                    l[(i, j)] = (a[(i, j)] - sum) / l[(j, j)];
                }
            }
        }
        Ok(Self { l })
    }

    pub fn l(&self) -> &Matrix<T> {
        &self.l
    }

    /// `Lᵀ` as an explicit matrix.
    pub fn lt(&self) -> Matrix<T> {
        self.l.transpose()
    }

    pub fn reconstruct(&self) -> Matrix<T> {
        &self.l * &self.lt()
    }

    /// Forward substitution `Ly = b`.
    pub fn forward(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let n = self.l.nrows();
        if b.len() != n {
            return Err(ShapeError::DimensionMismatch {
                expected: (n, 1),
                got: (b.len(), 1),
            }
            .into());
        }
        let mut y = Vector::zeros(n);
        for i in 0..n {
            let mut sum = b[i];
            for k in 0..i {
                sum = sum - self.l[(i, k)] * y[k];
            }
            y[i] = sum / self.l[(i, i)];
        }
        Ok(y)
    }

    /// Back substitution `Lᵀx = y`, reading `L` with swapped indices.
    pub fn backward(&self, y: &Vector<T>) -> Vector<T> {
        let n = self.l.nrows();
        let mut x = Vector::zeros(n);
        for i in (0..n).rev() {
            let mut sum = y[i];
            for k in (i + 1)..n {
                sum = sum - self.l[(k, i)] * x[k];
            }
            x[i] = sum / self.l[(i, i)];
        }
        x
    }

    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let y = self.forward(b)?;
        Ok(self.backward(&y))
    }

    /// `det(A) = Π L[i][i]²`.
    pub fn det(&self) -> T {
        (0..self.l.nrows()).fold(T::one(), |acc, i| acc * self.l[(i, i)] * self.l[(i, i)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn settings() -> LinalgSettings<f64> {
        LinalgSettings::default()
    }

    fn spd4() -> Matrix<f64> {
        Matrix::from_rows(&[
            [4.0, 1.0, 1.0, 0.0],
            [1.0, 3.0, 0.0, 1.0],
            [1.0, 0.0, 2.0, -1.0],
            [0.0, 1.0, -1.0, 2.0],
        ])
    }

    #[test]
    fn reconstructs_and_solves() {
        let a = spd4();
        let chol = CholeskyDecomposition::new(&a, &settings()).unwrap();
        assert!(chol.reconstruct().max_abs_diff(&a) < 1e-12);

        let b = Vector::from_slice(&[6.0, 5.0, 1.0, 1.0]);
        let x = chol.solve(&b).unwrap();
        let r = &(&a * &x) - &b;
        assert!(r.norm_inf() < 1e-12);
    }

    #[test]
    fn upper_triangle_of_l_is_zero() {
        let chol = CholeskyDecomposition::new(&spd4(), &settings()).unwrap();
        let lt = chol.lt();
        for i in 0..4 {
            for j in 0..i {
                assert_eq!(lt[(i, j)], 0.0);
            }
        }
    }

    #[test]
    fn not_symmetric() {
        let a = Matrix::from_rows(&[[4.0, 1.0], [2.0, 3.0]]);
        assert_eq!(
            CholeskyDecomposition::new(&a, &settings()).unwrap_err(),
            LinalgError::NotSymmetric { row: 0, col: 1 }
        );
    }

    #[test]
    fn symmetric_indefinite() {
        // Eigenvalues 6 and -4.
        let a = Matrix::from_rows(&[[1.0, 5.0], [5.0, 1.0]]);
        match CholeskyDecomposition::new(&a, &settings()).unwrap_err() {
            LinalgError::NotPositiveDefinite { row, pivot } => {
                assert_eq!(row, 1);
                assert_relative_eq!(pivot, -24.0, epsilon = 1e-12);
            }
            e => panic!("unexpected {e:?}"),
        }
    }

    #[test]
    fn determinant_matches_lu() {
        let a = spd4();
        let chol = a.cholesky().unwrap();
        let lu = a.lu().unwrap();
        assert_relative_eq!(chol.det(), lu.det(), epsilon = 1e-10);
    }
}
