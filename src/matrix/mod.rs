//! Dense row-major matrices and vectors.
//!
//! Every solver works on small dense systems, so storage is a single heap
//! `Vec<T>` laid out row by row. Solvers never mutate caller-owned matrices:
//! they clone into a working copy first.

mod ops;
pub mod vector;

pub use vector::Vector;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::{FloatScalar, Scalar};

/// Shape errors raised while building or combining matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// A nested row has a different length than the first row.
    #[error("row {row} has length {got}, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// Operand dimensions are incompatible.
    #[error("dimension mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, got.0, got.1)]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// The matrix has no rows or no columns.
    #[error("matrix is empty")]
    Empty,
}

/// Dynamically-sized heap-allocated matrix with row-major storage.
///
/// # Examples
///
/// ```
/// use numlab::Matrix;
///
/// let a = Matrix::from_rows(&[[1.0_f64, 2.0], [3.0, 4.0]]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.nrows(), 2);
///
/// let i = Matrix::<f64>::eye(3);
/// assert_eq!(i[(1, 1)], 1.0);
/// assert_eq!(i[(1, 2)], 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Create an `nrows x ncols` matrix of zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![T::zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Identity matrix of size `n`.
    pub fn eye(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Build from fixed-width rows.
    ///
    /// ```
    /// use numlab::Matrix;
    /// let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows<const N: usize>(rows: &[[T; N]]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * N);
        for row in rows {
            data.extend_from_slice(row);
        }
        Self {
            data,
            nrows: rows.len(),
            ncols: N,
        }
    }

    /// Build from nested rows of possibly different lengths.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::RaggedRows`] if any row's length differs from
    /// the first row.
    ///
    /// ```
    /// use numlab::Matrix;
    /// use numlab::matrix::ShapeError;
    ///
    /// let ok = Matrix::try_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
    /// assert!(ok.is_ok());
    ///
    /// let bad = Matrix::try_from_rows(&[vec![1.0, 2.0], vec![3.0]]);
    /// assert_eq!(bad.unwrap_err(), ShapeError::RaggedRows { row: 1, expected: 2, got: 1 });
    /// ```
    pub fn try_from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, ShapeError> {
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(ShapeError::RaggedRows {
                    row: i,
                    expected: ncols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            nrows: rows.len(),
            ncols,
        })
    }

    /// Build from a flat row-major vector.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::DimensionMismatch`] if `data.len() != nrows * ncols`.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Result<Self, ShapeError> {
        if data.len() != nrows * ncols {
            return Err(ShapeError::DimensionMismatch {
                expected: (nrows, ncols),
                got: (1, data.len()),
            });
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Build by evaluating `f(row, col)` for each element.
    ///
    /// ```
    /// use numlab::Matrix;
    /// let h = Matrix::from_fn(3, 3, |i, j| 1.0 / (i + j + 1) as f64);
    /// assert_eq!(h[(0, 0)], 1.0);
    /// assert_eq!(h[(2, 2)], 0.2);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }
}

// ── Accessors ───────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Borrow a row as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Borrow a row mutably.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Copy column `j` into a vector.
    pub fn col(&self, j: usize) -> Vector<T> {
        Vector::from_vec((0..self.nrows).map(|i| self[(i, j)]).collect())
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.ncols.max(1)).take(self.nrows)
    }

    /// Flat row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Nested row copy, for callers that want plain `Vec<Vec<T>>`.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows().map(<[T]>::to_vec).collect()
    }

    /// Swap rows `a` and `b` in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.ncols {
            self.data.swap(a * self.ncols + j, b * self.ncols + j);
        }
    }

    /// Transpose into a new matrix.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }

    /// Copy of the matrix without the listed columns.
    ///
    /// Column indices refer to the original layout; duplicates are ignored.
    pub fn without_columns(&self, drop: &[usize]) -> Self {
        let keep: Vec<usize> = (0..self.ncols).filter(|j| !drop.contains(j)).collect();
        let mut data = Vec::with_capacity(self.nrows * keep.len());
        for i in 0..self.nrows {
            for &j in &keep {
                data.push(self[(i, j)]);
            }
        }
        Self {
            data,
            nrows: self.nrows,
            ncols: keep.len(),
        }
    }

    /// Copy of the matrix without row `r`.
    pub fn without_row(&self, r: usize) -> Self {
        let mut data = Vec::with_capacity(self.data.len().saturating_sub(self.ncols));
        for (i, row) in self.rows().enumerate() {
            if i != r {
                data.extend_from_slice(row);
            }
        }
        Self {
            data,
            nrows: self.nrows - usize::from(r < self.nrows),
            ncols: self.ncols,
        }
    }
}

// ── Augmented systems ───────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Append `b` as an extra column, producing `[A | b]`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::DimensionMismatch`] if `b.len() != self.nrows()`.
    pub fn augment(&self, b: &Vector<T>) -> Result<Self, ShapeError> {
        if b.len() != self.nrows {
            return Err(ShapeError::DimensionMismatch {
                expected: (self.nrows, 1),
                got: (b.len(), 1),
            });
        }
        Ok(Self::from_fn(self.nrows, self.ncols + 1, |i, j| {
            if j < self.ncols {
                self[(i, j)]
            } else {
                b[i]
            }
        }))
    }

    /// Split an `n x (n+1)` augmented matrix into `(A, b)`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::Empty`] for a matrix without rows and
    /// [`ShapeError::DimensionMismatch`] unless `ncols == nrows + 1`.
    pub fn split_augmented(&self) -> Result<(Self, Vector<T>), ShapeError> {
        self.check_augmented()?;
        let n = self.nrows;
        let a = Self::from_fn(n, n, |i, j| self[(i, j)]);
        let b = self.col(n);
        Ok((a, b))
    }

    /// Validate the `n x (n+1)` augmented shape and return `n`.
    pub(crate) fn check_augmented(&self) -> Result<usize, ShapeError> {
        if self.nrows == 0 {
            return Err(ShapeError::Empty);
        }
        if self.ncols != self.nrows + 1 {
            return Err(ShapeError::DimensionMismatch {
                expected: (self.nrows, self.nrows + 1),
                got: (self.nrows, self.ncols),
            });
        }
        Ok(self.nrows)
    }

    /// Validate a square non-empty shape and return `n`.
    pub(crate) fn check_square(&self) -> Result<usize, ShapeError> {
        if self.nrows == 0 {
            return Err(ShapeError::Empty);
        }
        if !self.is_square() {
            return Err(ShapeError::DimensionMismatch {
                expected: (self.nrows, self.nrows),
                got: (self.nrows, self.ncols),
            });
        }
        Ok(self.nrows)
    }
}

// ── Float helpers ───────────────────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// Largest absolute element-wise difference. Shapes must match.
    pub fn max_abs_diff(&self, other: &Self) -> T {
        self.data
            .iter()
            .zip(&other.data)
            .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs()))
    }

    /// Frobenius norm.
    pub fn frobenius_norm(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x)
            .sqrt()
    }

    /// `|A[i][j] - A[j][i]| <= tol` for every pair.
    pub fn is_symmetric(&self, tol: T) -> bool {
        self.first_asymmetry(tol).is_none()
    }

    /// First `(i, j)` with `i < j` violating symmetry, scanning row by row.
    pub(crate) fn first_asymmetry(&self, tol: T) -> Option<(usize, usize)> {
        for i in 0..self.nrows {
            for j in (i + 1)..self.ncols {
                if (self[(i, j)] - self[(j, i)]).abs() > tol {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// True when every element is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

// ── Indexing ────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[row * self.ncols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[row * self.ncols + col]
    }
}

impl<T: FloatScalar> core::fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let prec = f.precision().unwrap_or(4);
        for row in self.rows() {
            write!(f, "[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:.*}", prec, x)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_and_eye() {
        let z = Matrix::<f64>::zeros(2, 3);
        assert_eq!(z.nrows(), 2);
        assert_eq!(z.ncols(), 3);
        assert!(z.as_slice().iter().all(|&x| x == 0.0));

        let i = Matrix::<f64>::eye(3);
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(i[(r, c)], if r == c { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn row_major_layout() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.col(2).as_slice(), &[3.0, 6.0]);
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows = [vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0]];
        let err = Matrix::try_from_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            ShapeError::RaggedRows {
                row: 2,
                expected: 3,
                got: 1
            }
        );
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]).is_err());
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m[(1, 0)], 3.0);
    }

    #[test]
    fn swap_rows_in_place() {
        let mut m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        m.swap_rows(0, 2);
        assert_eq!(m.row(0), &[5.0, 6.0]);
        assert_eq!(m.row(2), &[1.0, 2.0]);
        m.swap_rows(1, 1);
        assert_eq!(m.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn augment_and_split() {
        let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 3.0]]);
        let b = Vector::from_slice(&[3.0, 5.0]);
        let aug = a.augment(&b).unwrap();
        assert_eq!(aug.ncols(), 3);
        assert_eq!(aug[(1, 2)], 5.0);

        let (a2, b2) = aug.split_augmented().unwrap();
        assert_eq!(a2, a);
        assert_eq!(b2, b);
    }

    #[test]
    fn split_rejects_square() {
        let a = Matrix::<f64>::eye(2);
        assert_eq!(
            a.split_augmented().unwrap_err(),
            ShapeError::DimensionMismatch {
                expected: (2, 3),
                got: (2, 2)
            }
        );
        assert_eq!(
            Matrix::<f64>::zeros(0, 1).split_augmented().unwrap_err(),
            ShapeError::Empty
        );
    }

    #[test]
    fn without_columns_and_row() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let c = m.without_columns(&[1]);
        assert_eq!(c.to_rows(), vec![vec![1.0, 3.0], vec![4.0, 6.0]]);
        let r = m.without_row(0);
        assert_eq!(r.nrows(), 1);
        assert_eq!(r.row(0), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn symmetry_check_reports_first_violation() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 0.0], [2.0, 1.0, 5.0], [0.0, 4.0, 1.0]]);
        assert_eq!(m.first_asymmetry(1e-9), Some((1, 2)));
        assert!(!m.is_symmetric(1e-9));
        assert!(m.is_symmetric(2.0));
    }

    #[test]
    fn display_honors_precision() {
        let m = Matrix::from_rows(&[[1.0_f64, 0.5]]);
        assert_eq!(format!("{:.2}", m), "[1.00, 0.50]\n");
    }
}
