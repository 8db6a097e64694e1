//! Direct and iterative solvers for small dense linear systems.
//!
//! # Direct
//!
//! - [`gauss_elimination`]: forward elimination with partial pivoting, then back substitution
//! - [`gauss_jordan`] / [`rref`]: reduced row echelon form with solution classification
//! - [`LuDecomposition`]: Doolittle `PA = LU` with an explicit permutation vector
//! - [`CholeskyDecomposition`]: `A = LLᵀ` for symmetric positive-definite matrices
//!
//! # Iterative
//!
//! - [`jacobi`] and [`gauss_seidel`], built on the single-sweep functions
//!   [`jacobi_sweep`] and [`gauss_seidel_sweep`]
//!
//! All pivot and diagonal checks compare magnitudes against an *absolute*
//! epsilon from [`LinalgSettings`]. Badly scaled systems (every entry around
//! `1e-11`, say) are therefore reported as singular even when they are not;
//! rescale the rows first.

mod cholesky;
mod gauss;
mod gauss_jordan;
mod iterative;
mod lu;

pub use cholesky::CholeskyDecomposition;
pub use gauss::gauss_elimination;
pub use gauss_jordan::{gauss_jordan, rref, Rref};
pub use iterative::{
    gauss_seidel, gauss_seidel_sweep, is_diagonally_dominant, jacobi, jacobi_sweep,
    IterationRecord, IterativeSettings, IterativeSolution, IterativeStatus,
};
pub use lu::LuDecomposition;

use crate::matrix::{Matrix, ShapeError, Vector};
use crate::trace::Trace;
use crate::traits::FloatScalar;

/// Errors from linear system solvers.
///
/// ```
/// use numlab::linalg::{gauss_elimination, LinalgError, LinalgSettings};
/// use numlab::Matrix;
///
/// let singular = Matrix::from_rows(&[[1.0_f64, 2.0, 3.0], [2.0, 4.0, 6.0]]);
/// let err = gauss_elimination(&singular, &LinalgSettings::default()).unwrap_err();
/// assert!(matches!(err, LinalgError::Singular { column: 1, .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LinalgError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    /// Best available pivot in `column` is below the pivot epsilon.
    #[error("matrix is singular: best pivot {pivot:e} in column {column} is below tolerance")]
    Singular { column: usize, pivot: f64 },
    #[error("matrix is not symmetric: entries ({row}, {col}) and ({col}, {row}) differ")]
    NotSymmetric { row: usize, col: usize },
    #[error("matrix is not positive definite: diagonal pivot {pivot:e} at row {row}")]
    NotPositiveDefinite { row: usize, pivot: f64 },
    #[error("zero diagonal entry at row {row}")]
    ZeroDiagonal { row: usize },
    /// A row reduced to `[0 … 0 | rhs]` with `rhs ≠ 0`.
    #[error("system is inconsistent: row {row} reduces to 0 = {rhs}")]
    Inconsistent { row: usize, rhs: f64 },
    #[error("system has infinitely many solutions: rank {rank} < {n}")]
    InfiniteSolutions { rank: usize, n: usize },
    #[error("input contains NaN or infinite entries")]
    NonFinite,
}

/// Structural tolerances for the direct solvers.
#[derive(Debug, Clone, Copy)]
pub struct LinalgSettings<T> {
    /// Pivots with magnitude below this are treated as zero (Gauss, Gauss-Jordan, LU).
    pub pivot_eps: T,
    /// Cholesky diagonal pivots must exceed this.
    pub cholesky_eps: T,
    /// Largest tolerated `|A[i][j] - A[j][i]|` for Cholesky input.
    pub symmetry_tol: T,
}

impl Default for LinalgSettings<f64> {
    fn default() -> Self {
        Self {
            pivot_eps: 1e-10,
            cholesky_eps: 1e-12,
            symmetry_tol: 1e-9,
        }
    }
}

impl Default for LinalgSettings<f32> {
    fn default() -> Self {
        Self {
            pivot_eps: 1e-5,
            cholesky_eps: 1e-6,
            symmetry_tol: 1e-4,
        }
    }
}

/// One recorded operation of a direct solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveStep<T> {
    /// Pivot chosen for `column`, found in `row` before any swap.
    Pivot { column: usize, row: usize, value: T },
    Swap { a: usize, b: usize },
    /// Pivot row divided by `divisor` (Gauss-Jordan).
    Normalize { row: usize, divisor: T },
    /// `row[target] -= factor * row[source]`.
    Eliminate { target: usize, source: usize, factor: T },
    ForwardSubstitute { row: usize, value: T },
    BackSubstitute { row: usize, value: T },
}

/// Solution of an augmented system by elimination.
#[derive(Debug, Clone)]
pub struct DirectSolution<T> {
    pub x: Vector<T>,
    /// Augmented matrix after reduction (upper triangular for Gauss, RREF for
    /// Gauss-Jordan).
    pub reduced: Matrix<T>,
    pub trace: Trace<SolveStep<T>>,
}

/// Row in `[from, nrows)` holding the largest `|m[row][col]|`, first wins on ties.
pub(crate) fn pivot_row<T: FloatScalar>(m: &Matrix<T>, col: usize, from: usize) -> (usize, T) {
    let mut best = from;
    let mut best_val = m[(from, col)].abs();
    for row in (from + 1)..m.nrows() {
        let val = m[(row, col)].abs();
        if val > best_val {
            best = row;
            best_val = val;
        }
    }
    (best, best_val)
}

// ── Convenience methods ─────────────────────────────────────────────

impl<T: FloatScalar> Matrix<T>
where
    LinalgSettings<T>: Default,
{
    /// LU decomposition with default tolerances.
    pub fn lu(&self) -> Result<LuDecomposition<T>, LinalgError> {
        LuDecomposition::new(self, &LinalgSettings::default())
    }

    /// Cholesky decomposition with default tolerances.
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T>, LinalgError> {
        CholeskyDecomposition::new(self, &LinalgSettings::default())
    }

    /// Solve `Ax = b` through the LU decomposition.
    ///
    /// ```
    /// use numlab::{Matrix, Vector};
    ///
    /// let a = Matrix::from_rows(&[[2.0_f64, 1.0], [1.0, 3.0]]);
    /// let x = a.solve(&Vector::from_slice(&[3.0, 5.0])).unwrap();
    /// assert!((x[0] - 0.8).abs() < 1e-12);
    /// assert!((x[1] - 1.4).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.lu()?.solve(b)
    }
}
