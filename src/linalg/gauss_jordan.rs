use alloc::vec::Vec;

use crate::matrix::{Matrix, ShapeError, Vector};
use crate::trace::Trace;
use crate::traits::FloatScalar;

use super::{pivot_row, DirectSolution, LinalgError, LinalgSettings, SolveStep};

/// Reduced row echelon form of an augmented matrix.
#[derive(Debug, Clone)]
pub struct Rref<T> {
    pub matrix: Matrix<T>,
    /// Coefficient columns that received a pivot, in row order.
    pub pivot_columns: Vec<usize>,
    pub trace: Trace<SolveStep<T>>,
}

impl<T: FloatScalar> Rref<T> {
    /// Rank of the coefficient part.
    pub fn rank(&self) -> usize {
        self.pivot_columns.len()
    }

    /// First zero row whose right-hand side exceeds `eps`, as `(row, rhs)`.
    pub fn inconsistent_row(&self, eps: T) -> Option<(usize, T)> {
        let rhs_col = self.matrix.ncols() - 1;
        (self.rank()..self.matrix.nrows())
            .map(|i| (i, self.matrix[(i, rhs_col)]))
            .find(|&(_, rhs)| rhs.abs() > eps)
    }
}

/// Reduce an augmented matrix `[A | b]` (any `m x (k+1)`) to RREF.
///
/// Each coefficient column takes its largest remaining entry as the pivot.
/// Columns whose best pivot is below `settings.pivot_eps` are skipped and the
/// pivot row stays where it is, so rank-deficient systems reduce fully.
pub fn rref<T: FloatScalar>(
    aug: &Matrix<T>,
    settings: &LinalgSettings<T>,
) -> Result<Rref<T>, LinalgError> {
    if aug.nrows() == 0 || aug.ncols() < 2 {
        return Err(ShapeError::Empty.into());
    }
    if !aug.is_finite() {
        return Err(LinalgError::NonFinite);
    }

    let rows = aug.nrows();
    let cols = aug.ncols();
    let mut m = aug.clone();
    let mut trace = Trace::new();
    let mut pivot_columns = Vec::new();
    let mut r = 0;

    for col in 0..cols - 1 {
        if r == rows {
            break;
        }
        let (p, mag) = pivot_row(&m, col, r);
        if mag < settings.pivot_eps {
            log::trace!("column {col} has no usable pivot");
            continue;
        }
        trace.push(SolveStep::Pivot {
            column: col,
            row: p,
            value: m[(p, col)],
        });
        if p != r {
            m.swap_rows(p, r);
            trace.push(SolveStep::Swap { a: r, b: p });
        }

        let divisor = m[(r, col)];
        for x in m.row_mut(r) {
            *x = *x / divisor;
        }
        trace.push(SolveStep::Normalize { row: r, divisor });

        for i in 0..rows {
            let factor = m[(i, col)];
            if i == r || factor == T::zero() {
                continue;
            }
            for j in 0..cols {
                m[(i, j)] = m[(i, j)] - factor * m[(r, j)];
            }
            trace.push(SolveStep::Eliminate {
                target: i,
                source: r,
                factor,
            });
        }

        pivot_columns.push(col);
        r += 1;
    }

    Ok(Rref {
        matrix: m,
        pivot_columns,
        trace,
    })
}

/// Solve an `n x (n+1)` augmented system by Gauss-Jordan reduction.
///
/// # Errors
///
/// - [`LinalgError::Inconsistent`] if a row reduces to `[0 … 0 | b]` with `|b| > pivot_eps`
/// - [`LinalgError::InfiniteSolutions`] if the rank is below `n`
/// - shape and finiteness errors as for [`rref`]
///
/// ```
/// use numlab::linalg::{gauss_jordan, LinalgError, LinalgSettings};
/// use numlab::Matrix;
///
/// let s = LinalgSettings::default();
/// let sol = gauss_jordan(&Matrix::from_rows(&[[1.0_f64, 1.0, 3.0], [1.0, -1.0, 1.0]]), &s).unwrap();
/// assert!((sol.x[0] - 2.0).abs() < 1e-12);
///
/// let dependent = Matrix::from_rows(&[[1.0_f64, 1.0, 2.0], [2.0, 2.0, 4.0]]);
/// assert_eq!(
///     gauss_jordan(&dependent, &s).unwrap_err(),
///     LinalgError::InfiniteSolutions { rank: 1, n: 2 }
/// );
/// ```
pub fn gauss_jordan<T: FloatScalar>(
    aug: &Matrix<T>,
    settings: &LinalgSettings<T>,
) -> Result<DirectSolution<T>, LinalgError> {
    let n = aug.check_augmented()?;
    let reduced = rref(aug, settings)?;

    if let Some((row, rhs)) = reduced.inconsistent_row(settings.pivot_eps) {
        return Err(LinalgError::Inconsistent {
            row,
            rhs: rhs.as_f64(),
        });
    }
    let rank = reduced.rank();
    if rank < n {
        return Err(LinalgError::InfiniteSolutions { rank, n });
    }

    let Rref { matrix, trace, .. } = reduced;
    let x: Vector<T> = (0..n).map(|i| matrix[(i, n)]).collect();
    Ok(DirectSolution {
        x,
        reduced: matrix,
        trace,
    })
}
