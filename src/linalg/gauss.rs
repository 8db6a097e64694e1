use crate::matrix::{Matrix, Vector};
use crate::trace::Trace;
use crate::traits::FloatScalar;

use super::{pivot_row, DirectSolution, LinalgError, LinalgSettings, SolveStep};

/// Gaussian elimination with partial pivoting on an `n x (n+1)` augmented matrix.
///
/// For each column the row with the largest magnitude entry is swapped into
/// place, lower entries are eliminated, then back substitution yields `x`.
/// The input is not modified.
///
/// # Errors
///
/// - [`LinalgError::Shape`] unless the input is `n x (n+1)` with `n ≥ 1`
/// - [`LinalgError::NonFinite`] if any entry is NaN or infinite
/// - [`LinalgError::Singular`] if a column has no pivot above `settings.pivot_eps`
///
/// # Example
///
/// ```
/// use numlab::linalg::{gauss_elimination, LinalgSettings};
/// use numlab::Matrix;
///
/// let aug = Matrix::from_rows(&[
///     [2.0_f64, 1.0, -1.0, 8.0],
///     [-3.0, -1.0, 2.0, -11.0],
///     [-2.0, 1.0, 2.0, -3.0],
/// ]);
/// let sol = gauss_elimination(&aug, &LinalgSettings::default()).unwrap();
/// assert!((sol.x[0] - 2.0).abs() < 1e-12);
/// assert!((sol.x[1] - 3.0).abs() < 1e-12);
/// assert!((sol.x[2] + 1.0).abs() < 1e-12);
/// ```
pub fn gauss_elimination<T: FloatScalar>(
    aug: &Matrix<T>,
    settings: &LinalgSettings<T>,
) -> Result<DirectSolution<T>, LinalgError> {
    let n = aug.check_augmented()?;
    if !aug.is_finite() {
        return Err(LinalgError::NonFinite);
    }

    let mut m = aug.clone();
    let mut trace = Trace::new();

    for k in 0..n {
        let (p, mag) = pivot_row(&m, k, k);
        if mag < settings.pivot_eps {
            return Err(LinalgError::Singular {
                column: k,
                pivot: mag.as_f64(),
            });
        }
        trace.push(SolveStep::Pivot {
            column: k,
            row: p,
            value: m[(p, k)],
        });
        if p != k {
            log::trace!("gauss: column {k} pivot from row {p}, swapping");
            m.swap_rows(p, k);
            trace.push(SolveStep::Swap { a: k, b: p });
        }

        let pivot = m[(k, k)];
        for i in (k + 1)..n {
            let factor = m[(i, k)] / pivot;
            if factor == T::zero() {
                continue;
            }
            for j in k..=n {
                m[(i, j)] = m[(i, j)] - factor * m[(k, j)];
            }
            trace.push(SolveStep::Eliminate {
                target: i,
                source: k,
                factor,
            });
        }
    }

    let x = back_substitute(&m, n, &mut trace);
    log::debug!("gauss elimination solved {n}x{n} system in {} steps", trace.len());
    Ok(DirectSolution {
        x,
        reduced: m,
        trace,
    })
}

/// Back substitution on an upper-triangular augmented matrix: `x[i] = (b[i] - Σ_{j>i} A[i][j]·x[j]) / A[i][i]`.
fn back_substitute<T: FloatScalar>(
    m: &Matrix<T>,
    n: usize,
    trace: &mut Trace<SolveStep<T>>,
) -> Vector<T> {
    let mut x = Vector::zeros(n);
    for i in (0..n).rev() {
        let mut sum = m[(i, n)];
        for j in (i + 1)..n {
            sum = sum - m[(i, j)] * x[j];
        }
        x[i] = sum / m[(i, i)];
        trace.push(SolveStep::BackSubstitute { row: i, value: x[i] });
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::ShapeError;
    use approx::assert_relative_eq;

    fn settings() -> LinalgSettings<f64> {
        LinalgSettings::default()
    }

    #[test]
    fn solves_with_row_swap() {
        // Zero in the leading position forces a swap.
        let aug = Matrix::from_rows(&[[0.0, 2.0, 4.0], [3.0, 1.0, 5.0]]);
        let sol = gauss_elimination(&aug, &settings()).unwrap();
        assert_relative_eq!(sol.x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sol.x[1], 2.0, epsilon = 1e-12);
        assert!(sol
            .trace
            .iter()
            .any(|s| matches!(s, SolveStep::Swap { a: 0, b: 1 })));
    }

    #[test]
    fn reduced_matrix_is_upper_triangular() {
        let aug = Matrix::from_rows(&[
            [4.0, -2.0, 1.0, 11.0],
            [-2.0, 4.0, -2.0, -16.0],
            [1.0, -2.0, 4.0, 17.0],
        ]);
        let sol = gauss_elimination(&aug, &settings()).unwrap();
        for i in 0..3 {
            for j in 0..i {
                assert!(sol.reduced[(i, j)].abs() < 1e-12);
            }
        }
        assert_relative_eq!(sol.x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sol.x[1], -2.0, epsilon = 1e-12);
        assert_relative_eq!(sol.x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn input_not_mutated() {
        let aug = Matrix::from_rows(&[[0.0, 1.0, 1.0], [1.0, 0.0, 2.0]]);
        let before = aug.clone();
        gauss_elimination(&aug, &settings()).unwrap();
        assert_eq!(aug, before);
    }

    #[test]
    fn singular_reports_column() {
        let aug = Matrix::from_rows(&[
            [1.0, 2.0, 3.0, 1.0],
            [2.0, 4.0, 6.0, 2.0],
            [1.0, 0.0, 1.0, 3.0],
        ]);
        let err = gauss_elimination(&aug, &settings()).unwrap_err();
        assert!(matches!(err, LinalgError::Singular { column: 2, .. }), "{err:?}");
    }

    #[test]
    fn rejects_square_input() {
        let a = Matrix::<f64>::eye(2);
        assert!(matches!(
            gauss_elimination(&a, &settings()),
            Err(LinalgError::Shape(ShapeError::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn rejects_nan() {
        let aug = Matrix::from_rows(&[[1.0, f64::NAN]]);
        assert_eq!(
            gauss_elimination(&aug, &settings()).unwrap_err(),
            LinalgError::NonFinite
        );
    }

    #[test]
    fn single_precision() {
        let aug = Matrix::from_rows(&[[2.0_f32, 0.0, 4.0], [0.0, 4.0, 2.0]]);
        let sol = gauss_elimination(&aug, &LinalgSettings::default()).unwrap();
        assert!((sol.x[0] - 2.0).abs() < 1e-6);
        assert!((sol.x[1] - 0.5).abs() < 1e-6);
    }
}
