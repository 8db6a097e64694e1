use crate::matrix::{Matrix, ShapeError, Vector};
use crate::trace::Trace;
use crate::traits::FloatScalar;

use super::LinalgError;

/// Settings for the Jacobi and Gauss-Seidel iterations.
#[derive(Debug, Clone, Copy)]
pub struct IterativeSettings<T> {
    /// Relative change, as a fraction, every component must reach.
    pub tol: T,
    pub max_iter: usize,
    /// Diagonal entries with magnitude at or below this are rejected. Also
    /// floors the denominator of the relative change.
    pub diag_eps: T,
}

impl Default for IterativeSettings<f64> {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            max_iter: 100,
            diag_eps: 1e-12,
        }
    }
}

impl Default for IterativeSettings<f32> {
    fn default() -> Self {
        Self {
            tol: 1e-4,
            max_iter: 100,
            diag_eps: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterativeStatus {
    Converged,
    /// Budget exhausted, or the iterate stopped being finite.
    NotConverged,
}

/// State after one sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord<T> {
    /// 1-based sweep number.
    pub iteration: usize,
    pub x: Vector<T>,
    /// `A·x − b` at the new iterate.
    pub residual: Vector<T>,
    /// Per-component `|Δx_i| / max(|x_i|, diag_eps)`.
    pub rel_change: Vector<T>,
}

impl<T: FloatScalar> IterationRecord<T> {
    pub fn max_rel_change(&self) -> T {
        self.rel_change.norm_inf()
    }
}

#[derive(Debug, Clone)]
pub struct IterativeSolution<T> {
    pub x: Vector<T>,
    pub iterations: usize,
    pub status: IterativeStatus,
    /// Advisory only.
    pub diagonally_dominant: bool,
    pub trace: Trace<IterationRecord<T>>,
}

impl<T> IterativeSolution<T> {
    pub fn converged(&self) -> bool {
        self.status == IterativeStatus::Converged
    }
}

/// Weak row diagonal dominance, strict in at least one row.
///
/// `|A[i][i]| ≥ Σ_{j≠i} |A[i][j]|` for every row, with `>` somewhere.
/// Sufficient (not necessary) for Jacobi and Gauss-Seidel to converge when
/// the matrix is also irreducible.
pub fn is_diagonally_dominant<T: FloatScalar>(a: &Matrix<T>) -> bool {
    let mut strict = false;
    for (i, row) in a.rows().enumerate() {
        let d = row[i].abs();
        let off = row
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .fold(T::zero(), |acc, (_, x)| acc + x.abs());
        if d < off {
            return false;
        }
        strict |= d > off;
    }
    strict
}

/// One Jacobi sweep: every component uses only the previous iterate.
pub fn jacobi_sweep<T: FloatScalar>(a: &Matrix<T>, b: &Vector<T>, x: &Vector<T>) -> Vector<T> {
    (0..a.nrows())
        .map(|i| {
            let sigma = a
                .row(i)
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(T::zero(), |acc, (j, &aij)| acc + aij * x[j]);
            (b[i] - sigma) / a[(i, i)]
        })
        .collect()
}

/// One Gauss-Seidel sweep: components `j < i` already hold this sweep's values.
pub fn gauss_seidel_sweep<T: FloatScalar>(
    a: &Matrix<T>,
    b: &Vector<T>,
    x: &Vector<T>,
) -> Vector<T> {
    let mut next = x.clone();
    for i in 0..a.nrows() {
        let mut sigma = T::zero();
        for (j, &aij) in a.row(i).iter().enumerate() {
            if j != i {
                sigma = sigma + aij * next[j];
            }
        }
        next[i] = (b[i] - sigma) / a[(i, i)];
    }
    next
}

/// Jacobi iteration for `Ax = b` starting from `x0`.
///
/// Converges when *every* component's relative change is at most
/// `settings.tol`. Running out of iterations is not an error: the last
/// iterate comes back with [`IterativeStatus::NotConverged`].
///
/// # Errors
///
/// - [`LinalgError::ZeroDiagonal`] for a diagonal entry `|A[i][i]| ≤ diag_eps`
/// - shape errors if `A` is not square or `b`, `x0` do not match it
///
/// # Example
///
/// ```
/// use numlab::{Matrix, Vector};
/// use numlab::linalg::{jacobi, IterativeSettings};
///
/// let a = Matrix::from_rows(&[[4.0_f64, 1.0], [2.0, 5.0]]);
/// let b = Vector::from_slice(&[9.0, 12.0]);
/// let sol = jacobi(&a, &b, &Vector::zeros(2), &IterativeSettings::default()).unwrap();
/// assert!(sol.converged());
/// assert!((sol.x[0] - 11.0 / 6.0).abs() < 1e-5);
/// ```
pub fn jacobi<T: FloatScalar>(
    a: &Matrix<T>,
    b: &Vector<T>,
    x0: &Vector<T>,
    settings: &IterativeSettings<T>,
) -> Result<IterativeSolution<T>, LinalgError> {
    iterate("jacobi", a, b, x0, settings, jacobi_sweep)
}

/// Gauss-Seidel iteration for `Ax = b`, same contract as [`jacobi`].
pub fn gauss_seidel<T: FloatScalar>(
    a: &Matrix<T>,
    b: &Vector<T>,
    x0: &Vector<T>,
    settings: &IterativeSettings<T>,
) -> Result<IterativeSolution<T>, LinalgError> {
    iterate("gauss-seidel", a, b, x0, settings, gauss_seidel_sweep)
}

fn iterate<T: FloatScalar>(
    method: &str,
    a: &Matrix<T>,
    b: &Vector<T>,
    x0: &Vector<T>,
    settings: &IterativeSettings<T>,
    sweep: fn(&Matrix<T>, &Vector<T>, &Vector<T>) -> Vector<T>,
) -> Result<IterativeSolution<T>, LinalgError> {
    let n = a.check_square()?;
    for v in [b, x0] {
        if v.len() != n {
            return Err(ShapeError::DimensionMismatch {
                expected: (n, 1),
                got: (v.len(), 1),
            }
            .into());
        }
    }
    if !a.is_finite() || !b.is_finite() || !x0.is_finite() {
        return Err(LinalgError::NonFinite);
    }
    if let Some(row) = (0..n).find(|&i| a[(i, i)].abs() <= settings.diag_eps) {
        return Err(LinalgError::ZeroDiagonal { row });
    }

    let diagonally_dominant = is_diagonally_dominant(a);
    if !diagonally_dominant {
        log::warn!("{method}: matrix is not diagonally dominant; convergence is not guaranteed");
    }

    let mut x = x0.clone();
    let mut trace = Trace::new();
    let mut status = IterativeStatus::NotConverged;

    for k in 1..=settings.max_iter {
        let next = sweep(a, b, &x);
        if !next.is_finite() {
            log::warn!("{method}: iterate became non-finite at sweep {k}");
            break;
        }

        let rel_change: Vector<T> = next
            .iter()
            .zip(x.iter())
            .map(|(&new, &old)| (new - old).abs() / new.abs().max(settings.diag_eps))
            .collect();
        let residual = &(a * &next) - b;
        let done = rel_change.iter().all(|&e| e <= settings.tol);

        trace.push(IterationRecord {
            iteration: k,
            x: next.clone(),
            residual,
            rel_change,
        });
        x = next;

        if done {
            status = IterativeStatus::Converged;
            break;
        }
    }

    let iterations = trace.len();
    match status {
        IterativeStatus::Converged => {
            log::debug!("{method}: converged after {iterations} sweeps");
        }
        IterativeStatus::NotConverged => {
            log::warn!("{method}: no convergence after {iterations} sweeps");
        }
    }

    Ok(IterativeSolution {
        x,
        iterations,
        status,
        diagonally_dominant,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn system() -> (Matrix<f64>, Vector<f64>) {
        let a = Matrix::from_rows(&[
            [10.0, -1.0, 2.0, 0.0],
            [-1.0, 11.0, -1.0, 3.0],
            [2.0, -1.0, 10.0, -1.0],
            [0.0, 3.0, -1.0, 8.0],
        ]);
        let b = Vector::from_slice(&[6.0, 25.0, -11.0, 15.0]);
        (a, b)
    }

    #[test]
    fn jacobi_converges_on_dominant_system() {
        let (a, b) = system();
        let sol = jacobi(&a, &b, &Vector::zeros(4), &IterativeSettings::default()).unwrap();
        assert!(sol.converged());
        assert!(sol.diagonally_dominant);
        for (xi, expect) in sol.x.iter().zip([1.0, 2.0, -1.0, 1.0]) {
            assert_abs_diff_eq!(*xi, expect, epsilon = 1e-5);
        }
        let last = sol.trace.last().unwrap();
        assert!(last.max_rel_change() <= 1e-6);
        assert!(last.residual.norm_inf() < 1e-4);
        assert_eq!(last.iteration, sol.iterations);
    }

    #[test]
    fn gauss_seidel_needs_no_more_sweeps() {
        let (a, b) = system();
        let s = IterativeSettings::default();
        let j = jacobi(&a, &b, &Vector::zeros(4), &s).unwrap();
        let gs = gauss_seidel(&a, &b, &Vector::zeros(4), &s).unwrap();
        assert!(gs.converged());
        assert!(gs.iterations <= j.iterations, "{} > {}", gs.iterations, j.iterations);
    }

    #[test]
    fn sweeps_differ_in_update_order() {
        let (a, b) = system();
        let x0 = Vector::zeros(4);
        let j = jacobi_sweep(&a, &b, &x0);
        let gs = gauss_seidel_sweep(&a, &b, &x0);
        // First component is identical; later ones see the update.
        assert_eq!(j[0], gs[0]);
        assert_abs_diff_eq!(j[1], 25.0 / 11.0, epsilon = 1e-15);
        assert_abs_diff_eq!(gs[1], (25.0 + 0.6) / 11.0, epsilon = 1e-15);
    }

    #[test]
    fn zero_diagonal_rejected() {
        let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 0.0]]);
        let b = Vector::from_slice(&[1.0, 1.0]);
        assert_eq!(
            jacobi(&a, &b, &Vector::zeros(2), &IterativeSettings::default()).unwrap_err(),
            LinalgError::ZeroDiagonal { row: 1 }
        );
    }

    #[test]
    fn budget_exhaustion_is_a_status() {
        let (a, b) = system();
        let s = IterativeSettings {
            max_iter: 3,
            ..IterativeSettings::default()
        };
        let sol = gauss_seidel(&a, &b, &Vector::zeros(4), &s).unwrap();
        assert_eq!(sol.status, IterativeStatus::NotConverged);
        assert_eq!(sol.iterations, 3);
        assert_eq!(sol.trace.len(), 3);
    }

    #[test]
    fn non_dominant_still_runs() {
        // Not dominant but SPD, so Gauss-Seidel still converges.
        let a = Matrix::from_rows(&[[1.0, 0.9, 0.9], [0.9, 1.0, 0.9], [0.9, 0.9, 1.0]]);
        assert!(!is_diagonally_dominant(&a));
        let b = Vector::from_slice(&[2.8, 2.8, 2.8]);
        let s = IterativeSettings {
            max_iter: 2000,
            ..IterativeSettings::default()
        };
        let sol = gauss_seidel(&a, &b, &Vector::zeros(3), &s).unwrap();
        assert!(!sol.diagonally_dominant);
        assert!(sol.converged());
        for &xi in sol.x.iter() {
            assert_abs_diff_eq!(xi, 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn dominance_requires_one_strict_row() {
        let a = Matrix::from_rows(&[[1.0, 1.0], [1.0, 1.0]]);
        assert!(!is_diagonally_dominant(&a));
        let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 1.0]]);
        assert!(is_diagonally_dominant(&a));
    }

    #[test]
    fn mismatched_rhs() {
        let (a, _) = system();
        assert!(matches!(
            jacobi(&a, &Vector::zeros(3), &Vector::zeros(4), &IterativeSettings::default()),
            Err(LinalgError::Shape(_))
        ));
    }
}
