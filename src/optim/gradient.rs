use crate::expr::{GradientFn, VectorFn};
use crate::matrix::Vector;
use crate::trace::Trace;
use crate::traits::FloatScalar;

use super::line_search::{backtracking_armijo, ArmijoSettings};
use super::{Goal, OptimError};

/// Settings for the gradient method.
#[derive(Debug, Clone, Copy)]
pub struct GradientSettings<T> {
    pub goal: Goal,
    /// Stop when `‖Δx‖ / max(1, ‖x_new‖) · 100` is at or below this.
    pub max_error: T,
    /// Stop when `‖∇f‖` drops below this.
    pub grad_tol: T,
    pub max_iter: usize,
    pub line_search: ArmijoSettings<T>,
}

impl Default for GradientSettings<f64> {
    fn default() -> Self {
        Self {
            goal: Goal::Minimize,
            max_error: 0.01,
            grad_tol: 1e-12,
            max_iter: 200,
            line_search: ArmijoSettings::default(),
        }
    }
}

impl Default for GradientSettings<f32> {
    fn default() -> Self {
        Self {
            goal: Goal::Minimize,
            max_error: 0.01,
            grad_tol: 1e-6,
            max_iter: 200,
            line_search: ArmijoSettings::default(),
        }
    }
}

impl<T> GradientSettings<T>
where
    Self: Default,
{
    pub fn maximize() -> Self {
        Self {
            goal: Goal::Maximize,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientRecord<T> {
    pub iteration: usize,
    pub x: Vector<T>,
    pub fx: T,
    pub gradient: Vector<T>,
    pub grad_norm: T,
    /// `−∇f` when minimizing, `+∇f` when maximizing.
    pub direction: Vector<T>,
    pub alpha: T,
    pub x_next: Vector<T>,
    pub f_next: T,
    pub error: T,
    pub armijo_satisfied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientStatus {
    /// Gradient norm fell below `grad_tol`.
    StationaryPoint,
    /// Step error fell below `max_error` on an accepted Armijo step.
    Converged,
    /// Backtracking failed and the forced step no longer moves `x`.
    Stalled,
    NotConverged,
}

#[derive(Debug, Clone)]
pub struct GradientResult<T> {
    pub x: Vector<T>,
    pub fx: T,
    pub gradient: Vector<T>,
    pub iterations: usize,
    /// Objective evaluations, line search included.
    pub evals: usize,
    pub status: GradientStatus,
    pub trace: Trace<GradientRecord<T>>,
}

/// One ascent/descent step from `x` with known `f(x)` and `∇f(x)`.
pub fn gradient_step<T: FloatScalar>(
    f: &mut impl VectorFn<T>,
    x: &Vector<T>,
    fx: T,
    gradient: &Vector<T>,
    settings: &GradientSettings<T>,
    iteration: usize,
) -> Result<(GradientRecord<T>, usize), OptimError> {
    let direction = match settings.goal {
        Goal::Minimize => gradient * -T::one(),
        Goal::Maximize => gradient.clone(),
    };
    let slope = gradient.dot(&direction);
    let step = backtracking_armijo(
        f,
        x,
        fx,
        &direction,
        slope,
        settings.goal,
        &settings.line_search,
    )?;
    let moved = (&step.x_new - x).norm();
    let error = moved / T::one().max(step.x_new.norm()) * T::lit(100.0);

    let record = GradientRecord {
        iteration,
        x: x.clone(),
        fx,
        gradient: gradient.clone(),
        grad_norm: gradient.norm(),
        direction,
        alpha: step.alpha,
        x_next: step.x_new,
        f_next: step.f_new,
        error,
        armijo_satisfied: step.satisfied,
    };
    Ok((record, step.evals))
}

/// Steepest descent (or ascent) with Armijo backtracking.
///
/// # Errors
///
/// - [`OptimError::DimensionMismatch`] if `grad` returns the wrong length
/// - [`OptimError::NonFinite`] if `f` or `∇f` stop being finite
///
/// # Example
///
/// ```
/// use numlab::optim::{gradient_method, GradientSettings, GradientStatus};
/// use numlab::Vector;
///
/// // Minimum of (x - 1)² + 2(y + 2)² at (1, -2)
/// let r = gradient_method(
///     |p: &[f64]| (p[0] - 1.0).powi(2) + 2.0 * (p[1] + 2.0).powi(2),
///     |p: &[f64]| Vector::from_slice(&[2.0 * (p[0] - 1.0), 4.0 * (p[1] + 2.0)]),
///     &[0.0, 0.0],
///     &GradientSettings::default(),
/// )
/// .unwrap();
/// assert_eq!(r.status, GradientStatus::StationaryPoint);
/// assert!((r.x[0] - 1.0).abs() < 1e-12);
/// assert!((r.x[1] + 2.0).abs() < 1e-12);
/// ```
pub fn gradient_method<T: FloatScalar>(
    mut f: impl VectorFn<T>,
    mut grad: impl GradientFn<T>,
    x0: &[T],
    settings: &GradientSettings<T>,
) -> Result<GradientResult<T>, OptimError> {
    let n = x0.len();
    let mut eval_grad = |x: &Vector<T>, iteration: usize| -> Result<Vector<T>, OptimError> {
        let g = grad.gradient(x.as_slice())?;
        if g.len() != n {
            return Err(OptimError::DimensionMismatch {
                expected: n,
                got: g.len(),
            });
        }
        if !g.is_finite() {
            return Err(OptimError::NonFinite { iteration });
        }
        Ok(g)
    };

    let mut x = Vector::from_slice(x0);
    let mut fx = f.call(x0)?;
    if !fx.is_finite() {
        return Err(OptimError::NonFinite { iteration: 0 });
    }
    let mut g = eval_grad(&x, 0)?;
    let mut evals = 1;
    let mut trace = Trace::new();
    let mut status = GradientStatus::NotConverged;

    for k in 1..=settings.max_iter {
        if g.norm() < settings.grad_tol {
            status = GradientStatus::StationaryPoint;
            break;
        }
        let (record, used) = gradient_step(&mut f, &x, fx, &g, settings, k)?;
        evals += used;
        let g_next = eval_grad(&record.x_next, k)?;

        x = record.x_next.clone();
        fx = record.f_next;
        g = g_next;
        let small = record.error <= settings.max_error;
        let satisfied = record.armijo_satisfied;
        trace.push(record);
        if small {
            status = if satisfied {
                GradientStatus::Converged
            } else {
                log::warn!("gradient method: line search stalled at iteration {k}");
                GradientStatus::Stalled
            };
            break;
        }
    }
    // The budget can run out exactly when the last step lands on a stationary point.
    if status == GradientStatus::NotConverged && g.norm() < settings.grad_tol {
        status = GradientStatus::StationaryPoint;
    }

    log::debug!("gradient method: {:?} after {} iterations", status, trace.len());
    Ok(GradientResult {
        x,
        fx,
        gradient: g,
        iterations: trace.len(),
        evals,
        status,
        trace,
    })
}
