use crate::expr::VectorFn;
use crate::matrix::Vector;
use crate::traits::FloatScalar;

use super::{Goal, OptimError};

/// Parameters of the Armijo backtracking line search.
#[derive(Debug, Clone, Copy)]
pub struct ArmijoSettings<T> {
    /// First trial step.
    pub initial_step: T,
    /// Contraction factor β in `α ← β·α`.
    pub beta: T,
    /// Sufficient-change constant `c1`.
    pub c1: T,
    pub max_backtracks: usize,
    /// Backtracking stops before α would drop below this.
    pub min_step: T,
}

impl Default for ArmijoSettings<f64> {
    fn default() -> Self {
        Self {
            initial_step: 1.0,
            beta: 0.5,
            c1: 1e-4,
            max_backtracks: 50,
            min_step: 1e-12,
        }
    }
}

impl Default for ArmijoSettings<f32> {
    fn default() -> Self {
        Self {
            initial_step: 1.0,
            beta: 0.5,
            c1: 1e-4,
            max_backtracks: 50,
            min_step: 1e-6,
        }
    }
}

/// Accepted (or last tried) step of a line search.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmijoStep<T> {
    pub alpha: T,
    pub x_new: Vector<T>,
    pub f_new: T,
    pub evals: usize,
    /// `false` when backtracking hit its cap; `alpha` is then the last trial.
    pub satisfied: bool,
}

/// Backtracking line search along `s` from `x`.
///
/// Starts at `initial_step` and contracts by `beta` until the Armijo
/// condition holds:
///
/// - minimize: `f(x + α·s) ≤ f(x) + c1·α·(∇f·s)`
/// - maximize: `f(x + α·s) ≥ f(x) + c1·α·(∇f·s)`
///
/// `slope` is `∇f·s`. If the cap on attempts or the `min_step` floor is
/// reached first, the last trial step is returned with `satisfied == false`.
///
/// # Errors
///
/// [`OptimError::NonFinite`] if even the last trial point evaluates to NaN or
/// infinity.
pub fn backtracking_armijo<T: FloatScalar>(
    f: &mut impl VectorFn<T>,
    x: &Vector<T>,
    fx: T,
    s: &Vector<T>,
    slope: T,
    goal: Goal,
    settings: &ArmijoSettings<T>,
) -> Result<ArmijoStep<T>, OptimError> {
    let mut alpha = settings.initial_step;
    let mut evals = 0;

    loop {
        let x_new = x + &(s * alpha);
        let f_new = f.call(x_new.as_slice())?;
        evals += 1;

        let bound = fx + settings.c1 * alpha * slope;
        let accepted = f_new.is_finite()
            && match goal {
                Goal::Minimize => f_new <= bound,
                Goal::Maximize => f_new >= bound,
            };
        let exhausted = evals > settings.max_backtracks || alpha * settings.beta < settings.min_step;

        if accepted || exhausted {
            if !f_new.is_finite() {
                return Err(OptimError::NonFinite { iteration: evals });
            }
            if !accepted {
                log::warn!("armijo: backtracking cap reached at alpha = {alpha}");
            }
            return Ok(ArmijoStep {
                alpha,
                x_new,
                f_new,
                evals,
                satisfied: accepted,
            });
        }
        alpha = alpha * settings.beta;
    }
}
