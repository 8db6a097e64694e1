use crate::expr::BivariateFn;
use crate::trace::Trace;
use crate::traits::FloatScalar;

use super::{OdeError, OdeSettings, OdeSolution, OdeStatus, StepRecord};

/// Trait for explicit fixed-step solvers.
///
/// Each solver is a zero-size struct providing [`step`](FixedStep::step);
/// [`integrate`](FixedStep::integrate) is the shared harness.
pub trait FixedStep {
    const NAME: &'static str;
    /// Evaluations of `f` per step.
    const STAGES: usize;
    const ORDER: usize;

    /// Advance `(x, y)` by `h`.
    fn step<T: FloatScalar>(
        f: &mut impl BivariateFn<T>,
        x: T,
        y: T,
        h: T,
        step: usize,
    ) -> Result<StepRecord<T>, OdeError>;

    /// Integrate from `(x0, y0)` to `x_final` with step `h`.
    ///
    /// A step that would overshoot `x_final` (or end within `1e-9·h` of it) is
    /// shortened so the final abscissa equals `x_final` exactly. Hitting
    /// `settings.max_steps` first ends with [`OdeStatus::StepLimitReached`].
    ///
    /// # Errors
    ///
    /// - [`OdeError::InvalidStep`] unless `h` is positive and finite
    /// - [`OdeError::InvalidInterval`] unless `x_final > x0`
    /// - [`OdeError::NonFinite`] if the solution blows up
    fn integrate<T: FloatScalar>(
        mut f: impl BivariateFn<T>,
        x0: T,
        y0: T,
        h: T,
        x_final: T,
        settings: &OdeSettings,
    ) -> Result<OdeSolution<T>, OdeError> {
        if !(h > T::zero()) || !h.is_finite() {
            return Err(OdeError::InvalidStep { h: h.as_f64() });
        }
        if !(x_final > x0) || !x0.is_finite() || !x_final.is_finite() {
            return Err(OdeError::InvalidInterval {
                x0: x0.as_f64(),
                x_final: x_final.as_f64(),
            });
        }

        let slack = h * T::lit(1e-9);
        let (mut x, mut y) = (x0, y0);
        let mut trace = Trace::new();
        let mut status = OdeStatus::Completed;

        while x < x_final {
            if trace.len() >= settings.max_steps {
                status = OdeStatus::StepLimitReached;
                log::warn!("{}: step limit {} reached at x = {x}", Self::NAME, settings.max_steps);
                break;
            }
            let last = x + h >= x_final - slack;
            let hi = if last { x_final - x } else { h };
            let mut record = Self::step(&mut f, x, y, hi, trace.len() + 1)?;
            if last {
                record.x_next = x_final;
            }
            if !record.y_next.is_finite() {
                return Err(OdeError::NonFinite { step: record.step });
            }
            x = record.x_next;
            y = record.y_next;
            trace.push(record);
        }

        let steps = trace.len();
        log::debug!("{}: {steps} steps to x = {x}", Self::NAME);
        Ok(OdeSolution {
            x0,
            y0,
            x,
            y,
            steps,
            evals: steps * Self::STAGES,
            status,
            trace,
        })
    }
}
