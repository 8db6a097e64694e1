use crate::expr::BivariateFn;
use crate::traits::FloatScalar;

use super::{FixedStep, OdeError, StepRecord};

/// Heun's predictor-corrector method.
///
/// Predicts with an Euler step `y* = y + h·f(x, y)`, then corrects with the
/// mean slope `y_{i+1} = y + h/2·(f(x, y) + f(x + h, y*))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heun;

impl FixedStep for Heun {
    const NAME: &'static str = "heun";
    const STAGES: usize = 2;
    const ORDER: usize = 2;

    fn step<T: FloatScalar>(
        f: &mut impl BivariateFn<T>,
        x: T,
        y: T,
        h: T,
        step: usize,
    ) -> Result<StepRecord<T>, OdeError> {
        let half = T::lit(0.5);
        let k1 = f.call(x, y)?;
        let predictor = y + h * k1;
        let k2 = f.call(x + h, predictor)?;
        Ok(StepRecord {
            step,
            x,
            y,
            h,
            k1,
            k2: Some(k2),
            predictor: Some(predictor),
            x_next: x + h,
            y_next: y + h * half * (k1 + k2),
        })
    }
}
