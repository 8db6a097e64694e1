use crate::expr::BivariateFn;
use crate::traits::FloatScalar;

use super::{FixedStep, OdeError, StepRecord};

/// Explicit midpoint method (RK2).
///
/// `k₁ = f(x, y)`, `k₂ = f(x + h/2, y + h/2·k₁)`, `y_{i+1} = y + h·k₂`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Midpoint;

impl FixedStep for Midpoint {
    const NAME: &'static str = "midpoint";
    const STAGES: usize = 2;
    const ORDER: usize = 2;

    fn step<T: FloatScalar>(
        f: &mut impl BivariateFn<T>,
        x: T,
        y: T,
        h: T,
        step: usize,
    ) -> Result<StepRecord<T>, OdeError> {
        let half_h = h * T::lit(0.5);
        let k1 = f.call(x, y)?;
        let k2 = f.call(x + half_h, y + half_h * k1)?;
        Ok(StepRecord {
            step,
            x,
            y,
            h,
            k1,
            k2: Some(k2),
            predictor: None,
            x_next: x + h,
            y_next: y + h * k2,
        })
    }
}
