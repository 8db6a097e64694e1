use crate::expr::BivariateFn;
use crate::traits::FloatScalar;

use super::{FixedStep, OdeError, StepRecord};

/// Forward Euler: `y_{i+1} = y_i + h·f(x_i, y_i)`.
///
/// ```
/// use numlab::ode::{Euler, FixedStep};
///
/// let r = Euler::step(&mut |x: f64, y: f64| x + y, 0.0, 1.0, 0.1, 1).unwrap();
/// assert!((r.y_next - 1.1).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Euler;

impl FixedStep for Euler {
    const NAME: &'static str = "euler";
    const STAGES: usize = 1;
    const ORDER: usize = 1;

    fn step<T: FloatScalar>(
        f: &mut impl BivariateFn<T>,
        x: T,
        y: T,
        h: T,
        step: usize,
    ) -> Result<StepRecord<T>, OdeError> {
        let k1 = f.call(x, y)?;
        Ok(StepRecord {
            step,
            x,
            y,
            h,
            k1,
            k2: None,
            predictor: None,
            x_next: x + h,
            y_next: y + h * k1,
        })
    }
}
