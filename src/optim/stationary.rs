use crate::expr::ScalarFn;
use crate::trace::Trace;
use crate::traits::{relative_error_pct, FloatScalar};

use super::{OptimError, RootStatus};

/// Settings for [`critical_point`].
#[derive(Debug, Clone, Copy)]
pub struct StationarySettings<T> {
    /// Relative percentage error at which the iteration stops.
    pub max_error: T,
    pub max_iter: usize,
    /// `|f''| ≤ flat_eps` at the result classifies it as a saddle/inflection.
    pub flat_eps: T,
}

impl Default for StationarySettings<f64> {
    fn default() -> Self {
        Self {
            max_error: 1e-6,
            max_iter: 100,
            flat_eps: 1e-12,
        }
    }
}

impl Default for StationarySettings<f32> {
    fn default() -> Self {
        Self {
            max_error: 1e-3,
            max_iter: 100,
            flat_eps: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalPointKind {
    Minimum,
    Maximum,
    /// `f''` vanishes: saddle or inflection point.
    Saddle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationaryRecord<T> {
    pub iteration: usize,
    pub x: T,
    pub dfx: T,
    pub d2fx: T,
    pub x_next: T,
    pub error: T,
}

#[derive(Debug, Clone)]
pub struct CriticalPoint<T> {
    pub x: T,
    pub fx: T,
    pub dfx: T,
    pub d2fx: T,
    pub kind: CriticalPointKind,
    pub iterations: usize,
    pub status: RootStatus,
    pub trace: Trace<StationaryRecord<T>>,
}

/// Newton's method on `f'`: `x_{k+1} = x_k − f'(x_k)/f''(x_k)`.
///
/// The returned point is classified by the sign of `f''` there.
///
/// # Errors
///
/// - [`OptimError::ZeroSecondDerivative`] if `f''(x_k)` is exactly zero
/// - [`OptimError::NonFinite`] on NaN or infinite values
///
/// # Example
///
/// ```
/// use numlab::optim::{critical_point, CriticalPointKind, StationarySettings};
///
/// // f(x) = x³ − 3x has a local minimum at 1.
/// let cp = critical_point(
///     |x: f64| x * x * x - 3.0 * x,
///     |x: f64| 3.0 * x * x - 3.0,
///     |x: f64| 6.0 * x,
///     2.0,
///     &StationarySettings::default(),
/// )
/// .unwrap();
/// assert_eq!(cp.kind, CriticalPointKind::Minimum);
/// assert!((cp.x - 1.0).abs() < 1e-10);
/// assert!((cp.fx + 2.0).abs() < 1e-10);
/// ```
pub fn critical_point<T: FloatScalar>(
    mut f: impl ScalarFn<T>,
    mut df: impl ScalarFn<T>,
    mut d2f: impl ScalarFn<T>,
    x0: T,
    settings: &StationarySettings<T>,
) -> Result<CriticalPoint<T>, OptimError> {
    let finite = |v: T, iteration: usize| {
        if v.is_finite() {
            Ok(v)
        } else {
            Err(OptimError::NonFinite { iteration })
        }
    };

    let mut x = x0;
    let mut trace = Trace::new();
    let mut status = RootStatus::NotConverged;

    for k in 1..=settings.max_iter {
        let dfx = finite(df.call(x)?, k)?;
        let d2fx = finite(d2f.call(x)?, k)?;
        if d2fx == T::zero() {
            return Err(OptimError::ZeroSecondDerivative {
                iteration: k,
                x: x.as_f64(),
            });
        }
        let x_next = finite(x - dfx / d2fx, k)?;
        let error = relative_error_pct(x_next, x);
        trace.push(StationaryRecord {
            iteration: k,
            x,
            dfx,
            d2fx,
            x_next,
            error,
        });
        x = x_next;
        if dfx == T::zero() || error <= settings.max_error {
            status = RootStatus::Converged;
            break;
        }
    }

    let iterations = trace.len();
    let fx = finite(f.call(x)?, iterations)?;
    let dfx = finite(df.call(x)?, iterations)?;
    let d2fx = finite(d2f.call(x)?, iterations)?;
    let kind = if d2fx > settings.flat_eps {
        CriticalPointKind::Minimum
    } else if d2fx < -settings.flat_eps {
        CriticalPointKind::Maximum
    } else {
        CriticalPointKind::Saddle
    };
    if status == RootStatus::NotConverged {
        log::warn!("critical point: no convergence after {iterations} iterations");
    }

    Ok(CriticalPoint {
        x,
        fx,
        dfx,
        d2fx,
        kind,
        iterations,
        status,
        trace,
    })
}
