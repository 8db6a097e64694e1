use alloc::vec::Vec;

use crate::expr::{EvalError, ScalarFn};
use crate::trace::Trace;
use crate::traits::{relative_error_pct, FloatScalar};

use super::{OptimError, RootSolution, RootStatus};

/// Integer range scanned by [`false_position_auto`].
pub const BRACKET_SCAN_RANGE: (i32, i32) = (-100, 100);

/// Settings for scalar root-finding algorithms.
#[derive(Debug, Clone, Copy)]
pub struct RootSettings<T> {
    /// Stop once the relative percentage error is at or below this.
    pub max_error: T,
    /// Maximum number of iterations.
    pub max_iter: usize,
}

impl Default for RootSettings<f64> {
    fn default() -> Self {
        Self {
            max_error: 1e-6,
            max_iter: 100,
        }
    }
}

impl Default for RootSettings<f32> {
    fn default() -> Self {
        Self {
            max_error: 1e-3,
            max_iter: 100,
        }
    }
}

fn eval<T: FloatScalar>(f: &mut impl ScalarFn<T>, x: T, iteration: usize) -> Result<T, OptimError> {
    let y = f.call(x)?;
    if y.is_finite() {
        Ok(y)
    } else {
        Err(OptimError::NonFinite { iteration })
    }
}

fn error_since<T: FloatScalar>(new: T, prev: Option<T>) -> T {
    prev.map_or_else(T::infinity, |old| relative_error_pct(new, old))
}

// ── False position ──────────────────────────────────────────────────

/// Sign-change bracket with cached endpoint values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket<T> {
    pub a: T,
    pub b: T,
    pub fa: T,
    pub fb: T,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FalsePositionRecord<T> {
    pub iteration: usize,
    /// Bracket the iteration started from.
    pub bracket: Bracket<T>,
    pub x: T,
    pub fx: T,
    pub error: T,
}

/// One regula falsi step: `x = (a·f(b) − b·f(a)) / (f(b) − f(a))`.
///
/// Returns the shrunk bracket together with `(x, f(x))`. If `f(a)·f(x) < 0`
/// the root lies in `[a, x]`, otherwise in `[x, b]`.
pub fn false_position_step<T: FloatScalar>(
    f: &mut impl ScalarFn<T>,
    br: &Bracket<T>,
    iteration: usize,
) -> Result<(Bracket<T>, T, T), OptimError> {
    let x = (br.a * br.fb - br.b * br.fa) / (br.fb - br.fa);
    if !x.is_finite() {
        return Err(OptimError::NonFinite { iteration });
    }
    let fx = eval(f, x, iteration)?;
    let next = if br.fa * fx < T::zero() {
        Bracket { b: x, fb: fx, ..*br }
    } else {
        Bracket { a: x, fa: fx, ..*br }
    };
    Ok((next, x, fx))
}

/// False position (regula falsi) on the bracket `[a, b]`.
///
/// # Errors
///
/// - [`OptimError::InvalidBracket`] unless `a < b`
/// - [`OptimError::NoSignChange`] unless `f(a)·f(b) < 0`
/// - [`OptimError::NonFinite`] if an evaluation is NaN or infinite
///
/// # Example
///
/// ```
/// use numlab::optim::{false_position, RootSettings};
///
/// let r = false_position(|x: f64| x * x - 2.0, 1.0, 2.0, &RootSettings::default()).unwrap();
/// assert!(r.converged());
/// assert!((r.root - core::f64::consts::SQRT_2).abs() < 1e-8);
/// assert!(r.trace[0].error.is_infinite());
/// ```
pub fn false_position<T: FloatScalar>(
    mut f: impl ScalarFn<T>,
    a: T,
    b: T,
    settings: &RootSettings<T>,
) -> Result<RootSolution<T, FalsePositionRecord<T>>, OptimError> {
    if !(a < b) {
        return Err(OptimError::InvalidBracket {
            a: a.as_f64(),
            b: b.as_f64(),
        });
    }
    let fa = eval(&mut f, a, 0)?;
    let fb = eval(&mut f, b, 0)?;
    if !(fa * fb < T::zero()) {
        return Err(OptimError::NoSignChange {
            a: a.as_f64(),
            b: b.as_f64(),
            fa: fa.as_f64(),
            fb: fb.as_f64(),
        });
    }

    let mut br = Bracket { a, b, fa, fb };
    let mut trace = Trace::new();
    let mut prev = None;
    let mut status = RootStatus::NotConverged;
    let (mut root, mut residual) = (a, fa);

    for k in 1..=settings.max_iter {
        let (next, x, fx) = false_position_step(&mut f, &br, k)?;
        let error = error_since(x, prev);
        trace.push(FalsePositionRecord {
            iteration: k,
            bracket: br,
            x,
            fx,
            error,
        });
        br = next;
        prev = Some(x);
        (root, residual) = (x, fx);
        if fx == T::zero() || error <= settings.max_error {
            status = RootStatus::Converged;
            break;
        }
    }

    log::debug!("false position: {:?} after {} iterations", status, trace.len());
    Ok(RootSolution {
        root,
        residual,
        iterations: trace.len(),
        status,
        trace,
    })
}

/// Unit intervals `[i, i+1]` in `[lo, hi]` over which `f` changes sign.
///
/// Points where `f` is non-finite or reports [`EvalError::Domain`] are
/// skipped; other evaluation errors are returned. A root that falls exactly
/// on an integer produces no strict sign change and is not reported.
pub fn scan_brackets<T: FloatScalar>(
    f: &mut impl ScalarFn<T>,
    lo: i32,
    hi: i32,
) -> Result<Vec<(T, T)>, OptimError> {
    let mut sample = |i: i32| -> Result<Option<T>, OptimError> {
        match f.call(T::lit(f64::from(i))) {
            Ok(y) if y.is_finite() => Ok(Some(y)),
            Ok(_) | Err(EvalError::Domain(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    };

    let mut found = Vec::new();
    let mut left = sample(lo)?;
    for i in lo..hi {
        let right = sample(i + 1)?;
        if let (Some(fl), Some(fr)) = (left, right) {
            if fl * fr < T::zero() {
                found.push((T::lit(f64::from(i)), T::lit(f64::from(i + 1))));
            }
        }
        left = right;
    }
    Ok(found)
}

/// False position on the first sign change found by [`scan_brackets`] over
/// [`BRACKET_SCAN_RANGE`].
///
/// # Errors
///
/// [`OptimError::NoBracketFound`] if no unit interval changes sign.
pub fn false_position_auto<T: FloatScalar>(
    mut f: impl ScalarFn<T>,
    settings: &RootSettings<T>,
) -> Result<RootSolution<T, FalsePositionRecord<T>>, OptimError> {
    let (lo, hi) = BRACKET_SCAN_RANGE;
    let brackets = scan_brackets(&mut f, lo, hi)?;
    let Some(&(a, b)) = brackets.first() else {
        return Err(OptimError::NoBracketFound { lo, hi });
    };
    log::debug!("false position: using bracket [{a}, {b}] of {} found", brackets.len());
    false_position(f, a, b, settings)
}

// ── Newton-Raphson ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRecord<T> {
    pub iteration: usize,
    pub x: T,
    pub fx: T,
    pub dfx: T,
    pub x_next: T,
    pub error: T,
}

/// One Newton step `x − f(x)/f'(x)`, returning `(x_next, f(x), f'(x))`.
///
/// The derivative is checked first, so a root with a flat tangent is still
/// reported as [`OptimError::ZeroDerivative`].
pub fn newton_step<T: FloatScalar>(
    f: &mut impl ScalarFn<T>,
    df: &mut impl ScalarFn<T>,
    x: T,
    iteration: usize,
) -> Result<(T, T, T), OptimError> {
    let fx = eval(f, x, iteration)?;
    let dfx = eval(df, x, iteration)?;
    if dfx == T::zero() {
        return Err(OptimError::ZeroDerivative {
            iteration,
            x: x.as_f64(),
        });
    }
    let x_next = x - fx / dfx;
    if !x_next.is_finite() {
        return Err(OptimError::NonFinite { iteration });
    }
    Ok((x_next, fx, dfx))
}

/// Newton-Raphson root finding.
///
/// # Errors
///
/// - [`OptimError::ZeroDerivative`] if `f'(x_k)` is exactly zero
/// - [`OptimError::NonFinite`] if an evaluation or step is NaN or infinite
///
/// # Example
///
/// ```
/// use numlab::optim::{newton_raphson, OptimError, RootSettings};
///
/// let s = RootSettings::default();
/// let r = newton_raphson(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, 1.0, &s).unwrap();
/// assert!((r.root - core::f64::consts::SQRT_2).abs() < 1e-12);
/// assert!(r.iterations <= 6);
///
/// let flat = newton_raphson(|x: f64| x * x * x, |x: f64| 3.0 * x * x, 0.0, &s);
/// assert!(matches!(flat, Err(OptimError::ZeroDerivative { iteration: 1, .. })));
/// ```
pub fn newton_raphson<T: FloatScalar>(
    mut f: impl ScalarFn<T>,
    mut df: impl ScalarFn<T>,
    x0: T,
    settings: &RootSettings<T>,
) -> Result<RootSolution<T, NewtonRecord<T>>, OptimError> {
    let mut x = x0;
    let mut trace = Trace::new();
    let mut status = RootStatus::NotConverged;

    for k in 1..=settings.max_iter {
        let (x_next, fx, dfx) = newton_step(&mut f, &mut df, x, k)?;
        // The previous row's new iterate is the current x.
        let error = if k == 1 {
            T::infinity()
        } else {
            relative_error_pct(x_next, x)
        };
        trace.push(NewtonRecord {
            iteration: k,
            x,
            fx,
            dfx,
            x_next,
            error,
        });
        x = x_next;
        if fx == T::zero() || error <= settings.max_error {
            status = RootStatus::Converged;
            break;
        }
    }

    let residual = eval(&mut f, x, trace.len())?;
    log::debug!("newton-raphson: {:?} after {} iterations", status, trace.len());
    Ok(RootSolution {
        root: x,
        residual,
        iterations: trace.len(),
        status,
        trace,
    })
}

// ── Secant ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantRecord<T> {
    pub iteration: usize,
    pub x_prev: T,
    pub x: T,
    pub f_prev: T,
    pub fx: T,
    pub x_next: T,
    pub f_next: T,
    pub error: T,
}

/// One secant step `x_k − f(x_k)·(x_k − x_{k−1}) / (f(x_k) − f(x_{k−1}))`.
///
/// Returns `(x_next, f(x_next))`.
pub fn secant_step<T: FloatScalar>(
    f: &mut impl ScalarFn<T>,
    (x_prev, f_prev): (T, T),
    (x, fx): (T, T),
    iteration: usize,
) -> Result<(T, T), OptimError> {
    let denom = fx - f_prev;
    if denom.abs() < T::epsilon() {
        return Err(OptimError::ZeroDenominator { iteration });
    }
    let x_next = x - fx * (x - x_prev) / denom;
    if !x_next.is_finite() {
        return Err(OptimError::NonFinite { iteration });
    }
    let f_next = eval(f, x_next, iteration)?;
    Ok((x_next, f_next))
}

/// Secant method from seeds `x0`, `x1`.
///
/// # Errors
///
/// - [`OptimError::DegenerateSeeds`] if `x0 == x1`
/// - [`OptimError::ZeroDenominator`] if `|f(x_k) − f(x_{k−1})|` drops below machine epsilon
/// - [`OptimError::NonFinite`] on NaN or infinite values
///
/// ```
/// use numlab::optim::{secant, RootSettings};
///
/// let r = secant(|x: f64| x.cos() - x, 0.0, 1.0, &RootSettings::default()).unwrap();
/// assert!((r.root - 0.739_085_133_215_160_6).abs() < 1e-10);
/// ```
pub fn secant<T: FloatScalar>(
    mut f: impl ScalarFn<T>,
    x0: T,
    x1: T,
    settings: &RootSettings<T>,
) -> Result<RootSolution<T, SecantRecord<T>>, OptimError> {
    if x0 == x1 {
        return Err(OptimError::DegenerateSeeds);
    }
    let mut prev = (x0, eval(&mut f, x0, 0)?);
    let mut cur = (x1, eval(&mut f, x1, 0)?);
    let mut trace = Trace::new();
    let mut status = RootStatus::NotConverged;

    for k in 1..=settings.max_iter {
        let (x_next, f_next) = secant_step(&mut f, prev, cur, k)?;
        let error = if k == 1 {
            T::infinity()
        } else {
            relative_error_pct(x_next, cur.0)
        };
        trace.push(SecantRecord {
            iteration: k,
            x_prev: prev.0,
            x: cur.0,
            f_prev: prev.1,
            fx: cur.1,
            x_next,
            f_next,
            error,
        });
        prev = cur;
        cur = (x_next, f_next);
        if f_next == T::zero() || error <= settings.max_error {
            status = RootStatus::Converged;
            break;
        }
    }

    log::debug!("secant: {:?} after {} iterations", status, trace.len());
    Ok(RootSolution {
        root: cur.0,
        residual: cur.1,
        iterations: trace.len(),
        status,
        trace,
    })
}
