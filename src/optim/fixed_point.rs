use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::expr::{EvalError, ScalarFn};
use crate::trace::Trace;
use crate::traits::{relative_error_pct, FloatScalar};

use super::{OptimError, RootSettings, RootSolution, RootStatus};

/// Relaxation factors used by [`relaxation_candidates`].
pub const RELAXATION_FACTORS: [f64; 4] = [1.0, 0.5, 0.2, 0.1];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointRecord<T> {
    pub iteration: usize,
    pub x: T,
    pub gx: T,
    pub error: T,
}

/// Fixed-point iteration `x_{k+1} = g(x_k)`.
///
/// # Errors
///
/// [`OptimError::Diverged`] as soon as `g(x)` is NaN or infinite.
///
/// # Example
///
/// ```
/// use numlab::optim::{fixed_point, RootSettings};
///
/// // x = cos(x)
/// let r = fixed_point(|x: f64| x.cos(), 1.0, &RootSettings { max_error: 1e-8, max_iter: 200 }).unwrap();
/// assert!(r.converged());
/// assert!((r.root - 0.739_085_133_215_160_6).abs() < 1e-8);
/// ```
pub fn fixed_point<T: FloatScalar>(
    mut g: impl ScalarFn<T>,
    x0: T,
    settings: &RootSettings<T>,
) -> Result<RootSolution<T, FixedPointRecord<T>>, OptimError> {
    iterate(&mut g, x0, settings)
}

fn iterate<T: FloatScalar, G: ScalarFn<T> + ?Sized>(
    g: &mut G,
    x0: T,
    settings: &RootSettings<T>,
) -> Result<RootSolution<T, FixedPointRecord<T>>, OptimError> {
    let mut x = x0;
    let mut trace = Trace::new();
    let mut status = RootStatus::NotConverged;
    let mut residual = T::nan();

    for k in 1..=settings.max_iter {
        let gx = g.call(x)?;
        if !gx.is_finite() {
            return Err(OptimError::Diverged { iteration: k });
        }
        let error = if k == 1 {
            T::infinity()
        } else {
            relative_error_pct(gx, x)
        };
        trace.push(FixedPointRecord {
            iteration: k,
            x,
            gx,
            error,
        });
        residual = gx - x;
        x = gx;
        if error <= settings.max_error {
            status = RootStatus::Converged;
            break;
        }
    }

    Ok(RootSolution {
        root: x,
        residual,
        iterations: trace.len(),
        status,
        trace,
    })
}

// ── Candidate rearrangements ────────────────────────────────────────

/// A labelled rearrangement `x = g(x)` of some equation `F(x) = 0`.
pub struct Rearrangement<'a, T> {
    pub label: String,
    g: Box<dyn ScalarFn<T> + 'a>,
}

impl<'a, T> Rearrangement<'a, T> {
    pub fn new(label: impl Into<String>, g: impl ScalarFn<T> + 'a) -> Self {
        Self {
            label: label.into(),
            g: Box::new(g),
        }
    }
}

impl<T> core::fmt::Debug for Rearrangement<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rearrangement")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<T> ScalarFn<T> for Rearrangement<'_, T> {
    fn call(&mut self, x: T) -> Result<T, EvalError> {
        self.g.call(x)
    }
}

struct Relaxation<F, T> {
    f: F,
    lambda: T,
}

impl<T: FloatScalar, F: ScalarFn<T>> ScalarFn<T> for Relaxation<F, T> {
    fn call(&mut self, x: T) -> Result<T, EvalError> {
        Ok(x - self.lambda * self.f.call(x)?)
    }
}

/// Generic rearrangements `g(x) = x − λ·F(x)` for every λ in [`RELAXATION_FACTORS`].
///
/// Useful when no algebraic rearrangement of `F(x) = 0` is at hand.
pub fn relaxation_candidates<'a, T, F>(f: F) -> Vec<Rearrangement<'a, T>>
where
    T: FloatScalar,
    F: ScalarFn<T> + Clone + 'a,
{
    RELAXATION_FACTORS
        .iter()
        .map(|&lambda| {
            Rearrangement::new(
                format!("x - {lambda}*f(x)"),
                Relaxation {
                    f: f.clone(),
                    lambda: T::lit(lambda),
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStatus {
    Converged,
    NoneConverged,
}

/// Outcome of one rearrangement in [`fixed_point_candidates`].
#[derive(Debug, Clone)]
pub struct CandidateRun<T> {
    pub label: String,
    pub outcome: Result<RootSolution<T, FixedPointRecord<T>>, OptimError>,
}

impl<T: FloatScalar> CandidateRun<T> {
    /// Error column of the last iteration, if the run produced one.
    pub fn final_error(&self) -> Option<T> {
        self.outcome
            .as_ref()
            .ok()
            .and_then(|s| s.trace.last())
            .map(|r| r.error)
    }
}

#[derive(Debug, Clone)]
pub struct FixedPointReport<T> {
    pub status: CandidateStatus,
    /// Index into `runs` of the reported candidate.
    pub selected: Option<usize>,
    pub runs: Vec<CandidateRun<T>>,
}

impl<T> FixedPointReport<T> {
    pub fn best(&self) -> Option<&RootSolution<T, FixedPointRecord<T>>> {
        self.selected
            .and_then(|i| self.runs.get(i))
            .and_then(|run| run.outcome.as_ref().ok())
    }
}

/// Try each rearrangement in turn.
///
/// Stops at the first one that converges. Otherwise reports the run with the
/// smallest final error and [`CandidateStatus::NoneConverged`]; `selected` is
/// `None` only when every candidate diverged or failed to evaluate.
///
/// # Errors
///
/// [`OptimError::NoCandidates`] for an empty candidate list.
///
/// ```
/// use numlab::optim::{fixed_point_candidates, CandidateStatus, Rearrangement, RootSettings};
///
/// // x^2 - x - 2 = 0 has a root at 2.
/// let mut candidates = vec![
///     Rearrangement::new("x^2 - 2", |x: f64| x * x - 2.0),
///     Rearrangement::new("sqrt(x + 2)", |x: f64| (x + 2.0).sqrt()),
/// ];
/// let report = fixed_point_candidates(&mut candidates, 2.5, &RootSettings::default()).unwrap();
/// assert_eq!(report.status, CandidateStatus::Converged);
/// assert_eq!(report.selected, Some(1));
/// assert!((report.best().unwrap().root - 2.0).abs() < 1e-6);
/// ```
pub fn fixed_point_candidates<T: FloatScalar>(
    candidates: &mut [Rearrangement<'_, T>],
    x0: T,
    settings: &RootSettings<T>,
) -> Result<FixedPointReport<T>, OptimError> {
    if candidates.is_empty() {
        return Err(OptimError::NoCandidates);
    }

    let mut runs = Vec::with_capacity(candidates.len());
    for cand in candidates.iter_mut() {
        let outcome = iterate(cand, x0, settings);
        let converged = matches!(&outcome, Ok(s) if s.converged());
        runs.push(CandidateRun {
            label: cand.label.clone(),
            outcome,
        });
        if converged {
            let selected = runs.len() - 1;
            log::debug!("fixed point: candidate `{}` converged", runs[selected].label);
            return Ok(FixedPointReport {
                status: CandidateStatus::Converged,
                selected: Some(selected),
                runs,
            });
        }
    }

    let selected = runs
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.final_error().filter(|e| !e.is_nan()).map(|e| (i, e)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal))
        .map(|(i, _)| i);
    log::warn!("fixed point: none of {} candidates converged", runs.len());
    Ok(FixedPointReport {
        status: CandidateStatus::NoneConverged,
        selected,
        runs,
    })
}
