use super::*;
use crate::expr::{Differentiator, EvalError, Evaluator, ExprFn, Fallible};
use crate::{relative_error_pct, Vector};
use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::SQRT_2;

const TOL: f64 = 1e-8;
const LOOSE_TOL: f64 = 1e-2;

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff {})",
        msg,
        a,
        b,
        (a - b).abs()
    );
}

// ═══════════════════════════════════════════════════════════════════
// False position
// ═══════════════════════════════════════════════════════════════════

#[test]
fn false_position_sqrt2() {
    let r = false_position(|x: f64| x * x - 2.0, 1.0, 2.0, &RootSettings::default()).unwrap();
    assert!(r.converged());
    assert_near(r.root, SQRT_2, TOL, "false position √2");
    assert!(r.trace[0].error.is_infinite());
    // Each record compares against the previous record's iterate.
    for w in r.trace.records().windows(2) {
        assert_near(w[1].error, relative_error_pct(w[1].x, w[0].x), 1e-15, "error column");
    }
    assert_eq!(r.iterations, r.trace.len());
}

#[test]
fn false_position_bracket_shrinks_around_root() {
    let r = false_position(|x: f64| x * x - 2.0, 1.0, 2.0, &RootSettings::default()).unwrap();
    for rec in &r.trace {
        let br = rec.bracket;
        assert!(br.a <= SQRT_2 && SQRT_2 <= br.b);
        assert!(br.fa * br.fb < 0.0);
    }
}

#[test]
fn false_position_rejects_bad_brackets() {
    let s = RootSettings::default();
    assert_eq!(
        false_position(|x: f64| x * x + 1.0, 0.0, 2.0, &s).unwrap_err(),
        OptimError::NoSignChange {
            a: 0.0,
            b: 2.0,
            fa: 1.0,
            fb: 5.0
        }
    );
    assert_eq!(
        false_position(|x: f64| x, 1.0, -1.0, &s).unwrap_err(),
        OptimError::InvalidBracket { a: 1.0, b: -1.0 }
    );
}

#[test]
fn false_position_exact_root_stops() {
    // The first interpolant hits the root exactly.
    let r = false_position(|x: f64| x - 1.0, 0.0, 2.0, &RootSettings::default()).unwrap();
    assert!(r.converged());
    assert_eq!(r.iterations, 1);
    assert_eq!(r.root, 1.0);
}

#[test]
fn false_position_auto_takes_first_bracket() {
    let r = false_position_auto(|x: f64| x * x - 2.0, &RootSettings::default()).unwrap();
    assert_near(r.root, -SQRT_2, TOL, "leftmost root");
}

#[test]
fn false_position_auto_no_bracket() {
    let r = false_position_auto(|x: f64| x * x + 1.0, &RootSettings::default());
    assert_eq!(r.unwrap_err(), OptimError::NoBracketFound { lo: -100, hi: 100 });
}

#[test]
fn scan_skips_domain_errors() {
    let mut ln = Fallible(|x: f64| {
        if x <= 0.0 {
            Err(EvalError::Domain("log of non-positive".into()))
        } else {
            Ok(x.ln() - 0.5)
        }
    });
    let found = scan_brackets(&mut ln, -5, 5).unwrap();
    assert_eq!(found, vec![(1.0, 2.0)]);
}

#[test]
fn scan_propagates_other_errors() {
    let mut bad = Fallible(|_: f64| -> Result<f64, EvalError> {
        Err(EvalError::UndefinedSymbol("y".into()))
    });
    let r = scan_brackets(&mut bad, 0, 3);
    assert_eq!(
        r.unwrap_err(),
        OptimError::Eval(EvalError::UndefinedSymbol("y".into()))
    );
}

// ═══════════════════════════════════════════════════════════════════
// Newton-Raphson and secant
// ═══════════════════════════════════════════════════════════════════

#[test]
fn newton_quadratic_convergence() {
    let r = newton_raphson(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, 1.0, &RootSettings::default())
        .unwrap();
    assert!(r.converged());
    assert!(r.iterations <= 6);
    assert_near(r.root, SQRT_2, 1e-14, "newton √2");
    assert_near(r.residual, 0.0, 1e-14, "residual");
    assert_eq!(r.trace[0].x_next, 1.5);
    assert!(r.trace[0].error.is_infinite());
}

#[test]
fn newton_zero_derivative() {
    let r = newton_raphson(|x: f64| x * x * x, |x: f64| 3.0 * x * x, 0.0, &RootSettings::default());
    assert_eq!(
        r.unwrap_err(),
        OptimError::ZeroDerivative {
            iteration: 1,
            x: 0.0
        }
    );
}

#[test]
fn newton_budget_reports_not_converged() {
    let settings = RootSettings {
        max_error: 1e-6,
        max_iter: 2,
    };
    let r = newton_raphson(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, 10.0, &settings).unwrap();
    assert_eq!(r.status, RootStatus::NotConverged);
    assert_eq!(r.iterations, 2);
}

#[test]
fn secant_matches_newton_root() {
    let r = secant(|x: f64| x * x - 2.0, 1.0, 2.0, &RootSettings::default()).unwrap();
    assert!(r.converged());
    assert_near(r.root, SQRT_2, TOL, "secant √2");
    // Seeds shift by one each iteration.
    let t = r.trace.records();
    for w in t.windows(2) {
        assert_eq!(w[1].x_prev, w[0].x);
        assert_eq!(w[1].x, w[0].x_next);
    }
}

#[test]
fn secant_degenerate_and_flat() {
    let s = RootSettings::default();
    assert_eq!(
        secant(|x: f64| x - 1.0, 3.0, 3.0, &s).unwrap_err(),
        OptimError::DegenerateSeeds
    );
    assert_eq!(
        secant(|x: f64| x * x, -1.0, 1.0, &s).unwrap_err(),
        OptimError::ZeroDenominator { iteration: 1 }
    );
}

#[test]
fn newton_f32() {
    let r = newton_raphson(|x: f32| x * x - 2.0, |x: f32| 2.0 * x, 1.0f32, &RootSettings::default())
        .unwrap();
    assert!((r.root - core::f32::consts::SQRT_2).abs() < 1e-6);
}

// ═══════════════════════════════════════════════════════════════════
// Fixed point
// ═══════════════════════════════════════════════════════════════════

#[test]
fn fixed_point_diverges_to_infinity() {
    let r = fixed_point(|x: f64| x * x, 2.0, &RootSettings::default());
    assert_eq!(r.unwrap_err(), OptimError::Diverged { iteration: 10 });
}

#[test]
fn fixed_point_residual_is_last_step() {
    let r = fixed_point(|x: f64| 0.5 * x + 1.0, 0.0, &RootSettings::default()).unwrap();
    assert!(r.converged());
    assert_near(r.root, 2.0, 1e-6, "fixed point of x/2 + 1");
    let last = r.trace.last().unwrap();
    assert_eq!(r.residual, last.gx - last.x);
}

#[test]
fn relaxation_picks_first_converging_factor() {
    // λ = 1 cycles between 2 and 0; λ = 0.5 contracts.
    let mut cands = relaxation_candidates(|x: f64| x * x - 2.0);
    assert_eq!(cands.len(), RELAXATION_FACTORS.len());
    assert_eq!(cands[0].label, "x - 1*f(x)");
    let report = fixed_point_candidates(&mut cands, 1.0, &RootSettings::default()).unwrap();
    assert_eq!(report.status, CandidateStatus::Converged);
    assert_eq!(report.selected, Some(1));
    assert_eq!(report.runs.len(), 2);
    assert_eq!(report.runs[1].label, "x - 0.5*f(x)");
    assert_near(report.best().unwrap().root, SQRT_2, 1e-6, "relaxed root");
    assert_eq!(report.runs[0].outcome.as_ref().unwrap().status, RootStatus::NotConverged);
}

#[test]
fn candidates_report_smallest_final_error() {
    let mut cands = vec![
        Rearrangement::new("x^2", |x: f64| x * x),
        Rearrangement::new("-x", |x: f64| -x),
        Rearrangement::new("x + 1", |x: f64| x + 1.0),
    ];
    let report = fixed_point_candidates(&mut cands, 2.0, &RootSettings::default()).unwrap();
    assert_eq!(report.status, CandidateStatus::NoneConverged);
    assert_eq!(report.runs.len(), 3);
    assert!(report.runs[0].outcome.is_err());
    assert_eq!(report.selected, Some(2));
    assert!(report.runs[2].final_error().unwrap() < report.runs[1].final_error().unwrap());
}

#[test]
fn candidates_require_input() {
    let mut none: Vec<Rearrangement<'_, f64>> = Vec::new();
    assert_eq!(
        fixed_point_candidates(&mut none, 0.0, &RootSettings::default()).unwrap_err(),
        OptimError::NoCandidates
    );
}

// ═══════════════════════════════════════════════════════════════════
// Gradient method
// ═══════════════════════════════════════════════════════════════════

#[test]
fn gradient_ascent_lands_on_peak() {
    let f = |p: &[f64]| -(p[0] - 3.0).powi(2) - (p[1] - 1.0).powi(2) + 5.0;
    let g = |p: &[f64]| Vector::from_slice(&[-2.0 * (p[0] - 3.0), -2.0 * (p[1] - 1.0)]);
    let r = gradient_method(f, g, &[0.0, 0.0], &GradientSettings::maximize()).unwrap();
    assert_eq!(r.status, GradientStatus::StationaryPoint);
    assert_eq!(r.iterations, 1);
    assert_eq!(r.x.as_slice(), &[3.0, 1.0]);
    assert_eq!(r.fx, 5.0);
    let step = &r.trace[0];
    assert_eq!(step.alpha, 0.5);
    assert!(step.armijo_satisfied);
    assert_eq!(step.direction.as_slice(), &[6.0, 2.0]);
}

#[test]
fn gradient_descent_ill_conditioned() {
    let f = |p: &[f64]| (p[0] - 1.0).powi(2) + 10.0 * p[1] * p[1];
    let g = |p: &[f64]| Vector::from_slice(&[2.0 * (p[0] - 1.0), 20.0 * p[1]]);
    let r = gradient_method(f, g, &[0.0, 1.0], &GradientSettings::default()).unwrap();
    assert_ne!(r.status, GradientStatus::NotConverged);
    assert_near(r.x[0], 1.0, LOOSE_TOL, "x");
    assert_near(r.x[1], 0.0, LOOSE_TOL, "y");
    // Descent never increases the objective.
    for rec in &r.trace {
        assert!(rec.f_next <= rec.fx);
    }
    assert!(r.evals > r.iterations);
}

#[test]
fn gradient_dimension_mismatch() {
    let f = |p: &[f64]| p[0] * p[0] + p[1] * p[1];
    let g = |p: &[f64]| Vector::from_slice(&[2.0 * p[0]]);
    let r = gradient_method(f, g, &[1.0, 1.0], &GradientSettings::default());
    assert_eq!(
        r.unwrap_err(),
        OptimError::DimensionMismatch {
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn gradient_starting_at_optimum() {
    let f = |p: &[f64]| p[0] * p[0];
    let g = |p: &[f64]| Vector::from_slice(&[2.0 * p[0]]);
    let r = gradient_method(f, g, &[0.0], &GradientSettings::default()).unwrap();
    assert_eq!(r.status, GradientStatus::StationaryPoint);
    assert_eq!(r.iterations, 0);
    assert_eq!(r.evals, 1);
}

#[test]
fn failed_line_search_is_not_convergence() {
    // Gradient with the wrong sign: every trial step goes uphill, so
    // backtracking bottoms out at a step too small to register.
    let f = |p: &[f64]| p[0] * p[0];
    let g = |p: &[f64]| Vector::from_slice(&[-2.0 * p[0]]);
    let r = gradient_method(f, g, &[1.0], &GradientSettings::default()).unwrap();
    assert_eq!(r.status, GradientStatus::Stalled);
    assert_eq!(r.iterations, 1);
    let step = &r.trace[0];
    assert!(!step.armijo_satisfied);
    assert!(step.error <= GradientSettings::<f64>::default().max_error);
}

// ═══════════════════════════════════════════════════════════════════
// Critical points
// ═══════════════════════════════════════════════════════════════════

#[test]
fn critical_point_maximum() {
    let cp = critical_point(
        |x: f64| x * x * x - 3.0 * x,
        |x: f64| 3.0 * x * x - 3.0,
        |x: f64| 6.0 * x,
        -2.0,
        &StationarySettings::default(),
    )
    .unwrap();
    assert_eq!(cp.kind, CriticalPointKind::Maximum);
    assert_eq!(cp.status, RootStatus::Converged);
    assert_near(cp.x, -1.0, 1e-10, "maximum at -1");
    assert_near(cp.fx, 2.0, 1e-10, "f(-1)");
    assert_eq!(cp.trace[0].x_next, -1.25);
}

#[test]
fn critical_point_inflection_is_saddle() {
    // Newton on 3x² halves x every step, so the relative change stays at 100%.
    let cp = critical_point(
        |x: f64| x * x * x,
        |x: f64| 3.0 * x * x,
        |x: f64| 6.0 * x,
        1.0,
        &StationarySettings::default(),
    )
    .unwrap();
    assert_eq!(cp.status, RootStatus::NotConverged);
    assert_eq!(cp.kind, CriticalPointKind::Saddle);
    assert_eq!(cp.iterations, 100);
}

#[test]
fn critical_point_flat_start() {
    let r = critical_point(
        |x: f64| x * x * x,
        |x: f64| 3.0 * x * x,
        |x: f64| 6.0 * x,
        0.0,
        &StationarySettings::default(),
    );
    assert_eq!(
        r.unwrap_err(),
        OptimError::ZeroSecondDerivative {
            iteration: 1,
            x: 0.0
        }
    );
}

// ═══════════════════════════════════════════════════════════════════
// Expression handles
// ═══════════════════════════════════════════════════════════════════

/// Engine that knows a fixed set of expressions.
struct Known;

impl Evaluator for Known {
    fn evaluate(&self, expr: &str, bindings: &[(&str, f64)]) -> Result<f64, EvalError> {
        let x = bindings
            .iter()
            .find(|(n, _)| *n == "x")
            .map(|(_, v)| *v)
            .ok_or_else(|| EvalError::UndefinedSymbol("x".into()))?;
        match expr {
            "(x^2) - (2)" => Ok(x * x - 2.0),
            "2*x" => Ok(2.0 * x),
            other => Err(EvalError::Malformed(other.into())),
        }
    }
}

impl Differentiator for Known {
    fn derivative(&self, expr: &str, _var: &str) -> Result<String, EvalError> {
        match expr {
            "(x^2) - (2)" => Ok("2*x".into()),
            other => Err(EvalError::Other(other.into())),
        }
    }
}

#[test]
fn newton_on_expression_handles() {
    let f = ExprFn::equation(&Known, "x^2 = 2", "x").unwrap();
    let df = f.derivative(&Known).unwrap();
    assert_eq!(df.expr(), "2*x");
    let r = newton_raphson(f, df, 1.0, &RootSettings::default()).unwrap();
    assert_near(r.root, SQRT_2, 1e-12, "expression newton");
}

#[test]
fn evaluation_errors_surface() {
    let f = ExprFn::new(&Known, "sin(x)", "x");
    let r = secant(f, 0.0, 1.0, &RootSettings::default());
    assert_eq!(
        r.unwrap_err(),
        OptimError::Eval(EvalError::Malformed("sin(x)".into()))
    );
}
