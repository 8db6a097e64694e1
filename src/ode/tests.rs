use super::*;
use crate::expr::{EvalError, Fallible};
use approx::assert_abs_diff_eq;

fn linear(x: f64, y: f64) -> f64 {
    x + y
}

fn exact(x: f64) -> f64 {
    2.0 * x.exp() - x - 1.0
}

fn run<M: FixedStep>(h: f64) -> OdeSolution<f64> {
    M::integrate(linear, 0.0, 1.0, h, 1.0, &OdeSettings::default()).unwrap()
}

// ── Accuracy on dy/dx = x + y ──────────────────────────────────────

#[test]
fn euler_matches_closed_form_recurrence() {
    // Euler on this problem gives y_n = 2·(1 + h)^n − x_n − 1.
    let sol = run::<Euler>(0.1);
    assert_eq!(sol.steps, 10);
    assert_eq!(sol.x, 1.0);
    assert_abs_diff_eq!(sol.y, 2.0 * 1.1_f64.powi(10) - 2.0, epsilon = 1e-12);
}

#[test]
fn second_order_methods_coincide_on_linear_rhs() {
    let heun = run::<Heun>(0.1);
    let mid = run::<Midpoint>(0.1);
    let expected = 2.0 * 1.105_f64.powi(10) - 2.0;
    assert_abs_diff_eq!(heun.y, expected, epsilon = 1e-12);
    assert_abs_diff_eq!(mid.y, expected, epsilon = 1e-12);
}

#[test]
fn second_order_beats_euler() {
    let target = exact(1.0);
    let e = (run::<Euler>(0.1).y - target).abs();
    let h = (run::<Heun>(0.1).y - target).abs();
    let m = (run::<Midpoint>(0.1).y - target).abs();
    assert!(h < e && m < e, "euler {e}, heun {h}, midpoint {m}");
}

#[test]
fn convergence_order() {
    // Halving h divides the error by roughly 2^order.
    let target = exact(1.0);
    let ratio = |coarse: f64, fine: f64| (coarse - target).abs() / (fine - target).abs();
    let euler = ratio(run::<Euler>(0.02).y, run::<Euler>(0.01).y);
    let heun = ratio(run::<Heun>(0.02).y, run::<Heun>(0.01).y);
    assert!((1.8..2.2).contains(&euler), "euler ratio {euler}");
    assert!((3.6..4.4).contains(&heun), "heun ratio {heun}");
}

// ── Step control ───────────────────────────────────────────────────

#[test]
fn last_step_is_clamped() {
    let sol = run::<Midpoint>(0.3);
    assert_eq!(sol.steps, 4);
    assert_eq!(sol.x, 1.0);
    let last = sol.trace.last().unwrap();
    assert_abs_diff_eq!(last.h, 0.1, epsilon = 1e-12);
    assert!(sol.trace.iter().all(|r| r.x_next <= 1.0));
}

#[test]
fn points_include_initial_condition() {
    let sol = run::<Euler>(0.25);
    let pts = sol.points();
    assert_eq!(pts.len(), 5);
    assert_eq!(pts[0], (0.0, 1.0));
    assert_eq!(pts[4].0, 1.0);
    assert_eq!(sol.evals, 4);
}

#[test]
fn heun_records_predictor() {
    let sol = run::<Heun>(0.5);
    let r = &sol.trace[0];
    assert_eq!(r.k1, 1.0);
    assert_eq!(r.predictor, Some(1.5));
    assert_eq!(r.k2, Some(2.0));
    assert_eq!(r.y_next, 1.75);
    assert_eq!(sol.evals, 4);
}

#[test]
fn step_limit_is_a_status() {
    let settings = OdeSettings { max_steps: 5 };
    let sol = Euler::integrate(linear, 0.0, 1.0, 0.1, 1.0, &settings).unwrap();
    assert_eq!(sol.status, OdeStatus::StepLimitReached);
    assert!(!sol.completed());
    assert_eq!(sol.steps, 5);
    assert!(sol.x < 1.0);
}

#[test]
fn invalid_inputs() {
    let s = OdeSettings::default();
    assert_eq!(
        Heun::integrate(linear, 0.0, 1.0, 0.0, 1.0, &s).unwrap_err(),
        OdeError::InvalidStep { h: 0.0 }
    );
    assert_eq!(
        Heun::integrate(linear, 0.0, 1.0, -0.1, 1.0, &s).unwrap_err(),
        OdeError::InvalidStep { h: -0.1 }
    );
    assert_eq!(
        Heun::integrate(linear, 1.0, 1.0, 0.1, 1.0, &s).unwrap_err(),
        OdeError::InvalidInterval {
            x0: 1.0,
            x_final: 1.0
        }
    );
}

#[test]
fn blow_up_is_reported() {
    let err = Euler::integrate(|_x: f64, y: f64| y * y, 0.0, 1e200, 1.0, 3.0, &OdeSettings::default())
        .unwrap_err();
    assert_eq!(err, OdeError::NonFinite { step: 1 });
}

#[test]
fn evaluation_errors_propagate() {
    let f = Fallible(|_x: f64, y: f64| {
        if y > 1.5 {
            Err(EvalError::Domain("y too large".into()))
        } else {
            Ok(y)
        }
    });
    let err = Euler::integrate(f, 0.0, 1.0, 0.25, 1.0, &OdeSettings::default()).unwrap_err();
    assert_eq!(err, OdeError::Eval(EvalError::Domain("y too large".into())));
}

#[test]
fn method_dispatch_matches_direct_calls() {
    for m in Method::ALL {
        let a = m.integrate(linear, 0.0, 1.0, 0.1, 1.0, &OdeSettings::default()).unwrap();
        let b = match m {
            Method::Euler => run::<Euler>(0.1),
            Method::Heun => run::<Heun>(0.1),
            Method::Midpoint => run::<Midpoint>(0.1),
        };
        assert_eq!(a.y, b.y);
        assert!(!m.name().is_empty());
    }
}

#[test]
fn f32_integration() {
    let sol = Midpoint::integrate(|x: f32, y: f32| x + y, 0.0, 1.0, 0.1, 1.0, &OdeSettings::default())
        .unwrap();
    assert!((sol.y - exact(1.0) as f32).abs() < 1e-2);
}
