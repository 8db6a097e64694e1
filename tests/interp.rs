use numlab::interp::{fit_linear, lagrange, newton_divided, InterpError};

const TOL: f64 = 1e-9;

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
}

fn nodes(n: usize) -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = (0..n).map(|i| -1.0 + 2.0 * i as f64 / (n - 1) as f64).collect();
    let ys = xs.iter().map(|x| (2.0 * x).exp() - x).collect();
    (xs, ys)
}

// ── Lagrange and Newton agree ────────────────────────────────────────

#[test]
fn lagrange_and_newton_agree() {
    for n in 2..=8 {
        let (xs, ys) = nodes(n);
        let l = lagrange(&xs, &ys).unwrap();
        let p = newton_divided(&xs, &ys).unwrap();
        for k in 0..=40 {
            let x = -1.0 + k as f64 / 20.0;
            assert_near(l.eval(x), p.eval(x), TOL, &format!("n={n} x={x}"));
        }
    }
}

#[test]
fn both_forms_reproduce_nodes() {
    let (xs, ys) = nodes(6);
    let l = lagrange(&xs, &ys).unwrap();
    let p = newton_divided(&xs, &ys).unwrap();
    for (&x, &y) in xs.iter().zip(&ys) {
        assert_near(l.eval(x), y, TOL, "lagrange node");
        assert_near(p.eval(x), y, TOL, "newton node");
    }
}

#[test]
fn newton_expands_to_lagrange_polynomial() {
    let (xs, ys) = nodes(5);
    let standard = newton_divided(&xs, &ys).unwrap().to_standard();
    let l = lagrange(&xs, &ys).unwrap();
    for k in 0..5 {
        assert_near(standard.coeff(k), l.polynomial().coeff(k), 1e-8, &format!("coeff {k}"));
    }
}

#[test]
fn node_order_does_not_matter() {
    let (xs, ys) = nodes(5);
    let order = [3, 0, 4, 1, 2];
    let xs_shuffled: Vec<f64> = order.iter().map(|&i| xs[i]).collect();
    let ys_shuffled: Vec<f64> = order.iter().map(|&i| ys[i]).collect();
    let a = newton_divided(&xs, &ys).unwrap();
    let b = newton_divided(&xs_shuffled, &ys_shuffled).unwrap();
    for k in 0..=10 {
        let x = -0.95 + 0.19 * k as f64;
        assert_near(a.eval(x), b.eval(x), TOL, &format!("x={x}"));
    }
}

#[test]
fn duplicate_abscissas_rejected() {
    let xs = [0.0_f64, 1.0, 0.0];
    let ys = [1.0, 2.0, 3.0];
    let expected = InterpError::DuplicateAbscissas { first: 0, second: 2 };
    assert_eq!(lagrange(&xs, &ys).unwrap_err(), expected);
    assert_eq!(newton_divided(&xs, &ys).unwrap_err(), expected);
}

// ── Least squares ────────────────────────────────────────────────────

#[test]
fn line_fit_through_noisy_data() {
    let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
    // Alternating ±0.1 noise cancels in pairs.
    let ys: Vec<f64> = xs
        .iter()
        .enumerate()
        .map(|(i, &x)| 1.5 + 0.5 * x + if i % 2 == 0 { 0.1 } else { -0.1 })
        .collect();
    let fit = fit_linear(&xs, &ys).unwrap();
    assert_near(fit.slope, 0.5, 0.02, "slope");
    assert_near(fit.intercept, 1.5, 0.1, "intercept");
    assert_near(fit.to_polynomial().eval(4.0), fit.eval(4.0), TOL, "polynomial form");
}
