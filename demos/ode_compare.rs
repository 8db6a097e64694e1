// Fixed-step solver comparison on dy/dx = x + y, y(0) = 1, x in [0, 2].
// Prints JSON with the exact solution and one trajectory per method:
//   {"h":0.2, "x":[...], "y_exact":[...],
//    "y_euler":[...], "y_heun":[...], "y_midpoint":[...],
//    "err_euler":..., "err_heun":..., "err_midpoint":...}
// Pass a step size as the first argument to override the default 0.2.

use numlab::ode::{Method, OdeSettings};

fn fmt_arr(v: &[f64]) -> String {
    let inner: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", inner.join(","))
}

fn main() -> numlab::Result<()> {
    let h: f64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0.2);
    let exact = |x: f64| 2.0 * x.exp() - x - 1.0;
    let settings = OdeSettings::default();

    let mut fields = vec![format!("\"h\":{h}")];
    let mut x_vals = Vec::new();
    let mut errors = Vec::new();

    for method in Method::ALL {
        let sol = method.integrate(|x: f64, y: f64| x + y, 0.0, 1.0, h, 2.0, &settings)?;
        let (xs, ys): (Vec<f64>, Vec<f64>) = sol.points().into_iter().unzip();
        if x_vals.is_empty() {
            let y_exact: Vec<f64> = xs.iter().map(|&x| exact(x)).collect();
            fields.push(format!("\"x\":{}", fmt_arr(&xs)));
            fields.push(format!("\"y_exact\":{}", fmt_arr(&y_exact)));
            x_vals = xs;
        }
        fields.push(format!("\"y_{}\":{}", method.name(), fmt_arr(&ys)));
        errors.push(format!("\"err_{}\":{:.6e}", method.name(), (sol.y - exact(sol.x)).abs()));
    }
    fields.extend(errors);

    println!("{{{}}}", fields.join(","));
    Ok(())
}
