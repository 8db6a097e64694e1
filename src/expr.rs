//! Function handles and the pluggable expression-engine seam.
//!
//! Algorithms never parse text. They consume function handles:
//!
//! | Trait | Shape | Used by |
//! |-------|-------|---------|
//! | [`ScalarFn`] | `f(x)` | root finders, critical points |
//! | [`BivariateFn`] | `f(x, y)` | ODE integrators |
//! | [`VectorFn`] | `f(&[x])` | gradient method |
//! | [`GradientFn`] | `∇f(&[x])` | gradient method |
//!
//! Each trait is blanket-implemented for the matching infallible closure.
//! String expressions enter through the [`Evaluator`] and [`Differentiator`]
//! capabilities; the adapters [`ExprFn`], [`ExprFn2`], [`ExprFnN`] and
//! [`ExprGradient`] bind an expression to an engine and implement the handle
//! traits, so any engine plugs into every solver.
//!
//! ```
//! use numlab::expr::{EvalError, Evaluator, ExprFn, ScalarFn};
//!
//! /// Toy engine that only understands `x*x - 2`.
//! struct Toy;
//!
//! impl Evaluator for Toy {
//!     fn evaluate(&self, expr: &str, bindings: &[(&str, f64)]) -> Result<f64, EvalError> {
//!         match (expr, bindings) {
//!             ("x*x - 2", [("x", x)]) => Ok(x * x - 2.0),
//!             _ => Err(EvalError::Malformed(expr.into())),
//!         }
//!     }
//! }
//!
//! let mut f = ExprFn::new(&Toy, "x*x - 2", "x");
//! assert_eq!(f.call(3.0).unwrap(), 7.0);
//! ```

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::matrix::Vector;

/// Failure reported by an expression engine or a fallible function handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("malformed expression: {0}")]
    Malformed(String),
    #[error("undefined symbol `{0}`")]
    UndefinedSymbol(String),
    #[error("domain error: {0}")]
    Domain(String),
    #[error("expected {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },
    #[error("{0}")]
    Other(String),
}

/// Evaluate an expression at a point.
pub trait Evaluator {
    fn evaluate(&self, expr: &str, bindings: &[(&str, f64)]) -> Result<f64, EvalError>;
}

/// Produce the symbolic derivative of an expression.
pub trait Differentiator {
    fn derivative(&self, expr: &str, var: &str) -> Result<String, EvalError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, expr: &str, bindings: &[(&str, f64)]) -> Result<f64, EvalError> {
        (**self).evaluate(expr, bindings)
    }
}

impl<D: Differentiator + ?Sized> Differentiator for &D {
    fn derivative(&self, expr: &str, var: &str) -> Result<String, EvalError> {
        (**self).derivative(expr, var)
    }
}

/// Rewrite `"lhs = rhs"` as `"(lhs) - (rhs)"` so it can be solved for zero.
///
/// Text without `=` is returned unchanged.
///
/// # Errors
///
/// [`EvalError::Malformed`] for more than one `=` or an empty side.
///
/// ```
/// use numlab::expr::normalize_equation;
/// assert_eq!(normalize_equation("x^2 = 2").unwrap(), "(x^2) - (2)");
/// assert_eq!(normalize_equation("x - 1").unwrap(), "x - 1");
/// assert!(normalize_equation("x = = 1").is_err());
/// ```
pub fn normalize_equation(text: &str) -> Result<String, EvalError> {
    let mut sides = text.split('=');
    let lhs = sides.next().unwrap_or_default().trim();
    let Some(rhs) = sides.next() else {
        return Ok(text.trim().to_string());
    };
    let rhs = rhs.trim();
    if sides.next().is_some() || lhs.is_empty() || rhs.is_empty() {
        return Err(EvalError::Malformed(text.to_string()));
    }
    Ok(format!("({lhs}) - ({rhs})"))
}

// ── Function handles ────────────────────────────────────────────────

/// Scalar function `f(x)`.
pub trait ScalarFn<T> {
    fn call(&mut self, x: T) -> Result<T, EvalError>;
}

impl<T, F: FnMut(T) -> T> ScalarFn<T> for F {
    #[inline]
    fn call(&mut self, x: T) -> Result<T, EvalError> {
        Ok(self(x))
    }
}

/// Function of two scalars `f(x, y)`.
pub trait BivariateFn<T> {
    fn call(&mut self, x: T, y: T) -> Result<T, EvalError>;
}

impl<T, F: FnMut(T, T) -> T> BivariateFn<T> for F {
    #[inline]
    fn call(&mut self, x: T, y: T) -> Result<T, EvalError> {
        Ok(self(x, y))
    }
}

/// Scalar field `f(x₁, …, xₙ)`.
pub trait VectorFn<T> {
    fn call(&mut self, x: &[T]) -> Result<T, EvalError>;
}

impl<T, F: FnMut(&[T]) -> T> VectorFn<T> for F {
    #[inline]
    fn call(&mut self, x: &[T]) -> Result<T, EvalError> {
        Ok(self(x))
    }
}

/// Gradient of a scalar field.
pub trait GradientFn<T> {
    fn gradient(&mut self, x: &[T]) -> Result<Vector<T>, EvalError>;
}

impl<T, F: FnMut(&[T]) -> Vector<T>> GradientFn<T> for F {
    #[inline]
    fn gradient(&mut self, x: &[T]) -> Result<Vector<T>, EvalError> {
        Ok(self(x))
    }
}

/// Wraps a closure returning `Result<_, EvalError>` so it can be used
/// wherever an infallible closure would be.
///
/// ```
/// use numlab::expr::{EvalError, Fallible, ScalarFn};
///
/// let mut ln = Fallible(|x: f64| {
///     if x > 0.0 { Ok(x.ln()) } else { Err(EvalError::Domain("ln of non-positive".into())) }
/// });
/// assert!(ln.call(1.0).is_ok());
/// assert!(ln.call(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<T, F: FnMut(T) -> Result<T, EvalError>> ScalarFn<T> for Fallible<F> {
    fn call(&mut self, x: T) -> Result<T, EvalError> {
        (self.0)(x)
    }
}

impl<T, F: FnMut(T, T) -> Result<T, EvalError>> BivariateFn<T> for Fallible<F> {
    fn call(&mut self, x: T, y: T) -> Result<T, EvalError> {
        (self.0)(x, y)
    }
}

// ── Expression adapters ─────────────────────────────────────────────

/// Single-variable expression bound to an engine.
#[derive(Debug, Clone)]
pub struct ExprFn<'e, E: ?Sized> {
    engine: &'e E,
    expr: String,
    var: String,
}

impl<'e, E: Evaluator + ?Sized> ExprFn<'e, E> {
    pub fn new(engine: &'e E, expr: impl Into<String>, var: impl Into<String>) -> Self {
        Self {
            engine,
            expr: expr.into(),
            var: var.into(),
        }
    }

    /// Bind an equation `lhs = rhs`, solved as `lhs - rhs = 0`.
    pub fn equation(engine: &'e E, text: &str, var: impl Into<String>) -> Result<Self, EvalError> {
        Ok(Self::new(engine, normalize_equation(text)?, var))
    }

    /// Handle for `d/dvar` of this expression, evaluated by the same engine.
    pub fn derivative<D: Differentiator + ?Sized>(&self, diff: &D) -> Result<Self, EvalError> {
        Ok(Self {
            engine: self.engine,
            expr: diff.derivative(&self.expr, &self.var)?,
            var: self.var.clone(),
        })
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }
}

impl<E: Evaluator + ?Sized> ScalarFn<f64> for ExprFn<'_, E> {
    fn call(&mut self, x: f64) -> Result<f64, EvalError> {
        self.engine.evaluate(&self.expr, &[(self.var.as_str(), x)])
    }
}

/// Two-variable expression, e.g. the right-hand side `f(x, y)` of an ODE.
#[derive(Debug, Clone)]
pub struct ExprFn2<'e, E: ?Sized> {
    engine: &'e E,
    expr: String,
    vars: [String; 2],
}

impl<'e, E: Evaluator + ?Sized> ExprFn2<'e, E> {
    pub fn new(engine: &'e E, expr: impl Into<String>, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            engine,
            expr: expr.into(),
            vars: [x.into(), y.into()],
        }
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }
}

impl<E: Evaluator + ?Sized> BivariateFn<f64> for ExprFn2<'_, E> {
    fn call(&mut self, x: f64, y: f64) -> Result<f64, EvalError> {
        self.engine.evaluate(
            &self.expr,
            &[(self.vars[0].as_str(), x), (self.vars[1].as_str(), y)],
        )
    }
}

/// Expression over named variables, called with values in the same order.
#[derive(Debug, Clone)]
pub struct ExprFnN<'e, E: ?Sized> {
    engine: &'e E,
    expr: String,
    vars: Vec<String>,
}

impl<'e, E: Evaluator + ?Sized> ExprFnN<'e, E> {
    pub fn new<S: AsRef<str>>(engine: &'e E, expr: impl Into<String>, vars: &[S]) -> Self {
        Self {
            engine,
            expr: expr.into(),
            vars: vars.iter().map(|v| v.as_ref().to_string()).collect(),
        }
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn vars(&self) -> &[String] {
        &self.vars
    }
}

impl<E: Evaluator + ?Sized> VectorFn<f64> for ExprFnN<'_, E> {
    fn call(&mut self, x: &[f64]) -> Result<f64, EvalError> {
        if x.len() != self.vars.len() {
            return Err(EvalError::Arity {
                expected: self.vars.len(),
                got: x.len(),
            });
        }
        let bindings: Vec<(&str, f64)> = self
            .vars
            .iter()
            .map(String::as_str)
            .zip(x.iter().copied())
            .collect();
        self.engine.evaluate(&self.expr, &bindings)
    }
}

/// Gradient built from one symbolic partial derivative per variable.
#[derive(Debug, Clone)]
pub struct ExprGradient<'e, E: ?Sized> {
    partials: Vec<ExprFnN<'e, E>>,
}

impl<'e, E: Evaluator + ?Sized> ExprGradient<'e, E> {
    /// Differentiate `f` with respect to each of its variables.
    pub fn new<D: Differentiator + ?Sized>(f: &ExprFnN<'e, E>, diff: &D) -> Result<Self, EvalError> {
        let partials = f
            .vars
            .iter()
            .map(|v| {
                Ok(ExprFnN {
                    engine: f.engine,
                    expr: diff.derivative(&f.expr, v)?,
                    vars: f.vars.clone(),
                })
            })
            .collect::<Result<Vec<_>, EvalError>>()?;
        Ok(Self { partials })
    }

    pub fn partials(&self) -> &[ExprFnN<'e, E>] {
        &self.partials
    }
}

impl<E: Evaluator + ?Sized> GradientFn<f64> for ExprGradient<'_, E> {
    fn gradient(&mut self, x: &[f64]) -> Result<Vector<f64>, EvalError> {
        self.partials.iter_mut().map(|p| p.call(x)).collect::<Result<Vec<_>, _>>().map(Vector::from_vec)
    }
}
