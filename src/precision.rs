//! Approximation error measures and toy floating-point systems.
//!
//! A floating-point system `F(β, t, m, M)` holds zero and the numbers
//! `±0.d₁d₂…d_t × β^e` with `d₁ ≠ 0` and `m ≤ e ≤ M`.
//!
//! ```
//! use numlab::precision::{FloatSystem, Rounding};
//!
//! let f = FloatSystem::new(10, 3, -2, 2).unwrap();
//! assert_eq!(f.count(), Some(2 * 9 * 5 * 100 + 1));
//! let r = f.represent(3.14159, Rounding::Round);
//! assert_eq!(r.digits, vec![3, 1, 4]);
//! assert!((r.value - 3.14).abs() < 1e-12);
//! ```

use alloc::vec::Vec;

use num_traits::Float;

use crate::traits::FloatScalar;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PrecisionError {
    #[error("true value must be finite and non-zero, got {value}")]
    InvalidTrueValue { value: f64 },
    #[error("approximation must be finite")]
    NonFinite,
    #[error("base must be at least 2, got {0}")]
    InvalidBase(u32),
    #[error("precision must be at least 1 digit")]
    InvalidDigits,
    #[error("exponent range [{min}, {max}] is empty")]
    InvalidExponentRange { min: i32, max: i32 },
}

// ── Error measures ──────────────────────────────────────────────────

/// Errors of an approximation `p*` against a true value `p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorMeasures<T> {
    pub true_value: T,
    pub approx: T,
    /// `|p − p*|`
    pub true_error: T,
    /// `|p − p*| / |p|`
    pub relative_error: T,
    /// `relative_error · 100`
    pub percent_error: T,
}

impl<T: FloatScalar> ErrorMeasures<T> {
    pub fn new(true_value: T, approx: T) -> Result<Self, PrecisionError> {
        if true_value == T::zero() || !true_value.is_finite() {
            return Err(PrecisionError::InvalidTrueValue {
                value: true_value.as_f64(),
            });
        }
        if !approx.is_finite() {
            return Err(PrecisionError::NonFinite);
        }
        let true_error = (true_value - approx).abs();
        let relative_error = true_error / true_value.abs();
        Ok(Self {
            true_value,
            approx,
            true_error,
            relative_error,
            percent_error: relative_error * T::lit(100.0),
        })
    }

    /// Largest `n` such that `relative_error < 5·10⁻ⁿ`, the number of
    /// significant digits `approx` shares with `true_value`.
    pub fn significant_digits(&self) -> u32 {
        let mut n = 0;
        let mut bound = T::lit(5.0);
        while n < 32 && self.relative_error < bound / T::lit(10.0) {
            n += 1;
            bound = bound / T::lit(10.0);
        }
        n
    }
}

// ── Floating-point systems ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Truncate after `t` digits.
    Chop,
    /// Round half up at the `t`-th digit.
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationKind {
    Zero,
    Normal,
    /// Exponent above `M`.
    Overflow,
    /// Exponent below `m`.
    Underflow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    pub kind: RepresentationKind,
    pub negative: bool,
    /// Mantissa digits `d₁…d_t` (empty for zero).
    pub digits: Vec<u32>,
    pub exponent: i32,
    /// Value of the representation; `±∞` on overflow and `0` on underflow.
    pub value: f64,
    pub abs_error: f64,
    /// Relative to the input; zero for a zero input.
    pub rel_error: f64,
}

/// A normalized floating-point system `F(β, t, m, M)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatSystem {
    base: u32,
    digits: u32,
    min_exp: i32,
    max_exp: i32,
}

impl FloatSystem {
    /// # Errors
    ///
    /// Rejects `β < 2`, `t < 1` and `m ≥ M`.
    pub fn new(base: u32, digits: u32, min_exp: i32, max_exp: i32) -> Result<Self, PrecisionError> {
        if base < 2 {
            return Err(PrecisionError::InvalidBase(base));
        }
        if digits < 1 {
            return Err(PrecisionError::InvalidDigits);
        }
        if min_exp >= max_exp {
            return Err(PrecisionError::InvalidExponentRange {
                min: min_exp,
                max: max_exp,
            });
        }
        Ok(Self {
            base,
            digits,
            min_exp,
            max_exp,
        })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    pub fn exponent_range(&self) -> (i32, i32) {
        (self.min_exp, self.max_exp)
    }

    /// Number of representable values `2(β−1)(M−m+1)β^(t−1) + 1`, or `None`
    /// if it does not fit in a `u128`.
    pub fn count(&self) -> Option<u128> {
        let b = u128::from(self.base);
        let exps = u128::try_from(i64::from(self.max_exp) - i64::from(self.min_exp) + 1).ok()?;
        b.checked_pow(self.digits - 1)?
            .checked_mul(2 * (b - 1))?
            .checked_mul(exps)?
            .checked_add(1)
    }

    fn beta(&self) -> f64 {
        f64::from(self.base)
    }

    fn pow(&self, e: i32) -> f64 {
        Float::powi(self.beta(), e)
    }

    /// Largest value `(1 − β^(−t))·β^M`.
    pub fn max_value(&self) -> f64 {
        (1.0 - self.pow(-(self.digits as i32))) * self.pow(self.max_exp)
    }

    /// Smallest positive normalized value `β^(m−1)`.
    pub fn min_value(&self) -> f64 {
        self.pow(self.min_exp - 1)
    }

    /// Machine epsilon `β^(1−t)` under chopping, half that under rounding.
    pub fn unit_roundoff(&self, rounding: Rounding) -> f64 {
        let eps = self.pow(1 - self.digits as i32);
        match rounding {
            Rounding::Chop => eps,
            Rounding::Round => eps / 2.0,
        }
    }

    /// Represent `x` with `t` base-β digits.
    ///
    /// Non-finite input is classified as overflow.
    pub fn represent(&self, x: f64, rounding: Rounding) -> Representation {
        let negative = x.is_sign_negative() && x != 0.0;
        let sign = if negative { -1.0 } else { 1.0 };
        let result = |kind, digits, exponent, value: f64| {
            let abs_error = Float::abs(x - value);
            let rel_error = if x == 0.0 { 0.0 } else { abs_error / Float::abs(x) };
            Representation {
                kind,
                negative,
                digits,
                exponent,
                value,
                abs_error,
                rel_error,
            }
        };

        if x == 0.0 {
            return result(RepresentationKind::Zero, Vec::new(), 0, 0.0);
        }
        if !x.is_finite() {
            return result(RepresentationKind::Overflow, Vec::new(), self.max_exp, sign * f64::INFINITY);
        }

        let ax = Float::abs(x);
        let t = self.digits as i32;
        // Normalize so that β^(e−1) ≤ |x| < β^e.
        let mut e = Float::floor(Float::ln(ax) / Float::ln(self.beta())) as i32 + 1;
        while ax >= self.pow(e) {
            e += 1;
        }
        while ax < self.pow(e - 1) {
            e -= 1;
        }

        let mut scaled = ax / self.pow(e - t);
        if Float::abs(scaled - Float::round(scaled)) < 1e-9 * scaled {
            scaled = Float::round(scaled);
        }
        let mut mantissa = match rounding {
            Rounding::Chop => Float::floor(scaled),
            Rounding::Round => Float::floor(scaled + 0.5),
        };
        if mantissa >= self.pow(t) {
            mantissa = self.pow(t - 1);
            e += 1;
        }

        if e > self.max_exp {
            return result(RepresentationKind::Overflow, Vec::new(), e, sign * f64::INFINITY);
        }
        if e < self.min_exp {
            return result(RepresentationKind::Underflow, Vec::new(), e, 0.0);
        }

        let mut digits = Vec::with_capacity(self.digits as usize);
        let mut rest = mantissa;
        for _ in 0..self.digits {
            let d = rest % self.beta();
            digits.push(d as u32);
            rest = Float::round((rest - d) / self.beta());
        }
        digits.reverse();
        let value = sign * mantissa * self.pow(e - t);
        result(RepresentationKind::Normal, digits, e, value)
    }
}
