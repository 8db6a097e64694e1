use core::fmt::{Debug, Display};
use num_traits::{Float, Num, NumCast, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point elements accepted by every solver in the crate.
///
/// Required by operations that need `sqrt`, `abs`, `is_finite`, etc.
/// Blanket-implemented for `f32` and `f64`.
pub trait FloatScalar: Scalar + Float + Display + 'static {
    /// Convert an `f64` literal into `Self`.
    ///
    /// Solvers use this for their algorithmic constants (`0.5`, `100.0`, ...).
    /// Every `Float` type can represent those, so the fallback is unreachable
    /// for `f32`/`f64`; it yields NaN rather than panicking.
    #[inline]
    fn lit(x: f64) -> Self {
        <Self as NumCast>::from(x).unwrap_or_else(Self::nan)
    }

    /// Lossy conversion to `f64`, used when values are copied into error
    /// payloads.
    #[inline]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T: Scalar + Float + Display + 'static> FloatScalar for T {}

/// Relative percentage error `|new - old| / |new| * 100`.
///
/// Degrades to the absolute change `|new - old| * 100` when `new` is zero so
/// iterations that land exactly on the origin still report a finite error.
///
/// ```
/// use numlab::relative_error_pct;
/// assert!((relative_error_pct(2.0_f64, 1.0) - 50.0).abs() < 1e-12);
/// assert!((relative_error_pct(0.0_f64, 0.5) - 50.0).abs() < 1e-12);
/// ```
#[inline]
pub fn relative_error_pct<T: FloatScalar>(new: T, old: T) -> T {
    let hundred = T::lit(100.0);
    let delta = (new - old).abs();
    if new == T::zero() {
        delta * hundred
    } else {
        delta / new.abs() * hundred
    }
}
