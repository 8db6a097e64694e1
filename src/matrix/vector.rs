use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::traits::{FloatScalar, Scalar};

/// Owned dense vector.
///
/// ```
/// use numlab::Vector;
///
/// let v = Vector::from_slice(&[3.0_f64, 4.0]);
/// assert_eq!(v.len(), 2);
/// assert!((v.norm() - 5.0).abs() < 1e-12);
/// assert_eq!(v.dot(&v), 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T: Scalar> Vector<T> {
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![T::zero(); n],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Dot product. Panics on length mismatch.
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(self.len(), rhs.len(), "dimension mismatch in dot product");
        self.data
            .iter()
            .zip(&rhs.data)
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }
}

// ── Norms ───────────────────────────────────────────────────────────

impl<T: FloatScalar> Vector<T> {
    /// L2 (Euclidean) norm.
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }

    /// Infinity norm (largest absolute component).
    ///
    /// ```
    /// use numlab::Vector;
    /// let v = Vector::from_slice(&[1.0_f64, -7.0, 3.0]);
    /// assert_eq!(v.norm_inf(), 7.0);
    /// ```
    pub fn norm_inf(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, x| acc.max(x.abs()))
    }

    /// Largest absolute component-wise difference.
    pub fn max_abs_diff(&self, other: &Self) -> T {
        self.data
            .iter()
            .zip(&other.data)
            .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs()))
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

// ── Operators ───────────────────────────────────────────────────────

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T: Scalar> Add for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: Self) -> Vector<T> {
        assert_eq!(self.len(), rhs.len(), "dimension mismatch in vector add");
        Vector::from_vec(self.data.iter().zip(&rhs.data).map(|(&a, &b)| a + b).collect())
    }
}

impl<T: Scalar> Sub for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: Self) -> Vector<T> {
        assert_eq!(self.len(), rhs.len(), "dimension mismatch in vector sub");
        Vector::from_vec(self.data.iter().zip(&rhs.data).map(|(&a, &b)| a - b).collect())
    }
}

impl<T: Scalar> Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, s: T) -> Vector<T> {
        Vector::from_vec(self.data.iter().map(|&x| x * s).collect())
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Scalar> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norms() {
        let v = Vector::from_slice(&[3.0_f64, -4.0]);
        assert!((v.norm() - 5.0).abs() < 1e-12);
        assert_eq!(v.norm_inf(), 4.0);
    }

    #[test]
    fn arithmetic() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[0.5, 4.0]);
        assert_eq!((&a + &b).as_slice(), &[1.5, 6.0]);
        assert_eq!((&a - &b).as_slice(), &[0.5, -2.0]);
        assert_eq!((&a * 3.0).as_slice(), &[3.0, 6.0]);
        assert_eq!(a.max_abs_diff(&b), 2.0);
    }

    #[test]
    fn collect_and_index() {
        let mut v: Vector<f64> = (0..4).map(|i| i as f64).collect();
        v[3] = 10.0;
        assert_eq!(v.as_slice(), &[0.0, 1.0, 2.0, 10.0]);
        assert_eq!(v.iter().copied().sum::<f64>(), 13.0);
    }
}
