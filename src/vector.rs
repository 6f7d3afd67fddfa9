use std::{fmt, slice};

use itertools::Itertools;

use crate::{Element, Error, Result};

mod ops;

/// Whether a [`Vector`] is laid out as a row (`1xN`) or a column (`Nx1`).
///
/// Orientation does not affect the stored data or equality, but it decides which products are
/// legal (see [`Vector::dot`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    Row,
    #[default]
    Column,
}

impl Orientation {
    /// Returns the opposite orientation.
    #[inline]
    pub fn transposed(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }
}

/// An owned, fixed-length sequence of elements with an [`Orientation`].
///
/// # Construction
///
/// - [`Vector::new`] and [`Vector::column`] create column vectors, [`Vector::row`] creates a row
///   vector.
/// - [`Vector::from_fn`] invokes a closure with the index of each element.
/// - [`Vector::zeros`] creates a column vector of the given length containing all-zeroes.
/// - [`Vector::zero`] is the length-1 zero vector. [`Vector::add`] and [`Vector::sub`] treat it
///   specially, see their docs.
/// - [`Matrix::slice_row`][crate::Matrix::slice_row] copies part of a matrix row.
///
/// Vectors always own their elements; they never share storage with each other or with a matrix.
///
/// # Equality
///
/// Two vectors compare equal if they contain the same elements in the same order. Their
/// orientation is *not* compared.
///
/// ```
/// # use minigrad::*;
/// let a = Vector::row(vec![1, 2, 3]);
/// assert_eq!(a, a.transpose());
/// ```
#[derive(Clone)]
pub struct Vector<T> {
    data: Vec<T>,
    orientation: Orientation,
}

impl<T: Element> Vector<T> {
    /// Creates a column vector.
    #[inline]
    pub fn new(data: Vec<T>) -> Self {
        Self::with_orientation(data, Orientation::Column)
    }

    #[inline]
    pub fn with_orientation(data: Vec<T>, orientation: Orientation) -> Self {
        Self { data, orientation }
    }

    /// Creates a row vector.
    #[inline]
    pub fn row(data: Vec<T>) -> Self {
        Self::with_orientation(data, Orientation::Row)
    }

    /// Creates a column vector.
    #[inline]
    pub fn column(data: Vec<T>) -> Self {
        Self::with_orientation(data, Orientation::Column)
    }

    /// Returns the length-1 zero vector.
    pub fn zero() -> Self {
        Self::new(vec![T::ZERO])
    }

    /// Creates a column vector of `len` zeroes.
    ///
    /// Unlike [`Vector::zero`], this is a true additive identity for vectors of length `len`.
    pub fn zeros(len: usize) -> Self {
        Self::new(vec![T::ZERO; len])
    }

    /// Creates a column vector by invoking a closure with the index of each element.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let v = Vector::from_fn(4, |i| i * 2);
    /// assert_eq!(v.as_slice(), &[0, 2, 4, 6]);
    /// ```
    pub fn from_fn<F>(len: usize, cb: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self::new((0..len).map(cb).collect())
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
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns `true` if `self` is equal to [`Vector::zero`], regardless of orientation.
    pub fn is_zero_singleton(&self) -> bool {
        self.data == [T::ZERO]
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.data.get(index).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Applies a closure to each element, keeping the orientation.
    pub fn map<U, F>(&self, f: F) -> Vector<U>
    where
        U: Element,
        F: FnMut(T) -> U,
    {
        Vector::with_orientation(self.data.iter().copied().map(f).collect(), self.orientation)
    }

    fn check_len(&self, other: &Self) -> Result<()> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(Error::LengthMismatch {
                left: self.len(),
                right: other.len(),
            })
        }
    }

    fn zip_with<F>(&self, other: &Self, mut f: F) -> Result<Self>
    where
        F: FnMut(T, T) -> T,
    {
        self.check_len(other)?;
        let data = self
            .data
            .iter()
            .zip_eq(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self::with_orientation(data, self.orientation))
    }

    /// Element-wise sum.
    ///
    /// If either operand [is the zero singleton][Vector::is_zero_singleton], the other operand is
    /// returned unchanged, whatever its length. Otherwise both vectors must have the same length.
    ///
    /// The result has the orientation of `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let v = Vector::new(vec![1, 2, 3]);
    /// assert_eq!(v.add(&Vector::new(vec![10, 20, 30]))?.as_slice(), &[11, 22, 33]);
    /// assert_eq!(v.add(&Vector::zero())?, v);
    /// assert!(v.add(&Vector::new(vec![1, 2])).is_err());
    /// # Ok::<(), Error>(())
    /// ```
    pub fn add(&self, other: &Self) -> Result<Self> {
        if other.is_zero_singleton() {
            return Ok(self.clone());
        }
        if self.is_zero_singleton() {
            return Ok(other.clone());
        }
        self.zip_with(other, |a, b| a + b)
    }

    /// Element-wise difference.
    ///
    /// This has the same zero-singleton rule as [`Vector::add`]. Note that this makes
    /// `Vector::zero().sub(&v)` return `v`, *not* its negation.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        if other.is_zero_singleton() {
            return Ok(self.clone());
        }
        if self.is_zero_singleton() {
            return Ok(other.clone());
        }
        self.zip_with(other, |a, b| a - b)
    }

    /// Adds `scalar` to every element.
    pub fn scalar_add(&self, scalar: T) -> Self {
        self.map(|elem| elem + scalar)
    }

    /// Multiplies every element by `scalar`.
    pub fn scalar_mul(&self, scalar: T) -> Self {
        self.map(|elem| elem * scalar)
    }

    /// Element-wise (Hadamard) product of two vectors of the same length.
    pub fn hadamard(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Computes the inner product of a row vector `self` and a column vector `other`.
    ///
    /// # Errors
    ///
    /// - [`Error::OrientationError`] if `self` is not a row vector or `other` is not a column
    ///   vector. Outer products are not supported.
    /// - [`Error::LengthMismatch`] if the vectors have different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let a = Vector::column(vec![-1, 2, 2]);
    /// let b = Vector::column(vec![1, 0, -3]);
    /// assert_eq!(a.transpose().dot(&b)?, -7);
    /// assert!(a.dot(&b).is_err());
    /// # Ok::<(), Error>(())
    /// ```
    pub fn dot(&self, other: &Self) -> Result<T> {
        self.check_inner_product(other)?;
        Ok(self
            .data
            .iter()
            .zip_eq(&other.data)
            .fold(T::ZERO, |acc, (&a, &b)| acc + a * b))
    }

    pub(crate) fn check_inner_product(&self, other: &Self) -> Result<()> {
        if self.orientation != Orientation::Row || other.orientation != Orientation::Column {
            return Err(Error::OrientationError {
                left: self.orientation,
                right: other.orientation,
            });
        }
        self.check_len(other)
    }

    /// Returns a copy of `self` with the opposite orientation.
    pub fn transpose(&self) -> Self {
        Self::with_orientation(self.data.clone(), self.orientation.transposed())
    }

    /// Returns the sum of all elements (zero if the vector is empty).
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::ZERO, |acc, &elem| acc + elem)
    }
}

impl<T: Element> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}

impl<T: Element> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tup = f.debug_tuple(match self.orientation {
            Orientation::Row => "Row",
            Orientation::Column => "Column",
        });
        for elem in &self.data {
            tup.field(elem);
        }
        tup.finish()
    }
}

impl<T: fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct DebugViaDisplay<D>(D);
        impl<D: fmt::Display> fmt::Debug for DebugViaDisplay<D> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        let mut list = f.debug_list();
        for elem in &self.data {
            list.entry(&DebugViaDisplay(elem));
        }
        list.finish()?;
        if self.orientation == Orientation::Column {
            f.write_str("ᵀ")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn orientation() {
        assert_eq!(Orientation::default(), Orientation::Column);
        assert_eq!(Vector::new(vec![1]).orientation(), Orientation::Column);
        assert_eq!(Vector::row(vec![1]).orientation(), Orientation::Row);

        let v = Vector::row(vec![1, 2]);
        let t = v.transpose();
        assert_eq!(t.orientation(), Orientation::Column);
        assert_eq!(v.orientation(), Orientation::Row);
        assert_eq!(t.transpose().orientation(), Orientation::Row);
    }

    #[test]
    fn zero_singleton() {
        let zero = Vector::<i32>::zero();
        assert_eq!(zero.len(), 1);
        assert!(zero.is_zero_singleton());
        assert!(zero.transpose().is_zero_singleton());
        assert!(!Vector::<i32>::zeros(2).is_zero_singleton());
        assert!(!Vector::new(vec![1]).is_zero_singleton());
    }

    #[test]
    fn add_sub() {
        let a = Vector::new(vec![1, 2, 3]);
        let b = Vector::new(vec![4, 5, 6]);
        assert_eq!(a.add(&b).unwrap().as_slice(), &[5, 7, 9]);
        assert_eq!(b.sub(&a).unwrap().as_slice(), &[3, 3, 3]);

        let short = Vector::new(vec![1, 2]);
        assert_eq!(
            a.add(&short).unwrap_err(),
            Error::LengthMismatch { left: 3, right: 2 }
        );
        assert_eq!(
            a.sub(&short).unwrap_err(),
            Error::LengthMismatch { left: 3, right: 2 }
        );
    }

    #[test]
    fn zero_short_circuit() {
        let v = Vector::new(vec![1, 2, 3]);
        let zero = Vector::zero();
        assert_eq!(v.add(&zero).unwrap(), v);
        assert_eq!(zero.add(&v).unwrap(), v);
        assert_eq!(v.sub(&zero).unwrap(), v);

        // Asymmetric: subtracting from the zero singleton yields the right operand, not its
        // negation.
        assert_eq!(zero.sub(&v).unwrap(), v);
        assert_ne!(zero.sub(&v).unwrap(), v.scalar_mul(-1));

        // The per-length zero vector behaves like a real identity.
        let zeros = Vector::zeros(3);
        assert_eq!(zeros.sub(&v).unwrap(), v.scalar_mul(-1));
    }

    #[test]
    fn elementwise_keeps_left_orientation() {
        let row = Vector::row(vec![1, 2]);
        let col = Vector::column(vec![3, 4]);
        assert_eq!(row.add(&col).unwrap().orientation(), Orientation::Row);
        assert_eq!(col.hadamard(&row).unwrap().orientation(), Orientation::Column);
        assert_eq!(row.scalar_mul(2).orientation(), Orientation::Row);
    }

    #[test]
    fn scalar_ops() {
        let v = Vector::new(vec![1.0, -2.0]);
        assert_eq!(v.scalar_add(0.5).as_slice(), &[1.5, -1.5]);
        assert_eq!(v.scalar_mul(-2.0).as_slice(), &[-2.0, 4.0]);
        assert_eq!(Vector::<f64>::zero().scalar_add(3.0).as_slice(), &[3.0]);
    }

    #[test]
    fn hadamard() {
        let a = Vector::new(vec![1, 2, 3]);
        let b = Vector::new(vec![0, -1, 2]);
        assert_eq!(a.hadamard(&b).unwrap().as_slice(), &[0, -2, 6]);
        assert!(a.hadamard(&Vector::zero()).is_err());
    }

    #[test]
    fn dot() {
        let v1 = Vector::column(vec![-1.0f32, 2.0, 2.0]);
        let v2 = Vector::column(vec![1.0f32, 0.0, -3.0]);
        assert_eq!(v1.transpose().dot(&v2).unwrap(), -7.0);
        assert_eq!(v2.transpose().dot(&v1).unwrap(), -7.0);
    }

    #[test]
    fn dot_orientation() {
        let row = Vector::row(vec![1, 2]);
        let col = Vector::column(vec![1, 2]);
        assert_eq!(
            row.dot(&row).unwrap_err(),
            Error::OrientationError {
                left: Orientation::Row,
                right: Orientation::Row
            }
        );
        assert_eq!(
            col.dot(&col).unwrap_err(),
            Error::OrientationError {
                left: Orientation::Column,
                right: Orientation::Column
            }
        );
        assert_eq!(
            col.dot(&row).unwrap_err(),
            Error::OrientationError {
                left: Orientation::Column,
                right: Orientation::Row
            }
        );
        assert_eq!(
            row.dot(&Vector::column(vec![1])).unwrap_err(),
            Error::LengthMismatch { left: 2, right: 1 }
        );
        assert_eq!(row.dot(&col).unwrap(), 5);
    }

    #[test]
    fn dot_commutes() {
        let mut rng = fastrand::Rng::with_seed(1234);
        for _ in 0..20 {
            let len = rng.usize(1..=32);
            let a = Vector::from_fn(len, |_| rng.f32() * 2.0 - 1.0);
            let b = Vector::from_fn(len, |_| rng.f32() * 2.0 - 1.0);
            let ab = a.transpose().dot(&b).unwrap();
            let ba = b.transpose().dot(&a).unwrap();
            assert_relative_eq!(ab, ba, epsilon = 1e-5);
        }
    }

    #[test]
    fn sum() {
        assert_eq!(Vector::new(vec![1, 2, 3, 4]).sum(), 10);
        assert_eq!(Vector::<i32>::new(Vec::new()).sum(), 0);
    }

    #[test]
    fn fmt() {
        let row = Vector::row(vec![1, 2]);
        assert_eq!(format!("{row:?}"), "Row(1, 2)");
        assert_eq!(row.to_string(), "[1, 2]");
        assert_eq!(row.transpose().to_string(), "[1, 2]ᵀ");
    }
}
