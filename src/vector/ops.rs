//! Implementations of `std::ops`.

use std::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::Element;

use super::Vector;

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

// Orientation is deliberately left out.
impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for Vector<T> {}

/// Element-wise addition.
///
/// # Panics
///
/// Panics if the lengths differ (and neither operand is the zero singleton). Use [`Vector::add`]
/// to handle this case.
impl<T: Element> Add for &Vector<T> {
    type Output = Vector<T>;

    #[track_caller]
    fn add(self, rhs: Self) -> Self::Output {
        Vector::add(self, rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<T: Element> Add for Vector<T> {
    type Output = Vector<T>;

    #[track_caller]
    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

/// Element-wise subtraction.
///
/// # Panics
///
/// Panics if the lengths differ (and neither operand is the zero singleton). Use [`Vector::sub`]
/// to handle this case.
impl<T: Element> Sub for &Vector<T> {
    type Output = Vector<T>;

    #[track_caller]
    fn sub(self, rhs: Self) -> Self::Output {
        Vector::sub(self, rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<T: Element> Sub for Vector<T> {
    type Output = Vector<T>;

    #[track_caller]
    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

/// Vector + Scalar.
impl<T: Element> Add<T> for Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: T) -> Self::Output {
        self.scalar_add(rhs)
    }
}

impl<T: Element> Add<T> for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: T) -> Self::Output {
        self.scalar_add(rhs)
    }
}

/// Vector * Scalar.
impl<T: Element> Mul<T> for Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.scalar_mul(rhs)
    }
}

impl<T: Element> Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.scalar_mul(rhs)
    }
}

// Scalar + Vector and Scalar * Vector need one impl per concrete scalar type.
macro_rules! scalar_lhs_ops {
    ($($t:ty),+) => {
        $(
            impl Add<Vector<$t>> for $t {
                type Output = Vector<$t>;

                fn add(self, rhs: Vector<$t>) -> Self::Output {
                    rhs.scalar_add(self)
                }
            }

            impl Add<&Vector<$t>> for $t {
                type Output = Vector<$t>;

                fn add(self, rhs: &Vector<$t>) -> Self::Output {
                    rhs.scalar_add(self)
                }
            }

            impl Mul<Vector<$t>> for $t {
                type Output = Vector<$t>;

                fn mul(self, rhs: Vector<$t>) -> Self::Output {
                    rhs.scalar_mul(self)
                }
            }

            impl Mul<&Vector<$t>> for $t {
                type Output = Vector<$t>;

                fn mul(self, rhs: &Vector<$t>) -> Self::Output {
                    rhs.scalar_mul(self)
                }
            }
        )+
    };
}

scalar_lhs_ops!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);
