//! Approximate equality via the [`approx`] crate.
//!
//! Compound values are approximately equal if they have the same shape and all of their elements
//! are. Like [`PartialEq`], vector comparisons ignore orientation.

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use crate::{Element, Matrix, Vector};

fn all_abs<T: AbsDiffEq>(a: &[T], b: &[T], epsilon: T::Epsilon) -> bool
where
    T::Epsilon: Copy,
{
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.abs_diff_eq(b, epsilon))
}

fn all_rel<T: RelativeEq>(a: &[T], b: &[T], epsilon: T::Epsilon, max_relative: T::Epsilon) -> bool
where
    T::Epsilon: Copy,
{
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
}

fn all_ulps<T: UlpsEq>(a: &[T], b: &[T], epsilon: T::Epsilon, max_ulps: u32) -> bool
where
    T::Epsilon: Copy,
{
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.ulps_eq(b, epsilon, max_ulps))
}

impl<T> AbsDiffEq for Matrix<T>
where
    T: Element + AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.shape() == other.shape() && all_abs(self.as_slice(), other.as_slice(), epsilon)
    }
}

impl<T> RelativeEq for Matrix<T>
where
    T: Element + RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.shape() == other.shape()
            && all_rel(self.as_slice(), other.as_slice(), epsilon, max_relative)
    }
}

impl<T> UlpsEq for Matrix<T>
where
    T: Element + UlpsEq,
    T::Epsilon: Copy,
{
    fn default_max_ulps() -> u32 {
        T::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: Self::Epsilon, max_ulps: u32) -> bool {
        self.shape() == other.shape()
            && all_ulps(self.as_slice(), other.as_slice(), epsilon, max_ulps)
    }
}

impl<T> AbsDiffEq for Vector<T>
where
    T: Element + AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        all_abs(self.as_slice(), other.as_slice(), epsilon)
    }
}

impl<T> RelativeEq for Vector<T>
where
    T: Element + RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        all_rel(self.as_slice(), other.as_slice(), epsilon, max_relative)
    }
}

impl<T> UlpsEq for Vector<T>
where
    T: Element + UlpsEq,
    T::Epsilon: Copy,
{
    fn default_max_ulps() -> u32 {
        T::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: Self::Epsilon, max_ulps: u32) -> bool {
        all_ulps(self.as_slice(), other.as_slice(), epsilon, max_ulps)
    }
}
