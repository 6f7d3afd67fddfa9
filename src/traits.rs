use std::{fmt, ops};

/// Types that have a "zero" value (an additive identity).
pub trait Zero {
    /// The *0* value of this type.
    const ZERO: Self;
}

/// Types that have a "one" value (a multiplicative identity).
pub trait One {
    /// The *1* value of this type.
    const ONE: Self;
}

/// Scalar types that can be stored in a [`Matrix`][crate::Matrix] or [`Vector`][crate::Vector].
///
/// This covers all built-in integer and floating-point types. Elements are always [`Copy`]; there
/// is no support for heap-allocated numbers like big integers or decimals.
///
/// [`Send`] and [`Sync`] are required so that matrices sharing a buffer can be handed to other
/// threads.
pub trait Element:
    Zero
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + PartialEq
    + Copy
    + fmt::Debug
    + Send
    + Sync
    + 'static
{
}
impl<T> Element for T where
    T: Zero
        + ops::Add<Output = Self>
        + ops::Sub<Output = Self>
        + ops::Mul<Output = Self>
        + PartialEq
        + Copy
        + fmt::Debug
        + Send
        + Sync
        + 'static
{
}

macro_rules! int_consts {
    ($($types:ty),+) => {
        $(
            impl Zero for $types {
                const ZERO: Self = 0;
            }
            impl One for $types {
                const ONE: Self = 1;
            }
        )+
    };
}
int_consts!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! float_consts {
    ($($types:ty),+) => {
        $(
            impl Zero for $types {
                const ZERO: Self = 0.0;
            }
            impl One for $types {
                const ONE: Self = 1.0;
            }
        )+
    };
}
float_consts!(f32, f64);
