//! ScalarType trait for the scalars the solver can run on.

use num::{One, Zero};
use std::fmt::Display;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Trait for types that can be used as scalars by the constraints solver.
///
/// The solver only ever relies on the operations listed here, so any type implementing
/// this trait with well-defined rounding rules yields bit-reproducible simulations.
/// Implementations are provided for `f32`, `f64` and the deterministic fixed-point
/// [`Fix64`](crate::utils::Fix64).
pub trait ScalarType:
    na::Scalar
    + Copy
    + Default
    + PartialOrd
    + Display
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    /// Builds the scalar closest to `num / den`.
    ///
    /// This is the preferred way of writing constants since it does not go through
    /// a floating-point literal.
    fn from_ratio(num: i32, den: i32) -> Self;

    /// Converts a double-precision float into this scalar type.
    fn from_f64(val: f64) -> Self;

    /// Converts this scalar into a double-precision float.
    fn to_f64(self) -> f64;

    /// The square root of `self`, or zero if `self` is not positive.
    fn sqrt(self) -> Self;

    /// The sine and cosine of the angle `self`, in radians.
    fn sin_cos(self) -> (Self, Self);

    /// Archimedes’ constant.
    fn pi() -> Self;

    /// The constant `2`.
    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// The constant `0.5`.
    #[inline]
    fn half() -> Self {
        Self::from_ratio(1, 2)
    }

    /// The absolute value of `self`.
    #[inline]
    fn abs(self) -> Self {
        if self < Self::zero() {
            -self
        } else {
            self
        }
    }

    /// The largest of `self` and `other`.
    #[inline]
    fn max(self, other: Self) -> Self {
        if self < other {
            other
        } else {
            self
        }
    }

    /// The smallest of `self` and `other`.
    #[inline]
    fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// Clamps `self` to the interval `[lo, hi]`.
    #[inline]
    fn clamp(self, lo: Self, hi: Self) -> Self {
        ScalarType::max(lo, ScalarType::min(self, hi))
    }
}

macro_rules! impl_float_scalar_type(
    ($($t: ty, $pi: expr);*) => {$(
        impl ScalarType for $t {
            #[inline]
            fn from_ratio(num: i32, den: i32) -> Self {
                num as $t / den as $t
            }

            #[inline]
            fn from_f64(val: f64) -> Self {
                val as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn sqrt(self) -> Self {
                if self > 0.0 {
                    <$t>::sqrt(self)
                } else {
                    0.0
                }
            }

            #[inline]
            fn sin_cos(self) -> (Self, Self) {
                <$t>::sin_cos(self)
            }

            #[inline]
            fn pi() -> Self {
                $pi
            }
        }
    )*}
);

impl_float_scalar_type!(f32, std::f32::consts::PI; f64, std::f64::consts::PI);
