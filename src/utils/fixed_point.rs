//! Deterministic Q32.32 fixed-point scalar.
//!
//! Every operation is computed with integer arithmetic only, so the results are bit-identical on
//! every platform and with every compiler. The rounding and overflow rules are:
//!
//! - addition, subtraction and negation saturate at the representable bounds;
//! - multiplication computes the exact 128-bit product, then rounds to the nearest representable
//!   value (ties are rounded toward positive infinity) and saturates;
//! - division rounds to the nearest representable value (ties are rounded away from zero) and
//!   saturates. A division by zero saturates toward the sign of the numerator, and `0 / 0 = 0`;
//! - the square root is the exact integer square root (rounded toward zero);
//! - sine and cosine are evaluated with fixed polynomials after range reduction to `[-π/2, π/2]`.

use crate::utils::ScalarType;
use num::{One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

const FRAC_BITS: u32 = 32;
const ONE_RAW: i64 = 1 << FRAC_BITS;
const HALF_RAW: i128 = 1 << (FRAC_BITS - 1);
/// `π · 2³²`, rounded to the nearest integer.
const PI_RAW: i64 = 13_493_037_705;
/// `2π · 2³²`, rounded to the nearest integer.
const TWO_PI_RAW: i64 = 26_986_075_409;
/// `π/2 · 2³²`, rounded to the nearest integer.
const FRAC_PI_2_RAW: i64 = 6_746_518_852;

/// A signed fixed-point number with 32 integral bits and 32 fractional bits.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Fix64(i64);

impl Fix64 {
    /// The largest representable value.
    pub const MAX: Fix64 = Fix64(i64::MAX);
    /// The smallest representable value.
    pub const MIN: Fix64 = Fix64(i64::MIN);
    /// The smallest positive representable value.
    pub const EPSILON: Fix64 = Fix64(1);

    /// Builds a fixed-point number from its raw bit representation.
    #[inline]
    pub const fn from_bits(bits: i64) -> Self {
        Fix64(bits)
    }

    /// The raw bit representation of this fixed-point number.
    #[inline]
    pub const fn to_bits(self) -> i64 {
        self.0
    }

    /// Converts an integer into a fixed-point number, saturating if it is out of range.
    #[inline]
    pub fn from_int(val: i32) -> Self {
        Fix64((val as i64) << FRAC_BITS)
    }

    #[inline]
    fn saturate(val: i128) -> Self {
        Fix64(val.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Divides `num` by `den`, rounding to nearest with ties away from zero.
    fn div_round(num: i128, den: i128) -> i128 {
        let q = num / den;
        let r = num % den;

        if 2 * r.unsigned_abs() >= den.unsigned_abs() {
            if (num < 0) == (den < 0) {
                q + 1
            } else {
                q - 1
            }
        } else {
            q
        }
    }

    /// Maps `self` to the equivalent angle in `[-π, π]`.
    fn wrap_angle(self) -> i64 {
        let raw = self.0 as i128;
        let turns = Self::div_round(raw, TWO_PI_RAW as i128);
        (raw - turns * TWO_PI_RAW as i128) as i64
    }

    /// Evaluates `sin(x)` and `cos(x)` for `x` in `[-π/2, π/2]`.
    fn sin_cos_reduced(x: Fix64) -> (Fix64, Fix64) {
        let x2 = x * x;
        let one = Fix64::one();

        // Horner evaluation of the Taylor series up to the x¹³ and x¹⁶ terms.
        let mut sin = one;
        for den in [156, 110, 72, 42, 20, 6] {
            sin = one - x2 * sin / Fix64::from_int(den);
        }

        let mut cos = one;
        for den in [240, 182, 132, 90, 56, 30, 12, 2] {
            cos = one - x2 * cos / Fix64::from_int(den);
        }

        (x * sin, cos)
    }
}

impl Zero for Fix64 {
    #[inline]
    fn zero() -> Self {
        Fix64(0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl One for Fix64 {
    #[inline]
    fn one() -> Self {
        Fix64(ONE_RAW)
    }
}

impl Add for Fix64 {
    type Output = Fix64;

    #[inline]
    fn add(self, rhs: Fix64) -> Fix64 {
        Fix64(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Fix64 {
    type Output = Fix64;

    #[inline]
    fn sub(self, rhs: Fix64) -> Fix64 {
        Fix64(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for Fix64 {
    type Output = Fix64;

    #[inline]
    fn mul(self, rhs: Fix64) -> Fix64 {
        let prod = self.0 as i128 * rhs.0 as i128;
        Self::saturate((prod + HALF_RAW) >> FRAC_BITS)
    }
}

impl Div for Fix64 {
    type Output = Fix64;

    #[inline]
    fn div(self, rhs: Fix64) -> Fix64 {
        match (rhs.0, self.0.cmp(&0)) {
            (0, Ordering::Less) => Fix64::MIN,
            (0, Ordering::Equal) => Fix64(0),
            (0, Ordering::Greater) => Fix64::MAX,
            _ => Self::saturate(Self::div_round(
                (self.0 as i128) << FRAC_BITS,
                rhs.0 as i128,
            )),
        }
    }
}

impl Neg for Fix64 {
    type Output = Fix64;

    #[inline]
    fn neg(self) -> Fix64 {
        Fix64(self.0.saturating_neg())
    }
}

macro_rules! impl_op_assign(
    ($($Trait: ident, $method: ident, $op: tt);*) => {$(
        impl $Trait for Fix64 {
            #[inline]
            fn $method(&mut self, rhs: Fix64) {
                *self = *self $op rhs;
            }
        }
    )*}
);

impl_op_assign!(
    AddAssign, add_assign, +;
    SubAssign, sub_assign, -;
    MulAssign, mul_assign, *;
    DivAssign, div_assign, /
);

impl fmt::Debug for Fix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fix64({})", self.to_f64())
    }
}

impl fmt::Display for Fix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl ScalarType for Fix64 {
    fn from_ratio(num: i32, den: i32) -> Self {
        if den == 0 {
            return Fix64::from_int(num) / Fix64(0);
        }

        Self::saturate(Self::div_round((num as i128) << FRAC_BITS, den as i128))
    }

    fn from_f64(val: f64) -> Self {
        // `as` saturates and maps NaN to zero.
        Fix64((val * ONE_RAW as f64).round() as i64)
    }

    fn to_f64(self) -> f64 {
        self.0 as f64 / ONE_RAW as f64
    }

    fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Fix64(0);
        }

        // sqrt(raw / 2³²) · 2³² = sqrt(raw · 2³²)
        let target = (self.0 as u128) << FRAC_BITS;
        let mut result = 0u128;
        let mut bit = 1u128 << 126;
        let mut rem = target;

        while bit > rem {
            bit >>= 2;
        }

        while bit != 0 {
            if rem >= result + bit {
                rem -= result + bit;
                result = (result >> 1) + bit;
            } else {
                result >>= 1;
            }
            bit >>= 2;
        }

        Fix64(result as i64)
    }

    fn sin_cos(self) -> (Self, Self) {
        let x = self.wrap_angle();

        if x > FRAC_PI_2_RAW {
            let (s, c) = Self::sin_cos_reduced(Fix64(PI_RAW - x));
            (s, -c)
        } else if x < -FRAC_PI_2_RAW {
            let (s, c) = Self::sin_cos_reduced(Fix64(-PI_RAW - x));
            (s, -c)
        } else {
            Self::sin_cos_reduced(Fix64(x))
        }
    }

    #[inline]
    fn pi() -> Self {
        Fix64(PI_RAW)
    }
}
