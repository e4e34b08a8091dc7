//! The scalar module provides the coordinate types that the curve routines in
//! [`crate::point`] are generic over. Two representations are supported:
//!
//! - `f64`, for worked examples and for anything that ends up on a plot.
//! - [`CurveFunction`], an exact element of the function field of the curve
//!   `y^2 = x^3 + 7`. Coordinates of this type are rational functions of a free
//!   variable `x` plus a multiple of `y = sqrt(x^3 + 7)`, and they are kept in
//!   a canonical form so that `==` is equality after simplification.
//!
//! # Examples
//!
//! ```
//! use ecc_real::scalar::*;
//!
//! // y^2 reduces to x^3 + 7
//! let y = CurveFunction::y();
//! let x = CurveFunction::x();
//! assert_eq!(y.clone() * y, x.clone() * x.clone() * x + CurveFunction::from(7));
//! ```

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use num::BigRational;
use num_traits::{One, ToPrimitive, Zero};

/// Implements the by-value forms of a binary operator in terms of the
/// by-reference one.
macro_rules! forward_val_binop {
    (impl $imp:ident, $method:ident for $t:ty) => {
        impl $imp<$t> for $t {
            type Output = $t;

            #[inline]
            fn $method(self, other: $t) -> $t {
                $imp::$method(&self, &other)
            }
        }

        impl<'a> $imp<&'a $t> for $t {
            type Output = $t;

            #[inline]
            fn $method(self, other: &'a $t) -> $t {
                $imp::$method(&self, other)
            }
        }
    };
}

mod function;
mod poly;
mod rational;

pub use function::CurveFunction;
pub use poly::Polynomial;
pub use rational::RationalFunction;

/// Relative tolerance used by `f64` when deciding whether a value is zero for
/// the purpose of a validity check.
pub const F64_TOLERANCE: f64 = 1e-9;

/// A coordinate type that the curve arithmetic can be carried out over.
///
/// Implementors form a field under the usual operators. The additional methods
/// expose the partial operations (inversion and square roots) that the curve
/// routines need, returning `None` rather than producing a meaningless value.
pub trait CurveScalar:
    Clone
    + PartialEq
    + fmt::Debug
    + fmt::Display
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Returns `1/self`, or `None` if `self` is zero
    fn inv(&self) -> Option<Self>;

    /// Returns `self/rhs`, or `None` if `rhs` is zero
    fn checked_div(&self, rhs: &Self) -> Option<Self> {
        rhs.inv().map(|r| self.clone() * r)
    }

    /// Returns the non-negative square root of `self` if the representation
    /// has one
    fn sqrt(&self) -> Option<Self>;

    /// Returns the numeric value, or `None` while the value still depends on a
    /// free variable
    fn to_f64(&self) -> Option<f64>;

    /// Returns `true` if `self` is zero, measured against the magnitude of
    /// `scale` for inexact representations
    fn is_negligible(&self, scale: &Self) -> bool;
}

impl CurveScalar for f64 {
    fn inv(&self) -> Option<f64> {
        if *self == 0.0 {
            None
        } else {
            Some(1.0 / *self)
        }
    }

    fn checked_div(&self, rhs: &f64) -> Option<f64> {
        if *rhs == 0.0 {
            None
        } else {
            Some(*self / *rhs)
        }
    }

    fn sqrt(&self) -> Option<f64> {
        // also rejects NaN
        if *self >= 0.0 {
            Some(f64::sqrt(*self))
        } else {
            None
        }
    }

    fn to_f64(&self) -> Option<f64> {
        Some(*self)
    }

    fn is_negligible(&self, scale: &f64) -> bool {
        self.abs() <= F64_TOLERANCE * scale.abs().max(1.0)
    }
}

/// Returns the scalar `n` built from repeated additions of one, which is exact
/// in every representation
pub(crate) fn small<S: CurveScalar>(n: u32) -> S {
    (0..n).fold(S::zero(), |acc, _| acc + S::one())
}

/// Best-effort conversion of an exact rational into a float
pub(crate) fn ratio_to_f64(r: &BigRational) -> f64 {
    match (r.numer().to_f64(), r.denom().to_f64()) {
        (Some(n), Some(d)) => n / d,
        _ => f64::NAN,
    }
}
