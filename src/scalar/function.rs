//! Exact symbolic coordinates on `y^2 = x^3 + 7`

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use num::BigRational;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use super::{ratio_to_f64, CurveScalar, Polynomial, RationalFunction};

/// An element `a + b*y` of the function field of the curve, where `a` and `b`
/// are rational functions of the free variable `x` and `y` is the upper square
/// root of `x^3 + 7`. Because `{1, y}` is a basis of the field over the
/// rational functions, and both parts are kept in lowest terms, two values
/// compare equal exactly when they are algebraically equal.
///
/// This is enough to express the point `(x, y)` (or `(x, -y)`) as a free
/// variable together with every sum, difference and multiple derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveFunction {
    a: RationalFunction,
    b: RationalFunction,
}

/// `x^3 + 7`
fn curve_rhs() -> RationalFunction {
    RationalFunction::from_poly(Polynomial::from_integers(&[7, 0, 0, 1]))
}

impl CurveFunction {
    /// Builds `a + b*y`
    pub fn from_parts(a: RationalFunction, b: RationalFunction) -> Self {
        Self { a, b }
    }

    /// The free variable `x`
    pub fn x() -> Self {
        Self::from_parts(RationalFunction::x(), RationalFunction::zero())
    }

    /// `y = sqrt(x^3 + 7)`, taken on the upper branch
    pub fn y() -> Self {
        Self::from_parts(RationalFunction::zero(), RationalFunction::one())
    }

    /// The rational constant `c`
    pub fn constant(c: BigRational) -> Self {
        Self::from_parts(RationalFunction::constant(c), RationalFunction::zero())
    }

    /// The part `a` of `a + b*y`
    pub fn rational_part(&self) -> &RationalFunction {
        &self.a
    }

    /// The part `b` of `a + b*y`
    pub fn y_part(&self) -> &RationalFunction {
        &self.b
    }

    /// Evaluates the value at a concrete curve point `(x, y)`
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        if self.b.is_zero() {
            self.a.eval(x)
        } else {
            self.a.eval(x) + self.b.eval(x) * y
        }
    }

    fn as_constant(&self) -> Option<BigRational> {
        if self.b.is_zero() {
            self.a.as_constant()
        } else {
            None
        }
    }
}

/// Returns the exact rational square root of a non-negative rational, if any
fn rational_sqrt(c: &BigRational) -> Option<BigRational> {
    if c.is_negative() {
        return None;
    }
    let n = int_sqrt(c.numer())?;
    let d = int_sqrt(c.denom())?;
    Some(BigRational::new(n, d))
}

fn int_sqrt(n: &BigInt) -> Option<BigInt> {
    let root = n.sqrt();
    if &(&root * &root) == n {
        Some(root)
    } else {
        None
    }
}

impl CurveScalar for CurveFunction {
    fn inv(&self) -> Option<Self> {
        // 1/(a + by) = (a - by)/(a^2 - b^2(x^3 + 7))
        let norm = &self.a * &self.a - &(&self.b * &self.b) * &curve_rhs();
        let norm_inv = norm.inv()?;
        Some(Self::from_parts(&self.a * &norm_inv, -(&self.b * &norm_inv)))
    }

    fn sqrt(&self) -> Option<Self> {
        if !self.b.is_zero() {
            return None;
        }
        if self.a == curve_rhs() {
            return Some(Self::y());
        }
        let c = self.a.as_constant()?;
        rational_sqrt(&c).map(Self::constant)
    }

    fn to_f64(&self) -> Option<f64> {
        self.as_constant().map(|c| ratio_to_f64(&c))
    }

    fn is_negligible(&self, _scale: &Self) -> bool {
        self.is_zero()
    }
}

impl Zero for CurveFunction {
    fn zero() -> Self {
        Self::from_parts(RationalFunction::zero(), RationalFunction::zero())
    }

    fn is_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero()
    }
}

impl One for CurveFunction {
    fn one() -> Self {
        Self::from_parts(RationalFunction::one(), RationalFunction::zero())
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CurveFunction {
                fn from(n: $t) -> Self {
                    Self::constant(BigRational::from_integer(BigInt::from(n)))
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64);

impl<'a, 'b> Add<&'b CurveFunction> for &'a CurveFunction {
    type Output = CurveFunction;

    fn add(self, other: &'b CurveFunction) -> CurveFunction {
        CurveFunction::from_parts(&self.a + &other.a, &self.b + &other.b)
    }
}

impl<'a, 'b> Sub<&'b CurveFunction> for &'a CurveFunction {
    type Output = CurveFunction;

    fn sub(self, other: &'b CurveFunction) -> CurveFunction {
        CurveFunction::from_parts(&self.a - &other.a, &self.b - &other.b)
    }
}

impl<'a, 'b> Mul<&'b CurveFunction> for &'a CurveFunction {
    type Output = CurveFunction;

    fn mul(self, other: &'b CurveFunction) -> CurveFunction {
        // y^2 = x^3 + 7
        let a = &self.a * &other.a + &(&self.b * &other.b) * &curve_rhs();
        let b = &self.a * &other.b + &self.b * &other.a;
        CurveFunction::from_parts(a, b)
    }
}

forward_val_binop!(impl Add, add for CurveFunction);
forward_val_binop!(impl Sub, sub for CurveFunction);
forward_val_binop!(impl Mul, mul for CurveFunction);

impl<'a> Neg for &'a CurveFunction {
    type Output = CurveFunction;

    fn neg(self) -> CurveFunction {
        CurveFunction::from_parts(-&self.a, -&self.b)
    }
}

impl Neg for CurveFunction {
    type Output = CurveFunction;

    fn neg(self) -> CurveFunction {
        -&self
    }
}

impl fmt::Display for CurveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.b.is_zero() {
            return write!(f, "{}", self.a);
        }
        if !self.a.is_zero() {
            write!(f, "{} + ", self.a)?;
        }
        if self.b.is_one() {
            write!(f, "y")
        } else if (-&self.b).is_one() {
            write!(f, "-y")
        } else {
            write!(f, "({})*y", self.b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_squared_reduces() {
        let y = CurveFunction::y();
        let x = CurveFunction::x();
        assert_eq!(y.clone() * y.clone(), x.clone() * x.clone() * x + CurveFunction::from(7));
        assert_eq!(CurveScalar::sqrt(&(y.clone() * y.clone())), Some(y));
    }

    #[test]
    fn inverse() {
        let v = CurveFunction::x() + CurveFunction::y();
        let inv = v.inv().unwrap();
        assert_eq!(v * inv, CurveFunction::one());
        assert!(CurveFunction::zero().inv().is_none());
        assert_eq!(CurveFunction::y().inv().unwrap() * CurveFunction::y(), CurveFunction::one());
    }

    #[test]
    fn constant_square_roots() {
        let nine_quarters = CurveFunction::constant(BigRational::new(9.into(), 4.into()));
        assert_eq!(
            CurveScalar::sqrt(&nine_quarters),
            Some(CurveFunction::constant(BigRational::new(3.into(), 2.into())))
        );
        assert_eq!(CurveScalar::sqrt(&CurveFunction::from(132)), None);
        assert_eq!(CurveScalar::sqrt(&CurveFunction::from(-4)), None);
        assert_eq!(CurveScalar::sqrt(&CurveFunction::x()), None);
        assert_eq!(CurveScalar::sqrt(&CurveFunction::zero()), Some(CurveFunction::zero()));
    }

    #[test]
    fn numeric_values() {
        assert_eq!(CurveFunction::from(-3).to_f64(), Some(-3.0));
        assert_eq!(CurveFunction::x().to_f64(), None);
        assert_eq!(CurveFunction::y().to_f64(), None);
        let v = CurveFunction::x() * CurveFunction::y();
        assert_eq!(v.eval(2.0, 15f64.sqrt()), 2.0 * 15f64.sqrt());
    }

    #[test]
    fn display() {
        assert_eq!(CurveFunction::y().to_string(), "y");
        assert_eq!((CurveFunction::x() + CurveFunction::y()).to_string(), "x + y");
        assert_eq!((-CurveFunction::y()).to_string(), "-y");
        let term = CurveFunction::x() * CurveFunction::y();
        assert_eq!((CurveFunction::from(2) + term).to_string(), "2 + (x)*y");
        assert_eq!(CurveFunction::from(7).to_string(), "7");
    }
}
