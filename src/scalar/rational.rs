//! Rational functions of `x`

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use num::BigRational;
use num_traits::{One, Zero};

use super::Polynomial;

/// A quotient `num/den` of polynomials in lowest terms: the denominator is
/// monic and shares no factor with the numerator, and zero is always `0/1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalFunction {
    num: Polynomial,
    den: Polynomial,
}

impl RationalFunction {
    /// Returns `num/den` in lowest terms, or `None` if `den` is zero
    pub fn new(num: Polynomial, den: Polynomial) -> Option<Self> {
        if den.is_zero() {
            None
        } else {
            Some(Self::reduced(num, den))
        }
    }

    /// Embeds a polynomial
    pub fn from_poly(num: Polynomial) -> Self {
        Self {
            num,
            den: Polynomial::one(),
        }
    }

    /// The constant `c`
    pub fn constant(c: BigRational) -> Self {
        Self::from_poly(Polynomial::constant(c))
    }

    /// The free variable `x`
    pub fn x() -> Self {
        Self::from_poly(Polynomial::x())
    }

    /// The numerator in lowest terms
    pub fn numer(&self) -> &Polynomial {
        &self.num
    }

    /// The monic denominator in lowest terms
    pub fn denom(&self) -> &Polynomial {
        &self.den
    }

    /// Returns `1/self`, or `None` for zero
    pub fn inv(&self) -> Option<Self> {
        Self::new(self.den.clone(), self.num.clone())
    }

    /// Returns the value if the function does not depend on `x`
    pub fn as_constant(&self) -> Option<BigRational> {
        // lowest terms with a monic denominator means a constant is c/1
        match self.den.degree() {
            Some(0) => self.num.as_constant(),
            _ => None,
        }
    }

    /// Evaluates the function at `x` in floating point
    pub fn eval(&self, x: f64) -> f64 {
        self.num.eval(x) / self.den.eval(x)
    }

    /// den must be nonzero
    fn reduced(num: Polynomial, den: Polynomial) -> Self {
        if num.is_zero() {
            return Self::zero();
        }
        let g = num.gcd(&den);
        let (num, den) = match g.degree() {
            Some(d) if d > 0 => (exact_quotient(&num, &g), exact_quotient(&den, &g)),
            _ => (num, den),
        };
        match den.leading() {
            Some(lead) if !lead.is_one() => {
                let inv = lead.recip();
                Self {
                    num: num.scale(&inv),
                    den: den.scale(&inv),
                }
            }
            _ => Self { num, den },
        }
    }
}

fn exact_quotient(a: &Polynomial, g: &Polynomial) -> Polynomial {
    match a.div_rem(g) {
        Some((q, _)) => q,
        None => a.clone(),
    }
}

impl Zero for RationalFunction {
    fn zero() -> Self {
        Self::from_poly(Polynomial::zero())
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl One for RationalFunction {
    fn one() -> Self {
        Self::from_poly(Polynomial::one())
    }
}

impl From<Polynomial> for RationalFunction {
    fn from(p: Polynomial) -> Self {
        Self::from_poly(p)
    }
}

impl<'a, 'b> Add<&'b RationalFunction> for &'a RationalFunction {
    type Output = RationalFunction;

    fn add(self, other: &'b RationalFunction) -> RationalFunction {
        if self.den == other.den {
            return RationalFunction::reduced(&self.num + &other.num, self.den.clone());
        }
        RationalFunction::reduced(
            &self.num * &other.den + &other.num * &self.den,
            &self.den * &other.den,
        )
    }
}

impl<'a, 'b> Sub<&'b RationalFunction> for &'a RationalFunction {
    type Output = RationalFunction;

    fn sub(self, other: &'b RationalFunction) -> RationalFunction {
        self + &(-other)
    }
}

impl<'a, 'b> Mul<&'b RationalFunction> for &'a RationalFunction {
    type Output = RationalFunction;

    fn mul(self, other: &'b RationalFunction) -> RationalFunction {
        if self.is_zero() || other.is_zero() {
            return RationalFunction::zero();
        }
        RationalFunction::reduced(&self.num * &other.num, &self.den * &other.den)
    }
}

forward_val_binop!(impl Add, add for RationalFunction);
forward_val_binop!(impl Sub, sub for RationalFunction);
forward_val_binop!(impl Mul, mul for RationalFunction);

impl<'a> Neg for &'a RationalFunction {
    type Output = RationalFunction;

    fn neg(self) -> RationalFunction {
        RationalFunction {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl Neg for RationalFunction {
    type Output = RationalFunction;

    fn neg(self) -> RationalFunction {
        -&self
    }
}

impl fmt::Display for RationalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "({})/({})", self.num, self.den)
        }
    }
}
