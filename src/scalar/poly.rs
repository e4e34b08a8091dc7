//! Dense univariate polynomials in `x` with exact rational coefficients

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use num::BigRational;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use super::ratio_to_f64;

/// A polynomial `c_0 + c_1*x + ... + c_n*x^n`. Coefficients are stored lowest
/// degree first and the leading coefficient is never zero, so the zero
/// polynomial has no coefficients at all and structural equality is
/// polynomial equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coeffs: Vec<BigRational>,
}

impl Polynomial {
    /// Builds a polynomial from coefficients given lowest degree first
    pub fn from_coeffs(mut coeffs: Vec<BigRational>) -> Self {
        while coeffs.last().map_or(false, Zero::is_zero) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// Builds a polynomial from integer coefficients given lowest degree
    /// first, e.g. `[7, 0, 0, 1]` is `x^3 + 7`
    pub fn from_integers(coeffs: &[i64]) -> Self {
        Self::from_coeffs(
            coeffs
                .iter()
                .map(|&c| BigRational::from_integer(BigInt::from(c)))
                .collect(),
        )
    }

    /// The constant polynomial `c`
    pub fn constant(c: BigRational) -> Self {
        Self::from_coeffs(vec![c])
    }

    /// The polynomial `x`
    pub fn x() -> Self {
        Self::from_integers(&[0, 1])
    }

    /// Returns the degree, or `None` for the zero polynomial
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Coefficients, lowest degree first
    pub fn coeffs(&self) -> &[BigRational] {
        &self.coeffs
    }

    /// Returns the leading coefficient, or `None` for the zero polynomial
    pub fn leading(&self) -> Option<&BigRational> {
        self.coeffs.last()
    }

    /// Returns the value of a polynomial of degree zero (or of the zero
    /// polynomial)
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.coeffs.len() {
            0 => Some(BigRational::zero()),
            1 => Some(self.coeffs[0].clone()),
            _ => None,
        }
    }

    /// Multiplies every coefficient by `c`
    pub fn scale(&self, c: &BigRational) -> Self {
        Self::from_coeffs(self.coeffs.iter().map(|a| a * c).collect())
    }

    /// Returns the polynomial divided by its leading coefficient
    pub fn monic(&self) -> Self {
        match self.leading() {
            Some(lead) if !lead.is_one() => self.scale(&lead.recip()),
            _ => self.clone(),
        }
    }

    /// Euclidean division, returning `(quotient, remainder)` with
    /// `deg(remainder) < deg(divisor)`. Returns `None` when dividing by zero.
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        let lead = divisor.leading()?;
        let shift = divisor.coeffs.len() - 1;
        if self.coeffs.len() <= shift {
            return Some((Self::zero(), self.clone()));
        }

        let mut rem = self.coeffs.clone();
        let mut quot = vec![BigRational::zero(); rem.len() - shift];
        for i in (0..quot.len()).rev() {
            let c = &rem[i + shift] / lead;
            if c.is_zero() {
                continue;
            }
            for (j, d) in divisor.coeffs.iter().enumerate() {
                rem[i + j] = &rem[i + j] - &c * d;
            }
            quot[i] = c;
        }
        rem.truncate(shift);
        Some((Self::from_coeffs(quot), Self::from_coeffs(rem)))
    }

    /// Returns the monic greatest common divisor. `gcd(0, 0)` is zero.
    pub fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            // keeping the remainders monic stops the coefficients blowing up
            let r = match a.div_rem(&b) {
                Some((_, r)) => r.monic(),
                None => break,
            };
            a = b;
            b = r;
        }
        a.monic()
    }

    /// Evaluates the polynomial at `x` in floating point
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + ratio_to_f64(c))
    }
}

impl Zero for Polynomial {
    fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }
}

impl One for Polynomial {
    fn one() -> Self {
        Self::constant(BigRational::one())
    }
}

impl<'a, 'b> Add<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, other: &'b Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| match (self.coeffs.get(i), other.coeffs.get(i)) {
                (Some(a), Some(b)) => a + b,
                (Some(a), None) | (None, Some(a)) => a.clone(),
                (None, None) => BigRational::zero(),
            })
            .collect();
        Polynomial::from_coeffs(coeffs)
    }
}

impl<'a, 'b> Sub<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, other: &'b Polynomial) -> Polynomial {
        self + &(-other)
    }
}

impl<'a, 'b> Mul<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, other: &'b Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }
        let mut coeffs = vec![BigRational::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] = &coeffs[i + j] + a * b;
            }
        }
        Polynomial::from_coeffs(coeffs)
    }
}

forward_val_binop!(impl Add, add for Polynomial);
forward_val_binop!(impl Sub, sub for Polynomial);
forward_val_binop!(impl Mul, mul for Polynomial);

impl<'a> Neg for &'a Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
        }
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        -&self
    }
}

impl fmt::Display for Polynomial {
    /// Writes the polynomial highest degree first, e.g. `-x^6 - 140*x^3 + 392`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (k, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            let sign = if c.is_negative() { "-" } else { "+" };
            if first {
                if c.is_negative() {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {} ", sign)?;
            }
            first = false;

            let abs = c.abs();
            match k {
                0 => write!(f, "{}", abs)?,
                _ => {
                    if !abs.is_one() {
                        write!(f, "{}*", abs)?;
                    }
                    if k == 1 {
                        write!(f, "x")?;
                    } else {
                        write!(f, "x^{}", k)?;
                    }
                }
            }
        }
        Ok(())
    }
}
