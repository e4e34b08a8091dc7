//! The point module provides the main interface for performing arithmetic on
//! points of the `secp256k1` curve `y^2 = x^3 + 7` over the real numbers. Points
//! are added geometrically: draw the line through them, find its third
//! intersection with the curve, and mirror that point about the x-axis.
//!
//! Every operation is generic over the coordinate type (see
//! [`crate::scalar`]), so the same code produces either numbers, for plotting
//! and worked examples, or exact closed forms in a free variable `x`.
//!
//! # Examples
//!
//! Adding, doubling and subtracting points:
//!
//! ```
//! use ecc_real::point::*;
//!
//! let p = Point::on_curve(5.0, Branch::Lower).unwrap();
//! let q = Point::on_curve(1.0, Branch::Lower).unwrap();
//!
//! let r = p.add(&q).unwrap();
//! assert!(r.is_valid());
//!
//! // subtracting q takes us back to p
//! let back = r.subtract(&q).unwrap();
//! assert!((back.x() - 5.0).abs() < 1e-9);
//! assert!((back.y() - p.y()).abs() < 1e-9);
//!
//! // the tangent gives p + p
//! let two_p = p.double().unwrap();
//! assert_eq!(two_p, p.add(&p).unwrap());
//! ```
//!
//! The same arithmetic is exact when `x` is left as a variable. Here the
//! chained sum `p + (p + 2p)` and the doubling of `2p` come out identical, not
//! merely close:
//!
//! ```
//! use ecc_real::point::*;
//! use ecc_real::scalar::CurveFunction;
//!
//! let p = Point::on_curve(CurveFunction::x(), Branch::Lower).unwrap();
//! let two_p = p.double().unwrap();
//! let four_p = p.add(&p.add(&two_p).unwrap()).unwrap();
//! assert_eq!(four_p, two_p.double().unwrap());
//! ```
//!
//! Halving is the inverse of doubling and has one answer on each branch:
//!
//! ```
//! use ecc_real::point::*;
//!
//! let two_p = Point::on_curve(-1.7, Branch::Lower).unwrap();
//! for &branch in [Branch::Upper, Branch::Lower].iter() {
//!     let p = two_p.half(branch).unwrap();
//!     let again = p.double().unwrap();
//!     assert!((again.x() - two_p.x()).abs() < 1e-6);
//!     assert!((again.y() - two_p.y()).abs() < 1e-6);
//! }
//! ```

use core::fmt;
use core::ops::Neg;

use crate::scalar::CurveScalar;

mod errors;
mod tangent;
mod utils;

pub use errors::{Error, Line, Result};
pub use tangent::{SolverConfig, TangentSolver, RELIABLE_ANCHOR_MAX, TANGENT_SEARCH_SEED};
pub use utils::{
    curve_rhs, curve_y, line_y, secant_slope, slope, tangent_slope, third_intersection,
};

/// The leftmost real x-coordinate on the curve, `-cuberoot(7)`. For smaller
/// `x` the value `x^3 + 7` is negative and `y` is not real.
pub const MIN_CURVE_X: f64 = -1.912_931_182_772_389;

/// Selects one of the two mirror-image halves of the curve at a given `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Branch {
    /// `y >= 0`, ie `y = sqrt(x^3 + 7)`
    Upper,
    /// `y <= 0`, ie `y = -sqrt(x^3 + 7)`
    Lower,
}

impl Branch {
    /// Returns `true` for the upper branch
    pub fn is_upper(self) -> bool {
        self == Branch::Upper
    }

    /// Returns the other branch
    pub fn mirrored(self) -> Self {
        match self {
            Branch::Upper => Branch::Lower,
            Branch::Lower => Branch::Upper,
        }
    }
}

impl From<bool> for Branch {
    /// `true` selects the upper (positive `y`) branch
    fn from(positive: bool) -> Self {
        if positive {
            Branch::Upper
        } else {
            Branch::Lower
        }
    }
}

/// The `Point` struct is an immutable `(x, y)` coordinate pair. Apart from
/// values built directly through [`Point::new`], points satisfy
/// `y^2 = x^3 + 7` (exactly or to floating point precision, depending on `S`).
///
/// Operations never modify a point; they return new ones. Note that the point
/// at infinity is not represented, so adding a point to its own negative is an
/// `UndefinedSlope` error rather than the identity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point<S> {
    x: S,
    y: S,
}

impl<S: CurveScalar> Point<S> {
    /// Creates a point from raw coordinates. These are not checked against the
    /// curve equation, see `is_valid()`.
    pub fn new(x: S, y: S) -> Self {
        Self { x, y }
    }

    /// Returns the point of the curve at `x` on the requested branch
    pub fn on_curve(x: S, branch: Branch) -> Result<Self> {
        let y = curve_y(&x, branch)?;
        Ok(Self::new(x, y))
    }

    /// x-coordinate
    pub fn x(&self) -> &S {
        &self.x
    }

    /// y-coordinate
    pub fn y(&self) -> &S {
        &self.y
    }

    /// Both coordinates
    pub fn coords(&self) -> (&S, &S) {
        (&self.x, &self.y)
    }

    /// Consumes the point and returns both coordinates
    pub fn into_coords(self) -> (S, S) {
        (self.x, self.y)
    }

    /// Returns `y^2 - x^3 - 7`, which is zero for points of the curve
    pub fn residual(&self) -> S {
        self.y.clone() * self.y.clone() - curve_rhs(&self.x)
    }

    /// Returns `true` if the point satisfies the curve equation (exactly, or
    /// within a relative tolerance for floats)
    pub fn is_valid(&self) -> bool {
        let scale = self.y.clone() * self.y.clone();
        self.residual().is_negligible(&scale)
    }

    /// Returns the numeric coordinates, failing if either one still depends on
    /// a free variable
    pub fn to_numeric(&self) -> Result<Point<f64>> {
        let x = self.x.to_f64().ok_or_else(|| Error::NotNumeric(self.x.to_string()))?;
        let y = self.y.to_f64().ok_or_else(|| Error::NotNumeric(self.y.to_string()))?;
        Ok(Point::new(x, y))
    }

    /// Returns the point mirrored about the x-axis
    pub fn negate(&self) -> Self {
        Self::new(self.x.clone(), -self.y.clone())
    }

    /// Performs point addition: the line through `self` and `other` (the
    /// tangent when they are equal) meets the curve in a third point, and the
    /// sum is that point mirrored about the x-axis.
    pub fn add(&self, other: &Self) -> Result<Self> {
        let r = third_intersection(self, other)?;
        Ok(r.negate())
    }

    /// Returns `self + self`
    pub fn double(&self) -> Result<Self> {
        self.add(self)
    }

    /// Returns `self - other`, ie `self + (-other)`
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.add(&other.negate())
    }

    /// Returns a point `h` on `branch` with `h + h == self`, using the default
    /// tangent solver. Both branches hold such a point, so the result depends on
    /// the selector.
    pub fn half(&self, branch: Branch) -> Result<Point<f64>> {
        self.half_with(branch, &TangentSolver::default())
    }

    /// Like `half()`, but with an explicit solver. Mirrors `self` about the
    /// x-axis and finds the point whose tangent passes through the mirror
    /// image.
    pub fn half_with(&self, branch: Branch, solver: &TangentSolver) -> Result<Point<f64>> {
        solver.solve(&self.negate(), branch)
    }

    /// Returns `[p, 2p, ..., kp]`, each one obtained by adding `p` to the
    /// previous one
    pub fn multiples(&self, k: usize) -> Result<Vec<Self>> {
        if k == 0 {
            return Err(Error::ZeroMultiple);
        }
        let mut out = Vec::with_capacity(k);
        out.push(self.clone());
        for i in 1..k {
            let next = self.add(&out[i - 1])?;
            out.push(next);
        }
        Ok(out)
    }

    /// Returns `kp` by double-and-add
    pub fn scalar_mul(&self, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::ZeroMultiple);
        }
        let mut acc: Option<Self> = None;
        let mut base = self.clone();
        let mut k = k;
        loop {
            if k & 1 == 1 {
                acc = Some(match acc {
                    None => base.clone(),
                    Some(a) => a.add(&base)?,
                });
            }
            k >>= 1;
            if k == 0 {
                break;
            }
            base = base.double()?;
        }
        acc.ok_or(Error::ZeroMultiple)
    }

    /// Returns the geometric construction of `self + other`, which is what a
    /// plot of the addition draws
    pub fn construct_sum(&self, other: &Self) -> Result<Construction<S>> {
        let slope = slope(self, other)?;
        let intersection = third_intersection(self, other)?;
        let sum = intersection.negate();
        Ok(Construction {
            p: self.clone(),
            q: other.clone(),
            slope,
            intersection,
            sum,
        })
    }
}

impl<S: CurveScalar> Neg for Point<S> {
    type Output = Point<S>;

    fn neg(self) -> Point<S> {
        Point::new(self.x, -self.y)
    }
}

impl<'a, S: CurveScalar> Neg for &'a Point<S> {
    type Output = Point<S>;

    fn neg(self) -> Point<S> {
        self.negate()
    }
}

impl<S: fmt::Display> fmt::Display for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The pieces of the point addition `p + q`: the line through `p` and `q` with
/// its slope, where it meets the curve again, and the sum (that meeting point
/// mirrored about the x-axis).
#[derive(Clone, Debug, PartialEq)]
pub struct Construction<S> {
    /// first summand
    pub p: Point<S>,
    /// second summand
    pub q: Point<S>,
    /// slope of the line through `p` and `q`
    pub slope: S,
    /// third intersection of the line with the curve
    pub intersection: Point<S>,
    /// `p + q`
    pub sum: Point<S>,
}

impl<S: CurveScalar> Construction<S> {
    /// Returns `true` if the line is the tangent at `p`, ie this is a doubling
    pub fn is_tangent(&self) -> bool {
        self.p == self.q
    }

    /// Returns the range of x covered by the line from `p` and `q` to the
    /// intersection. Note that the intersection can lie between the summands.
    pub fn x_span(&self) -> Result<(f64, f64)> {
        let xs = [
            self.p.to_numeric()?.x,
            self.q.to_numeric()?.x,
            self.intersection.to_numeric()?.x,
        ];
        let lo = xs.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Ok((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{CurveFunction, Polynomial, RationalFunction};
    use approx::assert_relative_eq;
    use num_traits::Zero;

    const EPS: f64 = 1e-9;

    fn pt(x: f64, branch: Branch) -> Point<f64> {
        Point::on_curve(x, branch).unwrap()
    }

    fn assert_close(a: &Point<f64>, b: &Point<f64>, eps: f64) {
        assert_relative_eq!(a.x, b.x, epsilon = eps, max_relative = eps);
        assert_relative_eq!(a.y, b.y, epsilon = eps, max_relative = eps);
    }

    fn frac(num: &[i64], den: &[i64]) -> RationalFunction {
        let num = Polynomial::from_integers(num);
        RationalFunction::new(num, Polynomial::from_integers(den)).unwrap()
    }

    #[test]
    fn add_test() {
        for vector in ADD_TEST_VECTORS.iter() {
            let p = pt((vector.0).0, (vector.0).1);
            let q = pt((vector.1).0, (vector.1).1);
            let sum = p.add(&q).unwrap();
            let (ex, ey) = vector.2;
            assert_relative_eq!(*sum.x(), ex, epsilon = EPS, max_relative = EPS);
            assert_relative_eq!(*sum.y(), ey, epsilon = EPS, max_relative = EPS);
            assert!(sum.is_valid(), "sum of {} and {} is off the curve", p, q);
        }
    }

    #[test]
    fn closed_form_sum() {
        // p = (5, -sqrt(132)), q = (1, -sqrt(8)): xr = m^2 - 5 - 1 = 11/4 - sqrt(66)/2
        let p = pt(5.0, Branch::Lower);
        let q = pt(1.0, Branch::Lower);
        let m = (p.y() - q.y()) / (5.0 - 1.0);
        let xr = m * m - 5.0 - 1.0;
        let yr = m * (xr - 5.0) + p.y();
        let sum = p.add(&q).unwrap();
        assert_relative_eq!(*sum.x(), xr, epsilon = 1e-12);
        assert_relative_eq!(*sum.y(), -yr, epsilon = 1e-12);
        assert_relative_eq!(*sum.x(), 11.0 / 4.0 - 66f64.sqrt() / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn doubling_test() {
        // p = (2, -sqrt(15)): m^2 = 144/60, so x(2p) = 2.4 - 4
        let p = pt(2.0, Branch::Lower);
        let two_p = p.double().unwrap();
        assert_relative_eq!(*two_p.x(), -1.6, epsilon = 1e-12);
        assert_relative_eq!(*two_p.y(), -1.704_112_672_331_263, epsilon = EPS);
        assert!(two_p.is_valid());
    }

    #[test]
    fn four_p_test() {
        for vector in FOUR_P_TEST_VECTORS.iter() {
            let p = pt(vector.0, vector.1);
            let chain = p.multiples(4).unwrap();
            let four_p = &chain[3];
            let two_p_plus_two_p = chain[1].double().unwrap();
            let expected = Point::new((vector.2).0, (vector.2).1);
            assert_close(four_p, &expected, 1e-9);
            assert_close(&two_p_plus_two_p, &expected, 1e-9);
            assert_close(&p.scalar_mul(4).unwrap(), &expected, 1e-9);
            for m in chain.iter() {
                assert!(m.is_valid(), "{} is off the curve", m);
            }
        }
    }

    #[test]
    fn commutativity() {
        let p = pt(6.0, Branch::Lower);
        let q = pt(-1.0, Branch::Upper);
        assert_close(&p.add(&q).unwrap(), &q.add(&p).unwrap(), 1e-12);

        let p = Point::on_curve(CurveFunction::x(), Branch::Upper).unwrap();
        let q = p.double().unwrap();
        assert_eq!(p.add(&q).unwrap(), q.add(&p).unwrap());
    }

    #[test]
    fn negation() {
        let p = pt(3.0, Branch::Upper);
        assert_eq!(p.negate().negate(), p);
        assert_eq!(-&p, p.negate());
        assert_eq!(*p.negate().y(), -*p.y());
        assert_eq!(-(-p.clone()), p);
    }

    #[test]
    fn subtraction_inverts_addition() {
        let cases = [
            (pt(5.0, Branch::Lower), pt(1.0, Branch::Lower)),
            (pt(6.0, Branch::Lower), pt(-1.0, Branch::Upper)),
            (pt(0.5, Branch::Upper), pt(2.5, Branch::Upper)),
            (pt(-1.5, Branch::Lower), pt(4.0, Branch::Upper)),
        ];
        for (p, q) in cases.iter() {
            let r = p.add(q).unwrap();
            assert_close(&r.subtract(q).unwrap(), p, 1e-9);
        }

        let p = Point::on_curve(CurveFunction::x(), Branch::Lower).unwrap();
        let two_p = p.double().unwrap();
        let three_p = p.add(&two_p).unwrap();
        assert_eq!(three_p.subtract(&two_p).unwrap(), p);
    }

    #[test]
    fn symbolic_closed_forms() {
        let p = Point::on_curve(CurveFunction::x(), Branch::Lower).unwrap();
        let two_p = p.double().unwrap();

        // x(2p) = x(x^3 - 56) / 4(x^3 + 7)
        let x2 = CurveFunction::from_parts(
            frac(&[0, -56, 0, 0, 1], &[28, 0, 0, 4]),
            RationalFunction::zero(),
        );
        assert_eq!(two_p.x(), &x2);
        // y(2p) = (-x^6 - 140x^3 + 392) y / 8(x^3 + 7)^2
        let y2 = CurveFunction::from_parts(
            RationalFunction::zero(),
            frac(&[392, 0, 0, -140, 0, 0, -1], &[392, 0, 0, 112, 0, 0, 8]),
        );
        assert_eq!(two_p.y(), &y2);

        // x(3p) = (x^9 - 672x^6 + 2352x^3 + 21952) / 9x^2(x^3 + 28)^2
        let three_p = p.add(&two_p).unwrap();
        let x3 = frac(
            &[21952, 0, 0, 2352, 0, 0, -672, 0, 0, 1],
            &[0, 0, 7056, 0, 0, 504, 0, 0, 9],
        );
        assert_eq!(three_p.x().rational_part(), &x3);
        assert!(three_p.x().y_part().is_zero());

        assert!(two_p.is_valid());
        assert!(three_p.is_valid());
    }

    #[test]
    fn symbolic_four_p() {
        for &branch in [Branch::Upper, Branch::Lower].iter() {
            let p = Point::on_curve(CurveFunction::x(), branch).unwrap();
            let chain = p.multiples(4).unwrap();
            let two_p_plus_two_p = chain[1].double().unwrap();
            assert_eq!(chain[3], two_p_plus_two_p);
            assert!(chain[3].is_valid());
        }
    }

    #[test]
    fn symbolic_matches_numeric() {
        let p = Point::on_curve(CurveFunction::x(), Branch::Upper).unwrap();
        let four_p = p.scalar_mul(4).unwrap();
        let (x, y) = (10.0, 1007f64.sqrt());
        let numeric = pt(10.0, Branch::Upper).scalar_mul(4).unwrap();
        let (ex, ey) = (*numeric.x(), *numeric.y());
        assert_relative_eq!(four_p.x().eval(x, y), ex, epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(four_p.y().eval(x, y), ey, epsilon = 1e-9, max_relative = 1e-9);
        assert!(four_p.to_numeric().is_err());
    }

    #[test]
    fn halving_inverts_doubling() {
        let two_p = pt(-1.7, Branch::Lower);
        let mut halves = Vec::new();
        for vector in HALF_TEST_VECTORS.iter() {
            let half = two_p.half(vector.0).unwrap();
            assert_relative_eq!(*half.x(), vector.1, epsilon = 1e-9);
            assert_relative_eq!(*half.y(), vector.2, epsilon = 1e-9);
            assert_close(&half.double().unwrap(), &two_p, 1e-6);
            halves.push(half);
        }
        assert_ne!(halves[0], halves[1]);
    }

    #[test]
    fn halving_needs_numbers() {
        let p = Point::on_curve(CurveFunction::x(), Branch::Upper).unwrap();
        assert!(matches!(p.half(Branch::Upper), Err(Error::NotNumeric(_))));
    }

    #[test]
    fn opposite_points_have_no_sum() {
        let p = pt(2.0, Branch::Upper);
        assert_eq!(p.subtract(&p), Err(Error::UndefinedSlope(Line::Secant)));
        let root = Point::new(MIN_CURVE_X, 0.0);
        assert_eq!(root.double(), Err(Error::UndefinedSlope(Line::Tangent)));
    }

    #[test]
    fn leftmost_point() {
        let root = Point::on_curve(MIN_CURVE_X, Branch::Upper).unwrap();
        assert!(*root.y() >= 0.0 && *root.y() < 1e-7);
        assert!(root.is_valid());
        let below = Point::on_curve(MIN_CURVE_X, Branch::Lower).unwrap();
        assert_eq!(*below.y(), -*root.y());
        // one step left leaves the curve
        let left = MIN_CURVE_X - 1e-12;
        assert!(matches!(Point::on_curve(left, Branch::Upper), Err(Error::NoSquareRoot { .. })));
        assert!(!matches!(root.half(Branch::Upper), Err(Error::Domain { .. })));
    }

    #[test]
    fn multiples_and_scalar_mul() {
        let p = pt(3.0, Branch::Upper);
        assert_eq!(p.multiples(0), Err(Error::ZeroMultiple));
        assert_eq!(p.scalar_mul(0), Err(Error::ZeroMultiple));
        assert_eq!(p.multiples(1).unwrap(), vec![p.clone()]);
        assert_eq!(p.scalar_mul(1).unwrap(), p);

        let chain = p.multiples(7).unwrap();
        assert_eq!(chain.len(), 7);
        for (i, m) in chain.iter().enumerate() {
            assert_close(&p.scalar_mul(i + 1).unwrap(), m, 1e-6);
        }
    }

    #[test]
    fn construction() {
        let p = pt(6.0, Branch::Lower);
        let q = pt(-1.0, Branch::Upper);
        let c = p.construct_sum(&q).unwrap();
        assert!(!c.is_tangent());
        assert_eq!(c.sum, p.add(&q).unwrap());
        assert_eq!(c.sum, c.intersection.negate());
        assert_eq!(c.slope, slope(&p, &q).unwrap());
        let (lo, hi) = c.x_span().unwrap();
        assert_eq!((lo, hi), (-1.0, 6.0));
        // the intersection lies between the summands here
        assert!(lo < *c.intersection.x() && *c.intersection.x() < hi);

        let d = pt(2.0, Branch::Lower).construct_sum(&pt(2.0, Branch::Lower)).unwrap();
        assert!(d.is_tangent());
        assert_relative_eq!(d.x_span().unwrap().0, -1.6, epsilon = 1e-12);

        let s = Point::on_curve(CurveFunction::x(), Branch::Upper).unwrap();
        assert!(s.construct_sum(&s).unwrap().x_span().is_err());
    }

    #[test]
    fn validity() {
        assert!(pt(10.0, Branch::Upper).is_valid());
        assert!(!Point::new(1.0, 1.0).is_valid());
        assert!(!Point::new(CurveFunction::x(), CurveFunction::x()).is_valid());
        assert!(Point::new(CurveFunction::x(), -CurveFunction::y()).is_valid());
    }

    #[test]
    fn branch_selector() {
        assert_eq!(Branch::from(true), Branch::Upper);
        assert_eq!(Branch::from(false), Branch::Lower);
        assert!(Branch::Upper.is_upper());
        assert_eq!(Branch::Lower.mirrored(), Branch::Upper);
        assert!(*pt(4.0, Branch::Lower).y() < 0.0);
    }

    #[test]
    fn display() {
        assert_eq!(Point::new(1.5, -2.0).to_string(), "(1.5, -2)");
        let p = Point::on_curve(CurveFunction::x(), Branch::Lower).unwrap();
        assert_eq!(p.to_string(), "(x, -y)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let p = pt(5.0, Branch::Lower);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(serde_json::from_str::<Point<f64>>(&json).unwrap(), p);
        assert_eq!(serde_json::to_string(&Branch::Upper).unwrap(), "\"Upper\"");
    }

    // (x, branch) pairs of the summands and the expected sum, computed once
    // with the chord rule in double precision
    const ADD_TEST_VECTORS: [((f64, Branch), (f64, Branch), (f64, f64)); 3] = [
        (
            (5.0, Branch::Lower),
            (1.0, Branch::Lower),
            (-1.312_019_202_317_980_4, -2.177_497_992_918_514_3),
        ),
        (
            (6.0, Branch::Lower),
            (-1.0, Branch::Upper),
            (1.166_476_829_238_521_7, 2.930_390_403_955_032),
        ),
        (
            (2.0, Branch::Lower),
            (2.0, Branch::Lower),
            (-1.6, -1.704_112_672_331_263),
        ),
    ];

    // (x, branch, 4p)
    const FOUR_P_TEST_VECTORS: [(f64, Branch, (f64, f64)); 3] = [
        (10.0, Branch::Upper, (-1.271_565_685_447_572_3, 2.223_517_882_604_856)),
        (4.0, Branch::Lower, (-0.225_300_313_567_271_98, 2.643_589_170_800_342_3)),
        (3.0, Branch::Upper, (1.335_330_699_027_089, -3.062_848_176_656_985_7)),
    ];

    // halves of (-1.7, lower): (branch, x, y)
    const HALF_TEST_VECTORS: [(Branch, f64, f64); 2] = [
        (Branch::Lower, 1.880_099_494_044_988_2, -3.694_012_318_751_729_8),
        (Branch::Upper, 0.981_302_496_160_091_5, 2.818_678_722_707_698_4),
    ];
}
