//! utils module: the curve and line equations, slopes, and the chord
//! intersection that point addition is built on

use crate::scalar::{small, CurveScalar};

use super::errors::{Error, Line, Result};
use super::{Branch, Point};

/// Returns `x^3 + 7`
pub fn curve_rhs<S: CurveScalar>(x: &S) -> S {
    x.clone() * x.clone() * x.clone() + small(7)
}

/// Returns `y` such that `y^2 = x^3 + 7`, with the sign chosen by `branch`:
/// `y = sqrt(x^3 + 7)` on the upper branch and `-sqrt(x^3 + 7)` on the lower.
///
/// Nothing restricts `x` up front. If the representation has no square root
/// of `x^3 + 7` (e.g. a float `x < -cuberoot(7)`) the result is
/// `Error::NoSquareRoot`.
pub fn curve_y<S: CurveScalar>(x: &S, branch: Branch) -> Result<S> {
    let y = curve_rhs(x)
        .sqrt()
        .ok_or_else(|| Error::NoSquareRoot { x: x.to_string() })?;
    Ok(match branch {
        Branch::Upper => y,
        Branch::Lower => -y,
    })
}

/// Returns `y` at `x` on the line through `anchor` with slope `m`:
///
/// ```text
/// y = mx + c, with c = yp - m(xp)
/// ie y = m(x - xp) + yp
/// ```
pub fn line_y<S: CurveScalar>(x: &S, anchor: &Point<S>, m: &S) -> S {
    m.clone() * (x.clone() - anchor.x().clone()) + anchor.y().clone()
}

/// Slope of the tangent to the curve at `p`. Differentiating
/// `y = +/-sqrt(x^3 + 7)` gives `m = 3x^2 / 2y`, undefined where `y = 0`.
pub fn tangent_slope<S: CurveScalar>(p: &Point<S>) -> Result<S> {
    let (xp, yp) = p.coords();
    let num = small::<S>(3) * xp.clone() * xp.clone();
    let den = small::<S>(2) * yp.clone();
    num.checked_div(&den).ok_or(Error::UndefinedSlope(Line::Tangent))
}

/// Slope `(yp - yq) / (xp - xq)` of the line through two distinct points,
/// undefined when they share an x-coordinate
pub fn secant_slope<S: CurveScalar>(p: &Point<S>, q: &Point<S>) -> Result<S> {
    let num = p.y().clone() - q.y().clone();
    let den = p.x().clone() - q.x().clone();
    num.checked_div(&den).ok_or(Error::UndefinedSlope(Line::Secant))
}

/// Slope of the line through `p` and `q`. When the two are the same point
/// (by value) this is the tangent at `p`.
pub fn slope<S: CurveScalar>(p: &Point<S>, q: &Point<S>) -> Result<S> {
    if p == q {
        tangent_slope(p)
    } else {
        secant_slope(p, q)
    }
}

/// Returns the third point where the line through `p` and `q` (the tangent at
/// `p` if `p == q`) meets the curve.
///
/// Substituting `y = mx + c` into `y^2 = x^3 + 7` gives
///
/// ```text
/// x^3 - (m^2)x^2 - 2mcx + 7 - c^2 = 0
/// ```
///
/// whose three roots are `xp`, `xq` and the unknown `xr`. Expanding
/// `(x - xp)(x - xq)(x - xr)` and comparing the `x^2` terms gives
/// `xr = m^2 - xp - xq`. The y-coordinate comes from the line through `p`.
pub fn third_intersection<S: CurveScalar>(p: &Point<S>, q: &Point<S>) -> Result<Point<S>> {
    let m = slope(p, q)?;
    let xr = m.clone() * m.clone() - p.x().clone() - q.x().clone();
    let yr = line_y(&xr, p, &m);
    log::trace!("line through {} and {} with slope {} meets the curve at x = {}", p, q, m, xr);
    Ok(Point::new(xr, yr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::CurveFunction;
    use approx::assert_relative_eq;

    #[test]
    fn curve_y_branches() {
        assert_eq!(curve_y(&2.0, Branch::Upper).unwrap(), 15f64.sqrt());
        assert_eq!(curve_y(&2.0, Branch::Lower).unwrap(), -(15f64.sqrt()));
        assert!(matches!(curve_y(&-2.0, Branch::Upper), Err(Error::NoSquareRoot { .. })));

        assert_eq!(curve_y(&CurveFunction::x(), Branch::Lower).unwrap(), -CurveFunction::y());
        assert_eq!(curve_y(&CurveFunction::x(), Branch::Upper).unwrap(), CurveFunction::y());
        // no rational x puts a rational point on the curve
        assert!(matches!(
            curve_y(&CurveFunction::from(2), Branch::Upper),
            Err(Error::NoSquareRoot { .. })
        ));
    }

    #[test]
    fn line_through_anchor() {
        let anchor = Point::new(1.0, 2.0);
        assert_eq!(line_y(&1.0, &anchor, &3.0), 2.0);
        assert_eq!(line_y(&3.0, &anchor, &-0.5), 1.0);
    }

    #[test]
    fn slopes() {
        let p = Point::on_curve(2.0, Branch::Lower).unwrap();
        let q = Point::on_curve(5.0, Branch::Lower).unwrap();
        assert_relative_eq!(tangent_slope(&p).unwrap(), 12.0 / (2.0 * p.y()), epsilon = 1e-12);
        assert_relative_eq!(
            secant_slope(&p, &q).unwrap(),
            (p.y() - q.y()) / (2.0 - 5.0),
            epsilon = 1e-12
        );
        assert_eq!(slope(&p, &p.clone()).unwrap(), tangent_slope(&p).unwrap());
        assert_eq!(slope(&p, &q).unwrap(), secant_slope(&p, &q).unwrap());
    }

    #[test]
    fn vertical_lines() {
        let root = Point::new(-7f64.cbrt(), 0.0);
        assert_eq!(tangent_slope(&root), Err(Error::UndefinedSlope(Line::Tangent)));

        let p = Point::on_curve(3.0, Branch::Upper).unwrap();
        assert_eq!(secant_slope(&p, &-&p), Err(Error::UndefinedSlope(Line::Secant)));
        assert_eq!(slope(&p, &-&p), Err(Error::UndefinedSlope(Line::Secant)));
    }

    #[test]
    fn intersection_lies_on_line_and_curve() {
        let p = Point::on_curve(5.0, Branch::Lower).unwrap();
        let q = Point::on_curve(1.0, Branch::Lower).unwrap();
        let r = third_intersection(&p, &q).unwrap();
        assert!(r.is_valid());
        let m = slope(&p, &q).unwrap();
        // the same line anchored at q gives the same point
        assert_relative_eq!(*r.y(), line_y(r.x(), &q, &m), epsilon = 1e-9);
    }
}
