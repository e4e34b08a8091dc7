//! Collection of curve arithmetic errors

use core::fmt;

/// The line whose slope could not be computed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    /// The tangent at a single point, vertical where `y = 0`
    Tangent,
    /// The line through two distinct points, vertical when they share `x`
    Secant,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Tangent => write!(f, "tangent"),
            Line::Secant => write!(f, "secant"),
        }
    }
}

/// Errors raised by curve arithmetic. All of them are precondition
/// violations detected where they occur; none is transient.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The tangent search was anchored left of the curve, at `x < -cuberoot(7)`
    #[error("x = {x} must not be less than -cuberoot(7)")]
    Domain {
        /// x-coordinate of the anchor point
        x: f64,
    },
    /// The line through the points is vertical so its slope is undefined
    #[error("the {0} line is vertical and has no slope")]
    UndefinedSlope(Line),
    /// The tangent search failed to find a tangent point through the anchor
    #[error("no tangent point found for an anchor at x = {x} after {iterations} iterations")]
    NonConvergence {
        /// x-coordinate of the anchor point
        x: f64,
        /// iterations spent before giving up
        iterations: usize,
    },
    /// `x^3 + 7` has no square root in the coordinate representation
    #[error("x^3 + 7 has no square root at x = {x}")]
    NoSquareRoot {
        /// the offending x-coordinate, formatted
        x: String,
    },
    /// A coordinate still depends on a free variable where a number is needed
    #[error("coordinate {0} is not a number")]
    NotNumeric(String),
    /// The zeroth multiple was requested, but the identity is not modelled
    #[error("the zeroth multiple of a point is not represented")]
    ZeroMultiple,
}

/// Result alias for curve arithmetic
pub type Result<T> = core::result::Result<T, Error>;
