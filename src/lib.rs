//! Point arithmetic on the real `secp256k1` curve `y^2 = x^3 + 7`.
//!
//! Points can be added, doubled, negated, subtracted and halved following the
//! chord and tangent construction. Coordinates are either floats or exact
//! elements of the function field of the curve, so each result exists both as
//! a number and as a closed form in a free variable `x`.
//!
//! ```
//! use ecc_real::point::{Branch, Point};
//!
//! let p = Point::on_curve(10.0, Branch::Upper).unwrap();
//! let four_p = p.scalar_mul(4).unwrap();
//! assert!(four_p.is_valid());
//! ```
#![deny(unstable_features)]
#![warn(missing_docs, unused_qualifications)]

pub mod point;
pub mod scalar;
