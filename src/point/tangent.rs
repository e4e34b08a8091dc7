//! The tangent module finds, for a fixed anchor point `p`, the point `q` of
//! the curve whose tangent line passes through `p`. Since the tangent at `q`
//! meets the curve again at `-(q + q)`, this is how a point is halved: the
//! halves of `r` are the tangent points through `-r`.
//!
//! There is no closed form, so the search is numeric. It runs a secant
//! iteration on
//!
//! ```text
//! g(xq) = tangent_slope(q) - secant_slope(p, q),  q = (xq, curve_y(xq, branch))
//! ```
//!
//! which vanishes exactly when the tangent at `q` and the line from `q` to `p`
//! coincide.

use super::errors::{Error, Result};
use super::utils::{line_y, secant_slope, tangent_slope};
use super::{Branch, Point, MIN_CURVE_X};
use crate::scalar::CurveScalar;

/// First seed of the secant iteration
pub const TANGENT_SEARCH_SEED: f64 = 0.0;

/// Anchors with `x` above this are attempted, but the search is only known to
/// converge on `(MIN_CURVE_X, RELIABLE_ANCHOR_MAX)`
pub const RELIABLE_ANCHOR_MAX: f64 = -0.5;

/// Parameters of the tangent search
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// first seed
    pub seed: f64,
    /// offset of the second seed from the first
    pub seed_step: f64,
    /// the search stops once a step is smaller than
    /// `tolerance * max(1, |x|)`
    pub tolerance: f64,
    /// iterations before giving up
    pub max_iterations: usize,
    /// the tangent at the result must pass within
    /// `verify_tolerance * max(1, |yp|)` of the anchor
    pub verify_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: TANGENT_SEARCH_SEED,
            seed_step: 0.25,
            tolerance: 1e-12,
            max_iterations: 50,
            verify_tolerance: 1e-6,
        }
    }
}

impl SolverConfig {
    /// Sets the first seed
    pub fn with_seed(mut self, seed: f64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the offset of the second seed
    pub fn with_seed_step(mut self, seed_step: f64) -> Self {
        self.seed_step = seed_step;
        self
    }

    /// Sets the step tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration limit
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the tolerance the final tangent is checked against
    pub fn with_verify_tolerance(mut self, verify_tolerance: f64) -> Self {
        self.verify_tolerance = verify_tolerance;
        self
    }
}

/// Searches for tangent points through a given anchor
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TangentSolver {
    config: SolverConfig,
}

impl TangentSolver {
    /// Creates a solver with the given parameters
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver parameters
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Returns the point `q` on `branch` whose tangent line passes through
    /// `anchor`. The anchor must have numeric coordinates.
    ///
    /// # Errors
    ///
    /// - `Error::NotNumeric` if the anchor depends on a free variable
    /// - `Error::Domain` if the anchor lies left of the curve
    /// - `Error::NonConvergence` if no tangent point is found
    pub fn solve<S: CurveScalar>(&self, anchor: &Point<S>, branch: Branch) -> Result<Point<f64>> {
        let p = anchor.to_numeric()?;
        let xp = p.x;
        if !(xp >= MIN_CURVE_X) {
            return Err(Error::Domain { x: xp });
        }
        if xp > RELIABLE_ANCHOR_MAX {
            log::warn!(
                "anchor x = {} is outside ({}, {}), the tangent search may not converge",
                xp,
                MIN_CURVE_X,
                RELIABLE_ANCHOR_MAX
            );
        }

        let (xq, iterations) = self.search(&p, branch)?;
        let q = Point::on_curve(xq, branch).map_err(|_| self.failed(xp, iterations))?;
        let m = tangent_slope(&q).map_err(|_| self.failed(xp, iterations))?;
        let miss = (line_y(&xp, &q, &m) - p.y).abs();
        if !(miss <= self.config.verify_tolerance * p.y.abs().max(1.0)) {
            log::warn!("tangent at {} misses the anchor {} by {}", q, p, miss);
            return Err(self.failed(xp, iterations));
        }
        log::debug!("tangent at {} passes through {} ({} iterations)", q, p, iterations);
        Ok(q)
    }

    /// Runs the secant iteration, returning the root and the iterations spent
    fn search(&self, p: &Point<f64>, branch: Branch) -> Result<(f64, usize)> {
        let cfg = &self.config;
        let xp = p.x;
        let mut x0 = cfg.seed;
        let mut x1 = cfg.seed + cfg.seed_step;
        let mut f0 = slope_gap(p, x0, branch).ok_or_else(|| self.failed(xp, 0))?;
        let mut f1 = slope_gap(p, x1, branch).ok_or_else(|| self.failed(xp, 0))?;

        let mut iterations = 0;
        loop {
            if f1 == 0.0 {
                return Ok((x1, iterations));
            }
            if iterations >= cfg.max_iterations {
                return Err(self.failed(xp, iterations));
            }
            let df = f1 - f0;
            if df == 0.0 {
                // stalled
                return Err(self.failed(xp, iterations));
            }
            let x2 = x1 - f1 * (x1 - x0) / df;
            iterations += 1;
            if !x2.is_finite() {
                return Err(self.failed(xp, iterations));
            }
            log::trace!("tangent search step {}: x = {}, g = {}", iterations, x2, f1);
            x0 = x1;
            f0 = f1;
            x1 = x2;
            if (x1 - x0).abs() <= cfg.tolerance * x1.abs().max(1.0) {
                return Ok((x1, iterations));
            }
            f1 = slope_gap(p, x1, branch).ok_or_else(|| self.failed(xp, iterations))?;
        }
    }

    fn failed(&self, x: f64, iterations: usize) -> Error {
        log::warn!("tangent search from anchor x = {} failed after {} iterations", x, iterations);
        Error::NonConvergence { x, iterations }
    }
}

/// `g(xq)`, or `None` where `q` leaves the real curve or either slope is
/// undefined
fn slope_gap(p: &Point<f64>, xq: f64, branch: Branch) -> Option<f64> {
    let q = Point::on_curve(xq, branch).ok()?;
    let tangent = tangent_slope(&q).ok()?;
    let secant = secant_slope(p, &q).ok()?;
    let g = tangent - secant;
    if g.is_finite() {
        Some(g)
    } else {
        None
    }
}
