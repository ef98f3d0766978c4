//! Fisher's alpha of the log-series species-abundance model.
//!
//! Solves `a * ln(1 + N/a) = S` for `a > 0`. The left side is strictly
//! increasing in `a`, running from 0 to `N`, so a unique root exists
//! whenever `N > S`. Newton steps start from `a = 1` and fall back to
//! bisection whenever they leave the current bracket.

use crate::data::NaReason;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
/// Default relative tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

const INITIAL_GUESS: f64 = 1.0;

/// Converged Fisher's alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FisherAlpha {
    /// The diversity parameter alpha.
    pub alpha: f64,
    /// Log-series `x = N / (N + alpha)`; just below 1 for large `N/S`.
    pub x: f64,
    /// Iterations used.
    pub iterations: usize,
}

/// Root finder settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FisherSolver {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for FisherSolver {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl FisherSolver {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Solve for alpha given `n` individuals and `s` categories.
    ///
    /// Requires `s > 1` and `n > s`; otherwise returns
    /// [`NaReason::InsufficientData`] without iterating.
    pub fn solve(&self, n: f64, s: f64) -> Result<FisherAlpha, NaReason> {
        if !(n.is_finite() && s.is_finite()) || s <= 1.0 || n <= s {
            return Err(NaReason::InsufficientData);
        }

        let f = |a: f64| a * (n / a).ln_1p() - s;
        let df = |a: f64| (n / a).ln_1p() - n / (a + n);

        let mut lo = 0.0_f64;
        let mut hi = f64::INFINITY;
        let mut a = INITIAL_GUESS;

        for iter in 1..=self.max_iterations {
            let fa = f(a);
            if fa.abs() <= self.tolerance * s {
                return Ok(self.converged(n, a, iter));
            }
            if fa < 0.0 {
                lo = a;
            } else {
                hi = a;
            }

            let newton = a - fa / df(a);
            let next = if newton.is_finite() && newton > lo && newton < hi {
                newton
            } else if hi.is_finite() {
                0.5 * (lo + hi)
            } else {
                // no upper bound yet
                2.0 * a
            };

            if (next - a).abs() <= self.tolerance * a.max(1.0) {
                return Ok(self.converged(n, next, iter));
            }
            debug!(iteration = iter, alpha = next, residual = fa, "fisher step");
            a = next;
        }

        info!(n, s, max_iterations = self.max_iterations, "fisher solver did not converge");
        Err(NaReason::ConvergenceFailure)
    }

    fn converged(&self, n: f64, alpha: f64, iterations: usize) -> FisherAlpha {
        info!(alpha, iterations, "fisher solver converged");
        FisherAlpha {
            alpha,
            x: n / (n + alpha),
            iterations,
        }
    }
}
