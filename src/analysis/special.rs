//! Special-function provider.
//!
//! The tests only need two functions: the complementary error function
//! and the upper regularized incomplete gamma function `Q(a, x)`. They sit
//! behind a trait so an alternative numerical library can be swapped in.

use statrs::function::gamma;

/// Numerical services used to turn test statistics into p-values.
pub trait SpecialFunctions {
    /// Complementary error function, `1 - erf(x)`.
    fn erfc(&self, x: f64) -> f64;

    /// Upper regularized incomplete gamma function `Q(a, x)`.
    ///
    /// Callers pass `a > 0`. Implementations return 1 for `x <= 0`.
    fn gamma_q(&self, a: f64, x: f64) -> f64;
}

/// [`SpecialFunctions`] backed by `statrs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Statrs;

impl SpecialFunctions for Statrs {
    fn erfc(&self, x: f64) -> f64 {
        // erfc(x) = Q(1/2, x^2) for x >= 0; statrs' own erfc is only good to ~1e-11
        if x.is_nan() {
            return x;
        }
        if x < 0.0 {
            return 2.0 - self.gamma_q(0.5, x * x);
        }
        self.gamma_q(0.5, x * x)
    }

    fn gamma_q(&self, a: f64, x: f64) -> f64 {
        // statrs rejects x == 0, where Q is exactly 1
        if x <= 0.0 {
            return 1.0;
        }
        if x.is_infinite() {
            return 0.0;
        }
        gamma::gamma_ur(a, x)
    }
}

/// Clamps a computed probability into `[0, 1]`.
#[inline]
pub(crate) fn p_value(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}
