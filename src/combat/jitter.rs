//! Source of the outcome perturbation

use rand::Rng;

/// Supplies the random shift added to a strength ratio
pub trait RandomSource {
    /// A value in `[-spread, spread]`
    fn perturbation(&mut self, spread: f64) -> f64;
}

impl<R: Rng> RandomSource for R {
    fn perturbation(&mut self, spread: f64) -> f64 {
        if spread <= 0.0 {
            return 0.0;
        }
        self.gen_range(-spread..=spread)
    }
}

/// Always returns the same shift, clamped to the spread
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedJitter(pub f64);

impl RandomSource for FixedJitter {
    fn perturbation(&mut self, spread: f64) -> f64 {
        let spread = spread.max(0.0);
        self.0.clamp(-spread, spread)
    }
}
