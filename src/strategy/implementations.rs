// src/strategy/implementations.rs

use crate::error::PricingError;
use crate::strategy::traits::{DecayPolicy, ElasticityPolicy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp1};

// =========================================================================
// 1. Fixed Decay
// =========================================================================

/// Returns the same decay exponent every hour.
#[derive(Debug, Clone)]
pub struct FixedDecay {
    value: f64,
}

impl FixedDecay {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Default for FixedDecay {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DecayPolicy for FixedDecay {
    fn draw(&mut self) -> f64 {
        self.value
    }
}

// =========================================================================
// 2. Truncated Exponential Decay
// =========================================================================

/// Draws the decay exponent from a unit exponential distribution, redrawing
/// until the sample is at or below `threshold`.
///
/// With `reseed_each_draw` set (the default) the generator is reset to `seed`
/// before every draw, so every hour receives the same exponent. Turn it off to
/// let successive hours walk one seeded stream instead.
#[derive(Debug, Clone)]
pub struct TruncatedExponentialDecay {
    threshold: f64,
    seed: u64,
    reseed_each_draw: bool,
    rng: StdRng,
}

impl TruncatedExponentialDecay {
    pub fn new(threshold: f64, seed: u64) -> Result<Self, PricingError> {
        // A non-positive threshold would reject every sample forever.
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(PricingError::configuration(format!(
                "truncation threshold must be a positive finite number, got {threshold}"
            )));
        }
        Ok(Self {
            threshold,
            seed,
            reseed_each_draw: true,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn with_reseed_each_draw(mut self, reseed: bool) -> Self {
        self.reseed_each_draw = reseed;
        self
    }
}

impl DecayPolicy for TruncatedExponentialDecay {
    fn draw(&mut self) -> f64 {
        if self.reseed_each_draw {
            self.rng = StdRng::seed_from_u64(self.seed);
        }
        loop {
            let sample: f64 = Exp1.sample(&mut self.rng);
            if sample <= self.threshold {
                return sample;
            }
        }
    }
}

// =========================================================================
// 3. Fixed Elasticity
// =========================================================================

/// Constant elasticity regardless of price.
#[derive(Debug, Clone)]
pub struct FixedElasticity {
    value: f64,
}

impl FixedElasticity {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Default for FixedElasticity {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl ElasticityPolicy for FixedElasticity {
    fn elasticity(&mut self) -> f64 {
        self.value
    }
}

// =========================================================================
// 4. Discount Band Elasticity
// =========================================================================

/// Piecewise elasticity over discount "zones".
///
/// The discount range [0, 1] is split into `bands` equal zones. The zone that
/// `discount` falls into selects an elasticity linearly interpolated between
/// `low` (no discount) and `high` (deepest zone).
#[derive(Debug, Clone)]
pub struct DiscountBandElasticity {
    discount: f64,
    bands: usize,
    low: f64,
    high: f64,
}

impl DiscountBandElasticity {
    pub fn new(discount: f64, bands: usize, low: f64, high: f64) -> Result<Self, PricingError> {
        if !(0.0..=1.0).contains(&discount) {
            return Err(PricingError::configuration(format!(
                "discount must be within [0, 1], got {discount}"
            )));
        }
        if bands == 0 {
            return Err(PricingError::configuration(
                "discount band elasticity needs at least one band",
            ));
        }
        if !(low.is_finite() && high.is_finite()) || low <= 0.0 || high <= 0.0 {
            return Err(PricingError::configuration(format!(
                "band elasticities must be positive, got low={low} high={high}"
            )));
        }
        Ok(Self {
            discount,
            bands,
            low,
            high,
        })
    }

    /// Index of the zone the bound discount falls into.
    pub fn band(&self) -> usize {
        let zone = (self.discount * self.bands as f64).floor() as usize;
        zone.min(self.bands - 1)
    }
}

impl ElasticityPolicy for DiscountBandElasticity {
    fn elasticity(&mut self) -> f64 {
        if self.bands == 1 {
            return self.low;
        }
        let step = self.band() as f64 / (self.bands - 1) as f64;
        self.low + (self.high - self.low) * step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_policies_return_bound_values() {
        assert_eq!(FixedDecay::default().draw(), 1.0);
        assert_eq!(FixedDecay::new(0.3).draw(), 0.3);
        assert_eq!(FixedElasticity::default().elasticity(), 4.0);
        assert_eq!(FixedElasticity::new(1.5).elasticity(), 1.5);
    }

    #[test]
    fn truncated_exponential_respects_threshold() {
        let mut policy = TruncatedExponentialDecay::new(0.5, 7)
            .unwrap()
            .with_reseed_each_draw(false);
        for _ in 0..200 {
            let value = policy.draw();
            assert!((0.0..=0.5).contains(&value), "draw {value} out of range");
        }
    }

    #[test]
    fn reseeding_repeats_the_same_draw() {
        let mut policy = TruncatedExponentialDecay::new(1.0, 0).unwrap();
        let first = policy.draw();
        assert_eq!(policy.draw(), first);
        assert_eq!(policy.draw(), first);
    }

    #[test]
    fn seeded_streams_are_reproducible() {
        let mut a = TruncatedExponentialDecay::new(1.0, 42)
            .unwrap()
            .with_reseed_each_draw(false);
        let mut b = TruncatedExponentialDecay::new(1.0, 42)
            .unwrap()
            .with_reseed_each_draw(false);
        let xs: Vec<f64> = (0..10).map(|_| a.draw()).collect();
        let ys: Vec<f64> = (0..10).map(|_| b.draw()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn rejects_non_positive_threshold() {
        assert!(TruncatedExponentialDecay::new(0.0, 1).is_err());
        assert!(TruncatedExponentialDecay::new(f64::NAN, 1).is_err());
    }

    #[test]
    fn discount_bands_interpolate_between_bounds() {
        let mut none = DiscountBandElasticity::new(0.0, 3, 2.0, 6.0).unwrap();
        let mut mid = DiscountBandElasticity::new(0.5, 3, 2.0, 6.0).unwrap();
        let mut deep = DiscountBandElasticity::new(1.0, 3, 2.0, 6.0).unwrap();
        assert_eq!(none.elasticity(), 2.0);
        assert_eq!(mid.elasticity(), 4.0);
        assert_eq!(deep.elasticity(), 6.0);

        let mut single = DiscountBandElasticity::new(0.9, 1, 2.5, 6.0).unwrap();
        assert_eq!(single.elasticity(), 2.5);
    }

    #[test]
    fn discount_bands_validate_arguments() {
        assert!(DiscountBandElasticity::new(1.2, 3, 2.0, 6.0).is_err());
        assert!(DiscountBandElasticity::new(0.2, 0, 2.0, 6.0).is_err());
        assert!(DiscountBandElasticity::new(0.2, 2, -1.0, 6.0).is_err());
    }
}
