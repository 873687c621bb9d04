// src/simulation/config.rs

use crate::error::PricingError;
use serde::{Deserialize, Serialize};

pub const LAST_HOUR: u32 = 23;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Markdowns never go below `base_price * price_cap_low`.
    pub price_cap_low: f64,
    /// Prices never go above `base_price * price_cap_high`.
    pub price_cap_high: f64,
    pub opening_hour: u32,
    pub closing_hour: u32,
    /// Hold prices until the product's peak hour has passed.
    pub start_at_peak_hour: bool,
    /// Minimum |cumulative actual - cumulative forecast| before any repricing.
    pub min_delta_diff: f64,
    /// Actual/forecast ratio below which the decay exponent is amplified. 1 is off.
    pub delta_adjustment_factor: f64,
    /// Elapsed shelf-life fraction above which the decay exponent is amplified. 1 is off.
    pub shelf_adjustment_factor: f64,
    /// Share of the forecast captured when the price never moves.
    pub counterfactual_capture_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            price_cap_low: 0.5,
            price_cap_high: 1.5,
            opening_hour: 0,
            closing_hour: LAST_HOUR,
            start_at_peak_hour: true,
            min_delta_diff: 0.0,
            delta_adjustment_factor: 0.8,
            shelf_adjustment_factor: 0.8,
            counterfactual_capture_rate: 0.8,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.closing_hour > LAST_HOUR {
            return Err(PricingError::configuration(format!(
                "closing hour must be within 0-{LAST_HOUR}, got {}",
                self.closing_hour
            )));
        }
        if self.closing_hour < self.opening_hour {
            return Err(PricingError::configuration(format!(
                "closing hour {} is before opening hour {}",
                self.closing_hour, self.opening_hour
            )));
        }
        positive("price_cap_low", self.price_cap_low)?;
        positive("price_cap_high", self.price_cap_high)?;
        if self.price_cap_low > self.price_cap_high {
            return Err(PricingError::configuration(format!(
                "price_cap_low {} exceeds price_cap_high {}",
                self.price_cap_low, self.price_cap_high
            )));
        }
        if !self.min_delta_diff.is_finite() || self.min_delta_diff < 0.0 {
            return Err(PricingError::configuration(format!(
                "min_delta_diff must be non-negative, got {}",
                self.min_delta_diff
            )));
        }
        positive("delta_adjustment_factor", self.delta_adjustment_factor)?;
        positive("shelf_adjustment_factor", self.shelf_adjustment_factor)?;
        positive("counterfactual_capture_rate", self.counterfactual_capture_rate)?;
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::configuration(format!(
            "{field} must be a positive finite number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.closing_hour, 23);
        assert!(config.start_at_peak_hour);
        assert_eq!(config.counterfactual_capture_rate, 0.8);
    }

    #[test]
    fn rejects_inverted_hours() {
        let config = SimulationConfig {
            opening_hour: 10,
            closing_hour: 9,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PricingError::Configuration { .. })
        ));

        let config = SimulationConfig {
            closing_hour: 24,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_caps_and_factors() {
        let inverted = SimulationConfig {
            price_cap_low: 2.0,
            price_cap_high: 1.0,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let zero_shelf = SimulationConfig {
            shelf_adjustment_factor: 0.0,
            ..Default::default()
        };
        assert!(zero_shelf.validate().is_err());

        let negative_delta = SimulationConfig {
            min_delta_diff: -1.0,
            ..Default::default()
        };
        assert!(negative_delta.validate().is_err());
    }
}
