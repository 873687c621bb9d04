// src/model/product.rs

use crate::error::PricingError;
use crate::simulation::config::LAST_HOUR;
use crate::strategy::traits::ElasticityPolicy;

/// The perishable item being priced through one simulated day.
///
/// `current_price` and `current_age` are advanced by the simulator on each
/// trading hour; everything else stays fixed for the run.
#[derive(Debug)]
pub struct Product {
    pub name: String,
    /// Hour (0-23) with the most sales. For bimodal curves, the first peak.
    pub peak_hour: u32,
    pub base_price: f64,
    /// Maximum age of the product, in hours.
    pub shelf_life: u32,
    /// Hours elapsed since the product was stocked.
    pub current_age: u32,
    pub current_price: f64,

    // Demand sensitivity model; excluded from the data fields above because it
    // is behaviour, not state.
    elasticity_policy: Box<dyn ElasticityPolicy>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        peak_hour: u32,
        base_price: f64,
        shelf_life: u32,
        elasticity_policy: Box<dyn ElasticityPolicy>,
    ) -> Result<Self, PricingError> {
        if peak_hour > LAST_HOUR {
            return Err(PricingError::configuration(format!(
                "peak hour must be within 0-{LAST_HOUR}, got {peak_hour}"
            )));
        }
        if !base_price.is_finite() || base_price <= 0.0 {
            return Err(PricingError::configuration(format!(
                "base price must be positive, got {base_price}"
            )));
        }
        if shelf_life == 0 {
            return Err(PricingError::configuration("shelf life must be at least one hour"));
        }

        Ok(Self {
            name: name.into(),
            peak_hour,
            base_price,
            shelf_life,
            current_age: 0,
            current_price: base_price,
            elasticity_policy,
        })
    }

    /// Starts the run with a product that has already aged `hours`.
    pub fn with_age(mut self, hours: u32) -> Self {
        self.current_age = hours;
        self
    }

    /// Starts the run at a price other than the base price.
    pub fn with_current_price(mut self, price: f64) -> Result<Self, PricingError> {
        if !price.is_finite() || price < 0.0 {
            return Err(PricingError::configuration(format!(
                "current price must be non-negative, got {price}"
            )));
        }
        self.current_price = price;
        Ok(self)
    }

    /// Asks the bound elasticity policy for the current coefficient.
    pub fn compute_elasticity(&mut self) -> Result<f64, PricingError> {
        let elasticity = self.elasticity_policy.elasticity();
        if !elasticity.is_finite() || elasticity <= 0.0 {
            return Err(PricingError::policy(
                "elasticity",
                format!("expected a positive finite coefficient, got {elasticity}"),
            ));
        }
        Ok(elasticity)
    }
}
