// src/simulation/engine.rs

use crate::error::PricingError;
use crate::io::demand::HourlyDemand;
use crate::model::product::Product;
use crate::model::timeline::DemandTimeline;
use crate::simulation::config::SimulationConfig;
use crate::simulation::metrics::{SimulationMetrics, SimulationOutcome};
use crate::strategy::traits::DecayPolicy;
use tracing::{debug, info, trace};

/// Drives one product through one trading day, hour by hour.
///
/// Each open hour the simulator compares cumulative demand with the
/// cumulative forecast. When demand runs behind, it marks the price down
/// along `base * (1 - hour / shelf_life) ^ decay`, re-estimates demand with a
/// constant-elasticity curve and takes the sold units out of inventory.
pub struct PricingSimulator {
    config: SimulationConfig,

    // The item being priced; its price and age move with the clock.
    product: Product,
    decay_policy: Box<dyn DecayPolicy>,

    timeline: DemandTimeline,
    inventory: f64,
    current_hour: u32,
}

impl PricingSimulator {
    /// Joins the forecast and actual tables into a fresh timeline.
    ///
    /// # Arguments
    /// * `product` - The product being priced. Its forecast is `forecast`.
    /// * `forecast` - Hourly forecast demand, hours 0..n ascending.
    /// * `actual` - Hourly actual demand with exactly the same hours.
    /// * `decay_policy` - Source of the markdown exponent.
    /// * `inventory` - Units on hand when the day starts.
    /// * `config` - Caps, trading hours and decay adjustments.
    pub fn new(
        product: Product,
        forecast: &[HourlyDemand],
        actual: &[HourlyDemand],
        decay_policy: Box<dyn DecayPolicy>,
        inventory: f64,
        config: SimulationConfig,
    ) -> Result<Self, PricingError> {
        config.validate()?;
        if !inventory.is_finite() || inventory < 0.0 {
            return Err(PricingError::invalid_input(format!(
                "starting inventory must be non-negative, got {inventory}"
            )));
        }

        let timeline = DemandTimeline::build(
            forecast,
            actual,
            product.base_price,
            config.counterfactual_capture_rate,
        )?;
        match timeline.last_hour() {
            Some(last) if last >= config.closing_hour => {}
            last => {
                return Err(PricingError::alignment(format!(
                    "demand tables end at hour {last:?} but the store closes at hour {}",
                    config.closing_hour
                )))
            }
        }

        Ok(Self {
            config,
            product,
            decay_policy,
            timeline,
            inventory,
            current_hour: 0,
        })
    }

    /// Steps through every hour up to and including the closing hour.
    pub fn run(&mut self) -> Result<(), PricingError> {
        while self.current_hour <= self.config.closing_hour {
            self.step()?;
        }

        let metrics = SimulationMetrics::from_timeline(&self.timeline, self.config.closing_hour)?;
        info!(
            product = %self.product.name,
            inventory = self.inventory,
            waste = metrics.waste,
            waste_counterfactual = metrics.waste_counterfactual,
            revenue = metrics.revenue,
            revenue_counterfactual = metrics.revenue_counterfactual,
            "simulation complete"
        );
        Ok(())
    }

    fn step(&mut self) -> Result<(), PricingError> {
        let hour = self.current_hour;

        let holding = self.is_holding(hour);
        if holding {
            trace!(hour, "holding price");
        } else {
            self.reprice(hour)?;
        }

        // Resync every hour, whichever branch ran.
        self.timeline.refresh_cumulative();

        self.current_hour += 1;
        // Held hours only move the clock; the product ages on trading hours.
        if !holding {
            self.product.current_age += 1;
        }
        Ok(())
    }

    /// Closed, or still waiting for the peak hour to pass.
    fn is_holding(&self, hour: u32) -> bool {
        hour < self.config.opening_hour
            || (self.config.start_at_peak_hour && hour <= self.product.peak_hour)
    }

    fn reprice(&mut self, hour: u32) -> Result<(), PricingError> {
        let record = self.timeline.record(hour)?;
        let delta = record.delta;

        if (delta as f64).abs() < self.config.min_delta_diff {
            return Ok(());
        }
        // Running ahead of forecast never raises the price.
        if delta >= 0 {
            return Ok(());
        }

        let base_price = record.price;
        let counterfactual_demand = record.counterfactual_demand;
        let cum_actual = record.cum_actual_demand;
        let cum_forecast = record.cum_forecast;

        let decay = self.draw_decay(hour, cum_actual, cum_forecast)?;

        let elapsed = hour as f64 / self.product.shelf_life as f64;
        let candidate = base_price * (1.0 - elapsed).powf(decay);
        if !candidate.is_finite() {
            return Err(PricingError::configuration(format!(
                "markdown undefined at hour {hour}: shelf life is {} hours (decay {decay})",
                self.product.shelf_life
            )));
        }
        let price = candidate.clamp(
            base_price * self.config.price_cap_low,
            base_price * self.config.price_cap_high,
        );
        self.product.current_price = price;

        let elasticity = self.product.compute_elasticity()?;
        let mut demand =
            counterfactual_demand * (price / self.product.base_price).powf(-elasticity);

        // Demand can never exceed what is left on the shelf.
        if self.inventory - demand < 0.0 {
            demand = self.inventory;
            self.inventory = 0.0;
        } else {
            self.inventory -= demand;
        }

        self.timeline.apply_markdown(hour, price, demand)?;
        debug!(
            hour,
            delta,
            decay,
            price,
            elasticity,
            demand,
            inventory = self.inventory,
            "marked down"
        );
        Ok(())
    }

    /// Draws a decay exponent and applies the demand-shortfall and
    /// shelf-life accelerations.
    fn draw_decay(
        &mut self,
        hour: u32,
        cum_actual: i64,
        cum_forecast: i64,
    ) -> Result<f64, PricingError> {
        let mut decay = self.decay_policy.draw();
        if !decay.is_finite() || decay <= 0.0 {
            return Err(PricingError::policy(
                "decay",
                format!("expected a positive finite exponent, got {decay}"),
            ));
        }

        if self.config.delta_adjustment_factor != 1.0 {
            let ratio = cum_actual as f64 / cum_forecast as f64;
            if ratio < self.config.delta_adjustment_factor {
                decay /= ratio;
            }
        }

        if self.config.shelf_adjustment_factor != 1.0 {
            let elapsed = hour as f64 / self.product.shelf_life as f64;
            if elapsed > self.config.shelf_adjustment_factor {
                decay /= self.config.shelf_adjustment_factor;
            }
        }

        Ok(decay)
    }

    /// Snapshot of the timeline plus the end-of-day metrics.
    pub fn results(&self) -> Result<SimulationOutcome, PricingError> {
        let metrics = SimulationMetrics::from_timeline(&self.timeline, self.config.closing_hour)?;
        Ok(SimulationOutcome {
            timeline: self.timeline.clone(),
            metrics,
        })
    }

    pub fn timeline(&self) -> &DemandTimeline {
        &self.timeline
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Units still on hand.
    pub fn inventory(&self) -> f64 {
        self.inventory
    }

    /// Next hour to be simulated; past the closing hour once the run is over.
    pub fn current_hour(&self) -> u32 {
        self.current_hour
    }

    pub fn is_finished(&self) -> bool {
        self.current_hour > self.config.closing_hour
    }
}
