// src/simulation/metrics.rs

use crate::error::PricingError;
use crate::model::timeline::DemandTimeline;
use serde::Serialize;

/// End-of-day waste and revenue, with and without repricing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationMetrics {
    /// Forecast units left unsold had the price never moved.
    pub waste_counterfactual: i64,
    /// Forecast units left unsold under the simulated prices.
    pub waste: i64,
    pub revenue_counterfactual: f64,
    pub revenue: f64,
}

impl SimulationMetrics {
    pub fn from_timeline(
        timeline: &DemandTimeline,
        closing_hour: u32,
    ) -> Result<Self, PricingError> {
        let close = timeline.record(closing_hour)?;

        let revenue_counterfactual = timeline
            .iter()
            .map(|record| record.counterfactual_demand * record.price)
            .sum();
        let revenue = timeline
            .iter()
            .map(|record| record.actual_demand * record.new_price)
            .sum();

        Ok(Self {
            waste_counterfactual: close.cum_forecast - close.cum_counterfactual_demand,
            waste: close.cum_forecast - close.cum_actual_demand,
            revenue_counterfactual,
            revenue,
        })
    }

    /// Revenue gained (or lost) by repricing relative to the baseline.
    pub fn revenue_uplift(&self) -> f64 {
        self.revenue - self.revenue_counterfactual
    }

    /// Units of waste avoided by repricing relative to the baseline.
    pub fn waste_reduction(&self) -> i64 {
        self.waste_counterfactual - self.waste
    }
}

/// Everything a finished run hands back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub timeline: DemandTimeline,
    pub metrics: SimulationMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::demand::generate_constant_forecast;

    #[test]
    fn untouched_timeline_matches_its_baseline() {
        let forecast = generate_constant_forecast(2, 10.0);
        let timeline = DemandTimeline::build(&forecast, &forecast, 3.0, 0.8).unwrap();
        let metrics = SimulationMetrics::from_timeline(&timeline, 1).unwrap();

        assert_eq!(metrics.waste_counterfactual, 4);
        assert_eq!(metrics.waste, 4);
        assert!((metrics.revenue_counterfactual - 48.0).abs() < 1e-9);
        assert_eq!(metrics.revenue, metrics.revenue_counterfactual);
        assert_eq!(metrics.waste_reduction(), 0);
        assert_eq!(metrics.revenue_uplift(), 0.0);
    }

    #[test]
    fn closing_hour_must_exist() {
        let forecast = generate_constant_forecast(2, 10.0);
        let timeline = DemandTimeline::build(&forecast, &forecast, 3.0, 0.8).unwrap();
        assert!(matches!(
            SimulationMetrics::from_timeline(&timeline, 5),
            Err(PricingError::InputAlignment { .. })
        ));
    }
}
