// src/model/timeline.rs

use crate::error::PricingError;
use crate::io::demand::HourlyDemand;
use crate::simulation::config::LAST_HOUR;
use serde::Serialize;
use std::collections::BTreeMap;

/// One hour of the trading day.
///
/// Cumulative columns are running sums through `hour`, computed at full
/// precision and then truncated toward zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRecord {
    pub hour: u32,
    pub forecast_demand: f64,
    /// Value joined from the actual-demand table. Reported only.
    pub observed_demand: f64,
    /// Demand captured if the price never moved.
    pub counterfactual_demand: f64,
    pub cum_forecast: i64,
    pub cum_counterfactual_demand: i64,
    /// Baseline price (always the base price).
    pub price: f64,
    /// Price actually charged.
    pub new_price: f64,
    pub actual_demand: f64,
    pub cum_actual_demand: i64,
    /// `cum_actual_demand - cum_forecast`.
    pub delta: i64,
    pub price_adjusted: bool,
}

/// The per-hour state table shared by every simulation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandTimeline {
    records: Vec<HourRecord>,
}

impl DemandTimeline {
    /// Left-joins `actual` onto `forecast` by hour and seeds every derived
    /// column. Both tables must carry the same hours, starting at 0 with no
    /// gaps.
    pub fn build(
        forecast: &[HourlyDemand],
        actual: &[HourlyDemand],
        base_price: f64,
        capture_rate: f64,
    ) -> Result<Self, PricingError> {
        validate_hours("forecast", forecast)?;
        validate_demand("forecast", forecast)?;
        validate_demand("actual", actual)?;

        let mut observed = BTreeMap::new();
        for row in actual {
            if observed.insert(row.hour, row.demand).is_some() {
                return Err(PricingError::alignment(format!(
                    "actual demand has duplicate hour {}",
                    row.hour
                )));
            }
        }
        if observed.len() != forecast.len() {
            return Err(PricingError::alignment(format!(
                "forecast has {} hours but actual demand has {}",
                forecast.len(),
                observed.len()
            )));
        }

        let mut records = Vec::with_capacity(forecast.len());
        let mut cum_forecast = 0.0;
        let mut cum_counterfactual = 0.0;
        for row in forecast {
            let observed_demand = *observed.get(&row.hour).ok_or_else(|| {
                PricingError::alignment(format!("no actual demand for hour {}", row.hour))
            })?;
            let counterfactual_demand = capture_rate * row.demand;
            cum_forecast += row.demand;
            cum_counterfactual += counterfactual_demand;

            records.push(HourRecord {
                hour: row.hour,
                forecast_demand: row.demand,
                observed_demand,
                counterfactual_demand,
                cum_forecast: truncate(cum_forecast),
                cum_counterfactual_demand: truncate(cum_counterfactual),
                price: base_price,
                new_price: base_price,
                actual_demand: counterfactual_demand,
                cum_actual_demand: 0,
                delta: 0,
                price_adjusted: false,
            });
        }

        let mut timeline = Self { records };
        timeline.refresh_cumulative();
        Ok(timeline)
    }

    /// Recomputes `cum_actual_demand` and `delta` for every hour from the
    /// per-hour `actual_demand` column.
    pub fn refresh_cumulative(&mut self) {
        let mut running = 0.0;
        for record in &mut self.records {
            running += record.actual_demand;
            record.cum_actual_demand = truncate(running);
            record.delta = record.cum_actual_demand - record.cum_forecast;
        }
    }

    /// Records a repricing decision for `hour`.
    pub fn apply_markdown(
        &mut self,
        hour: u32,
        price: f64,
        demand: f64,
    ) -> Result<(), PricingError> {
        let record = self.record_mut(hour)?;
        record.new_price = price;
        record.actual_demand = demand;
        record.price_adjusted = true;
        Ok(())
    }

    pub fn record(&self, hour: u32) -> Result<&HourRecord, PricingError> {
        self.records
            .get(hour as usize)
            .ok_or_else(|| PricingError::alignment(format!("timeline has no row for hour {hour}")))
    }

    fn record_mut(&mut self, hour: u32) -> Result<&mut HourRecord, PricingError> {
        self.records
            .get_mut(hour as usize)
            .ok_or_else(|| PricingError::alignment(format!("timeline has no row for hour {hour}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &HourRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Last hour covered by the table.
    pub fn last_hour(&self) -> Option<u32> {
        self.records.last().map(|record| record.hour)
    }
}

// Cumulative demand is counted in whole units, dropping the fraction.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn validate_hours(table: &str, rows: &[HourlyDemand]) -> Result<(), PricingError> {
    if rows.is_empty() {
        return Err(PricingError::alignment(format!("{table} table is empty")));
    }
    if rows.len() > (LAST_HOUR + 1) as usize {
        return Err(PricingError::alignment(format!(
            "{table} table has {} rows; a day has at most {}",
            rows.len(),
            LAST_HOUR + 1
        )));
    }
    for (index, row) in rows.iter().enumerate() {
        if row.hour as usize != index {
            return Err(PricingError::alignment(format!(
                "{table} row {index} has hour {}; hours must run 0, 1, 2, ... without gaps",
                row.hour
            )));
        }
    }
    Ok(())
}

fn validate_demand(table: &str, rows: &[HourlyDemand]) -> Result<(), PricingError> {
    match rows
        .iter()
        .find(|row| !row.demand.is_finite() || row.demand < 0.0)
    {
        Some(row) => Err(PricingError::invalid_input(format!(
            "{table} demand at hour {} must be a non-negative number, got {}",
            row.hour, row.demand
        ))),
        None => Ok(()),
    }
}
