// src/io/demand.rs

use crate::error::PricingError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One row of an hourly demand table (forecast or actual).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyDemand {
    pub hour: u32,
    /// Forecast tables traditionally call this column `lambda`.
    #[serde(alias = "lambda")]
    pub demand: f64,
}

/// Reads an hourly demand table with `hour` and `demand` (or `lambda`) columns.
pub fn read_hourly_table<R: Read>(reader: R) -> Result<Vec<HourlyDemand>, PricingError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        let row: HourlyDemand = record?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn load_hourly_table(path: impl AsRef<Path>) -> Result<Vec<HourlyDemand>, PricingError> {
    let file = std::fs::File::open(path)?;
    read_hourly_table(file)
}

/// Flat forecast: every hour expects the same demand.
pub fn generate_constant_forecast(hours: u32, value: f64) -> Vec<HourlyDemand> {
    (0..hours)
        .map(|hour| HourlyDemand { hour, demand: value })
        .collect()
}

/// Bell-shaped forecast centred on `peak_hour`.
///
/// # Arguments
/// * `hours` - Number of hourly rows, starting at hour 0.
/// * `peak_hour` - Hour with the highest expected demand.
/// * `peak_demand` - Demand expected at the peak.
/// * `spread` - Standard deviation of the bump, in hours.
pub fn generate_peaked_forecast(
    hours: u32,
    peak_hour: u32,
    peak_demand: f64,
    spread: f64,
) -> Vec<HourlyDemand> {
    let spread = spread.max(f64::EPSILON);
    (0..hours)
        .map(|hour| {
            let distance = hour as f64 - peak_hour as f64;
            let demand = peak_demand * (-0.5 * (distance / spread).powi(2)).exp();
            HourlyDemand { hour, demand }
        })
        .collect()
}

/// Perturbs a forecast with seeded Normal noise to stand in for observed demand.
/// Negative samples are clamped to zero (demand cannot be negative).
pub fn generate_noisy_actuals(
    forecast: &[HourlyDemand],
    std_dev: f64,
    seed: u64,
) -> Result<Vec<HourlyDemand>, PricingError> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(PricingError::invalid_input(format!(
            "noise standard deviation must be non-negative, got {std_dev}"
        )));
    }
    let noise = Normal::new(0.0, std_dev).map_err(|e| {
        PricingError::invalid_input(format!("invalid noise standard deviation {std_dev}: {e}"))
    })?;
    let mut rng = StdRng::seed_from_u64(seed);

    Ok(forecast
        .iter()
        .map(|row| HourlyDemand {
            hour: row.hour,
            demand: (row.demand + noise.sample(&mut rng)).max(0.0),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lambda_and_demand_columns() {
        let forecast = "hour,lambda\n0,4.5\n1,6\n";
        let rows = read_hourly_table(forecast.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                HourlyDemand { hour: 0, demand: 4.5 },
                HourlyDemand { hour: 1, demand: 6.0 },
            ]
        );

        let actual = "hour, demand\n0, 3\n";
        let rows = read_hourly_table(actual.as_bytes()).unwrap();
        assert_eq!(rows, vec![HourlyDemand { hour: 0, demand: 3.0 }]);
    }

    #[test]
    fn malformed_rows_surface_as_csv_errors() {
        let broken = "hour,demand\nnoon,3\n";
        assert!(matches!(
            read_hourly_table(broken.as_bytes()),
            Err(PricingError::Csv(_))
        ));
    }

    #[test]
    fn peaked_forecast_tops_out_at_peak_hour() {
        let forecast = generate_peaked_forecast(24, 12, 30.0, 3.0);
        assert_eq!(forecast.len(), 24);
        assert_eq!(forecast[12].demand, 30.0);
        assert!(forecast[11].demand < 30.0);
        assert!((forecast[11].demand - forecast[13].demand).abs() < 1e-12);
    }

    #[test]
    fn noisy_actuals_are_seeded_and_non_negative() {
        let forecast = generate_constant_forecast(24, 1.0);
        let a = generate_noisy_actuals(&forecast, 5.0, 3).unwrap();
        let b = generate_noisy_actuals(&forecast, 5.0, 3).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|row| row.demand >= 0.0));
        assert!(generate_noisy_actuals(&forecast, -1.0, 3).is_err());
    }

    #[test]
    fn noise_spread_must_be_non_negative() {
        let forecast = generate_constant_forecast(3, 2.0);
        assert!(matches!(
            generate_noisy_actuals(&forecast, -0.5, 1),
            Err(PricingError::InvalidInput { .. })
        ));
        assert!(generate_noisy_actuals(&forecast, f64::INFINITY, 1).is_err());

        // Zero spread reproduces the forecast exactly.
        assert_eq!(generate_noisy_actuals(&forecast, 0.0, 1).unwrap(), forecast);
    }
}
