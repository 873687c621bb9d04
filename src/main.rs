use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use markdown_sim::io::demand::{self, HourlyDemand};
use markdown_sim::io::reporting;
use markdown_sim::strategy::implementations::{
    DiscountBandElasticity, FixedDecay, FixedElasticity, TruncatedExponentialDecay,
};
use markdown_sim::{DecayPolicy, ElasticityPolicy, PricingSimulator, Product, SimulationConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "markdown-sim",
    about = "Simulate one day of markdown pricing for a perishable product"
)]
struct Cli {
    /// Forecast CSV with `hour` and `lambda` (or `demand`) columns.
    #[arg(long, requires = "actual")]
    forecast: Option<PathBuf>,

    /// Actual demand CSV with `hour` and `demand` columns.
    #[arg(long, requires = "forecast")]
    actual: Option<PathBuf>,

    /// Seed for the synthetic demand used when no CSVs are given.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    #[arg(long, default_value = "fresh bread")]
    name: String,

    #[arg(long, default_value_t = 4.0)]
    base_price: f64,

    /// Shelf life in hours.
    #[arg(long, default_value_t = 24)]
    shelf_life: u32,

    #[arg(long, default_value_t = 12)]
    peak_hour: u32,

    /// Elasticity, or the no-discount end of the band range with `--elasticity-bands`.
    #[arg(long, default_value_t = 4.0)]
    elasticity: f64,

    /// Split discounts into this many bands with interpolated elasticities.
    #[arg(long)]
    elasticity_bands: Option<usize>,

    /// Elasticity in the deepest discount band.
    #[arg(long, default_value_t = 6.0)]
    max_elasticity: f64,

    /// Discount used to pick the band. Defaults to the deepest allowed markdown.
    #[arg(long, requires = "elasticity_bands")]
    expected_discount: Option<f64>,

    /// Constant decay exponent.
    #[arg(long, default_value_t = 1.0, conflicts_with = "random_decay_threshold")]
    decay: f64,

    /// Draw the decay exponent from a seeded exponential truncated at this value.
    #[arg(long)]
    random_decay_threshold: Option<f64>,

    /// Units on hand at the start of the day.
    #[arg(long, default_value_t = 250.0)]
    inventory: f64,

    #[arg(long)]
    price_cap_low: Option<f64>,

    #[arg(long)]
    price_cap_high: Option<f64>,

    #[arg(long)]
    opening_hour: Option<u32>,

    #[arg(long)]
    closing_hour: Option<u32>,

    /// Reprice from the first open hour instead of waiting for the peak.
    #[arg(long)]
    start_immediately: bool,

    #[arg(long)]
    min_delta_diff: Option<f64>,

    #[arg(long)]
    delta_adjustment_factor: Option<f64>,

    #[arg(long)]
    shelf_adjustment_factor: Option<f64>,

    #[arg(long)]
    counterfactual_capture_rate: Option<f64>,

    /// Where to write the hourly timeline.
    #[arg(long, default_value = "markdown_results.csv")]
    output: PathBuf,
}

impl Cli {
    fn simulation_config(&self) -> SimulationConfig {
        let defaults = SimulationConfig::default();
        SimulationConfig {
            price_cap_low: self.price_cap_low.unwrap_or(defaults.price_cap_low),
            price_cap_high: self.price_cap_high.unwrap_or(defaults.price_cap_high),
            opening_hour: self.opening_hour.unwrap_or(defaults.opening_hour),
            closing_hour: self.closing_hour.unwrap_or(defaults.closing_hour),
            start_at_peak_hour: !self.start_immediately,
            min_delta_diff: self.min_delta_diff.unwrap_or(defaults.min_delta_diff),
            delta_adjustment_factor: self
                .delta_adjustment_factor
                .unwrap_or(defaults.delta_adjustment_factor),
            shelf_adjustment_factor: self
                .shelf_adjustment_factor
                .unwrap_or(defaults.shelf_adjustment_factor),
            counterfactual_capture_rate: self
                .counterfactual_capture_rate
                .unwrap_or(defaults.counterfactual_capture_rate),
        }
    }

    fn demand_tables(&self) -> anyhow::Result<(Vec<HourlyDemand>, Vec<HourlyDemand>)> {
        match (&self.forecast, &self.actual) {
            (Some(forecast), Some(actual)) => {
                let forecast_rows = demand::load_hourly_table(forecast)
                    .with_context(|| format!("reading forecast {}", forecast.display()))?;
                let actual_rows = demand::load_hourly_table(actual)
                    .with_context(|| format!("reading actual demand {}", actual.display()))?;
                Ok((forecast_rows, actual_rows))
            }
            _ => {
                info!(seed = self.seed, "no demand tables given, generating a synthetic day");
                let forecast = demand::generate_peaked_forecast(24, self.peak_hour, 30.0, 3.0);
                let actual = demand::generate_noisy_actuals(&forecast, 4.0, self.seed)?;
                Ok((forecast, actual))
            }
        }
    }

    fn elasticity_policy(
        &self,
        config: &SimulationConfig,
    ) -> anyhow::Result<Box<dyn ElasticityPolicy>> {
        let policy: Box<dyn ElasticityPolicy> = match self.elasticity_bands {
            Some(bands) => {
                let discount = self
                    .expected_discount
                    .unwrap_or((1.0 - config.price_cap_low).max(0.0));
                Box::new(DiscountBandElasticity::new(
                    discount,
                    bands,
                    self.elasticity,
                    self.max_elasticity,
                )?)
            }
            None => Box::new(FixedElasticity::new(self.elasticity)),
        };
        Ok(policy)
    }

    fn decay_policy(&self) -> anyhow::Result<Box<dyn DecayPolicy>> {
        let policy: Box<dyn DecayPolicy> = match self.random_decay_threshold {
            Some(threshold) => Box::new(TruncatedExponentialDecay::new(threshold, self.seed)?),
            None => Box::new(FixedDecay::new(self.decay)),
        };
        Ok(policy)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    println!("=== Markdown Pricing Simulation ===");

    let config = cli.simulation_config();
    let (forecast, actual) = cli.demand_tables()?;
    let product = Product::new(
        cli.name.clone(),
        cli.peak_hour,
        cli.base_price,
        cli.shelf_life,
        cli.elasticity_policy(&config)?,
    )?;

    let mut sim = PricingSimulator::new(
        product,
        &forecast,
        &actual,
        cli.decay_policy()?,
        cli.inventory,
        config,
    )?;
    sim.run()?;
    let outcome = sim.results()?;

    reporting::write_timeline_to_path(&cli.output, &outcome.timeline)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    println!("Timeline written to ./{}", cli.output.display());

    let metrics = outcome.metrics;
    println!("\n=== Results: {} ===", sim.product().name);
    println!(
        "Waste:   {} units (no markdown: {}, avoided: {})",
        metrics.waste,
        metrics.waste_counterfactual,
        metrics.waste_reduction()
    );
    println!(
        "Revenue: ${:.2} (no markdown: ${:.2}, uplift: ${:.2})",
        metrics.revenue,
        metrics.revenue_counterfactual,
        metrics.revenue_uplift()
    );
    println!("Inventory left: {:.1} units", sim.inventory());

    Ok(())
}
