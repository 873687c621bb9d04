//! Intra-day markdown pricing simulation for a perishable product.
//!
//! A [`PricingSimulator`] walks the hours of one trading day, marks the price
//! down whenever cumulative demand runs behind the forecast, re-estimates
//! demand through a constant-elasticity curve and depletes inventory. The
//! finished [`DemandTimeline`] is reported together with waste and revenue
//! against a no-intervention baseline.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::PricingError;
pub use model::product::Product;
pub use model::timeline::{DemandTimeline, HourRecord};
pub use simulation::config::SimulationConfig;
pub use simulation::engine::PricingSimulator;
pub use simulation::metrics::{SimulationMetrics, SimulationOutcome};
pub use strategy::traits::{DecayPolicy, ElasticityPolicy};
