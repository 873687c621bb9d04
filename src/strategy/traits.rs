// src/strategy/traits.rs

use std::fmt::Debug;

/// Produces the exponent of the hourly power-law markdown.
///
/// Implementations are pure functions of their own bound parameters: the
/// simulator hands them no hour, price or timeline state. Values are meant to
/// lie in (0, 1] but the simulator only rejects non-finite or non-positive
/// draws; range shaping is the policy's job.
///
/// `&mut self` lets randomized policies advance their own seeded generator.
pub trait DecayPolicy: Debug + Send + Sync {
    /// Draws the decay exponent for the hour currently being marked down.
    fn draw(&mut self) -> f64;
}

/// Produces the price elasticity of demand used by the constant-elasticity
/// demand curve `demand * (price / base_price) ^ (-elasticity)`.
pub trait ElasticityPolicy: Debug + Send + Sync {
    /// Returns a positive elasticity coefficient.
    fn elasticity(&mut self) -> f64;
}
