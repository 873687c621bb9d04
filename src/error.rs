// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("input alignment error: {message}")]
    InputAlignment { message: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{policy} policy error: {message}")]
    Policy {
        policy: &'static str,
        message: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl PricingError {
    pub fn configuration(message: impl Into<String>) -> Self {
        PricingError::Configuration {
            message: message.into(),
        }
    }

    pub fn alignment(message: impl Into<String>) -> Self {
        PricingError::InputAlignment {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn policy(policy: &'static str, message: impl Into<String>) -> Self {
        PricingError::Policy {
            policy,
            message: message.into(),
        }
    }
}
