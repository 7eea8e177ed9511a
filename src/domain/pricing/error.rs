//! Fee calculation errors

use thiserror::Error;

/// Caller-facing failures of the fee calculator.
///
/// Neither variant is retried: the calculator is pure, so the same inputs
/// always fail the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The pricing configuration breaks an invariant (overlapping or gapped
    /// rules, negative rates, tiered pricing without rules, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The call-site input is invalid (e.g. a negative duration).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PricingError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
