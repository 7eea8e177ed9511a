//! Fee calculation core
//!
//! Pricing configuration types and the pure `FeeCalculator`.

pub mod calculator;
pub mod error;
pub mod model;

pub use calculator::FeeCalculator;
pub use error::PricingError;
pub use model::{ChargeScheme, ChargeType, FeeResult, PricingConfig, TieredRule};
