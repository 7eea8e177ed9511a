//! # Parking Fees
//!
//! Parking-fee calculation service: fixed hourly or tiered time-bracket
//! pricing with a free grace period and a daily cap, pricing templates
//! shared between lots, per-lot quotes and a fee preview API.
//!
//! ## Architecture
//!
//! - **domain**: Fee calculator, pricing configuration, templates, lots, stays
//! - **application**: Billing service (previews, quotes, pricing management)
//! - **infrastructure**: In-memory repositories seeded with default templates
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: Server lifecycle and tracing setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use domain::{FeeCalculator, FeeResult, PricingConfig, PricingError, TieredRule};
pub use interfaces::create_api_router;
