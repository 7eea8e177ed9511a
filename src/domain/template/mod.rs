//! Pricing template aggregate
//!
//! Named, reusable tiered schedules with grace period, daily cap and pass
//! catalog.

pub mod model;
pub mod repository;

pub use model::{PassKind, PassRate, PricingTemplate, TemplateRule, VehicleScope};
pub use repository::TemplateRepository;
