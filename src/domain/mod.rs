pub mod lot_pricing;
pub mod pricing;
pub mod record;
pub mod repositories;
pub mod template;

// Re-export commonly used types
pub use lot_pricing::{LotPricing, LotPricingRepository};
pub use pricing::{
    ChargeScheme, ChargeType, FeeCalculator, FeeResult, PricingConfig, PricingError, TieredRule,
};
pub use record::{Concession, ParkingStay};
pub use repositories::{DomainResult, RepositoryProvider};
pub use template::{
    PassKind, PassRate, PricingTemplate, TemplateRepository, TemplateRule, VehicleScope,
};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
