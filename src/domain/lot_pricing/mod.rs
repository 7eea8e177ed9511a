//! Lot pricing aggregate

pub mod model;
pub mod repository;

pub use model::LotPricing;
pub use repository::LotPricingRepository;
