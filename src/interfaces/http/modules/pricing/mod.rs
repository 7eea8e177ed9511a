//! Fee preview for the pricing editor

pub mod dto;
pub mod handlers;

pub use dto::{PricingPreviewRequest, PricingPreviewResponse, TieredRuleDto};
pub use handlers::*;
