//! Lot pricing repository interface

use async_trait::async_trait;

use super::model::LotPricing;
use crate::domain::DomainResult;

#[async_trait]
pub trait LotPricingRepository: Send + Sync {
    async fn find_by_lot(&self, lot_id: i32) -> DomainResult<Option<LotPricing>>;
    async fn upsert(&self, pricing: LotPricing) -> DomainResult<LotPricing>;
    /// Whether any lot links to the template
    async fn is_template_in_use(&self, template_id: i32) -> DomainResult<bool>;
}
