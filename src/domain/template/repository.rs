//! Pricing template repository interface

use async_trait::async_trait;

use super::model::PricingTemplate;
use crate::domain::DomainResult;

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PricingTemplate>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<PricingTemplate>>;
    async fn find_all(&self) -> DomainResult<Vec<PricingTemplate>>;
    async fn save(&self, template: PricingTemplate) -> DomainResult<PricingTemplate>;
    async fn update(&self, template: PricingTemplate) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
    async fn count(&self) -> DomainResult<u64>;
}
