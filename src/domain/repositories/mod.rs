//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::lot_pricing::LotPricingRepository;
use super::template::TemplateRepository;

pub use crate::shared::errors::DomainResult;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let template = repos.templates().find_by_id(1).await?;
///     let lot = repos.lot_pricing().find_by_lot(42).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn templates(&self) -> &dyn TemplateRepository;
    fn lot_pricing(&self) -> &dyn LotPricingRepository;
}
