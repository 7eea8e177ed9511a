//! Billing service for fee previews, stay quotes and pricing management

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{
    ChargeType, DomainError, DomainResult, FeeCalculator, FeeResult, LotPricing, ParkingStay,
    PricingConfig, PricingTemplate, RepositoryProvider, TieredRule, VehicleScope,
};

/// Ad-hoc pricing parameters for a preview, as entered in the pricing editor.
#[derive(Debug, Clone, Default)]
pub struct PreviewParams {
    pub duration_minutes: i64,
    pub charge_type: ChargeType,
    pub hourly_rate: Option<Decimal>,
    pub free_minutes: Option<u32>,
    pub daily_max_fee: Option<Decimal>,
    /// Template supplying rules, grace period and cap
    pub template_id: Option<i32>,
    /// Custom tiered rules; take precedence over the template's
    pub rules: Vec<TieredRule>,
    pub vehicle_scope: VehicleScope,
}

/// Fee owed for one stay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayQuote {
    pub duration_minutes: i64,
    pub fee: FeeResult,
}

/// Service for billing operations
pub struct BillingService {
    repos: Arc<dyn RepositoryProvider>,
    default_free_minutes: u32,
}

impl BillingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, default_free_minutes: u32) -> Self {
        Self {
            repos,
            default_free_minutes,
        }
    }

    // ── Calculation ────────────────────────────────────────────

    /// Compute a fee from editor parameters without touching any lot.
    pub async fn preview(&self, params: PreviewParams) -> DomainResult<FeeResult> {
        let config = self.preview_config(&params).await?;
        Ok(FeeCalculator::calculate(params.duration_minutes, &config)?)
    }

    async fn preview_config(&self, params: &PreviewParams) -> DomainResult<PricingConfig> {
        let template = match params.template_id {
            Some(id) => Some(self.require_template(id).await?),
            None => None,
        };

        let free_minutes = params
            .free_minutes
            .or_else(|| template.as_ref().map(|t| t.free_minutes))
            .unwrap_or(self.default_free_minutes);
        let daily_max_fee = params
            .daily_max_fee
            .or_else(|| template.as_ref().and_then(|t| t.daily_max_fee));

        let config = match params.charge_type {
            ChargeType::Fixed => {
                let hourly_rate = params.hourly_rate.ok_or_else(|| {
                    DomainError::Validation("hourly_rate is required for fixed pricing".into())
                })?;
                PricingConfig::fixed(hourly_rate)
            }
            ChargeType::Tiered => {
                let rules = if !params.rules.is_empty() {
                    params.rules.clone()
                } else {
                    template
                        .as_ref()
                        .map(|t| t.rules_for(params.vehicle_scope))
                        .unwrap_or_default()
                };
                PricingConfig::tiered(rules)
            }
        };

        Ok(config
            .with_free_minutes(free_minutes)
            .with_daily_max_fee(daily_max_fee))
    }

    /// Resolve a lot's configuration and price a stay, applying the
    /// vehicle's concession last.
    pub async fn quote_stay(
        &self,
        lot_id: i32,
        stay: &ParkingStay,
        now: DateTime<Utc>,
        scope: VehicleScope,
    ) -> DomainResult<StayQuote> {
        let config = self.lot_config(lot_id, scope).await?;
        let duration_minutes = stay.duration_minutes(now)?;
        let fee = FeeCalculator::calculate(duration_minutes, &config)?;
        let fee = stay.concession.apply(fee);

        info!(
            lot_id,
            duration_minutes,
            total_fee = %fee.total_fee,
            "Stay quoted"
        );

        Ok(StayQuote {
            duration_minutes,
            fee,
        })
    }

    /// Effective calculator configuration of a lot for spaces of `scope`.
    pub async fn lot_config(&self, lot_id: i32, scope: VehicleScope) -> DomainResult<PricingConfig> {
        let pricing = self.get_lot_pricing(lot_id).await?;
        let template = match pricing.template_id {
            Some(id) => Some(self.require_template(id).await?),
            None => None,
        };
        Ok(pricing.resolve(template.as_ref(), scope, self.default_free_minutes)?)
    }

    // ── Lot pricing ────────────────────────────────────────────

    pub async fn get_lot_pricing(&self, lot_id: i32) -> DomainResult<LotPricing> {
        self.repos
            .lot_pricing()
            .find_by_lot(lot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("LotPricing", "lot_id", lot_id))
    }

    pub async fn set_lot_pricing(&self, mut pricing: LotPricing) -> DomainResult<LotPricing> {
        let template = match pricing.template_id {
            Some(id) => Some(self.require_template(id).await?),
            None => None,
        };

        // Template-backed tiered pricing depends on the space type, so only
        // self-contained configurations can be checked up front.
        if template.is_none() || pricing.charge_type == ChargeType::Fixed {
            pricing
                .resolve(template.as_ref(), VehicleScope::All, self.default_free_minutes)?
                .validate()?;
        }

        pricing.updated_at = Utc::now();
        let saved = self.repos.lot_pricing().upsert(pricing).await?;

        info!(
            lot_id = saved.lot_id,
            charge_type = %saved.charge_type,
            template_id = ?saved.template_id,
            "Lot pricing updated"
        );

        Ok(saved)
    }

    // ── Templates ──────────────────────────────────────────────

    pub async fn list_templates(&self) -> DomainResult<Vec<PricingTemplate>> {
        self.repos.templates().find_all().await
    }

    pub async fn get_template(&self, id: i32) -> DomainResult<PricingTemplate> {
        self.require_template(id).await
    }

    pub async fn create_template(&self, template: PricingTemplate) -> DomainResult<PricingTemplate> {
        template.check().map_err(DomainError::Validation)?;
        let saved = self.repos.templates().save(template).await?;
        info!(template_id = saved.id, name = %saved.name, "Pricing template created");
        Ok(saved)
    }

    pub async fn update_template(&self, template: PricingTemplate) -> DomainResult<PricingTemplate> {
        template.check().map_err(DomainError::Validation)?;
        self.repos.templates().update(template.clone()).await?;
        info!(template_id = template.id, "Pricing template updated");
        Ok(template)
    }

    /// Duplicate a template with its rules and pass rates. The copy is named
    /// `new_name`, or "<source> (副本)" when none is given.
    pub async fn copy_template(
        &self,
        id: i32,
        new_name: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<PricingTemplate> {
        let source = self.require_template(id).await?;
        let name = new_name.unwrap_or_else(|| format!("{} (副本)", source.name));

        if self.repos.templates().find_by_name(&name).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "pricing template name '{}' already exists",
                name
            )));
        }

        let copy = PricingTemplate {
            id: 0,
            name,
            created_at: now,
            updated_at: now,
            ..source.clone()
        };
        copy.check().map_err(DomainError::Validation)?;
        let saved = self.repos.templates().save(copy).await?;
        info!(
            source_id = source.id,
            template_id = saved.id,
            name = %saved.name,
            "Pricing template copied"
        );
        Ok(saved)
    }

    pub async fn delete_template(&self, id: i32) -> DomainResult<()> {
        if self.repos.lot_pricing().is_template_in_use(id).await? {
            return Err(DomainError::Conflict(format!(
                "pricing template {} is linked to a parking lot",
                id
            )));
        }
        self.repos.templates().delete(id).await?;
        info!(template_id = id, "Pricing template deleted");
        Ok(())
    }

    pub async fn template_count(&self) -> DomainResult<u64> {
        self.repos.templates().count().await
    }

    async fn require_template(&self, id: i32) -> DomainResult<PricingTemplate> {
        self.repos
            .templates()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("PricingTemplate", "id", id))
    }
}
