//! In-memory storage implementation

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::domain::{
    DomainError, DomainResult, LotPricing, LotPricingRepository, PassKind, PassRate,
    PricingTemplate, RepositoryProvider, TemplateRepository, TemplateRule, VehicleScope,
};

// ── Templates ──────────────────────────────────────────────────

pub struct InMemoryTemplateRepository {
    templates: DashMap<i32, PricingTemplate>,
    counter: AtomicI32,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryTemplateRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PricingTemplate>> {
        Ok(self.templates.get(&id).map(|t| t.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<PricingTemplate>> {
        Ok(self
            .templates
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value().clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<PricingTemplate>> {
        let mut all: Vec<PricingTemplate> =
            self.templates.iter().map(|t| t.value().clone()).collect();
        // newest first
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }

    async fn save(&self, mut template: PricingTemplate) -> DomainResult<PricingTemplate> {
        if self.templates.iter().any(|t| t.name == template.name) {
            return Err(DomainError::Conflict(format!(
                "pricing template '{}'",
                template.name
            )));
        }
        template.id = self.counter.fetch_add(1, Ordering::SeqCst);
        self.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn update(&self, template: PricingTemplate) -> DomainResult<()> {
        if self
            .templates
            .iter()
            .any(|t| t.name == template.name && t.id != template.id)
        {
            return Err(DomainError::Conflict(format!(
                "pricing template '{}'",
                template.name
            )));
        }
        match self.templates.get_mut(&template.id) {
            Some(mut existing) => {
                *existing = template;
                Ok(())
            }
            None => Err(DomainError::not_found("PricingTemplate", "id", template.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.templates
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("PricingTemplate", "id", id))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.templates.len() as u64)
    }
}

// ── Lot pricing ────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryLotPricingRepository {
    lots: DashMap<i32, LotPricing>,
}

impl InMemoryLotPricingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LotPricingRepository for InMemoryLotPricingRepository {
    async fn find_by_lot(&self, lot_id: i32) -> DomainResult<Option<LotPricing>> {
        Ok(self.lots.get(&lot_id).map(|p| p.value().clone()))
    }

    async fn upsert(&self, pricing: LotPricing) -> DomainResult<LotPricing> {
        self.lots.insert(pricing.lot_id, pricing.clone());
        Ok(pricing)
    }

    async fn is_template_in_use(&self, template_id: i32) -> DomainResult<bool> {
        Ok(self
            .lots
            .iter()
            .any(|p| p.template_id == Some(template_id)))
    }
}

// ── Provider ───────────────────────────────────────────────────

/// Repository provider for development, tests and single-node deployments.
pub struct InMemoryRepositoryProvider {
    templates: InMemoryTemplateRepository,
    lot_pricing: InMemoryLotPricingRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            templates: InMemoryTemplateRepository::new(),
            lot_pricing: InMemoryLotPricingRepository::new(),
        }
    }

    /// Provider pre-loaded with the stock pricing templates.
    pub async fn with_default_templates() -> DomainResult<Self> {
        let provider = Self::new();
        for template in default_templates() {
            provider.templates.save(template).await?;
        }
        Ok(provider)
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn templates(&self) -> &dyn TemplateRepository {
        &self.templates
    }

    fn lot_pricing(&self) -> &dyn LotPricingRepository {
        &self.lot_pricing
    }
}

// ── Seed data ──────────────────────────────────────────────────

fn yuan(amount: i64) -> Decimal {
    Decimal::from(amount)
}

fn rule(
    order: u32,
    start_minutes: u32,
    end_minutes: Option<u32>,
    rate: i64,
    vehicle_scope: VehicleScope,
) -> TemplateRule {
    TemplateRule {
        start_minutes,
        end_minutes,
        rate_per_hour: yuan(rate),
        vehicle_scope,
        order,
    }
}

fn pass(kind: PassKind, price: i64, vehicle_scope: VehicleScope, description: &str) -> PassRate {
    PassRate {
        kind,
        price: yuan(price),
        vehicle_scope,
        description: Some(description.to_string()),
    }
}

fn template(
    name: &str,
    description: &str,
    free_minutes: u32,
    daily_max_fee: i64,
    rules: Vec<TemplateRule>,
    pass_rates: Vec<PassRate>,
) -> PricingTemplate {
    let now = Utc::now();
    PricingTemplate {
        id: 0,
        name: name.to_string(),
        description: Some(description.to_string()),
        free_minutes,
        daily_max_fee: Some(yuan(daily_max_fee)),
        is_active: true,
        rules,
        pass_rates,
        created_at: now,
        updated_at: now,
    }
}

/// Stock templates shipped with a fresh installation.
pub fn default_templates() -> Vec<PricingTemplate> {
    use VehicleScope::{All, Vip};

    vec![
        template(
            "标准阶梯收费",
            "标准停车场阶梯收费模板，适用于大多数停车场",
            15,
            100,
            vec![
                rule(0, 0, Some(60), 5, All),
                rule(1, 60, Some(120), 8, All),
                rule(2, 120, None, 10, All),
            ],
            vec![
                pass(PassKind::Month, 300, All, "包月优惠"),
                pass(PassKind::Quarter, 800, All, "包季优惠"),
                pass(PassKind::Year, 2800, All, "包年优惠"),
            ],
        ),
        template(
            "优惠收费模板",
            "适用于优惠活动期间的停车场",
            30,
            80,
            vec![rule(0, 0, Some(120), 4, All), rule(1, 120, None, 6, All)],
            vec![pass(PassKind::Month, 250, All, "优惠包月")],
        ),
        template(
            "VIP专用费率",
            "适用于VIP车位的专用费率模板",
            30,
            150,
            vec![rule(0, 0, Some(60), 8, Vip), rule(1, 60, None, 12, Vip)],
            vec![
                pass(PassKind::Month, 500, Vip, "VIP包月"),
                pass(PassKind::Year, 5000, Vip, "VIP包年"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChargeType, FeeCalculator};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn seeds_default_templates() {
        let repos = InMemoryRepositoryProvider::with_default_templates()
            .await
            .unwrap();
        assert_eq!(repos.templates().count().await.unwrap(), 3);
        let standard = repos
            .templates()
            .find_by_name("标准阶梯收费")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(standard.free_minutes, 15);
        assert_eq!(standard.rules.len(), 3);
    }

    #[tokio::test]
    async fn default_templates_are_valid_for_their_scopes() {
        for t in default_templates() {
            assert!(t.check().is_ok(), "{} failed entity checks", t.name);
        }
        let vip = default_templates().remove(2);
        assert!(vip.to_pricing_config(VehicleScope::Vip).validate().is_ok());
        // no rule applies to standard spaces
        assert!(vip
            .to_pricing_config(VehicleScope::Standard)
            .validate()
            .is_err());
    }

    #[tokio::test]
    async fn standard_template_fee() {
        let standard = default_templates().remove(0);
        let cfg = standard.to_pricing_config(VehicleScope::Standard);
        // 195 - 15 = 180 billable: 60@5 + 60@8 + 60@10
        let result = FeeCalculator::calculate(195, &cfg).unwrap();
        assert_eq!(result.total_fee, dec!(23.00));
    }

    #[tokio::test]
    async fn save_rejects_duplicate_names() {
        let repos = InMemoryTemplateRepository::new();
        let first = default_templates().remove(0);
        let saved = repos.save(first.clone()).await.unwrap();
        assert_eq!(saved.id, 1);
        let err = repos.save(first).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_and_delete_missing_template() {
        let repos = InMemoryTemplateRepository::new();
        let mut t = default_templates().remove(0);
        t.id = 99;
        assert!(matches!(
            repos.update(t).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            repos.delete(99).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn lot_pricing_upsert_and_template_usage() {
        let repos = InMemoryLotPricingRepository::new();
        let pricing = LotPricing {
            lot_id: 5,
            charge_type: ChargeType::Tiered,
            template_id: Some(2),
            hourly_rate: None,
            free_minutes: None,
            daily_max_fee: None,
            custom_rules: vec![],
            updated_at: Utc::now(),
        };
        repos.upsert(pricing).await.unwrap();
        assert!(repos.find_by_lot(5).await.unwrap().is_some());
        assert!(repos.is_template_in_use(2).await.unwrap());
        assert!(!repos.is_template_in_use(1).await.unwrap());
    }
}
