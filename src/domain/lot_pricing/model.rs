//! Per-lot pricing configuration

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::pricing::{ChargeType, PricingConfig, PricingError, TieredRule};
use crate::domain::template::{PricingTemplate, VehicleScope};

/// Pricing set up for one parking lot: either its own rates or a link to a
/// shared template.
#[derive(Debug, Clone)]
pub struct LotPricing {
    pub lot_id: i32,
    pub charge_type: ChargeType,
    pub template_id: Option<i32>,
    /// Required for fixed pricing
    pub hourly_rate: Option<Decimal>,
    pub free_minutes: Option<u32>,
    pub daily_max_fee: Option<Decimal>,
    /// Tiered rules used when no template is linked
    pub custom_rules: Vec<TieredRule>,
    pub updated_at: DateTime<Utc>,
}

impl LotPricing {
    /// Build the effective calculator configuration.
    ///
    /// `template` must be the template referenced by `template_id`, if any.
    pub fn resolve(
        &self,
        template: Option<&PricingTemplate>,
        scope: VehicleScope,
        default_free_minutes: u32,
    ) -> Result<PricingConfig, PricingError> {
        let daily_max_fee = template
            .map(|t| t.daily_max_fee)
            .unwrap_or(self.daily_max_fee);

        match self.charge_type {
            ChargeType::Fixed => {
                let hourly_rate = self.hourly_rate.ok_or_else(|| {
                    PricingError::configuration(format!(
                        "lot {} uses fixed pricing without an hourly rate",
                        self.lot_id
                    ))
                })?;
                Ok(PricingConfig::fixed(hourly_rate)
                    .with_free_minutes(self.free_minutes.unwrap_or(default_free_minutes))
                    .with_daily_max_fee(daily_max_fee))
            }
            ChargeType::Tiered => match template {
                Some(t) => Ok(t.to_pricing_config(scope)),
                None => Ok(PricingConfig::tiered(self.custom_rules.clone())
                    .with_free_minutes(self.free_minutes.unwrap_or(default_free_minutes))
                    .with_daily_max_fee(daily_max_fee)),
            },
        }
    }
}
