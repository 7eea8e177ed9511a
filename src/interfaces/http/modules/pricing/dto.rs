//! Fee preview DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::PreviewParams;
use crate::domain::{ChargeType, FeeResult, TieredRule, VehicleScope};

/// One tiered bracket `[start_minutes, end_minutes)`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct TieredRuleDto {
    pub start_minutes: u32,
    /// Exclusive upper bound; omitted for the open-ended last bracket
    #[serde(default)]
    pub end_minutes: Option<u32>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub rate_per_hour: Decimal,
}

impl From<TieredRuleDto> for TieredRule {
    fn from(dto: TieredRuleDto) -> Self {
        TieredRule::new(dto.start_minutes, dto.end_minutes, dto.rate_per_hour)
    }
}

impl From<TieredRule> for TieredRuleDto {
    fn from(rule: TieredRule) -> Self {
        Self {
            start_minutes: rule.start_minutes,
            end_minutes: rule.end_minutes,
            rate_per_hour: rule.rate_per_hour,
        }
    }
}

/// Parameters entered in the pricing editor
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PricingPreviewRequest {
    /// Elapsed parking time
    pub duration_minutes: i64,
    #[serde(default)]
    #[schema(value_type = String, example = "fixed")]
    pub charge_type: ChargeType,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub hourly_rate: Option<Decimal>,
    #[serde(default)]
    pub free_minutes: Option<u32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub daily_max_fee: Option<Decimal>,
    #[serde(default)]
    #[validate(range(min = 1, message = "template_id must be positive"))]
    pub template_id: Option<i32>,
    /// Custom tiered rules, used instead of the template's
    #[serde(default)]
    #[validate(length(max = 32, message = "at most 32 rules"))]
    pub rules: Vec<TieredRuleDto>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "standard")]
    pub vehicle_scope: Option<VehicleScope>,
}

impl From<PricingPreviewRequest> for PreviewParams {
    fn from(req: PricingPreviewRequest) -> Self {
        Self {
            duration_minutes: req.duration_minutes,
            charge_type: req.charge_type,
            hourly_rate: req.hourly_rate,
            free_minutes: req.free_minutes,
            daily_max_fee: req.daily_max_fee,
            template_id: req.template_id,
            rules: req.rules.into_iter().map(Into::into).collect(),
            vehicle_scope: req.vehicle_scope.unwrap_or_default(),
        }
    }
}

/// Computed preview
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PricingPreviewResponse {
    pub success: bool,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub fee: Decimal,
    pub breakdown: Vec<String>,
}

impl From<FeeResult> for PricingPreviewResponse {
    fn from(result: FeeResult) -> Self {
        Self {
            success: true,
            fee: result.total_fee,
            breakdown: result.breakdown,
        }
    }
}
