//! Lot pricing and stay quote DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::StayQuote;
use crate::domain::{ChargeType, Concession, LotPricing, ParkingStay, PricingError, VehicleScope};
use crate::interfaces::http::modules::pricing::TieredRuleDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LotPricingRequest {
    #[serde(default)]
    #[schema(value_type = String, example = "tiered")]
    pub charge_type: ChargeType,
    #[serde(default)]
    #[validate(range(min = 1, message = "template_id must be positive"))]
    pub template_id: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub hourly_rate: Option<Decimal>,
    #[serde(default)]
    pub free_minutes: Option<u32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub daily_max_fee: Option<Decimal>,
    #[serde(default)]
    #[validate(length(max = 32, message = "at most 32 rules"))]
    pub custom_rules: Vec<TieredRuleDto>,
}

impl LotPricingRequest {
    pub fn into_lot_pricing(self, lot_id: i32, now: DateTime<Utc>) -> LotPricing {
        LotPricing {
            lot_id,
            charge_type: self.charge_type,
            template_id: self.template_id,
            hourly_rate: self.hourly_rate,
            free_minutes: self.free_minutes,
            daily_max_fee: self.daily_max_fee,
            custom_rules: self.custom_rules.into_iter().map(Into::into).collect(),
            updated_at: now,
        }
    }
}

/// Pricing configured for a lot
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LotPricingResponse {
    pub lot_id: i32,
    pub charge_type: String,
    pub template_id: Option<i32>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub hourly_rate: Option<Decimal>,
    pub free_minutes: Option<u32>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub daily_max_fee: Option<Decimal>,
    pub custom_rules: Vec<TieredRuleDto>,
    pub updated_at: DateTime<Utc>,
}

impl From<LotPricing> for LotPricingResponse {
    fn from(p: LotPricing) -> Self {
        Self {
            lot_id: p.lot_id,
            charge_type: p.charge_type.to_string(),
            template_id: p.template_id,
            hourly_rate: p.hourly_rate,
            free_minutes: p.free_minutes,
            daily_max_fee: p.daily_max_fee,
            custom_rules: p.custom_rules.into_iter().map(Into::into).collect(),
            updated_at: p.updated_at,
        }
    }
}

/// Reduction granted to the vehicle
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConcessionDto {
    None,
    Free,
    /// `rate` is the waived fraction in `[0, 1]`
    Discount {
        #[serde(with = "rust_decimal::serde::float")]
        #[schema(value_type = f64)]
        rate: Decimal,
    },
}

impl TryFrom<ConcessionDto> for Concession {
    type Error = PricingError;

    fn try_from(dto: ConcessionDto) -> Result<Self, Self::Error> {
        match dto {
            ConcessionDto::None => Ok(Concession::None),
            ConcessionDto::Free => Ok(Concession::Free),
            ConcessionDto::Discount { rate } => Concession::discount(rate),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    pub entry_time: DateTime<Utc>,
    /// Omit for a vehicle that is still parked
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub concession: Option<ConcessionDto>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "standard")]
    pub vehicle_scope: Option<VehicleScope>,
}

impl QuoteRequest {
    pub fn to_stay(&self) -> Result<ParkingStay, PricingError> {
        let concession = match self.concession.clone() {
            Some(dto) => dto.try_into()?,
            None => Concession::None,
        };
        Ok(ParkingStay {
            entry_time: self.entry_time,
            exit_time: self.exit_time,
            concession,
        })
    }
}

/// Fee owed for a stay
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub lot_id: i32,
    pub duration_minutes: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub fee: Decimal,
    pub breakdown: Vec<String>,
}

impl QuoteResponse {
    pub fn new(lot_id: i32, quote: StayQuote) -> Self {
        Self {
            lot_id,
            duration_minutes: quote.duration_minutes,
            fee: quote.fee.total_fee,
            breakdown: quote.fee.breakdown,
        }
    }
}
