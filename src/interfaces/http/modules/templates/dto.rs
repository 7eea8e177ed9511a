//! Pricing template DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{PassKind, PassRate, PricingTemplate, TemplateRule, VehicleScope};

/// Rate rule of a template
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateRuleDto {
    pub start_minutes: u32,
    #[serde(default)]
    pub end_minutes: Option<u32>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub rate_per_hour: Decimal,
    #[serde(default)]
    #[schema(value_type = String, example = "all")]
    pub vehicle_scope: VehicleScope,
    #[serde(default)]
    pub order: u32,
}

impl From<TemplateRule> for TemplateRuleDto {
    fn from(r: TemplateRule) -> Self {
        Self {
            start_minutes: r.start_minutes,
            end_minutes: r.end_minutes,
            rate_per_hour: r.rate_per_hour,
            vehicle_scope: r.vehicle_scope,
            order: r.order,
        }
    }
}

impl From<TemplateRuleDto> for TemplateRule {
    fn from(r: TemplateRuleDto) -> Self {
        Self {
            start_minutes: r.start_minutes,
            end_minutes: r.end_minutes,
            rate_per_hour: r.rate_per_hour,
            vehicle_scope: r.vehicle_scope,
            order: r.order,
        }
    }
}

/// Month/quarter/year pass offered with a template
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PassRateDto {
    #[schema(value_type = String, example = "month")]
    pub kind: PassKind,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[serde(default)]
    #[schema(value_type = String, example = "all")]
    pub vehicle_scope: VehicleScope,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<PassRate> for PassRateDto {
    fn from(p: PassRate) -> Self {
        Self {
            kind: p.kind,
            price: p.price,
            vehicle_scope: p.vehicle_scope,
            description: p.description,
        }
    }
}

impl From<PassRateDto> for PassRate {
    fn from(p: PassRateDto) -> Self {
        Self {
            kind: p.kind,
            price: p.price,
            vehicle_scope: p.vehicle_scope,
            description: p.description,
        }
    }
}

/// Pricing template
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub free_minutes: u32,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub daily_max_fee: Option<Decimal>,
    pub is_active: bool,
    pub rules: Vec<TemplateRuleDto>,
    pub pass_rates: Vec<PassRateDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PricingTemplate> for TemplateResponse {
    fn from(t: PricingTemplate) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            free_minutes: t.free_minutes,
            daily_max_fee: t.daily_max_fee,
            is_active: t.is_active,
            rules: t.rules.into_iter().map(Into::into).collect(),
            pass_rates: t.pass_rates.into_iter().map(Into::into).collect(),
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 100, message = "template name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub free_minutes: Option<u32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub daily_max_fee: Option<Decimal>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    #[validate(length(max = 32, message = "at most 32 rules"))]
    pub rules: Vec<TemplateRuleDto>,
    #[serde(default)]
    pub pass_rates: Vec<PassRateDto>,
}

impl CreateTemplateRequest {
    pub fn into_template(self, now: DateTime<Utc>) -> PricingTemplate {
        PricingTemplate {
            id: 0,
            name: self.name,
            description: self.description,
            free_minutes: self
                .free_minutes
                .unwrap_or(PricingTemplate::DEFAULT_FREE_MINUTES),
            daily_max_fee: self.daily_max_fee,
            is_active: self.is_active.unwrap_or(true),
            rules: self.rules.into_iter().map(Into::into).collect(),
            pass_rates: self.pass_rates.into_iter().map(Into::into).collect(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; omitted fields keep their current value and an explicit
/// `null` clears `description` or `daily_max_fee`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, max = 100, message = "template name must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub free_minutes: Option<u32>,
    #[serde(default, deserialize_with = "present_money")]
    #[schema(value_type = Option<f64>)]
    pub daily_max_fee: Option<Option<Decimal>>,
    pub is_active: Option<bool>,
    #[validate(length(max = 32, message = "at most 32 rules"))]
    pub rules: Option<Vec<TemplateRuleDto>>,
    pub pass_rates: Option<Vec<PassRateDto>>,
}

/// Field was present in the body, possibly as `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_money<'de, D>(deserializer: D) -> Result<Option<Option<Decimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    rust_decimal::serde::float_option::deserialize(deserializer).map(Some)
}

impl UpdateTemplateRequest {
    pub fn apply(self, template: &mut PricingTemplate, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(description) = self.description {
            template.description = description;
        }
        if let Some(free_minutes) = self.free_minutes {
            template.free_minutes = free_minutes;
        }
        if let Some(cap) = self.daily_max_fee {
            template.daily_max_fee = cap;
        }
        if let Some(is_active) = self.is_active {
            template.is_active = is_active;
        }
        if let Some(rules) = self.rules {
            template.rules = rules.into_iter().map(Into::into).collect();
        }
        if let Some(pass_rates) = self.pass_rates {
            template.pass_rates = pass_rates.into_iter().map(Into::into).collect();
        }
        template.updated_at = now;
    }
}

/// Copy of an existing template; the name defaults to "<source> (副本)"
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CopyTemplateRequest {
    #[validate(length(min = 1, max = 100, message = "template name must be 1-100 characters"))]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn capped_template() -> PricingTemplate {
        let now = Utc::now();
        PricingTemplate {
            id: 7,
            name: "夜间收费".into(),
            description: Some("22:00-06:00".into()),
            free_minutes: 10,
            daily_max_fee: Some(dec!(30)),
            is_active: true,
            rules: vec![],
            pass_rates: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn update(body: serde_json::Value) -> UpdateTemplateRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn omitted_fields_are_kept() {
        let mut t = capped_template();
        update(json!({"free_minutes": 20})).apply(&mut t, Utc::now());
        assert_eq!(t.free_minutes, 20);
        assert_eq!(t.daily_max_fee, Some(dec!(30)));
        assert_eq!(t.description.as_deref(), Some("22:00-06:00"));
    }

    #[test]
    fn null_clears_cap_and_description() {
        let mut t = capped_template();
        update(json!({"daily_max_fee": null, "description": null})).apply(&mut t, Utc::now());
        assert_eq!(t.daily_max_fee, None);
        assert_eq!(t.description, None);
        assert_eq!(t.free_minutes, 10);
    }

    #[test]
    fn new_cap_replaces_old() {
        let mut t = capped_template();
        update(json!({"daily_max_fee": 45.5})).apply(&mut t, Utc::now());
        assert_eq!(t.daily_max_fee, Some(dec!(45.5)));
    }

    #[test]
    fn copy_request_name_is_optional() {
        let req: CopyTemplateRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.name.is_none());
        let req: CopyTemplateRequest = serde_json::from_value(json!({"name": ""})).unwrap();
        assert!(req.validate().is_err());
    }
}
