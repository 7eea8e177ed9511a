//! Pricing template domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::{PricingConfig, PricingError, TieredRule};

/// Parking space category a rule or pass applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleScope {
    Standard,
    Disabled,
    Vip,
    Large,
    /// Applies to every space type
    #[default]
    All,
}

impl VehicleScope {
    /// Whether a rule scoped to `self` applies to a space of type `scope`.
    pub fn covers(&self, scope: VehicleScope) -> bool {
        *self == VehicleScope::All || *self == scope
    }
}

impl fmt::Display for VehicleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Disabled => write!(f, "disabled"),
            Self::Vip => write!(f, "vip"),
            Self::Large => write!(f, "large"),
            Self::All => write!(f, "all"),
        }
    }
}

impl FromStr for VehicleScope {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "disabled" => Ok(Self::Disabled),
            "vip" => Ok(Self::Vip),
            "large" => Ok(Self::Large),
            "all" => Ok(Self::All),
            other => Err(PricingError::invalid_input(format!(
                "unknown vehicle scope '{}'",
                other
            ))),
        }
    }
}

/// Pass product length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassKind {
    Month,
    Quarter,
    Year,
}

/// Rate rule inside a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRule {
    pub start_minutes: u32,
    pub end_minutes: Option<u32>,
    pub rate_per_hour: Decimal,
    pub vehicle_scope: VehicleScope,
    /// Evaluation order, lower first
    pub order: u32,
}

/// Monthly/quarterly/yearly pass offered with a template. Catalog data only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassRate {
    pub kind: PassKind,
    pub price: Decimal,
    pub vehicle_scope: VehicleScope,
    pub description: Option<String>,
}

/// Reusable pricing standard that parking lots can link to
#[derive(Debug, Clone)]
pub struct PricingTemplate {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub free_minutes: u32,
    pub daily_max_fee: Option<Decimal>,
    pub is_active: bool,
    pub rules: Vec<TemplateRule>,
    pub pass_rates: Vec<PassRate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingTemplate {
    pub const DEFAULT_FREE_MINUTES: u32 = 15;

    /// Rules that apply to `scope`, in evaluation order.
    pub fn rules_for(&self, scope: VehicleScope) -> Vec<TieredRule> {
        let mut rules: Vec<&TemplateRule> = self
            .rules
            .iter()
            .filter(|r| r.vehicle_scope.covers(scope))
            .collect();
        rules.sort_by_key(|r| (r.order, r.start_minutes));
        rules
            .into_iter()
            .map(|r| TieredRule::new(r.start_minutes, r.end_minutes, r.rate_per_hour))
            .collect()
    }

    /// Tiered pricing configuration for spaces of type `scope`.
    pub fn to_pricing_config(&self, scope: VehicleScope) -> PricingConfig {
        PricingConfig::tiered(self.rules_for(scope))
            .with_free_minutes(self.free_minutes)
            .with_daily_max_fee(self.daily_max_fee)
    }

    /// Entity-level checks applied before a template is stored.
    pub fn check(&self) -> Result<(), String> {
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > 100 {
            return Err("template name must be 1-100 characters".to_string());
        }
        if let Some(cap) = self.daily_max_fee {
            if cap < Decimal::new(1, 2) {
                return Err("daily_max_fee must be greater than 0".to_string());
            }
        }
        for rule in &self.rules {
            if rule.rate_per_hour < Decimal::new(1, 2) {
                return Err(format!(
                    "rule starting at minute {} must have a rate of at least 0.01",
                    rule.start_minutes
                ));
            }
            if let Some(end) = rule.end_minutes {
                if end <= rule.start_minutes {
                    return Err(format!(
                        "rule {}-{}: end must be greater than start",
                        rule.start_minutes, end
                    ));
                }
            }
        }
        for pass in &self.pass_rates {
            if pass.price < Decimal::new(1, 2) {
                return Err("pass price must be greater than 0".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rule(start: u32, end: Option<u32>, rate: Decimal, scope: VehicleScope, order: u32) -> TemplateRule {
        TemplateRule {
            start_minutes: start,
            end_minutes: end,
            rate_per_hour: rate,
            vehicle_scope: scope,
            order,
        }
    }

    fn sample() -> PricingTemplate {
        PricingTemplate {
            id: 1,
            name: "标准阶梯收费".into(),
            description: None,
            free_minutes: 15,
            daily_max_fee: Some(dec!(100)),
            is_active: true,
            rules: vec![
                rule(60, None, dec!(8), VehicleScope::All, 1),
                rule(0, Some(60), dec!(5), VehicleScope::All, 0),
                rule(0, None, dec!(12), VehicleScope::Vip, 2),
            ],
            pass_rates: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn scope_all_covers_everything() {
        assert!(VehicleScope::All.covers(VehicleScope::Vip));
        assert!(VehicleScope::Vip.covers(VehicleScope::Vip));
        assert!(!VehicleScope::Vip.covers(VehicleScope::Standard));
    }

    #[test]
    fn rules_for_filters_and_orders() {
        let t = sample();
        let rules = t.rules_for(VehicleScope::Standard);
        assert_eq!(
            rules,
            vec![
                TieredRule::new(0, Some(60), dec!(5)),
                TieredRule::new(60, None, dec!(8)),
            ]
        );
        assert_eq!(t.rules_for(VehicleScope::Vip).len(), 3);
    }

    #[test]
    fn to_pricing_config_carries_grace_and_cap() {
        let cfg = sample().to_pricing_config(VehicleScope::Standard);
        assert_eq!(cfg.free_minutes, 15);
        assert_eq!(cfg.daily_max_fee, Some(dec!(100)));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn check_rejects_bad_templates() {
        let mut t = sample();
        t.name = String::new();
        assert!(t.check().is_err());

        let mut t = sample();
        t.daily_max_fee = Some(dec!(0));
        assert!(t.check().is_err());

        let mut t = sample();
        t.rules[0].rate_per_hour = dec!(0);
        assert!(t.check().is_err());

        assert!(sample().check().is_ok());
    }

    #[test]
    fn vehicle_scope_round_trips_through_str() {
        for scope in [
            VehicleScope::Standard,
            VehicleScope::Disabled,
            VehicleScope::Vip,
            VehicleScope::Large,
            VehicleScope::All,
        ] {
            assert_eq!(scope.to_string().parse::<VehicleScope>().unwrap(), scope);
        }
    }
}
