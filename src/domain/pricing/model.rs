//! Pricing configuration and fee result types

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PricingError;

/// How a parking lot charges for a stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeType {
    /// One hourly rate for the whole billable duration
    #[default]
    Fixed,
    /// Duration brackets, each with its own hourly rate
    Tiered,
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Tiered => write!(f, "tiered"),
        }
    }
}

impl FromStr for ChargeType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "tiered" => Ok(Self::Tiered),
            other => Err(PricingError::invalid_input(format!(
                "unknown charge type '{}'",
                other
            ))),
        }
    }
}

/// One bracket of a tiered schedule: `[start_minutes, end_minutes)` of
/// billable time charged at `rate_per_hour`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieredRule {
    pub start_minutes: u32,
    /// Exclusive upper bound. `None` marks the open-ended last bracket.
    pub end_minutes: Option<u32>,
    pub rate_per_hour: Decimal,
}

impl TieredRule {
    pub fn new(start_minutes: u32, end_minutes: Option<u32>, rate_per_hour: Decimal) -> Self {
        Self {
            start_minutes,
            end_minutes,
            rate_per_hour,
        }
    }
}

/// Charge scheme. Fixed and tiered pricing carry different data, so an
/// hourly rate can never sit next to a rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeScheme {
    Fixed { hourly_rate: Decimal },
    Tiered { rules: Vec<TieredRule> },
}

/// Immutable pricing configuration for one calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    pub scheme: ChargeScheme,
    /// Grace period subtracted from the elapsed duration.
    pub free_minutes: u32,
    /// Ceiling per commenced 24-hour period. `None` means uncapped.
    pub daily_max_fee: Option<Decimal>,
}

impl PricingConfig {
    pub fn fixed(hourly_rate: Decimal) -> Self {
        Self {
            scheme: ChargeScheme::Fixed { hourly_rate },
            free_minutes: 0,
            daily_max_fee: None,
        }
    }

    pub fn tiered(rules: Vec<TieredRule>) -> Self {
        Self {
            scheme: ChargeScheme::Tiered { rules },
            free_minutes: 0,
            daily_max_fee: None,
        }
    }

    pub fn with_free_minutes(mut self, free_minutes: u32) -> Self {
        self.free_minutes = free_minutes;
        self
    }

    pub fn with_daily_max_fee(mut self, daily_max_fee: Option<Decimal>) -> Self {
        self.daily_max_fee = daily_max_fee;
        self
    }

    pub fn charge_type(&self) -> ChargeType {
        match self.scheme {
            ChargeScheme::Fixed { .. } => ChargeType::Fixed,
            ChargeScheme::Tiered { .. } => ChargeType::Tiered,
        }
    }

    /// Check every configuration invariant.
    pub fn validate(&self) -> Result<(), PricingError> {
        self.checked_scheme().map(|_| ())
    }

    /// Validate and hand back the scheme ready for billing, with tiered
    /// rules already sorted.
    pub(crate) fn checked_scheme(&self) -> Result<CheckedScheme<'_>, PricingError> {
        if let Some(cap) = self.daily_max_fee {
            if cap < Decimal::ZERO {
                return Err(PricingError::configuration(
                    "daily_max_fee must not be negative",
                ));
            }
        }

        match &self.scheme {
            ChargeScheme::Fixed { hourly_rate } => {
                if *hourly_rate < Decimal::ZERO {
                    return Err(PricingError::configuration(
                        "hourly_rate must not be negative",
                    ));
                }
                Ok(CheckedScheme::Fixed(*hourly_rate))
            }
            ChargeScheme::Tiered { rules } => ordered_rules(rules).map(CheckedScheme::Tiered),
        }
    }
}

/// A scheme that passed validation.
pub(crate) enum CheckedScheme<'a> {
    Fixed(Decimal),
    Tiered(Vec<&'a TieredRule>),
}

/// Sort tiered rules by start minute and verify they tile `[0, ..)` without
/// overlaps or gaps, with at most one open-ended rule in last position.
fn ordered_rules(rules: &[TieredRule]) -> Result<Vec<&TieredRule>, PricingError> {
    if rules.is_empty() {
        return Err(PricingError::configuration(
            "tiered pricing requires at least one rule",
        ));
    }

    let mut ordered: Vec<&TieredRule> = rules.iter().collect();
    ordered.sort_by_key(|r| r.start_minutes);

    if ordered[0].start_minutes != 0 {
        return Err(PricingError::configuration(format!(
            "first rule must start at minute 0, found {}",
            ordered[0].start_minutes
        )));
    }

    let last = ordered.len() - 1;
    for (i, rule) in ordered.iter().enumerate() {
        if rule.rate_per_hour < Decimal::ZERO {
            return Err(PricingError::configuration(format!(
                "rule starting at minute {} has a negative rate",
                rule.start_minutes
            )));
        }

        match rule.end_minutes {
            Some(end) if end <= rule.start_minutes => {
                return Err(PricingError::configuration(format!(
                    "rule {}-{} ends before it starts",
                    rule.start_minutes, end
                )));
            }
            None if i != last => {
                return Err(PricingError::configuration(
                    "only the last rule may be open-ended",
                ));
            }
            _ => {}
        }

        if let (Some(end), Some(next)) = (rule.end_minutes, ordered.get(i + 1)) {
            if next.start_minutes < end {
                return Err(PricingError::configuration(format!(
                    "rules overlap: {}-{} and one starting at minute {}",
                    rule.start_minutes, end, next.start_minutes
                )));
            }
            if next.start_minutes > end {
                return Err(PricingError::configuration(format!(
                    "gap between minute {} and minute {}",
                    end, next.start_minutes
                )));
            }
        }
    }

    Ok(ordered)
}

/// Computed fee with display line items. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeeResult {
    /// Rounded to 2 decimal places, never negative.
    pub total_fee: Decimal,
    pub breakdown: Vec<String>,
}

impl FeeResult {
    pub fn free() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rule(start: u32, end: Option<u32>, rate: Decimal) -> TieredRule {
        TieredRule::new(start, end, rate)
    }

    #[test]
    fn charge_type_parses_case_insensitively() {
        assert_eq!("fixed".parse::<ChargeType>().unwrap(), ChargeType::Fixed);
        assert_eq!("Tiered".parse::<ChargeType>().unwrap(), ChargeType::Tiered);
        assert!("hourly".parse::<ChargeType>().is_err());
    }

    #[test]
    fn charge_type_display() {
        assert_eq!(ChargeType::Fixed.to_string(), "fixed");
        assert_eq!(ChargeType::Tiered.to_string(), "tiered");
    }

    #[test]
    fn charge_type_follows_scheme() {
        assert_eq!(PricingConfig::fixed(dec!(5)).charge_type(), ChargeType::Fixed);
        let tiered = PricingConfig::tiered(vec![rule(0, None, dec!(5))]);
        assert_eq!(tiered.charge_type(), ChargeType::Tiered);
    }

    #[test]
    fn unsorted_contiguous_rules_are_accepted() {
        let cfg = PricingConfig::tiered(vec![
            rule(120, None, dec!(10)),
            rule(0, Some(120), dec!(5)),
        ]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_tiered_rules_are_rejected() {
        let cfg = PricingConfig::tiered(vec![]);
        assert!(matches!(cfg.validate(), Err(PricingError::Configuration(_))));
    }

    #[test]
    fn overlapping_rules_are_rejected() {
        let cfg = PricingConfig::tiered(vec![
            rule(0, Some(60), dec!(5)),
            rule(30, Some(90), dec!(8)),
        ]);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn gapped_rules_are_rejected() {
        let cfg = PricingConfig::tiered(vec![
            rule(0, Some(60), dec!(5)),
            rule(90, None, dec!(8)),
        ]);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("gap"));
    }

    #[test]
    fn two_open_ended_rules_are_rejected() {
        let cfg = PricingConfig::tiered(vec![
            rule(0, None, dec!(5)),
            rule(120, None, dec!(10)),
        ]);
        assert!(matches!(cfg.validate(), Err(PricingError::Configuration(_))));
    }

    #[test]
    fn rule_not_starting_at_zero_is_rejected() {
        let cfg = PricingConfig::tiered(vec![rule(15, None, dec!(5))]);
        assert!(matches!(cfg.validate(), Err(PricingError::Configuration(_))));
    }

    #[test]
    fn inverted_rule_is_rejected() {
        let cfg = PricingConfig::tiered(vec![rule(0, Some(0), dec!(5))]);
        assert!(matches!(cfg.validate(), Err(PricingError::Configuration(_))));
    }

    #[test]
    fn negative_rates_and_caps_are_rejected() {
        assert!(PricingConfig::fixed(dec!(-1)).validate().is_err());
        assert!(PricingConfig::tiered(vec![rule(0, None, dec!(-0.5))])
            .validate()
            .is_err());
        assert!(PricingConfig::fixed(dec!(5))
            .with_daily_max_fee(Some(dec!(-10)))
            .validate()
            .is_err());
    }
}
