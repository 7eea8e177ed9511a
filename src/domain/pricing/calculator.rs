//! Parking fee calculator
//!
//! Pure and synchronous: no I/O, no shared state. Safe to call from any
//! number of tasks at once.

use rust_decimal::Decimal;
use tracing::debug;

use super::error::PricingError;
use super::model::{CheckedScheme, FeeResult, PricingConfig, TieredRule};
use crate::shared::money::{format_yuan, round_money};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * 60;

pub struct FeeCalculator;

impl FeeCalculator {
    /// Compute the fee for `duration_minutes` of parking under `config`.
    ///
    /// Free minutes are taken off first. Fixed pricing bills every commenced
    /// hour; tiered pricing prorates each bracket by the minute. The daily cap
    /// is applied per commenced 24-hour period of billable time and the total
    /// is rounded half-up to 2 decimal places. A fee too large for `Decimal`
    /// is reported as invalid input.
    pub fn calculate(
        duration_minutes: i64,
        config: &PricingConfig,
    ) -> Result<FeeResult, PricingError> {
        if duration_minutes < 0 {
            return Err(PricingError::invalid_input(format!(
                "duration_minutes must not be negative, got {}",
                duration_minutes
            )));
        }
        let scheme = config.checked_scheme()?;

        let billable = (duration_minutes - i64::from(config.free_minutes)).max(0);
        if billable == 0 {
            return Ok(FeeResult::free());
        }

        let (mut total, mut breakdown) = match scheme {
            CheckedScheme::Fixed(hourly_rate) => fixed_fee(billable, hourly_rate)?,
            CheckedScheme::Tiered(rules) => tiered_fee(billable, &rules)?,
        };

        if let Some(cap) = config.daily_max_fee {
            let days = commenced(billable, MINUTES_PER_DAY);
            // A limit past Decimal::MAX cannot bind.
            let limit = cap.checked_mul(Decimal::from(days)).unwrap_or(Decimal::MAX);
            if total > limit {
                let reduction = total - limit;
                breakdown.push(if days > 1 {
                    format!(
                        "每日上限 {} × {}天 已应用: -{}",
                        format_yuan(cap),
                        days,
                        format_yuan(reduction)
                    )
                } else {
                    format!(
                        "每日上限 {} 已应用: -{}",
                        format_yuan(cap),
                        format_yuan(reduction)
                    )
                });
                total = limit;
            }
        }

        let total_fee = round_money(total);
        debug!(
            duration_minutes,
            billable,
            charge_type = %config.charge_type(),
            total_fee = %total_fee,
            "Fee calculated"
        );

        Ok(FeeResult {
            total_fee,
            breakdown,
        })
    }
}

/// Number of started `unit`s in `minutes`. `minutes` is non-negative.
fn commenced(minutes: i64, unit: i64) -> i64 {
    minutes / unit + i64::from(minutes % unit != 0)
}

fn out_of_range() -> PricingError {
    PricingError::invalid_input("fee exceeds the representable range")
}

fn fixed_fee(billable: i64, hourly_rate: Decimal) -> Result<(Decimal, Vec<String>), PricingError> {
    let hours = commenced(billable, MINUTES_PER_HOUR);
    let total = Decimal::from(hours)
        .checked_mul(hourly_rate)
        .ok_or_else(out_of_range)?;
    let line = format!(
        "{} 分钟, 按 {} 小时计费: {}",
        billable,
        hours,
        format_yuan(total)
    );
    Ok((total, vec![line]))
}

fn tiered_fee(
    billable: i64,
    rules: &[&TieredRule],
) -> Result<(Decimal, Vec<String>), PricingError> {
    let mut total = Decimal::ZERO;
    let mut breakdown = Vec::new();
    let mut covered = 0i64;

    for rule in rules {
        let start = i64::from(rule.start_minutes);
        if start >= billable {
            break;
        }
        let end = rule.end_minutes.map(i64::from).unwrap_or(i64::MAX);
        let upper = end.min(billable);
        let overlap = upper - start;

        let amount = Decimal::from(overlap)
            .checked_mul(rule.rate_per_hour)
            .and_then(|v| v.checked_div(Decimal::from(MINUTES_PER_HOUR)))
            .ok_or_else(out_of_range)?;
        total = total.checked_add(amount).ok_or_else(out_of_range)?;
        breakdown.push(format!("{}–{}分钟: {}", start, upper, format_yuan(amount)));
        covered = upper;
    }

    if covered < billable {
        return Err(PricingError::configuration(format!(
            "no rule covers minute {}",
            covered
        )));
    }

    Ok((total, breakdown))
}
