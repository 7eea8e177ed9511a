//! Parking stay and concessions

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::pricing::{FeeResult, PricingError};
use crate::shared::money::{format_yuan, round_money};

/// Reduction granted to a vehicle (VIP, staff, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concession {
    #[default]
    None,
    /// Parks for free
    Free,
    /// Fraction of the fee waived, in `[0, 1]`. 0.5 is half price.
    Discount(Decimal),
}

impl Concession {
    pub fn discount(rate: Decimal) -> Result<Self, PricingError> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(PricingError::invalid_input(format!(
                "discount rate must be within [0, 1], got {}",
                rate
            )));
        }
        Ok(Self::Discount(rate))
    }

    /// Apply to a computed fee, adding a breakdown line when it changes
    /// anything.
    pub fn apply(&self, mut result: FeeResult) -> FeeResult {
        match *self {
            Concession::None => result,
            Concession::Free => FeeResult {
                total_fee: Decimal::ZERO,
                breakdown: vec!["免费车辆".to_string()],
            },
            Concession::Discount(rate) => {
                if rate.is_zero() || result.total_fee.is_zero() {
                    return result;
                }
                let discounted = round_money(result.total_fee * (Decimal::ONE - rate));
                let reduction = result.total_fee - discounted;
                result.breakdown.push(format!(
                    "优惠 {}%: -{}",
                    (rate * Decimal::from(100)).normalize(),
                    format_yuan(reduction)
                ));
                result.total_fee = discounted;
                result
            }
        }
    }
}

/// One vehicle's time in a lot
#[derive(Debug, Clone)]
pub struct ParkingStay {
    pub entry_time: DateTime<Utc>,
    /// `None` while the vehicle is still parked
    pub exit_time: Option<DateTime<Utc>>,
    pub concession: Concession,
}

impl ParkingStay {
    /// Whole elapsed minutes, measured to `now` for an open stay.
    pub fn duration_minutes(&self, now: DateTime<Utc>) -> Result<i64, PricingError> {
        let end = self.exit_time.unwrap_or(now);
        let elapsed = end - self.entry_time;
        if elapsed < chrono::Duration::zero() {
            return Err(PricingError::invalid_input(
                "exit time is before entry time",
            ));
        }
        Ok(elapsed.num_seconds() / 60)
    }
}
