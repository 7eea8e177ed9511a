//! Money helpers (CNY, 2 decimal places)

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format as `¥12.30`.
pub fn format_yuan(amount: Decimal) -> String {
    format!("¥{:.2}", round_money(amount))
}
