use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);
const ONE_HUNDRED: Decimal = dec!(100);

/// Monthly periodic rate from a nominal annual percentage (36 -> 0.03).
pub fn monthly_rate(annual_percent: Percent) -> Rate {
    annual_percent / ONE_HUNDRED / MONTHS_PER_YEAR
}

/// Apply a percentage to an amount (base × pct / 100).
pub fn percent_of(base: Money, pct: Percent) -> Money {
    base.saturating_mul(pct) / ONE_HUNDRED
}

/// Discount factor `(1 + r)^-n`.
///
/// When `(1 + r)^n` leaves the 128-bit decimal range the factor is
/// reported as zero, which is the value it tends to.
pub fn discount_factor(rate: Rate, periods: u32) -> Decimal {
    match (Decimal::ONE + rate).checked_powi(i64::from(periods)) {
        Some(growth) if !growth.is_zero() => Decimal::ONE
            .checked_div(growth)
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Level payment that amortises `principal` over `periods` at `rate` per period.
///
/// `P·r / (1 − (1 + r)^−n)`, or `P / n` when the rate is zero. A period
/// count of zero is treated as one.
pub fn level_payment(principal: Money, rate: Rate, periods: u32) -> Money {
    let n = periods.max(1);
    if rate.is_zero() {
        return principal / Decimal::from(n);
    }

    let annuity = Decimal::ONE - discount_factor(rate, n);
    if annuity <= Decimal::ZERO {
        // Rate too small to register against 1 at 28 digits
        return principal / Decimal::from(n);
    }

    principal
        .saturating_mul(rate)
        .checked_div(annuity)
        .unwrap_or(Decimal::MAX)
}
