use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::{level_payment, monthly_rate, percent_of};
use crate::types::*;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Loan request as typed into the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    pub principal: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub term_months: i64,
    #[serde(default)]
    pub annual_rate_percent: Percent,
    #[serde(default)]
    pub origination_fee_percent: Percent,
}

/// Fixed-payment plan derived from [`LoanInputs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub financed_principal: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub effective_rate_label: String,
}

impl LoanResult {
    /// Monetary fields rounded to whole currency units for presentation.
    pub fn rounded(&self) -> LoanResult {
        LoanResult {
            financed_principal: round_currency(self.financed_principal),
            monthly_payment: round_currency(self.monthly_payment),
            total_interest: round_currency(self.total_interest),
            total_payable: round_currency(self.total_payable),
            effective_rate_label: self.effective_rate_label.clone(),
        }
    }
}

/// Inputs after clamping: what the formula actually runs on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Normalized {
    pub financed_principal: Money,
    pub monthly_rate: Rate,
    pub term: u32,
    pub annual_rate_percent: Percent,
    pub fee_percent: Percent,
}

impl Normalized {
    pub(crate) fn from_inputs(inputs: &LoanInputs) -> Self {
        let principal = inputs.principal.max(Decimal::ZERO);
        let down_payment = inputs.down_payment.max(Decimal::ZERO);
        let annual_rate_percent = inputs.annual_rate_percent.max(Decimal::ZERO);
        let fee_percent = inputs.origination_fee_percent.max(Decimal::ZERO);

        let financed_base = (principal - down_payment).max(Decimal::ZERO);
        let fee = percent_of(financed_base, fee_percent);

        Normalized {
            financed_principal: financed_base.saturating_add(fee),
            monthly_rate: monthly_rate(annual_rate_percent),
            term: clamp_term(inputs.term_months),
            annual_rate_percent,
            fee_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fixed-rate amortization of a loan. Never fails: negative amounts and
/// rates are read as zero and terms below one month as one month.
pub fn compute_amortization(inputs: &LoanInputs) -> LoanResult {
    let n = Normalized::from_inputs(inputs);

    let monthly_payment = level_payment(n.financed_principal, n.monthly_rate, n.term);

    let (total_payable, total_interest) = if n.monthly_rate.is_zero() {
        (n.financed_principal, Decimal::ZERO)
    } else {
        let total = monthly_payment.saturating_mul(Decimal::from(n.term));
        (total, total - n.financed_principal)
    };

    LoanResult {
        financed_principal: n.financed_principal,
        monthly_payment,
        total_interest,
        total_payable,
        effective_rate_label: format_percent(n.annual_rate_percent.saturating_add(n.fee_percent)),
    }
}

/// [`compute_amortization`] wrapped in the standard output envelope, with a
/// warning for every input that had to be coerced.
pub fn calculate_loan(inputs: &LoanInputs) -> ComputationOutput<LoanResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if inputs.principal < Decimal::ZERO {
        warnings.push("Principal is negative; treated as zero.".into());
    }
    if inputs.down_payment < Decimal::ZERO {
        warnings.push("Down payment is negative; treated as zero.".into());
    }
    if inputs.annual_rate_percent < Decimal::ZERO {
        warnings.push("Annual rate is negative; treated as zero.".into());
    }
    if inputs.origination_fee_percent < Decimal::ZERO {
        warnings.push("Origination fee is negative; treated as zero.".into());
    }
    if inputs.term_months < 1 {
        warnings.push(format!(
            "Term of {} months is not positive; using 1 month.",
            inputs.term_months
        ));
    }
    if inputs.down_payment >= inputs.principal && inputs.principal > Decimal::ZERO {
        warnings.push("Down payment covers the principal; nothing is financed.".into());
    }

    let result = compute_amortization(inputs);

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "payment_frequency": "monthly",
        "rate_convention": "nominal annual / 12",
        "fee_model": "origination fee capitalised into the financed principal",
        "display_rounding": "whole currency units"
    });

    with_metadata(
        "Fixed-rate annuity (French amortization)",
        &assumptions,
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn clamp_term(term_months: i64) -> u32 {
    term_months.clamp(1, i64::from(u32::MAX)) as u32
}

pub(crate) fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `36` -> `"36.00%"`
pub fn format_percent(pct: Percent) -> String {
    let rounded = pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}%", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn inputs(principal: Decimal, down: Decimal, term: i64, rate: Decimal) -> LoanInputs {
        LoanInputs {
            principal,
            down_payment: down,
            term_months: term,
            annual_rate_percent: rate,
            origination_fee_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(36)), "36.00%");
        assert_eq!(format_percent(dec!(38.505)), "38.51%");
        assert_eq!(format_percent(Decimal::ZERO), "0.00%");
    }

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(dec!(100462.5)), dec!(100463));
        assert_eq!(round_currency(dec!(100462.49)), dec!(100462));
    }

    #[test]
    fn test_clamp_term() {
        assert_eq!(clamp_term(0), 1);
        assert_eq!(clamp_term(-12), 1);
        assert_eq!(clamp_term(36), 36);
        assert_eq!(clamp_term(i64::MAX), u32::MAX);
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let r = compute_amortization(&inputs(dec!(-1000), dec!(-50), 12, dec!(-5)));
        assert_eq!(r.financed_principal, Decimal::ZERO);
        assert_eq!(r.monthly_payment, Decimal::ZERO);
        assert_eq!(r.effective_rate_label, "0.00%");
    }

    #[test]
    fn test_calculate_loan_warnings() {
        let out = calculate_loan(&inputs(dec!(500_000), dec!(500_000), 0, dec!(40)));
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings.iter().any(|w| w.contains("nothing is financed")));
        assert!(out.warnings.iter().any(|w| w.contains("using 1 month")));
    }

    #[test]
    fn test_rounded_keeps_label() {
        let r = compute_amortization(&inputs(dec!(1_000_000), Decimal::ZERO, 12, dec!(36)));
        let shown = r.rounded();
        assert_eq!(shown.monthly_payment, dec!(100462));
        assert_eq!(shown.effective_rate_label, "36.00%");
    }

    #[test]
    fn test_rate_and_fee_at_decimal_max_do_not_overflow() {
        let mut i = inputs(dec!(1000), Decimal::ZERO, 12, Decimal::MAX);
        i.origination_fee_percent = Decimal::MAX;
        let r = compute_amortization(&i);
        assert_eq!(r.effective_rate_label, format_percent(Decimal::MAX));
        assert!(r.monthly_payment > Decimal::ZERO);
    }
}
