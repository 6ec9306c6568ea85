//! Calculator form state: the raw text fields, the display fields and the
//! rate-source note, with the calculate / clear / pre-fill actions.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::amortization::{compute_amortization, LoanInputs, LoanResult};
use crate::parse::{parse_amount, parse_term};
use crate::rates::ReferenceRate;
use crate::types::Money;

pub const DEFAULT_TERM: &str = "36";
pub const DEFAULT_RATE: &str = "0";
pub const PLACEHOLDER: &str = "-";

/// Editable input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Principal,
    DownPayment,
    Term,
    Rate,
    Fee,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Principal,
        Field::DownPayment,
        Field::Term,
        Field::Rate,
        Field::Fee,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Principal => "Monto del vehículo",
            Field::DownPayment => "Anticipo",
            Field::Term => "Plazo (meses)",
            Field::Rate => "TNA (%)",
            Field::Fee => "Gastos de otorgamiento (%)",
        }
    }
}

/// Read-only result fields as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFields {
    pub financed: String,
    pub monthly_payment: String,
    pub total_interest: String,
    pub total_payable: String,
    pub effective_rate: String,
}

impl DisplayFields {
    pub fn empty() -> Self {
        DisplayFields {
            financed: PLACEHOLDER.into(),
            monthly_payment: PLACEHOLDER.into(),
            total_interest: PLACEHOLDER.into(),
            total_payable: PLACEHOLDER.into(),
            effective_rate: PLACEHOLDER.into(),
        }
    }

    pub fn from_result(result: &LoanResult) -> Self {
        DisplayFields {
            financed: format_ars(result.financed_principal),
            monthly_payment: format_ars(result.monthly_payment),
            total_interest: format_ars(result.total_interest),
            total_payable: format_ars(result.total_payable),
            effective_rate: result.effective_rate_label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorForm {
    principal: String,
    down_payment: String,
    term: String,
    rate: String,
    fee: String,
    display: DisplayFields,
    rate_note: String,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        CalculatorForm {
            principal: String::new(),
            down_payment: String::new(),
            term: DEFAULT_TERM.into(),
            rate: DEFAULT_RATE.into(),
            fee: String::new(),
            display: DisplayFields::empty(),
            rate_note: String::new(),
        }
    }
}

impl CalculatorForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Principal => &self.principal,
            Field::DownPayment => &self.down_payment,
            Field::Term => &self.term,
            Field::Rate => &self.rate,
            Field::Fee => &self.fee,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Principal => &mut self.principal,
            Field::DownPayment => &mut self.down_payment,
            Field::Term => &mut self.term,
            Field::Rate => &mut self.rate,
            Field::Fee => &mut self.fee,
        };
        *slot = value.into();
    }

    pub fn display(&self) -> &DisplayFields {
        &self.display
    }

    pub fn rate_note(&self) -> &str {
        &self.rate_note
    }

    /// Current field text coerced into calculator inputs.
    pub fn inputs(&self) -> LoanInputs {
        LoanInputs {
            principal: parse_amount(&self.principal),
            down_payment: parse_amount(&self.down_payment),
            term_months: parse_term(&self.term),
            annual_rate_percent: parse_amount(&self.rate),
            origination_fee_percent: parse_amount(&self.fee),
        }
    }

    /// Compute from the current fields and refresh the display fields.
    pub fn calculate(&mut self) -> LoanResult {
        let result = compute_amortization(&self.inputs());
        self.display = DisplayFields::from_result(&result);
        result
    }

    /// Back to defaults: empty amounts, 36 months, 0% and no note.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Pre-fill the rate field from the start-up reference rate.
    pub fn apply_reference_rate(&mut self, rate: &ReferenceRate) {
        self.rate = if rate.is_live() {
            let shown = rate
                .value_percent
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.2}", shown)
        } else {
            rate.value_percent.normalize().to_string()
        };
        self.rate_note = rate.source.annotation().to_string();
    }

    /// Enter calculates; other keys are ignored. Every input field reacts
    /// the same way, so the caller only passes the key.
    pub fn handle_key(&mut self, key: &str) -> Option<LoanResult> {
        if key == "Enter" {
            Some(self.calculate())
        } else {
            None
        }
    }
}

/// es-AR currency presentation without decimals: `$ 1.234.568`.
pub fn format_ars(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let digits = digits.split('.').next().unwrap_or("0");

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < Decimal::ZERO {
        format!("-$ {grouped}")
    } else {
        format!("$ {grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_ars() {
        assert_eq!(format_ars(dec!(1_205_545.03)), "$ 1.205.545");
        assert_eq!(format_ars(dec!(100_462.5)), "$ 100.463");
        assert_eq!(format_ars(dec!(999)), "$ 999");
        assert_eq!(format_ars(Decimal::ZERO), "$ 0");
        assert_eq!(format_ars(dec!(-0.4)), "$ 0");
        assert_eq!(format_ars(dec!(-2500)), "-$ 2.500");
    }

    #[test]
    fn test_defaults() {
        let form = CalculatorForm::new();
        assert_eq!(form.value(Field::Term), "36");
        assert_eq!(form.value(Field::Rate), "0");
        assert_eq!(form.value(Field::Principal), "");
        assert_eq!(form.display(), &DisplayFields::empty());
        assert_eq!(form.rate_note(), "");
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut form = CalculatorForm::new();
        form.set(Field::Principal, "1000");
        assert!(form.handle_key("Tab").is_none());
        assert_eq!(form.display().monthly_payment, PLACEHOLDER);
    }
}
