use credito_core::form::{CalculatorForm, DisplayFields, Field};
use credito_core::rates::ReferenceRate;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn filled() -> CalculatorForm {
    let mut form = CalculatorForm::new();
    form.set(Field::Principal, "1000000");
    form.set(Field::DownPayment, "");
    form.set(Field::Term, "12");
    form.set(Field::Rate, "36");
    form
}

#[test]
fn test_calculate_writes_display_fields() {
    let mut form = filled();
    let result = form.calculate();

    assert_eq!(result.financed_principal, dec!(1_000_000));
    assert_eq!(
        form.display(),
        &DisplayFields {
            financed: "$ 1.000.000".into(),
            monthly_payment: "$ 100.462".into(),
            total_interest: "$ 205.545".into(),
            total_payable: "$ 1.205.545".into(),
            effective_rate: "36.00%".into(),
        }
    );
}

#[test]
fn test_enter_key_calculates() {
    let mut form = filled();
    let result = form.handle_key("Enter");
    assert!(result.is_some());
    assert_eq!(form.display().monthly_payment, "$ 100.462");
}

#[test]
fn test_unparseable_fields_are_coerced() {
    let mut form = CalculatorForm::new();
    form.set(Field::Principal, "abc");
    form.set(Field::Term, "");
    form.set(Field::Rate, "doce");

    let inputs = form.inputs();
    assert_eq!(inputs.principal, dec!(0));
    assert_eq!(inputs.term_months, 1);
    assert_eq!(inputs.annual_rate_percent, dec!(0));

    form.calculate();
    assert_eq!(form.display().monthly_payment, "$ 0");
}

#[test]
fn test_rate_and_fee_at_decimal_limit_still_calculate() {
    let mut form = CalculatorForm::new();
    form.set(Field::Principal, "1000");
    form.set(Field::Rate, "79228162514264337593543950335");
    form.set(Field::Fee, "79228162514264337593543950335");

    let result = form.calculate();
    assert!(result.monthly_payment > dec!(0));
    assert_ne!(form.display().monthly_payment, "-");
    assert!(form.display().effective_rate.ends_with('%'));
}

#[test]
fn test_decimal_comma_rate_field() {
    let mut form = filled();
    form.set(Field::Rate, "36,5");
    form.calculate();
    assert_eq!(form.display().effective_rate, "36.50%");
}

#[test]
fn test_clear_resets_everything() {
    let mut form = filled();
    form.apply_reference_rate(&ReferenceRate::live(dec!(40), None, "series:7917"));
    form.calculate();

    form.clear();

    assert_eq!(form, CalculatorForm::new());
    assert_eq!(form.value(Field::Term), "36");
    assert_eq!(form.value(Field::Rate), "0");
    assert_eq!(form.display().total_payable, "-");
    assert_eq!(form.rate_note(), "");
}

#[test]
fn test_live_rate_prefills_two_decimals() {
    let mut form = CalculatorForm::new();
    let as_of = NaiveDate::from_ymd_opt(2024, 5, 10);
    form.apply_reference_rate(&ReferenceRate::live(dec!(40.456), as_of, "series:7917"));

    assert_eq!(form.value(Field::Rate), "40.46");
    assert_eq!(form.rate_note(), "(BCRA)");
}

#[test]
fn test_fallback_rate_prefills_constant() {
    let mut form = CalculatorForm::new();
    form.apply_reference_rate(&ReferenceRate::fallback(dec!(1)));

    assert_eq!(form.value(Field::Rate), "1");
    assert_eq!(form.rate_note(), "(sin conexión)");
}

#[test]
fn test_user_can_overwrite_prefilled_rate() {
    let mut form = filled();
    form.apply_reference_rate(&ReferenceRate::live(dec!(40), None, "series:7917"));
    form.set(Field::Rate, "0");
    form.set(Field::Term, "36");
    form.set(Field::Principal, "1000000");

    form.calculate();
    assert_eq!(form.display().monthly_payment, "$ 27.778");
    assert_eq!(form.display().total_interest, "$ 0");
}
