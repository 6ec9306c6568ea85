use serde_json::Value;

use super::scalar_text;

/// Fields worth printing on their own, most important first.
const PRIORITY_KEYS: [&str; 4] = [
    "monthly_payment",
    "value_percent",
    "total_payable",
    "financed_principal",
];

/// Print just the key answer value from the output: the monthly payment
/// for loans, the rate for `rate`, else the first result field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result").or_else(|| m.get("summary")))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", scalar_text(val, "null"));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val, "null"));
            return;
        }
    }

    println!("{}", scalar_text(result_obj, "null"));
}
