use napi::Result as NapiResult;
use napi_derive::napi;

use credito_core::amortization::{self, LoanInputs};
use credito_core::rates::config::ProviderConfig;
use credito_core::rates::RateProvider;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan calculation
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_amortization(input_json: String) -> NapiResult<String> {
    let input: LoanInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_loan(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = amortization::amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reference rate
// ---------------------------------------------------------------------------

/// Blocks the calling thread for at most the timeout. `config_json` is an
/// optional provider configuration; defaults apply when omitted.
#[napi]
pub fn fetch_reference_rate(timeout_ms: Option<u32>, config_json: Option<String>) -> NapiResult<String> {
    let config: ProviderConfig = match config_json {
        Some(raw) => serde_json::from_str(&raw).map_err(to_napi_error)?,
        None => ProviderConfig::default(),
    };
    config.validate().map_err(to_napi_error)?;

    let rate = RateProvider::new(config).fetch_reference_rate(timeout_ms.map(u64::from));
    serde_json::to_string(&rate).map_err(to_napi_error)
}
