use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use credito_core::types::with_metadata;

use super::Context;

/// Arguments for reference-rate acquisition
#[derive(Args)]
pub struct RateArgs {
    /// Rate to report when no source answers (overrides the config file)
    #[arg(long)]
    pub fallback: Option<Decimal>,
}

pub fn run_rate(args: RateArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut config = ctx.provider.clone();
    if let Some(fallback) = args.fallback {
        if fallback < Decimal::ZERO {
            return Err("--fallback cannot be negative".into());
        }
        config.fallback_rate_percent = fallback;
    }
    let timeout = config.timeout(ctx.timeout_ms);
    let fallback = config.fallback_rate_percent;
    let source_count = config.sources.len();

    let start = Instant::now();
    let rate = credito_core::rates::RateProvider::new(config).fetch_reference_rate(ctx.timeout_ms);
    let elapsed = start.elapsed().as_micros() as u64;

    let mut warnings = Vec::new();
    if !rate.is_live() {
        warnings.push(format!("No source answered; reporting fallback {fallback}%."));
    }
    let assumptions = serde_json::json!({
        "timeout_ms": timeout.as_millis() as u64,
        "fallback_rate_percent": fallback,
        "sources_tried_in_order": source_count,
    });

    let output = with_metadata(
        "Reference TNA, first usable value from an ordered source chain",
        &assumptions,
        warnings,
        elapsed,
        rate,
    );
    Ok(serde_json::to_value(&output)?)
}
