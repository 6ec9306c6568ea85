use clap::Args;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{json, Value};

use credito_core::amortization::{self, LoanInputs, ScheduleRow};
use credito_core::rates::ReferenceRate;

use super::Context;
use crate::input;

const DEFAULT_TERM_MONTHS: i64 = 36;

/// Arguments shared by loan calculations
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle price
    #[arg(long, alias = "monto")]
    pub principal: Option<Decimal>,

    /// Down payment
    #[arg(long, alias = "anticipo")]
    pub down_payment: Option<Decimal>,

    /// Term in months (default 36)
    #[arg(long, alias = "plazo")]
    pub term: Option<i64>,

    /// Nominal annual rate in percent (TNA)
    #[arg(long, alias = "tasa")]
    pub rate: Option<Decimal>,

    /// Origination fee in percent of the financed amount
    #[arg(long)]
    pub fee: Option<Decimal>,

    /// Fetch the reference rate when --rate is not given
    #[arg(long)]
    pub fetch_rate: bool,

    /// Keep full precision instead of whole currency units
    #[arg(long)]
    pub precise: bool,
}

pub fn run_calc(args: LoanArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let (inputs, reference) = resolve_inputs(&args, ctx)?;

    let mut output = amortization::calculate_loan(&inputs);
    if !args.precise {
        output.result = output.result.rounded();
    }
    if let Some(rate) = reference.as_ref().filter(|r| !r.is_live()) {
        output.warnings.push(format!(
            "Reference rate unavailable; using fallback {}%.",
            rate.value_percent
        ));
    }

    let mut value = serde_json::to_value(&output)?;
    if let Some(rate) = reference {
        value["reference_rate"] = serde_json::to_value(&rate)?;
    }
    Ok(value)
}

pub fn run_schedule(args: LoanArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let (inputs, reference) = resolve_inputs(&args, ctx)?;

    let mut summary = amortization::compute_amortization(&inputs);
    let mut rows = amortization::amortization_schedule(&inputs)?;
    if !args.precise {
        summary = summary.rounded();
        rows = rows.iter().map(round_row).collect();
    }

    let mut value = json!({
        "results": rows,
        "summary": summary,
        "inputs": inputs,
    });
    if let Some(rate) = reference {
        value["reference_rate"] = serde_json::to_value(&rate)?;
    }
    Ok(value)
}

/// Inputs from --input, piped JSON, or flags (in that order).
fn resolve_inputs(
    args: &LoanArgs,
    ctx: &Context,
) -> Result<(LoanInputs, Option<ReferenceRate>), Box<dyn std::error::Error>> {
    let mut inputs: LoanInputs = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        LoanInputs {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            down_payment: args.down_payment.unwrap_or(Decimal::ZERO),
            term_months: args.term.unwrap_or(DEFAULT_TERM_MONTHS),
            annual_rate_percent: args.rate.unwrap_or(Decimal::ZERO),
            origination_fee_percent: args.fee.unwrap_or(Decimal::ZERO),
        }
    };

    let mut reference = None;
    if args.fetch_rate && args.rate.is_none() {
        let rate = ctx.rate_provider().fetch_reference_rate(ctx.timeout_ms);
        inputs.annual_rate_percent = rate.value_percent;
        reference = Some(rate);
    }

    Ok((inputs, reference))
}

fn round_row(row: &ScheduleRow) -> ScheduleRow {
    let whole = |d: Decimal| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    ScheduleRow {
        period: row.period,
        payment: whole(row.payment),
        interest: whole(row.interest),
        principal: whole(row.principal),
        balance: whole(row.balance),
    }
}
