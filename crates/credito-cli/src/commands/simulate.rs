use clap::Args;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

use credito_core::form::{CalculatorForm, Field};

use super::Context;

/// Typed at any prompt, these reset every field to its default.
const CLEAR_WORDS: [&str; 2] = ["clear", "limpiar"];

/// Arguments for the interactive simulator
#[derive(Args)]
pub struct SimulateArgs {
    /// Skip the reference-rate fetch and start from the default rate
    #[arg(long)]
    pub no_fetch: bool,
}

/// Prompts go to stderr so stdout only carries the result.
pub fn run_simulate(args: SimulateArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut form = CalculatorForm::new();
    if !args.no_fetch {
        eprintln!("Consultando TNA de referencia...");
        let rate = ctx.rate_provider().fetch_reference_rate(ctx.timeout_ms);
        form.apply_reference_rate(&rate);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stderr = io::stderr();

    let mut idx = 0;
    while idx < Field::ALL.len() {
        let field = Field::ALL[idx];
        write!(stderr, "{} [{}]: ", field.label(), form.value(field))?;
        stderr.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let entry = line.trim();

        if CLEAR_WORDS.iter().any(|w| entry.eq_ignore_ascii_case(w)) {
            form.clear();
            idx = 0;
            continue;
        }
        if !entry.is_empty() {
            form.set(field, entry);
        }
        idx += 1;
    }

    let result = form.calculate();
    if !form.rate_note().is_empty() {
        eprintln!("TNA {}", form.rate_note());
    }

    Ok(json!({
        "result": form.display(),
        "inputs": form.inputs(),
        "rate_note": form.rate_note(),
        "exact": result,
    }))
}
