use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::{LoanInputs, Normalized};
use crate::time_value::level_payment;
use crate::types::Money;
use crate::{CreditoError, CreditoResult};

/// Longest schedule that will be materialised (100 years of monthly rows).
pub const MAX_SCHEDULE_MONTHS: u32 = 1200;

/// One month of the repayment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Month-by-month split of the level payment into interest and principal.
///
/// Uses the same clamped inputs as the calculator. The last row absorbs
/// the residual so the closing balance is exactly zero.
pub fn amortization_schedule(inputs: &LoanInputs) -> CreditoResult<Vec<ScheduleRow>> {
    let n = Normalized::from_inputs(inputs);
    if n.term > MAX_SCHEDULE_MONTHS {
        return Err(CreditoError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Schedules are limited to {MAX_SCHEDULE_MONTHS} months."),
        });
    }

    let payment = level_payment(n.financed_principal, n.monthly_rate, n.term);
    let mut balance = n.financed_principal;
    let mut rows = Vec::with_capacity(n.term as usize);

    for period in 1..=n.term {
        let interest = balance
            .checked_mul(n.monthly_rate)
            .ok_or_else(|| out_of_range(period))?;
        let (row_payment, principal) = if period == n.term {
            let closing = balance
                .checked_add(interest)
                .ok_or_else(|| out_of_range(period))?;
            (closing, balance)
        } else {
            let principal = payment
                .checked_sub(interest)
                .ok_or_else(|| out_of_range(period))?;
            (payment, principal)
        };
        balance = balance
            .checked_sub(principal)
            .ok_or_else(|| out_of_range(period))?;

        rows.push(ScheduleRow {
            period,
            payment: row_payment,
            interest,
            principal,
            balance: if period == n.term { Decimal::ZERO } else { balance },
        });
    }

    Ok(rows)
}

fn out_of_range(period: u32) -> CreditoError {
    CreditoError::InvalidInput {
        field: "principal".into(),
        reason: format!("Schedule amounts leave the decimal range at month {period}."),
    }
}
