pub mod calculator;
pub mod schedule;

pub use calculator::{calculate_loan, compute_amortization, LoanInputs, LoanResult};
pub use schedule::{amortization_schedule, ScheduleRow, MAX_SCHEDULE_MONTHS};
