//! Decides whether a new expense fits within the savings for the month.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    auth::UserID,
    date_key::month_bounds,
    expense::list_expenses,
    savings::list_savings,
    summary::filter::{filter_by_owner_and_range, sum_amounts},
};

/// Whether an expense of `proposed_amount` may be recorded.
///
/// The expense is refused when `existing_expense_total + proposed_amount`
/// exceeds `period_savings_total`. Amounts are compared in whole cents so
/// that float rounding cannot refuse an expense that exactly meets the ceiling.
pub fn can_admit(
    proposed_amount: f64,
    existing_expense_total: f64,
    period_savings_total: f64,
) -> bool {
    to_cents(existing_expense_total + proposed_amount) <= to_cents(period_savings_total)
}

/// Rounded to whole cents but kept as a float, so huge amounts do not saturate.
fn to_cents(amount: f64) -> f64 {
    (amount * 100.0).round()
}

/// The outcome of checking a proposed expense against the savings ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    /// The expense fits.
    Admitted,
    /// The expense would push total expenses past the ceiling.
    Rejected {
        /// Total expenses including the proposed expense.
        projected_total: f64,
        /// The savings the expenses were checked against.
        ceiling: f64,
    },
}

impl Admission {
    /// Check `proposed_amount` against the given totals.
    pub fn check(
        proposed_amount: f64,
        existing_expense_total: f64,
        period_savings_total: f64,
    ) -> Self {
        if can_admit(proposed_amount, existing_expense_total, period_savings_total) {
            Admission::Admitted
        } else {
            Admission::Rejected {
                projected_total: existing_expense_total + proposed_amount,
                ceiling: period_savings_total,
            }
        }
    }

    /// Turn a rejection into [Error::BudgetExceeded].
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Admission::Admitted => Ok(()),
            Admission::Rejected {
                projected_total,
                ceiling,
            } => Err(Error::BudgetExceeded {
                projected_total,
                ceiling,
            }),
        }
    }
}

/// Check a proposed expense of `owner_id` against the store.
///
/// All of the owner's expenses, whatever their date, are compared with the
/// savings recorded in the calendar month containing `today`.
///
/// # Errors
/// Returns [Error::SqlError] if the records cannot be read.
pub fn check_expense_admission(
    owner_id: UserID,
    proposed_amount: f64,
    today: Date,
    connection: &Connection,
) -> Result<Admission, Error> {
    let expenses = list_expenses(owner_id, connection)?;
    let savings = list_savings(owner_id, connection)?;

    let existing_expense_total = sum_amounts(&expenses);
    let period_savings_total = sum_amounts(filter_by_owner_and_range(
        &savings,
        owner_id,
        &month_bounds(today),
    ));

    Ok(Admission::check(
        proposed_amount,
        existing_expense_total,
        period_savings_total,
    ))
}
