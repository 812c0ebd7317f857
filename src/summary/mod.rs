//! Turns a user's expense and savings records into summaries.
//!
//! Everything here is recomputed from the records on each request:
//! - records are filtered to one owner and a window of days,
//! - grouped and summed per category (and per day),
//! - expanded into zero-filled daily series for the charts,
//! - and checked against the savings for the month before a new expense is admitted.

mod aggregation;
mod budget;
mod filter;
mod handlers;
mod report;
mod series;

pub use aggregation::Totals;
pub use budget::{can_admit, check_expense_admission};
pub use handlers::{
    get_comparison, get_last_30_days, get_monthly_dashboard, get_today_summary, get_week_summary,
};
pub use report::{
    COMPARISON_DAYS, CategoryTotal, LAST_30_DAYS, MonthlySummary, TodaySummary, WEEK_DAYS,
    month_start, monthly_summary, today_summary, window_series,
};
pub use series::{CategorySeries, TimeSeries};
