//! The summaries served to the dashboard: today, rolling windows of days, and the month.

use serde::Serialize;
use time::Date;

use crate::{
    auth::UserID,
    date_key::{DateKey, month_bounds, window_keys},
    expense::{Category, Expense},
    savings::Savings,
    summary::{
        aggregation::aggregate_by_category,
        filter::{filter_by_owner_and_keys, filter_by_owner_and_range, sum_amounts},
        series::{TimeSeries, build_series},
    },
};

/// The number of days in the comparison chart.
pub const COMPARISON_DAYS: u16 = 3;
/// The number of days in the weekly chart.
pub const WEEK_DAYS: u16 = 7;
/// The number of days in the 30-day chart.
pub const LAST_30_DAYS: u16 = 30;

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: Category,
    pub total_amount: f64,
}

/// How much the user has spent today, per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub username: String,
    pub total_amount: f64,
    pub per_category: Vec<CategoryTotal>,
}

/// Expense and savings totals for the calendar month containing today.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_expenses: f64,
    pub total_savings: f64,
}

/// Summarise what `owner_id` spent on `today`.
pub fn today_summary(
    username: &str,
    expenses: &[Expense],
    owner_id: UserID,
    today: Date,
) -> TodaySummary {
    let today_keys = window_keys(today, 1).key_set();
    let totals = aggregate_by_category(filter_by_owner_and_keys(expenses, owner_id, &today_keys));

    TodaySummary {
        username: username.to_owned(),
        total_amount: totals.total(),
        per_category: totals
            .iter()
            .map(|(category, total_amount)| CategoryTotal {
                category: category.clone(),
                total_amount,
            })
            .collect(),
    }
}

/// Daily spending per category over the `length_in_days` days ending on `today`.
pub fn window_series(
    expenses: &[Expense],
    owner_id: UserID,
    today: Date,
    length_in_days: u16,
) -> TimeSeries {
    let window = window_keys(today, length_in_days);
    let in_window = filter_by_owner_and_keys(expenses, owner_id, &window.key_set());

    build_series(in_window, &window.into_chronological())
}

/// Total expenses and savings of `owner_id` in the month containing `today`.
pub fn monthly_summary(
    expenses: &[Expense],
    savings: &[Savings],
    owner_id: UserID,
    today: Date,
) -> MonthlySummary {
    let month = month_bounds(today);

    MonthlySummary {
        total_expenses: sum_amounts(filter_by_owner_and_range(expenses, owner_id, &month)),
        total_savings: sum_amounts(filter_by_owner_and_range(savings, owner_id, &month)),
    }
}

/// The first day of the month containing `today`, for display.
pub fn month_start(today: Date) -> DateKey {
    month_bounds(today).start
}

#[cfg(test)]
mod report_tests {
    use time::macros::date;

    use crate::{
        auth::UserID,
        date_key::DateKey,
        expense::{Category, Expense},
        savings::Savings,
        summary::report::{
            CategoryTotal, MonthlySummary, monthly_summary, today_summary, window_series,
        },
    };

    fn expense(owner: i64, amount: f64, category: Category, date: time::Date) -> Expense {
        Expense {
            id: 1,
            owner_id: UserID::new(owner),
            name: "thing".to_owned(),
            amount,
            category,
            date: DateKey::new(date),
        }
    }

    fn savings(owner: i64, amount: f64, date: time::Date) -> Savings {
        Savings {
            id: 1,
            owner_id: UserID::new(owner),
            amount,
            date: DateKey::new(date),
        }
    }

    #[test]
    fn today_groups_by_category() {
        let today = date!(2024 - 03 - 02);
        let expenses = [
            expense(1, 4.5, Category::Food, today),
            expense(1, 2.0, Category::Transport, today),
            expense(1, 1.5, Category::Food, today),
            expense(1, 100.0, Category::Food, date!(2024 - 03 - 01)),
            expense(2, 100.0, Category::Food, today),
        ];

        let summary = today_summary("alice", &expenses, UserID::new(1), today);

        assert_eq!(summary.username, "alice");
        assert_eq!(summary.total_amount, 8.0);
        assert_eq!(
            summary.per_category,
            [
                CategoryTotal {
                    category: Category::Food,
                    total_amount: 6.0
                },
                CategoryTotal {
                    category: Category::Transport,
                    total_amount: 2.0
                },
            ]
        );
    }

    #[test]
    fn today_with_no_expenses_is_zero() {
        let summary = today_summary("alice", &[], UserID::new(1), date!(2024 - 03 - 02));

        assert_eq!(summary.total_amount, 0.0);
        assert!(summary.per_category.is_empty());
    }

    #[test]
    fn today_summary_uses_camel_case() {
        let today = date!(2024 - 03 - 02);
        let expenses = [expense(1, 4.5, Category::Food, today)];

        let summary = today_summary("alice", &expenses, UserID::new(1), today);

        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({
                "username": "alice",
                "totalAmount": 4.5,
                "perCategory": [{"category": "Food", "totalAmount": 4.5}],
            })
        );
    }

    #[test]
    fn window_series_excludes_other_owners() {
        let today = date!(2024 - 03 - 02);
        let expenses = [
            expense(1, 3.0, Category::Food, today),
            expense(2, 9.0, Category::Bills, today),
        ];

        let series = window_series(&expenses, UserID::new(1), today, 7);

        assert_eq!(series.days.len(), 7);
        assert_eq!(series.days.last(), Some(&DateKey::new(today)));
        assert_eq!(series.series.len(), 1);
        assert_eq!(series.series[0].label, "Food");
    }

    #[test]
    fn month_totals_only_count_this_month() {
        let today = date!(2024 - 02 - 15);
        let expenses = [
            expense(1, 10.0, Category::Food, date!(2024 - 01 - 31)),
            expense(1, 20.0, Category::Food, date!(2024 - 02 - 01)),
            expense(1, 30.0, Category::Food, date!(2024 - 02 - 29)),
            expense(1, 40.0, Category::Food, date!(2024 - 03 - 01)),
        ];
        let savings = [
            savings(1, 500.0, date!(2024 - 02 - 10)),
            savings(1, 700.0, date!(2023 - 02 - 10)),
            savings(2, 900.0, date!(2024 - 02 - 10)),
        ];

        let summary = monthly_summary(&expenses, &savings, UserID::new(1), today);

        assert_eq!(
            summary,
            MonthlySummary {
                total_expenses: 50.0,
                total_savings: 500.0
            }
        );
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({"totalExpenses": 50.0, "totalSavings": 500.0})
        );
    }

    #[test]
    fn month_totals_are_zero_without_records() {
        let summary = monthly_summary(&[], &[], UserID::new(1), date!(2024 - 12 - 31));

        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.total_savings, 0.0);
    }
}
