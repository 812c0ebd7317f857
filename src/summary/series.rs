//! Expands category totals into per-day series for bar charts.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    date_key::{Chronological, DateKey},
    summary::{
        aggregation::{aggregate_by_category, aggregate_by_category_and_date},
        filter::CategorisedRecord,
    },
};

/// Daily totals for one category, aligned with [TimeSeries::days].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySeries {
    /// The category name.
    pub label: String,
    /// `values[i]` is the amount spent in this category on `days[i]`.
    pub values: Vec<f64>,
    /// The colour to draw this category with.
    pub color: String,
}

impl CategorySeries {
    /// The sum over every day in the window.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Chart-ready daily totals per category over a window of days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    /// The days of the window, oldest first.
    pub days: Vec<DateKey>,
    /// One entry per category seen in the window, in first-seen order.
    pub series: Vec<CategorySeries>,
}

/// Build zero-filled daily series per category over `days`.
///
/// Records dated outside `days` are ignored. Categories appear in the order
/// they are first seen among the remaining records.
pub fn build_series<R: CategorisedRecord>(
    records: impl IntoIterator<Item = R>,
    days: &Chronological,
) -> TimeSeries {
    let day_set: HashSet<DateKey> = days.key_set();
    let in_window: Vec<R> = records
        .into_iter()
        .filter(|record| day_set.contains(&record.date()))
        .collect();

    let categories = aggregate_by_category(in_window.iter());
    let daily_totals = aggregate_by_category_and_date(in_window.iter());

    let series = categories
        .keys()
        .map(|category| CategorySeries {
            label: category.to_string(),
            values: days
                .keys()
                .iter()
                .map(|day| daily_totals.get(&(category.clone(), *day)))
                .collect(),
            color: category.color().to_owned(),
        })
        .collect();

    TimeSeries {
        days: days.keys().to_vec(),
        series,
    }
}

#[cfg(test)]
mod series_tests {
    use time::macros::date;

    use crate::{
        auth::UserID,
        date_key::{Chronological, DateKey, window_keys},
        expense::{Category, Expense},
        summary::{
            aggregation::aggregate_by_category,
            filter::filter_by_owner_and_keys,
            series::{TimeSeries, build_series},
        },
    };

    fn expense(amount: f64, category: Category, date: time::Date) -> Expense {
        Expense {
            id: 1,
            owner_id: UserID::new(1),
            name: "thing".to_owned(),
            amount,
            category,
            date: DateKey::new(date),
        }
    }

    #[test]
    fn three_day_window_over_leap_day() {
        let records = vec![
            expense(10.0, Category::Food, date!(2024 - 03 - 01)),
            expense(5.0, Category::Food, date!(2024 - 03 - 02)),
            expense(20.0, Category::Transport, date!(2024 - 03 - 02)),
        ];
        let days = window_keys(date!(2024 - 03 - 02), 3).into_chronological();

        let series = build_series(&records, &days);

        let day_labels: Vec<String> = series.days.iter().map(ToString::to_string).collect();
        assert_eq!(day_labels, ["29-02-2024", "01-03-2024", "02-03-2024"]);
        assert_eq!(series.series.len(), 2);
        assert_eq!(series.series[0].label, "Food");
        assert_eq!(series.series[0].values, [0.0, 10.0, 5.0]);
        assert_eq!(series.series[1].label, "Transport");
        assert_eq!(series.series[1].values, [0.0, 0.0, 20.0]);
    }

    #[test]
    fn records_outside_window_are_ignored() {
        let records = vec![
            expense(10.0, Category::Food, date!(2024 - 02 - 01)),
            expense(3.0, Category::Bills, date!(2024 - 03 - 02)),
        ];
        let days = window_keys(date!(2024 - 03 - 02), 3).into_chronological();

        let series = build_series(&records, &days);

        assert_eq!(series.series.len(), 1);
        assert_eq!(series.series[0].label, "Bills");
    }

    #[test]
    fn custom_category_uses_fallback_color() {
        let records = vec![expense(
            4.0,
            Category::Custom("Pets".to_owned()),
            date!(2024 - 03 - 02),
        )];
        let days = window_keys(date!(2024 - 03 - 02), 1).into_chronological();

        let series = build_series(&records, &days);

        assert_eq!(series.series[0].color, "rgba(0, 0, 0, 1.0)");
        assert_eq!(series.series[0].values, [4.0]);
    }

    #[test]
    fn no_records_gives_days_and_no_series() {
        let records: Vec<Expense> = Vec::new();
        let days = window_keys(date!(2024 - 03 - 02), 7).into_chronological();

        let series = build_series(&records, &days);

        assert_eq!(series.days.len(), 7);
        assert!(series.series.is_empty());
    }

    #[test]
    fn every_series_is_as_long_as_the_window() {
        let records: Vec<Expense> = (1..=28)
            .map(|day| {
                let date =
                    time::Date::from_calendar_date(2024, time::Month::February, day).unwrap();
                let category = if day % 2 == 0 { Category::Food } else { Category::Health };
                expense(f64::from(day), category, date)
            })
            .collect();
        let days = window_keys(date!(2024 - 03 - 01), 30).into_chronological();

        let series = build_series(&records, &days);

        assert!(series.series.iter().all(|entry| entry.values.len() == 30));
    }

    #[test]
    fn series_totals_match_category_totals() {
        let records = vec![
            expense(12.25, Category::Food, date!(2024 - 02 - 27)),
            expense(3.5, Category::Transport, date!(2024 - 02 - 28)),
            expense(7.0, Category::Food, date!(2024 - 03 - 01)),
            expense(1.75, Category::Custom("Gifts".to_owned()), date!(2024 - 03 - 01)),
            expense(99.0, Category::Food, date!(2024 - 01 - 01)),
        ];
        let window = window_keys(date!(2024 - 03 - 01), 7);
        let in_window = filter_by_owner_and_keys(&records, UserID::new(1), &window.key_set());
        let days = window.into_chronological();

        let series = build_series(&records, &days);
        let totals = aggregate_by_category(in_window);

        assert_eq!(series.series.len(), totals.len());
        for entry in &series.series {
            let category = Category::new(&entry.label).unwrap();
            assert_eq!(entry.total(), totals.get(&category), "{}", entry.label);
        }
    }

    #[test]
    fn serializes_days_as_date_keys() {
        let days = Chronological::from_unordered(vec![DateKey::new(date!(2024 - 03 - 02))]);
        let series = TimeSeries {
            days: days.keys().to_vec(),
            series: vec![],
        };

        assert_eq!(
            serde_json::to_value(&series).unwrap(),
            serde_json::json!({"days": ["02-03-2024"], "series": []})
        );
    }
}
