//! Query-string filters for listing expenses.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    date_key::{DateKey, DateRange},
    expense::{Category, Expense},
};

/// The category filter value that matches every category.
pub const ALL_CATEGORIES: &str = "All";

/// Filters as they appear in the query string. Empty values are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseQuery {
    /// Only show expenses in this category. "All" shows every category.
    pub category: Option<String>,
    /// The first day to show, inclusive.
    pub start: Option<String>,
    /// The last day to show, inclusive.
    pub end: Option<String>,
}

/// Validated filters for a list of expenses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// `None` matches every category.
    pub category: Option<Category>,
    /// `None` matches every day.
    pub range: Option<DateRange>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl ExpenseQuery {
    /// Validate the query.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::IncompleteDateRange] if only one of `start` and `end` is given,
    /// - [Error::InvalidDate] if either bound is not a date,
    /// - [Error::InvalidCategory] if the category name is invalid.
    pub fn parse(&self) -> Result<ExpenseFilter, Error> {
        let category = match non_empty(&self.category) {
            None => None,
            Some(name) if name.eq_ignore_ascii_case(ALL_CATEGORIES) => None,
            Some(name) => Some(Category::new(name)?),
        };

        let range = match (non_empty(&self.start), non_empty(&self.end)) {
            (None, None) => None,
            (Some(start), Some(end)) => Some(DateRange::new(
                DateKey::parse_input(start)?,
                DateKey::parse_input(end)?,
            )),
            _ => return Err(Error::IncompleteDateRange),
        };

        Ok(ExpenseFilter { category, range })
    }
}

impl ExpenseFilter {
    /// Whether `expense` passes every filter.
    pub fn matches(&self, expense: &Expense) -> bool {
        let category_matches = self
            .category
            .as_ref()
            .is_none_or(|category| *category == expense.category);
        let date_matches = self
            .range
            .as_ref()
            .is_none_or(|range| range.contains(&expense.date));

        category_matches && date_matches
    }

    /// Keep the expenses that pass every filter, in their original order.
    pub fn apply(&self, expenses: Vec<Expense>) -> Vec<Expense> {
        expenses
            .into_iter()
            .filter(|expense| self.matches(expense))
            .collect()
    }
}
