//! Selects one owner's records that fall inside a window of days.

use std::collections::HashSet;

use crate::{
    auth::UserID,
    date_key::{DateKey, DateRange},
    expense::{Category, Expense},
    savings::Savings,
};

/// A record with an owner, a day and an amount of money.
pub trait DatedRecord {
    /// The user the record belongs to.
    fn owner_id(&self) -> UserID;
    /// The day the record applies to.
    fn date(&self) -> DateKey;
    /// The amount of money in dollars.
    fn amount(&self) -> f64;
}

/// A [DatedRecord] that is filed under a category.
pub trait CategorisedRecord: DatedRecord {
    /// The category the record is filed under.
    fn category(&self) -> &Category;
}

impl DatedRecord for Expense {
    fn owner_id(&self) -> UserID {
        self.owner_id
    }

    fn date(&self) -> DateKey {
        self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

impl CategorisedRecord for Expense {
    fn category(&self) -> &Category {
        &self.category
    }
}

impl DatedRecord for Savings {
    fn owner_id(&self) -> UserID {
        self.owner_id
    }

    fn date(&self) -> DateKey {
        self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

impl<R: DatedRecord> DatedRecord for &R {
    fn owner_id(&self) -> UserID {
        (*self).owner_id()
    }

    fn date(&self) -> DateKey {
        (*self).date()
    }

    fn amount(&self) -> f64 {
        (*self).amount()
    }
}

impl<R: CategorisedRecord> CategorisedRecord for &R {
    fn category(&self) -> &Category {
        (*self).category()
    }
}

/// The records of `owner_id` whose day is one of `keys`, in input order.
pub fn filter_by_owner_and_keys<'a, R: DatedRecord>(
    records: &'a [R],
    owner_id: UserID,
    keys: &HashSet<DateKey>,
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| record.owner_id() == owner_id && keys.contains(&record.date()))
        .collect()
}

/// The records of `owner_id` whose day falls in `range` (inclusive), in input order.
///
/// A range whose start is after its end matches nothing.
pub fn filter_by_owner_and_range<'a, R: DatedRecord>(
    records: &'a [R],
    owner_id: UserID,
    range: &DateRange,
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| record.owner_id() == owner_id && range.contains(&record.date()))
        .collect()
}

/// The sum of the amounts of `records`, zero if there are none.
pub fn sum_amounts<R: DatedRecord>(records: impl IntoIterator<Item = R>) -> f64 {
    records.into_iter().map(|record| record.amount()).sum()
}
