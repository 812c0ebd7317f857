//! Groups records by category, and optionally by day, and sums their amounts.

use std::{collections::HashMap, hash::Hash};

use crate::{date_key::DateKey, expense::Category, summary::filter::CategorisedRecord};

/// Summed amounts per group, iterated in the order groups were first seen.
///
/// Totals are rebuilt from the records for every request.
#[derive(Debug, Clone)]
pub struct Totals<K> {
    entries: Vec<(K, f64)>,
    positions: HashMap<K, usize>,
}

impl<K: PartialEq> PartialEq for Totals<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K> Default for Totals<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> Totals<K> {
    /// Add `amount` to the group `key`, creating the group if needed.
    pub fn add(&mut self, key: K, amount: f64) {
        match self.positions.get(&key) {
            Some(&position) => self.entries[position].1 += amount,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, amount));
            }
        }
    }

    /// The total for `key`, zero if no record fell into that group.
    pub fn get(&self, key: &K) -> f64 {
        self.positions
            .get(key)
            .map(|&position| self.entries[position].1)
            .unwrap_or(0.0)
    }

    /// The groups and their totals, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.entries.iter().map(|(key, total)| (key, *total))
    }

    /// The groups in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// The sum over all groups, zero when there are none.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, total)| total).sum()
    }

    /// The number of groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sum the amounts of `records` per category.
pub fn aggregate_by_category<R: CategorisedRecord>(
    records: impl IntoIterator<Item = R>,
) -> Totals<Category> {
    let mut totals = Totals::default();

    for record in records {
        totals.add(record.category().clone(), record.amount());
    }

    totals
}

/// Sum the amounts of `records` per category and day.
pub fn aggregate_by_category_and_date<R: CategorisedRecord>(
    records: impl IntoIterator<Item = R>,
) -> Totals<(Category, DateKey)> {
    let mut totals = Totals::default();

    for record in records {
        totals.add((record.category().clone(), record.date()), record.amount());
    }

    totals
}
