//! Calendar date keys and the day windows built from them.
//!
//! Records store their date as a fixed-width `DD-MM-YYYY` key. That text form
//! is only good for equality tests: "01-02-2024" sorts before "31-01-2024"
//! even though it is the later day. [DateKey] therefore wraps a
//! [time::Date] and all ordering and range checks go through the calendar
//! value, while [Display] and the SQLite conversions produce the text key.
//!
//! Windows of consecutive days come in two flavours that cannot be mixed up:
//! [NewestFirst], which is how windows are generated (walking backwards from
//! a reference day), and [Chronological], which is what chart series need.

use std::{collections::HashSet, fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Duration, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The storage and display format, e.g. "02-03-2024".
const KEY_FORMAT: &[BorrowedFormatItem] = format_description!("[day]-[month]-[year]");

/// The format browsers send for `<input type="date">`, e.g. "2024-03-02".
const ISO_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A calendar day that renders as a `DD-MM-YYYY` key.
///
/// Comparisons (`<`, `max`, sorting) use the underlying calendar date, so they
/// are correct across month and year boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(Date);

impl DateKey {
    /// Wrap a calendar date.
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    /// The calendar date behind the key.
    pub fn date(&self) -> Date {
        self.0
    }

    /// Parse a date submitted by a client.
    ///
    /// Accepts ISO dates ("2024-03-02"), ISO date-times whose date part comes
    /// first ("2024-03-02T10:00:00Z"), and date keys ("02-03-2024").
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if `raw` matches none of these forms or
    /// names a day that does not exist.
    pub fn parse_input(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim();
        let date_part = trimmed
            .split_once('T')
            .map(|(date, _)| date)
            .unwrap_or(trimmed);

        Date::parse(date_part, ISO_FORMAT)
            .or_else(|_| Date::parse(date_part, KEY_FORMAT))
            .map(Self)
            .map_err(|_| Error::InvalidDate(raw.to_owned()))
    }
}

/// Render `date` as a `DD-MM-YYYY` key with zero-padded day and month.
pub fn to_key(date: Date) -> String {
    DateKey(date).to_string()
}

impl From<Date> for DateKey {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}-{:02}-{:04}",
            self.0.day(),
            u8::from(self.0.month()),
            self.0.year()
        )
    }
}

impl FromStr for DateKey {
    type Err = Error;

    /// Parse a strict `DD-MM-YYYY` key.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Date::parse(key, KEY_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidDate(key.to_owned()))
    }
}

impl Serialize for DateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for DateKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for DateKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let key = value.as_str()?;

        Date::parse(key, KEY_FORMAT)
            .map(Self)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An inclusive range of calendar days.
///
/// A range whose start is after its end is empty rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: DateKey,
    /// The last day in the range.
    pub end: DateKey,
}

impl DateRange {
    /// Create the range `start..=end`. The bounds are not reordered.
    pub fn new(start: DateKey, end: DateKey) -> Self {
        Self { start, end }
    }

    /// Whether `key` falls on or between the bounds.
    pub fn contains(&self, key: &DateKey) -> bool {
        self.start <= *key && *key <= self.end
    }
}

/// Return the first and last day of the month containing `reference`.
pub fn month_bounds(reference: Date) -> DateRange {
    let start = reference - Duration::days(i64::from(reference.day()) - 1);

    let mut end = reference;
    while let Some(next) = end
        .next_day()
        .filter(|next| next.month() == reference.month())
    {
        end = next;
    }

    DateRange::new(start.into(), end.into())
}

/// Return `length_in_days` keys ending at `reference`, newest first.
///
/// The reference day is the first key. Walking backwards rolls over month and
/// year boundaries, e.g. the day before 01-03-2024 is 29-02-2024.
pub fn window_keys(reference: Date, length_in_days: u16) -> NewestFirst {
    let keys = std::iter::successors(Some(reference), |date| date.previous_day())
        .take(usize::from(length_in_days))
        .map(DateKey)
        .collect();

    NewestFirst(keys)
}

/// Day keys ordered from the most recent day to the oldest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewestFirst(Vec<DateKey>);

impl NewestFirst {
    /// Reverse the window so that the oldest day comes first.
    pub fn into_chronological(self) -> Chronological {
        let mut keys = self.0;
        keys.reverse();

        Chronological(keys)
    }

    /// The keys, newest first.
    pub fn keys(&self) -> &[DateKey] {
        &self.0
    }

    /// The keys as a set for membership tests.
    pub fn key_set(&self) -> HashSet<DateKey> {
        self.0.iter().copied().collect()
    }
}

/// Day keys ordered from the oldest day to the most recent.
///
/// The only way to build one is from a [NewestFirst] window, or from keys
/// that are sorted here, so holders can rely on ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chronological(Vec<DateKey>);

impl Chronological {
    /// Sort `keys` into ascending calendar order, dropping duplicates.
    pub fn from_unordered(mut keys: Vec<DateKey>) -> Self {
        keys.sort();
        keys.dedup();

        Self(keys)
    }

    /// The keys, oldest first.
    pub fn keys(&self) -> &[DateKey] {
        &self.0
    }

    /// The number of days in the window.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the window has no days.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The keys as a set for membership tests.
    pub fn key_set(&self) -> HashSet<DateKey> {
        self.0.iter().copied().collect()
    }
}

#[cfg(test)]
mod date_key_tests {
    use time::{Date, Duration, macros::date};

    use crate::{
        Error,
        date_key::{DateKey, DateRange, month_bounds, to_key, window_keys},
    };

    #[test]
    fn to_key_zero_pads_day_and_month() {
        assert_eq!(to_key(date!(2024 - 03 - 02)), "02-03-2024");
        assert_eq!(to_key(date!(1999 - 12 - 31)), "31-12-1999");
    }

    #[test]
    fn key_round_trips_for_every_day_in_supported_range() {
        let mut day = date!(1900 - 01 - 01);
        let last = date!(2100 - 12 - 31);

        while day <= last {
            let key = to_key(day);
            let parsed: DateKey = key.parse().unwrap();
            assert_eq!(parsed.date(), day, "round trip failed for {key}");

            day += Duration::days(1);
        }
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        for raw in ["2-3-2024", "02/03/2024", "31-02-2024", "", "02-03-2024 "] {
            assert_eq!(
                raw.parse::<DateKey>(),
                Err(Error::InvalidDate(raw.to_owned())),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn parse_input_accepts_iso_and_key_forms() {
        let want = DateKey::new(date!(2024 - 03 - 02));

        assert_eq!(DateKey::parse_input("2024-03-02"), Ok(want));
        assert_eq!(DateKey::parse_input("2024-03-02T23:15:00Z"), Ok(want));
        assert_eq!(DateKey::parse_input("02-03-2024"), Ok(want));
        assert_eq!(DateKey::parse_input(" 2024-03-02 "), Ok(want));
    }

    #[test]
    fn parse_input_rejects_garbage() {
        assert_eq!(
            DateKey::parse_input("yesterday"),
            Err(Error::InvalidDate("yesterday".to_owned()))
        );
    }

    #[test]
    fn ordering_uses_calendar_not_text() {
        let end_of_january: DateKey = "31-01-2024".parse().unwrap();
        let start_of_february: DateKey = "01-02-2024".parse().unwrap();

        assert!("01-02-2024" < "31-01-2024");
        assert!(end_of_january < start_of_february);
    }

    #[test]
    fn month_bounds_for_december() {
        let bounds = month_bounds(date!(2023 - 12 - 31));

        assert_eq!(bounds.start.to_string(), "01-12-2023");
        assert_eq!(bounds.end.to_string(), "31-12-2023");
    }

    #[test]
    fn month_bounds_for_leap_february() {
        let bounds = month_bounds(date!(2024 - 02 - 10));

        assert_eq!(bounds.start.to_string(), "01-02-2024");
        assert_eq!(bounds.end.to_string(), "29-02-2024");
    }

    #[test]
    fn month_bounds_for_common_february() {
        let bounds = month_bounds(date!(2023 - 02 - 01));

        assert_eq!(bounds.end.to_string(), "28-02-2023");
    }

    #[test]
    fn window_walks_backwards_across_month_boundary() {
        let window = window_keys(date!(2024 - 03 - 02), 3);

        let keys: Vec<String> = window.keys().iter().map(DateKey::to_string).collect();
        assert_eq!(keys, vec!["02-03-2024", "01-03-2024", "29-02-2024"]);
    }

    #[test]
    fn window_walks_backwards_across_year_boundary() {
        let window = window_keys(date!(2024 - 01 - 01), 2);

        let keys: Vec<String> = window.keys().iter().map(DateKey::to_string).collect();
        assert_eq!(keys, vec!["01-01-2024", "31-12-2023"]);
    }

    #[test]
    fn chronological_window_is_oldest_first() {
        let window = window_keys(date!(2024 - 03 - 02), 3).into_chronological();

        let keys: Vec<String> = window.keys().iter().map(DateKey::to_string).collect();
        assert_eq!(keys, vec!["29-02-2024", "01-03-2024", "02-03-2024"]);
    }

    #[test]
    fn window_of_zero_days_is_empty() {
        assert!(window_keys(date!(2024 - 03 - 02), 0).keys().is_empty());
    }

    #[test]
    fn window_has_requested_length() {
        let window = window_keys(date!(2024 - 03 - 02), 30);

        assert_eq!(window.keys().len(), 30);
        assert_eq!(window.key_set().len(), 30);
    }

    #[test]
    fn from_unordered_sorts_and_dedups() {
        let keys = vec![
            DateKey::new(date!(2024 - 02 - 01)),
            DateKey::new(date!(2024 - 01 - 31)),
            DateKey::new(date!(2024 - 02 - 01)),
        ];

        let window = super::Chronological::from_unordered(keys);

        assert_eq!(
            window.keys(),
            &[
                DateKey::new(date!(2024 - 01 - 31)),
                DateKey::new(date!(2024 - 02 - 01))
            ]
        );
    }

    #[test]
    fn range_with_start_after_end_contains_nothing() {
        let range = DateRange::new(
            DateKey::new(date!(2024 - 03 - 10)),
            DateKey::new(date!(2024 - 03 - 01)),
        );

        let mut day: Date = date!(2024 - 02 - 20);
        while day < date!(2024 - 03 - 20) {
            assert!(!range.contains(&DateKey::new(day)));
            day += Duration::days(1);
        }
    }

    #[test]
    fn range_spanning_months_is_inclusive() {
        let range = DateRange::new(
            DateKey::new(date!(2023 - 12 - 30)),
            DateKey::new(date!(2024 - 01 - 02)),
        );

        assert!(range.contains(&DateKey::new(date!(2023 - 12 - 30))));
        assert!(range.contains(&DateKey::new(date!(2024 - 01 - 01))));
        assert!(range.contains(&DateKey::new(date!(2024 - 01 - 02))));
        assert!(!range.contains(&DateKey::new(date!(2024 - 01 - 03))));
    }
}
