//! Expense categories.
//!
//! The app ships with a handful of well-known categories that get a fixed
//! chart colour, but users may file expenses under any other name. Unknown
//! names are kept as [Category::Custom] and drawn with [FALLBACK_COLOR].

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// The longest category name accepted, in characters.
pub const MAX_CATEGORY_LENGTH: usize = 50;

/// Chart colour for categories without a colour of their own.
pub const FALLBACK_COLOR: &str = "rgba(0, 0, 0, 1.0)";

/// The category an expense is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Groceries and eating out.
    Food,
    /// Fares and fuel.
    Transport,
    /// Going out and subscriptions.
    Entertainment,
    /// Clothes and other purchases.
    Shopping,
    /// Rent and other recurring bills.
    Bills,
    /// Doctors and pharmacy.
    Health,
    /// Any other non-empty name.
    Custom(String),
}

impl Category {
    /// The categories offered in forms, in display order.
    pub const KNOWN: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Health,
    ];

    /// Parse a category name.
    ///
    /// Well-known names match case-insensitively and are normalised to their
    /// canonical spelling. Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if the name is empty, longer than
    /// [MAX_CATEGORY_LENGTH] characters, or contains control characters.
    pub fn new(raw: &str) -> Result<Self, Error> {
        let name = raw.trim();

        if name.is_empty()
            || name.chars().count() > MAX_CATEGORY_LENGTH
            || name.chars().any(char::is_control)
        {
            return Err(Error::InvalidCategory(raw.to_owned()));
        }

        let known = Self::KNOWN
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name));

        Ok(known.unwrap_or_else(|| Self::Custom(name.to_owned())))
    }

    /// The display name of the category.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Health => "Health",
            Self::Custom(name) => name,
        }
    }

    /// The colour used for this category in charts.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Food => "rgba(255, 99, 132, 1.0)",
            Self::Transport => "rgba(54, 162, 235, 1.0)",
            Self::Entertainment => "rgba(255, 206, 86, 1.0)",
            Self::Shopping => "rgba(75, 192, 192, 1.0)",
            Self::Bills => "rgba(153, 102, 255, 1.0)",
            Self::Health => "rgba(255, 159, 64, 1.0)",
            Self::Custom(_) => FALLBACK_COLOR,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Category::new(&raw).map_err(serde::de::Error::custom)
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let name = value.as_str()?;

        // Names were validated on the way in, so keep whatever is stored.
        Ok(Category::new(name).unwrap_or_else(|_| Category::Custom(name.to_owned())))
    }
}

#[cfg(test)]
mod category_tests {
    use crate::{
        Error,
        expense::category::{Category, FALLBACK_COLOR, MAX_CATEGORY_LENGTH},
    };

    #[test]
    fn known_names_are_case_insensitive() {
        assert_eq!(Category::new("food"), Ok(Category::Food));
        assert_eq!(Category::new("  TRANSPORT "), Ok(Category::Transport));
    }

    #[test]
    fn unknown_names_become_custom() {
        let category = Category::new("Pets").unwrap();

        assert_eq!(category, Category::Custom("Pets".to_owned()));
        assert_eq!(category.to_string(), "Pets");
        assert_eq!(category.color(), FALLBACK_COLOR);
    }

    #[test]
    fn known_categories_have_their_own_colour() {
        for category in Category::KNOWN {
            assert_ne!(category.color(), FALLBACK_COLOR, "{category} has no colour");
        }
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(
            Category::new("   "),
            Err(Error::InvalidCategory("   ".to_owned()))
        );
    }

    #[test]
    fn rejects_overlong_name() {
        let name = "x".repeat(MAX_CATEGORY_LENGTH + 1);

        assert_eq!(Category::new(&name), Err(Error::InvalidCategory(name)));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![Category::Bills, Category::Custom("Gym".into())])
            .unwrap();

        assert_eq!(json, r#"["Bills","Gym"]"#);
    }
}
