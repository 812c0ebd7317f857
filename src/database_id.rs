//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of an expense record.
pub type ExpenseId = DatabaseId;

/// The ID of a savings record.
pub type SavingsId = DatabaseId;
