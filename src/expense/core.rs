//! Defines the expense record and the owner-scoped database queries for it.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{
    Error,
    auth::UserID,
    database_id::ExpenseId,
    date_key::DateKey,
    expense::category::Category,
};

// ============================================================================
// MODELS
// ============================================================================

/// Money spent by a user on a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The user who recorded the expense.
    pub owner_id: UserID,
    /// What the money was spent on.
    pub name: String,
    /// How much was spent. Never negative.
    pub amount: f64,
    /// The category the expense is filed under.
    pub category: Category,
    /// The day the money was spent.
    pub date: DateKey,
}

/// The user-editable fields of an expense, already validated.
///
/// Used both to create an expense and to replace the fields of an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFields {
    name: String,
    amount: f64,
    category: Category,
    date: DateKey,
}

impl ExpenseFields {
    /// Validate the fields of an expense.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::EmptyExpenseName] if `name` is blank,
    /// - [Error::InvalidAmount] if `amount` is negative or not finite.
    pub fn new(name: &str, amount: f64, category: Category, date: DateKey) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyExpenseName);
        }

        Ok(Self {
            name: name.to_owned(),
            amount: validate_amount(amount)?,
            category,
            date,
        })
    }

    /// The amount to be spent.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// Check that `amount` is a finite, non-negative number of dollars.
///
/// # Errors
/// Returns [Error::InvalidAmount] otherwise.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount.to_string()))
    }
}

/// Parse an amount typed into a form.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `raw` is not a number, or is negative or
/// not finite.
pub fn parse_amount(raw: &str) -> Result<f64, Error> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidAmount(raw.to_owned()))
        .and_then(validate_amount)
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const EXPENSE_COLUMNS: &str = "id, user_id, name, amount, category, date";

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user ON expense(user_id);",
        (),
    )?;

    Ok(())
}

/// Insert a new expense for `owner_id`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn create_expense(
    owner_id: UserID,
    fields: ExpenseFields,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO expense (user_id, name, amount, category, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                owner_id.as_i64(),
                fields.name,
                fields.amount,
                fields.category,
                fields.date,
            ),
            map_expense_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the expense `id` if it belongs to `owner_id`.
///
/// # Errors
/// Returns:
/// - [Error::NotFound] if `id` does not exist or belongs to another user,
/// - [Error::SqlError] if there is some other SQL error.
pub fn get_expense(
    id: ExpenseId,
    owner_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, owner_id.as_i64()), map_expense_row)
        .map_err(|error| error.into())
}

/// Get every expense recorded by `owner_id`, oldest record first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_expenses(owner_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE user_id = ?1 ORDER BY id ASC"
        ))?
        .query_map((owner_id.as_i64(),), map_expense_row)?
        .collect::<Result<Vec<Expense>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Replace the fields of expense `id` owned by `owner_id`.
///
/// # Errors
/// Returns:
/// - [Error::NotFound] if `id` does not exist or belongs to another user,
/// - [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    owner_id: UserID,
    fields: ExpenseFields,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "UPDATE expense SET name = ?1, amount = ?2, category = ?3, date = ?4
             WHERE id = ?5 AND user_id = ?6
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                fields.name,
                fields.amount,
                fields.category,
                fields.date,
                id,
                owner_id.as_i64(),
            ),
            map_expense_row,
        )
        .map_err(|error| error.into())
}

/// Delete expense `id` owned by `owner_id`.
///
/// # Errors
/// Returns:
/// - [Error::NotFound] if `id` does not exist or belongs to another user,
/// - [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(
    id: ExpenseId,
    owner_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (id, owner_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

/// Map a database row to an [Expense].
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        owner_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        date: row.get(5)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
