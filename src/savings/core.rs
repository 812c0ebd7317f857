//! Defines the savings record and its database queries.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{
    Error, auth::UserID, database_id::SavingsId, date_key::DateKey, expense::validate_amount,
};

/// Money set aside by a user on a given day.
///
/// Savings are the budget that expenses are checked against. They cannot be
/// edited or deleted once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Savings {
    /// The ID of the savings record.
    pub id: SavingsId,
    /// The user who recorded the savings.
    pub owner_id: UserID,
    /// How much was saved. Never negative.
    pub amount: f64,
    /// The day the money was saved.
    pub date: DateKey,
}

/// Create the savings table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_savings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_savings_user ON savings(user_id);",
        (),
    )?;

    Ok(())
}

/// Record `amount` saved by `owner_id` on `date`.
///
/// # Errors
/// Returns:
/// - [Error::InvalidAmount] if `amount` is negative or not finite,
/// - [Error::SqlError] if there is an SQL error.
pub fn create_savings(
    owner_id: UserID,
    amount: f64,
    date: DateKey,
    connection: &Connection,
) -> Result<Savings, Error> {
    let amount = validate_amount(amount)?;

    connection
        .prepare(
            "INSERT INTO savings (user_id, amount, date) VALUES (?1, ?2, ?3)
             RETURNING id, user_id, amount, date",
        )?
        .query_row((owner_id.as_i64(), amount, date), map_savings_row)
        .map_err(|error| error.into())
}

/// Get every savings record of `owner_id`, oldest record first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_savings(owner_id: UserID, connection: &Connection) -> Result<Vec<Savings>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, date FROM savings WHERE user_id = ?1 ORDER BY id ASC",
        )?
        .query_map((owner_id.as_i64(),), map_savings_row)?
        .collect::<Result<Vec<Savings>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

fn map_savings_row(row: &Row) -> Result<Savings, rusqlite::Error> {
    Ok(Savings {
        id: row.get(0)?,
        owner_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        date: row.get(3)?,
    })
}
