//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{auth::create_user_table, expense::create_expense_table, savings::create_savings_table};

/// Create the tables for users, expenses and savings if they do not exist yet.
///
/// All tables are created in one exclusive transaction, so a failure leaves
/// the database untouched.
///
/// # Errors
/// Returns an error if a table could not be created or the transaction
/// could not be committed.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_savings_table(&transaction)?;

    transaction.commit()
}
