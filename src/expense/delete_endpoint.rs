//! Defines the endpoint for deleting an expense.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, auth::UserID, database_id::ExpenseId, expense::delete_expense,
    is_htmx_request,
};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense.
///
/// API clients get `204 No Content`. HTMX requests get `200 OK` with only an
/// out-of-band alert, which swaps the targeted table row for nothing.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    headers: HeaderMap,
) -> Response {
    let is_htmx = is_htmx_request(&headers);

    let result = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| delete_expense(expense_id, user_id, &connection));

    match result {
        // The status code has to be 200 OK or HTMX will not remove the table row.
        Ok(()) if is_htmx => Alert::success("Expense deleted", "").into_response(),
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            tracing::debug!("Could not delete expense {expense_id}: {error}");
            error.into_response_for(is_htmx)
        }
    }
}
