//! Defines the endpoint for replacing the fields of an expense.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form, Json,
    extract::{FromRef, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    database_id::ExpenseId,
    endpoints,
    expense::{Expense, form::ExpenseForm, update_expense},
    is_htmx_request,
};

/// The state needed to edit an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that replaces the name, amount, category and date of an expense.
///
/// Edits are not checked against the savings ceiling.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    headers: HeaderMap,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let is_htmx = is_htmx_request(&headers);

    match edit_expense(&state, user_id, expense_id, &form) {
        Ok(_) if is_htmx => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(expense) => Json(expense).into_response(),
        Err(error) => {
            tracing::debug!("Could not update expense {expense_id}: {error}");
            error.into_response_for(is_htmx)
        }
    }
}

fn edit_expense(
    state: &EditExpenseState,
    user_id: UserID,
    expense_id: ExpenseId,
    form: &ExpenseForm,
) -> Result<Expense, Error> {
    let fields = form.into_fields()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_expense(expense_id, user_id, fields, &connection)
}
