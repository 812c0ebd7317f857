//! Defines the endpoint for recording an expense.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form, Json,
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::{Expense, create_expense, form::ExpenseForm},
    is_htmx_request,
    summary::check_expense_admission,
    timezone::today_in,
};

/// The state needed to record an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for recording an expense.
///
/// The expense is refused with [Error::BudgetExceeded] if it would push the
/// user's total expenses past their savings for the current month.
///
/// Responds with the new record as JSON and `201 Created`, or for HTMX
/// requests redirects to the expenses page.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    headers: HeaderMap,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let is_htmx = is_htmx_request(&headers);

    match admit_and_create(&state, user_id, &form) {
        Ok(_) if is_htmx => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(error) => {
            tracing::debug!("Could not record expense {form:?}: {error}");
            error.into_response_for(is_htmx)
        }
    }
}

fn admit_and_create(
    state: &CreateExpenseState,
    user_id: UserID,
    form: &ExpenseForm,
) -> Result<Expense, Error> {
    let fields = form.into_fields()?;
    let today = today_in(&state.local_timezone)?;

    // The lock is held from the check until the insert so that two requests
    // from the same user cannot both pass the check.
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    check_expense_admission(user_id, fields.amount(), today, &connection)?.into_result()?;

    create_expense(user_id, fields, &connection)
}
