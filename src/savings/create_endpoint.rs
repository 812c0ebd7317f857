//! Defines the endpoint for recording savings.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form, Json,
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, auth::UserID, date_key::DateKey, endpoints, expense::parse_amount,
    is_htmx_request, savings::create_savings,
};

/// The state needed to record savings.
#[derive(Debug, Clone)]
pub struct CreateSavingsState {
    /// The database connection for managing savings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateSavingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for recording savings.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavingsForm {
    /// The amount saved in dollars.
    pub amount: String,
    /// The day the money was saved, as YYYY-MM-DD or DD-MM-YYYY.
    pub date: String,
}

/// A route handler for recording savings.
///
/// Responds with the new record as JSON and `201 Created`, or for HTMX
/// requests redirects to the expenses page.
pub async fn create_savings_endpoint(
    State(state): State<CreateSavingsState>,
    Extension(user_id): Extension<UserID>,
    headers: HeaderMap,
    Form(form): Form<SavingsForm>,
) -> Response {
    let is_htmx = is_htmx_request(&headers);

    let savings = parse_amount(&form.amount)
        .and_then(|amount| Ok((amount, DateKey::parse_input(&form.date)?)))
        .and_then(|(amount, date)| {
            let connection = state
                .db_connection
                .lock()
                .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
                .map_err(|_| Error::DatabaseLockError)?;

            create_savings(user_id, amount, date, &connection)
        });

    match savings {
        Ok(_) if is_htmx => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(savings) => (StatusCode::CREATED, Json(savings)).into_response(),
        Err(error) => {
            tracing::debug!("Could not record savings {form:?}: {error}");
            error.into_response_for(is_htmx)
        }
    }
}
