//! Defines the endpoint for listing a user's savings.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    savings::{Savings, list_savings},
};

/// The state needed to list savings.
#[derive(Debug, Clone)]
pub struct ListSavingsState {
    /// The database connection for reading savings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListSavingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Return every savings record of the logged-in user.
pub async fn list_savings_endpoint(
    State(state): State<ListSavingsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Savings>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    list_savings(user_id, &connection).map(Json)
}
