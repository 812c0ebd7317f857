//! Pennywise is a web app for tracking day-to-day expenses against savings.
//!
//! Users record dated, categorised expenses and savings entries. The app
//! turns those records into daily, weekly, 30-day and monthly summaries,
//! builds chart-ready time series per category, and refuses new expenses
//! that would push total spending past the savings for the month.
//!
//! This library provides a JSON API plus a handful of server-rendered HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_htmx::HX_REQUEST;
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod dashboard;
mod database_id;
mod date_key;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod savings;
mod summary;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, User, UserID, ValidatedPassword};
pub use date_key::{
    Chronological, DateKey, DateRange, NewestFirst, month_bounds, to_key, window_keys,
};
pub use db::initialize as initialize_db;
pub use expense::{Category, Expense, get_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use savings::Savings;
pub use summary::{CategorySeries, TimeSeries, Totals, can_admit};

use crate::alert::Alert;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// Whether the request was sent by HTMX rather than a plain API client.
pub(crate) fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST)
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid auth cookie.
    #[error("you must be logged in to do that")]
    Unauthenticated,

    /// The username and password do not match a registered user.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The requested resource was not found.
    ///
    /// Records owned by another user are reported as not found so that
    /// clients cannot probe for other users' record IDs.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A date could not be parsed, or names a day that does not exist.
    #[error("\"{0}\" is not a valid date, use YYYY-MM-DD or DD-MM-YYYY")]
    InvalidDate(String),

    /// An amount was negative, not a number, or not finite.
    #[error("\"{0}\" is not a valid amount, use a non-negative number")]
    InvalidAmount(String),

    /// A category name was empty, too long or contained control characters.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// An expense was submitted without a name.
    #[error("expense name cannot be empty")]
    EmptyExpenseName,

    /// A date range filter was given only one of its two bounds.
    #[error("both a start date and an end date are needed to filter by date")]
    IncompleteDateRange,

    /// Admitting an expense would push total expenses past the savings for
    /// the month. The expense was not saved.
    #[error(
        "cannot add expense: total expenses of {projected_total:.2} would exceed savings of {ceiling:.2}"
    )]
    BudgetExceeded {
        /// Total expenses including the rejected expense.
        projected_total: f64,
        /// The savings total the expenses were checked against.
        ceiling: f64,
    },

    /// The password and confirmation password differ.
    #[error("passwords do not match")]
    PasswordsDoNotMatch,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The username is already taken.
    #[error("that username is already taken")]
    DuplicateUsername,

    /// The email address already belongs to a registered user.
    #[error("a user with that email already exists")]
    DuplicateEmail,

    /// The username was empty or had surrounding/control characters.
    #[error("usernames must be 1 to 32 characters without spaces")]
    InvalidUsername,

    /// The email address is not of the form `local@domain`.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent back for a failed API request.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

const GENERIC_ERROR_MESSAGE: &str =
    "An unexpected error occurred, check the server logs for more details.";

impl Error {
    /// The HTTP status that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateUsername | Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::InvalidDate(_)
            | Error::InvalidAmount(_)
            | Error::InvalidCategory(_)
            | Error::EmptyExpenseName
            | Error::IncompleteDateRange
            | Error::BudgetExceeded { .. }
            | Error::PasswordsDoNotMatch
            | Error::TooWeak(_)
            | Error::InvalidUsername
            | Error::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::JSONSerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message that is safe to show to the client.
    fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", self);
                GENERIC_ERROR_MESSAGE.to_owned()
            }
            _ => self.to_string(),
        }
    }

    /// Render the error as an alert for HTMX requests.
    pub(crate) fn into_alert_response(self) -> Response {
        let status = self.status_code();
        let message = self.client_message();
        let alert = match &self {
            Error::BudgetExceeded { .. } => Alert::error("Cannot add expense", &message),
            Error::NotFound => Alert::error(
                "Could not find that record",
                "Try refreshing the page to see if it has already been deleted.",
            ),
            Error::Unauthenticated => Alert::error("Not logged in", &message),
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                Alert::error("Something went wrong", &message)
            }
            _ => Alert::error("Invalid input", &message),
        };

        (status, alert.into_html()).into_response()
    }

    /// Render the error as an HTML alert when `is_htmx` is set, otherwise as JSON.
    pub(crate) fn into_response_for(self, is_htmx: bool) -> Response {
        if is_htmx {
            self.into_alert_response()
        } else {
            self.into_response()
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
