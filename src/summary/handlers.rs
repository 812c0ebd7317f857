//! Route handlers for the JSON summaries shown on the dashboard.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    expense::list_expenses,
    savings::list_savings,
    summary::{
        report::{
            COMPARISON_DAYS, LAST_30_DAYS, MonthlySummary, TodaySummary, WEEK_DAYS,
            monthly_summary, today_summary, window_series,
        },
        series::TimeSeries,
    },
    timezone::today_in,
};

/// The state needed to summarise a user's records.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl SummaryState {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// Return what the logged-in user spent today, per category.
pub async fn get_today_summary(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<TodaySummary>, Error> {
    let today = today_in(&state.local_timezone)?;
    let connection = state.connection()?;

    let user = get_user_by_id(user_id, &connection)?;
    let expenses = list_expenses(user_id, &connection)?;

    Ok(Json(today_summary(&user.username, &expenses, user_id, today)))
}

/// Return daily spending per category for the last three days.
pub async fn get_comparison(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<TimeSeries>, Error> {
    series_for_window(&state, user_id, COMPARISON_DAYS).map(Json)
}

/// Return daily spending per category for the last seven days.
pub async fn get_week_summary(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<TimeSeries>, Error> {
    series_for_window(&state, user_id, WEEK_DAYS).map(Json)
}

/// Return daily spending per category for the last 30 days.
pub async fn get_last_30_days(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<TimeSeries>, Error> {
    series_for_window(&state, user_id, LAST_30_DAYS).map(Json)
}

/// Return the expense and savings totals for the current month.
pub async fn get_monthly_dashboard(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<MonthlySummary>, Error> {
    let today = today_in(&state.local_timezone)?;
    let connection = state.connection()?;

    let expenses = list_expenses(user_id, &connection)?;
    let savings = list_savings(user_id, &connection)?;

    Ok(Json(monthly_summary(&expenses, &savings, user_id, today)))
}

fn series_for_window(
    state: &SummaryState,
    user_id: UserID,
    length_in_days: u16,
) -> Result<TimeSeries, Error> {
    let today = today_in(&state.local_timezone)?;
    let connection = state.connection()?;

    let expenses = list_expenses(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not list expenses: {error}"))?;

    Ok(window_series(&expenses, user_id, today, length_in_days))
}

#[cfg(test)]
mod summary_handler_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        auth::UserID,
        date_key::DateKey,
        db::initialize,
        expense::{Category, ExpenseFields, create_expense},
        savings::create_savings,
        summary::handlers::{
            SummaryState, get_comparison, get_last_30_days, get_monthly_dashboard,
            get_today_summary, get_week_summary,
        },
        test_utils::insert_test_user,
    };

    fn get_test_state() -> (SummaryState, UserID) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user_id = insert_test_user("alice", &conn);

        let state = SummaryState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(conn)),
        };

        (state, user_id)
    }

    fn add_expense(state: &SummaryState, owner: UserID, amount: f64, days_ago: i64) {
        let date = OffsetDateTime::now_utc().date() - Duration::days(days_ago);
        let fields =
            ExpenseFields::new("thing", amount, Category::Food, DateKey::new(date)).unwrap();
        create_expense(owner, fields, &state.db_connection.lock().unwrap()).unwrap();
    }

    #[tokio::test]
    async fn today_summary_includes_username() {
        let (state, user_id) = get_test_state();
        add_expense(&state, user_id, 12.5, 0);
        add_expense(&state, user_id, 99.0, 1);

        let summary = get_today_summary(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(summary.username, "alice");
        assert_eq!(summary.total_amount, 12.5);
        assert_eq!(summary.per_category.len(), 1);
    }

    #[tokio::test]
    async fn today_summary_for_unknown_user_is_not_found() {
        let (state, _) = get_test_state();

        let result = get_today_summary(State(state), Extension(UserID::new(999))).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    #[tokio::test]
    async fn windows_have_expected_lengths() {
        let (state, user_id) = get_test_state();
        add_expense(&state, user_id, 5.0, 2);
        add_expense(&state, user_id, 5.0, 10);

        let comparison = get_comparison(State(state.clone()), Extension(user_id))
            .await
            .unwrap();
        let week = get_week_summary(State(state.clone()), Extension(user_id))
            .await
            .unwrap();
        let month = get_last_30_days(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(comparison.days.len(), 3);
        assert_eq!(comparison.series[0].values, [5.0, 0.0, 0.0]);
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.series[0].total(), 5.0);
        assert_eq!(month.days.len(), 30);
        assert_eq!(month.series[0].total(), 10.0);
    }

    #[tokio::test]
    async fn window_without_expenses_is_empty() {
        let (state, user_id) = get_test_state();

        let week = get_week_summary(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(week.days.len(), 7);
        assert!(week.series.is_empty());
    }

    #[tokio::test]
    async fn monthly_dashboard_sums_this_month() {
        let (state, user_id) = get_test_state();
        add_expense(&state, user_id, 20.0, 0);
        let today = DateKey::new(OffsetDateTime::now_utc().date());
        create_savings(user_id, 300.0, today, &state.db_connection.lock().unwrap()).unwrap();

        let summary = get_monthly_dashboard(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(summary.total_expenses, 20.0);
        assert_eq!(summary.total_savings, 300.0);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let (mut state, user_id) = get_test_state();
        state.local_timezone = "Not/AZone".to_owned();

        let result = get_monthly_dashboard(State(state), Extension(user_id)).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidTimezoneError("Not/AZone".to_owned()))
        );
    }
}
