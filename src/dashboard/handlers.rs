//! Dashboard route handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    dashboard::{
        cards::{month_card, today_card},
        charts::{DashboardChart, charts_script, charts_view},
    },
    endpoints,
    expense::list_expenses,
    html::{ECHARTS_URL, HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    savings::list_savings,
    summary::{
        COMPARISON_DAYS, LAST_30_DAYS, MonthlySummary, TodaySummary, WEEK_DAYS, month_start,
        monthly_summary, today_summary, window_series,
    },
    timezone::today_in,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display today's spending, the month's totals and charts of recent spending.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = today_in(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;
    let expenses = list_expenses(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not list expenses: {error}"))?;
    let savings = list_savings(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not list savings: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if expenses.is_empty() && savings.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, &user.username).into_response());
    }

    let today_summary = today_summary(&user.username, &expenses, user_id, today);
    let month_summary = monthly_summary(&expenses, &savings, user_id, today);
    let charts = [
        DashboardChart::new(
            "comparison-chart",
            "Comparison",
            "Last 3 days",
            &window_series(&expenses, user_id, today, COMPARISON_DAYS),
        ),
        DashboardChart::new(
            "week-chart",
            "This week",
            "Last 7 days",
            &window_series(&expenses, user_id, today, WEEK_DAYS),
        ),
        DashboardChart::new(
            "last-30-days-chart",
            "Last 30 days",
            "Grouped by category",
            &window_series(&expenses, user_id, today, LAST_30_DAYS),
        ),
    ];

    Ok(dashboard_view(
        nav_bar,
        &today_summary,
        &month_summary,
        &month_start(today).to_string(),
        &charts,
    )
    .into_response())
}

fn dashboard_no_data_view(nav_bar: NavBar, username: &str) -> Markup {
    let nav_bar = nav_bar.into_html();
    let expenses_link = link(endpoints::EXPENSES_VIEW, "expenses page");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Welcome, " (username)
            }

            p
            {
                "Charts will show up here once you add some savings and expenses.
                You can add them on the " (expenses_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(
    nav_bar: NavBar,
    today_summary: &TodaySummary,
    month_summary: &MonthlySummary,
    month_label: &str,
    charts: &[DashboardChart],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class={ (PAGE_CONTAINER_STYLE) " max-w-screen-xl" }
        {
            h2 class="w-full text-xl font-bold mb-4"
            {
                "Hello, " (today_summary.username)
            }

            section class="w-full grid grid-cols-1 md:grid-cols-2 gap-4 mb-4"
            {
                (today_card(today_summary))
                (month_card(month_summary, month_label))
            }

            (charts_view(charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod dashboard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::OffsetDateTime;

    use crate::{
        Error,
        auth::UserID,
        dashboard::handlers::{DashboardState, get_dashboard_page},
        date_key::DateKey,
        db::initialize,
        expense::{Category, ExpenseFields, create_expense},
        savings::create_savings,
        test_utils::{
            assert_status_ok, assert_valid_html, insert_test_user, parse_html_document,
        },
    };

    fn get_test_state() -> (DashboardState, UserID) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user_id = insert_test_user("alice", &conn);

        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, user_id)
    }

    #[track_caller]
    fn assert_element_exists(html: &Html, selector: &str) {
        assert!(
            html.select(&Selector::parse(selector).unwrap()).next().is_some(),
            "{selector} not found in {}",
            html.html()
        );
    }

    #[tokio::test]
    async fn dashboard_page_shows_cards_and_charts() {
        let (state, user_id) = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let today = DateKey::new(OffsetDateTime::now_utc().date());
            create_savings(user_id, 500.0, today, &connection).unwrap();
            let fields = ExpenseFields::new("Lunch", 12.0, Category::Food, today).unwrap();
            create_expense(user_id, fields, &connection).unwrap();
        }

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_element_exists(&html, "#today-card");
        assert_element_exists(&html, "#month-card");
        assert_element_exists(&html, "#comparison-chart");
        assert_element_exists(&html, "#week-chart");
        assert_element_exists(&html, "#last-30-days-chart");
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let (state, user_id) = get_test_state();

        let response = get_dashboard_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(
            html.select(&Selector::parse("[data-chart]").unwrap())
                .next()
                .is_none()
        );
        let heading = html
            .select(&Selector::parse("h2").unwrap())
            .next()
            .unwrap();
        assert_eq!(heading.text().collect::<String>(), "Welcome, alice");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (state, _) = get_test_state();

        let result = get_dashboard_page(State(state), Extension(UserID::new(42))).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
