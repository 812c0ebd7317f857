//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_api, get_log_in_page, get_log_out, get_profile, get_register_page,
        post_log_in, register_user,
    },
    dashboard::get_dashboard_page,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_expenses_page, list_expenses_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    savings::{create_savings_endpoint, list_savings_endpoint},
    summary::{
        get_comparison, get_last_30_days, get_monthly_dashboard, get_today_summary,
        get_week_summary,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // API routes answer unauthenticated requests with 401, or an HX-Redirect for HTMX requests.
    let protected_api = Router::new()
        .route(endpoints::PROFILE, get(get_profile))
        .route(
            endpoints::EXPENSES_API,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(edit_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(
            endpoints::SAVINGS_API,
            get(list_savings_endpoint).post(create_savings_endpoint),
        )
        .route(endpoints::TODAY_SUMMARY, get(get_today_summary))
        .route(endpoints::COMPARISON, get(get_comparison))
        .route(endpoints::WEEK_SUMMARY, get(get_week_summary))
        .route(endpoints::LAST_30_DAYS, get(get_last_30_days))
        .route(endpoints::MONTHLY_DASHBOARD, get(get_monthly_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_api));

    protected_pages
        .merge(protected_api)
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::OffsetDateTime;

    use crate::{AppState, auth::COOKIE_TOKEN, build_router, date_key::DateKey, endpoints};

    const PASSWORD: &str = "correct-horse-battery-staple-42";

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "a very secret secret",
            "Etc/UTC",
        )
        .unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn register(server: &TestServer, username: &str) -> Cookie<'static> {
        let email = format!("{username}@example.com");
        let response = server
            .post(endpoints::USERS)
            .form(&[
                ("username", username),
                ("email", email.as_str()),
                ("password", PASSWORD),
                ("confirm_password", PASSWORD),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);

        response.cookie(COOKIE_TOKEN)
    }

    fn today() -> String {
        DateKey::new(OffsetDateTime::now_utc().date()).to_string()
    }

    #[tokio::test]
    async fn api_requires_authentication() {
        let server = get_test_server();

        let response = server.get(endpoints::EXPENSES_API).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn pages_redirect_to_log_in() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert!(
            response
                .header("location")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/no/such/page")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn records_flow_into_summaries() {
        let server = get_test_server();
        let cookie = register(&server, "alice").await;

        server
            .post(endpoints::SAVINGS_API)
            .add_cookie(cookie.clone())
            .form(&[("amount", "500"), ("date", today().as_str())])
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post(endpoints::EXPENSES_API)
            .add_cookie(cookie.clone())
            .form(&[
                ("name", "Lunch"),
                ("amount", "12.5"),
                ("category", "Food"),
                ("date", today().as_str()),
            ])
            .await
            .assert_status(StatusCode::CREATED);

        let today_summary = server
            .get(endpoints::TODAY_SUMMARY)
            .add_cookie(cookie.clone())
            .await;
        today_summary.assert_status_ok();
        today_summary.assert_json(&json!({
            "username": "alice",
            "totalAmount": 12.5,
            "perCategory": [{"category": "Food", "totalAmount": 12.5}],
        }));

        let month = server
            .get(endpoints::MONTHLY_DASHBOARD)
            .add_cookie(cookie.clone())
            .await;
        month.assert_json(&json!({"totalExpenses": 12.5, "totalSavings": 500.0}));

        let week: Value = server
            .get(endpoints::WEEK_SUMMARY)
            .add_cookie(cookie.clone())
            .await
            .json();
        assert_eq!(week["days"].as_array().unwrap().len(), 7);
        assert_eq!(week["days"][6], today());
        assert_eq!(week["series"][0]["label"], "Food");
        assert_eq!(week["series"][0]["values"][6], 12.5);

        let comparison: Value = server
            .get(endpoints::COMPARISON)
            .add_cookie(cookie.clone())
            .await
            .json();
        assert_eq!(comparison["days"].as_array().unwrap().len(), 3);

        let last_30_days: Value = server
            .get(endpoints::LAST_30_DAYS)
            .add_cookie(cookie)
            .await
            .json();
        assert_eq!(last_30_days["days"].as_array().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn expense_over_budget_is_refused() {
        let server = get_test_server();
        let cookie = register(&server, "bob").await;
        server
            .post(endpoints::SAVINGS_API)
            .add_cookie(cookie.clone())
            .form(&[("amount", "50"), ("date", today().as_str())])
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post(endpoints::EXPENSES_API)
            .add_cookie(cookie.clone())
            .form(&[
                ("name", "Phone"),
                ("amount", "60"),
                ("category", "Shopping"),
                ("date", today().as_str()),
            ])
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let expenses: Value = server
            .get(endpoints::EXPENSES_API)
            .add_cookie(cookie)
            .await
            .json();
        assert_eq!(expenses, json!([]));
    }

    #[tokio::test]
    async fn users_cannot_touch_each_others_expenses() {
        let server = get_test_server();
        let alice = register(&server, "alice").await;
        let mallory = register(&server, "mallory").await;
        server
            .post(endpoints::SAVINGS_API)
            .add_cookie(alice.clone())
            .form(&[("amount", "100"), ("date", today().as_str())])
            .await
            .assert_status(StatusCode::CREATED);
        let expense: Value = server
            .post(endpoints::EXPENSES_API)
            .add_cookie(alice.clone())
            .form(&[
                ("name", "Book"),
                ("amount", "20"),
                ("category", "Shopping"),
                ("date", today().as_str()),
            ])
            .await
            .json();
        let url = endpoints::format_endpoint(endpoints::EXPENSE, expense["id"].as_i64().unwrap());

        server
            .delete(&url)
            .add_cookie(mallory)
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&url)
            .add_cookie(alice)
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn profile_returns_username_and_email() {
        let server = get_test_server();
        let cookie = register(&server, "carol").await;

        let response = server.get(endpoints::PROFILE).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_json(&json!({"username": "carol", "email": "carol@example.com"}));
    }
}
