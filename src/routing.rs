//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{charge_interest_endpoint, create_transaction_endpoint, get_dashboard_page},
    endpoints,
    error_pages::{get_404_not_found, get_internal_server_error_page},
    ledger::{create_loan_endpoint, export_csv_endpoint, get_loans_endpoint, reset_endpoint},
    settings::{
        get_settings_endpoint, get_settings_page, update_setting_endpoint,
        update_settings_endpoint, update_theme_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // Targets for the HTMX forms on the pages above.
    let form_routes = Router::new()
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(endpoints::INTEREST, post(charge_interest_endpoint))
        .route(endpoints::SETTINGS_FORM, post(update_settings_endpoint))
        .route(endpoints::THEME, post(update_theme_endpoint));

    let api_routes = Router::new()
        .route(
            endpoints::LOANS_API,
            get(get_loans_endpoint).post(create_loan_endpoint),
        )
        .route(
            endpoints::SETTINGS_API,
            get(get_settings_endpoint).post(update_setting_endpoint),
        )
        .route(endpoints::RESET_API, delete(reset_endpoint))
        .route(endpoints::EXPORT_API, get(export_csv_endpoint));

    page_routes
        .merge(form_routes)
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod api_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "Asia/Bangkok").unwrap();

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn records_draw_interest_and_repayment() {
        let server = get_test_server();

        server
            .post(endpoints::SETTINGS_API)
            .json(&json!({"key": "interestRate", "value": 5}))
            .await
            .assert_status_ok();
        server
            .post(endpoints::LOANS_API)
            .json(&json!({"date": "2024-01-01", "type": "Draw", "amount": 1000}))
            .await
            .assert_status_ok();
        server
            .post(endpoints::LOANS_API)
            .json(&json!({"date": "2024-01-31", "type": "InterestCharge"}))
            .await
            .assert_status_ok();
        server
            .post(endpoints::LOANS_API)
            .json(&json!({"date": "2024-02-15", "type": "Repayment", "amount": 200}))
            .await
            .assert_status_ok();

        let entries = server.get(endpoints::LOANS_API).await.json::<Vec<Value>>();

        assert_eq!(entries.len(), 3);
        let newest = &entries[0];
        assert_eq!(newest["type"], "Repayment");
        assert_eq!(newest["balance"], 850.0);
        assert_eq!(newest["principal_balance"], 800.0);
        let interest = &entries[1];
        assert_eq!(interest["type"], "InterestCharge");
        assert_eq!(interest["amount"], 50.0);
        assert_eq!(interest["notes"], "Monthly interest (5%)");
    }

    #[tokio::test]
    async fn interest_without_principal_is_conflict() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOANS_API)
            .json(&json!({"date": "2024-01-31", "type": "InterestCharge"}))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body = response.json::<Value>();
        assert!(body["error"].is_string(), "got {body}");
    }

    #[tokio::test]
    async fn back_dated_entry_is_bad_request() {
        let server = get_test_server();
        server
            .post(endpoints::LOANS_API)
            .json(&json!({"date": "2024-03-01", "type": "Draw", "amount": 1000}))
            .await
            .assert_status_ok();

        let response = server
            .post(endpoints::LOANS_API)
            .json(&json!({"date": "2024-02-01", "type": "Draw", "amount": 500}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let entries = server.get(endpoints::LOANS_API).await.json::<Vec<Value>>();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["principal_balance"], 1000.0);
    }

    #[tokio::test]
    async fn reset_clears_ledger_and_restores_settings() {
        let server = get_test_server();
        server
            .post(endpoints::LOANS_API)
            .json(&json!({"date": "2024-01-01", "type": "Draw", "amount": 1000}))
            .await
            .assert_status_ok();
        server
            .post(endpoints::SETTINGS_API)
            .json(&json!({"key": "theme", "value": "light"}))
            .await
            .assert_status_ok();

        let response = server.delete(endpoints::RESET_API).await;

        response.assert_status_ok();
        response.assert_json(&json!({"message": "Reset complete"}));
        let entries = server.get(endpoints::LOANS_API).await.json::<Vec<Value>>();
        assert!(entries.is_empty());
        let settings = server.get(endpoints::SETTINGS_API).await.json::<Value>();
        let settings = settings.as_object().unwrap();
        assert_eq!(settings.len(), 3, "got {settings:?}");
        assert!(!settings.contains_key("theme"));
    }

    #[tokio::test]
    async fn export_downloads_csv() {
        let server = get_test_server();

        let response = server.get(endpoints::EXPORT_API).await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "text/csv; charset=utf-8");
        let disposition = response.header("content-disposition");
        let disposition = disposition.to_str().unwrap();
        assert!(
            disposition.starts_with("attachment; filename="),
            "got {disposition}"
        );
        assert!(
            response
                .text()
                .starts_with("date,type,amount,principal_balance,interest_accrued,notes")
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/no-such-page").await;

        response.assert_status_not_found();
    }
}
