//! The URIs of the pages and API endpoints.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The ledger overview with forms for adding transactions.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for editing the loan settings.
pub const SETTINGS_VIEW: &str = "/settings";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The form endpoint for recording a draw or repayment.
pub const TRANSACTIONS: &str = "/transactions";
/// The form endpoint for charging interest at the configured rate.
pub const INTEREST: &str = "/transactions/interest";
/// The form endpoint for saving the loan settings.
pub const SETTINGS_FORM: &str = "/settings/form";
/// The form endpoint for switching between the dark and light themes.
pub const THEME: &str = "/settings/theme";

/// The route to list and add ledger entries as JSON.
pub const LOANS_API: &str = "/api/loans";
/// The route to read and update settings as JSON.
pub const SETTINGS_API: &str = "/api/settings";
/// The route to delete every ledger entry and restore the default settings.
pub const RESET_API: &str = "/api/reset";
/// The route to download the ledger as CSV.
pub const EXPORT_API: &str = "/api/export";

#[cfg(test)]
mod tests {
    use axum::http::Uri;

    use super::*;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(endpoint: &str) {
        assert!(endpoint.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            ROOT,
            DASHBOARD_VIEW,
            SETTINGS_VIEW,
            INTERNAL_ERROR_VIEW,
            STATIC,
            TRANSACTIONS,
            INTEREST,
            SETTINGS_FORM,
            THEME,
            LOANS_API,
            SETTINGS_API,
            RESET_API,
            EXPORT_API,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }
}
