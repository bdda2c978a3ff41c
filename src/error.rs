//! Defines the app level error type and conversions to JSON responses, rendered HTML pages and alerts.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::Date;

use crate::{
    alert::Alert,
    error_pages::{InternalServerError, NotFoundError},
};

/// The message shown to clients for errors whose details should stay in the server logs.
const UNEXPECTED_ERROR_DETAILS: &str =
    "An unexpected error occurred, check the server logs for more details.";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount for a draw or repayment was missing, not a number, zero or negative.
    #[error("{0} is not a valid amount, enter an amount greater than zero")]
    InvalidAmount(String),

    /// A date was missing or was not a calendar date in the form `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, use the format YYYY-MM-DD")]
    InvalidDate(String),

    /// The entry is dated before the latest entry in the ledger.
    ///
    /// Balances are built on the latest entry, so entries must be added in date order.
    #[error("{date} is before the latest entry on {latest}, entries must be added in date order")]
    DateBeforeLatestEntry {
        /// The date of the rejected entry.
        date: Date,
        /// The date of the latest entry in the ledger.
        latest: Date,
    },

    /// The transaction type is not one of the supported types.
    #[error("\"{0}\" is not a transaction type, expected Draw, Repayment or InterestCharge")]
    InvalidTransactionType(String),

    /// An interest rate was negative or not a finite number.
    #[error("{0} is not a valid interest rate, use a percentage of zero or more")]
    InvalidInterestRate(String),

    /// The caller tried to set the amount of an interest charge.
    ///
    /// Interest is always calculated from the outstanding principal so that
    /// arbitrary amounts cannot be recorded as interest.
    #[error("the amount of an interest charge is calculated from the principal and cannot be set")]
    InterestAmountNotAllowed,

    /// Interest was requested while the outstanding principal is zero or negative.
    #[error("there is no outstanding principal to charge interest on (principal is {0})")]
    NoPrincipal(f64),

    /// The setting key is not one the application knows about.
    #[error("\"{0}\" is not a known setting")]
    UnknownSetting(String),

    /// The value for a setting failed validation.
    #[error("invalid value for the setting \"{key}\": {reason}")]
    InvalidSetting {
        /// The key of the setting.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The request body could not be parsed.
    #[error("could not read the request: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The ledger could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::DateBeforeLatestEntry { .. }
            | Error::InvalidTransactionType(_)
            | Error::InvalidInterestRate(_)
            | Error::InterestAmountNotAllowed
            | Error::UnknownSetting(_)
            | Error::InvalidSetting { .. }
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::NoPrincipal(_) => StatusCode::CONFLICT,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::CsvError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message that is safe to show to a client.
    ///
    /// Server errors are replaced by a generic message so that internal
    /// details only end up in the logs.
    fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
            UNEXPECTED_ERROR_DETAILS.to_owned()
        } else {
            self.to_string()
        }
    }

    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let message = match &self {
            Error::NoPrincipal(_) => "Cannot charge interest",
            Error::InvalidSetting { .. } | Error::UnknownSetting(_) => "Could not save settings",
            error if error.status_code().is_client_error() => "Invalid transaction",
            _ => "Something went wrong",
        };

        self.into_alert_response_with_message(message)
    }

    /// Convert the error into an HTTP response with an HTML alert headed by `message`.
    pub fn into_alert_response_with_message(self, message: &str) -> Response {
        let status_code = self.status_code();
        let alert = Alert::Error {
            message: message.to_owned(),
            details: self.client_message(),
        };

        (status_code, alert.into_html()).into_response()
    }

    /// Convert the error into an HTTP response with a JSON body of the form `{"error": "..."}`.
    pub fn into_json_response(self) -> Response {
        let status_code = self.status_code();
        let body = ErrorBody {
            error: self.client_message(),
        };

        (status_code, Json(body)).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Wraps [Error] so that JSON endpoints can use `?` and respond with a JSON error body.
#[derive(Debug, PartialEq)]
pub struct JsonError(pub Error);

impl From<Error> for JsonError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        self.0.into_json_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::{Error, JsonError};

    async fn response_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");

        String::from_utf8_lossy(&body).to_string()
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(
            Error::InvalidAmount("-1".to_owned()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InterestAmountNotAllowed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::NoPrincipal(0.0).status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn json_error_contains_message() {
        let response = JsonError(Error::InvalidDate("tomorrow".to_owned())).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let text = response_text(response).await;
        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            body["error"],
            "\"tomorrow\" is not a valid date, use the format YYYY-MM-DD"
        );
    }

    #[tokio::test]
    async fn json_error_hides_server_error_details() {
        let response = JsonError(Error::CsvError("disk on fire".to_owned())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = response_text(response).await;
        assert!(!text.contains("disk on fire"), "got {text}");
    }

    #[tokio::test]
    async fn alert_response_has_error_status() {
        let response = Error::NoPrincipal(0.0).into_alert_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let text = response_text(response).await;
        assert!(text.contains("Cannot charge interest"), "got {text}");
    }

    #[tokio::test]
    async fn alert_response_uses_given_heading() {
        let response = Error::InvalidSetting {
            key: "interestRate".to_owned(),
            reason: "not a number".to_owned(),
        }
        .into_alert_response_with_message("Cannot charge interest");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let text = response_text(response).await;
        assert!(text.contains("Cannot charge interest"), "got {text}");
        assert!(!text.contains("Could not save settings"), "got {text}");
    }
}
