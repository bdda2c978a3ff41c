//! JSON endpoints for reading and appending ledger entries and resetting the ledger.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    error::JsonError,
    ledger::{
        core::{LedgerEntry, TransactionType, get_all_entries, reset_ledger},
        engine::{EntryAction, EntryRequest, record_entry},
    },
    timezone::{local_today, parse_date},
};

/// The state needed by the ledger endpoints.
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// The database connection for the ledger and settings.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Bangkok".
    pub local_timezone: String,
}

impl FromRef<AppState> for LedgerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The body of a request to add a ledger entry.
///
/// Balances sent by the client are ignored since they are always
/// calculated from the stored ledger.
#[derive(Debug, Default, Deserialize)]
pub struct NewLoanRequest {
    /// The date as `YYYY-MM-DD`. Defaults to today for interest charges only.
    pub date: Option<String>,
    /// One of `Draw`, `Repayment` or `InterestCharge`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Required for draws and repayments, not allowed for interest charges.
    pub amount: Option<f64>,
    pub notes: Option<String>,
    /// Overrides the configured rate for an interest charge.
    pub interest_rate: Option<f64>,
}

impl NewLoanRequest {
    /// Validate the request and convert it into an [EntryRequest].
    ///
    /// `today` is used when an interest charge has no date.
    pub fn into_entry_request(self, today: Date) -> Result<EntryRequest, Error> {
        let kind: TransactionType = self.kind.parse()?;
        let date = self.date.filter(|date| !date.trim().is_empty());

        let (date, action) = match kind {
            TransactionType::Draw | TransactionType::Repayment => {
                let date = parse_date(date.as_deref().unwrap_or_default())?;
                let amount = self
                    .amount
                    .ok_or_else(|| Error::InvalidAmount("nothing".to_owned()))?;

                let action = if kind == TransactionType::Draw {
                    EntryAction::Draw { amount }
                } else {
                    EntryAction::Repayment { amount }
                };

                (date, action)
            }
            TransactionType::InterestCharge => {
                if self.amount.is_some() {
                    return Err(Error::InterestAmountNotAllowed);
                }

                let date = match date {
                    Some(date) => parse_date(&date)?,
                    None => today,
                };

                (
                    date,
                    EntryAction::InterestCharge {
                        rate_override: self.interest_rate,
                    },
                )
            }
        };

        Ok(EntryRequest::new(date, action, self.notes))
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: DatabaseId,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Get every ledger entry, newest first.
pub async fn get_loans_endpoint(
    State(state): State<LedgerState>,
) -> Result<Json<Vec<LedgerEntry>>, JsonError> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entries = get_all_entries(&connection)?;

    Ok(Json(entries))
}

/// Append an entry to the ledger, calculating its balances from the latest entry.
pub async fn create_loan_endpoint(
    State(state): State<LedgerState>,
    payload: Result<Json<NewLoanRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, JsonError> {
    let Json(payload) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;

    let today = local_today(&state.local_timezone)?;
    let request = payload.into_entry_request(today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = record_entry(&request, &connection)?;

    Ok(Json(CreatedResponse { id: entry.id }))
}

/// Delete every entry and restore the default settings.
pub async fn reset_endpoint(
    State(state): State<LedgerState>,
) -> Result<Json<MessageResponse>, JsonError> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    reset_ledger(today, &connection)?;

    Ok(Json(MessageResponse {
        message: "Reset complete",
    }))
}
