//! CSV export of the ledger.

use axum::{
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    error::JsonError,
    ledger::{
        api::LedgerState,
        core::{LedgerEntry, get_all_entries},
    },
    settings::{Settings, get_settings},
};

/// A row of the exported CSV file.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    date: String,
    #[serde(rename = "type")]
    kind: &'static str,
    amount: f64,
    principal_balance: f64,
    interest_accrued: f64,
    notes: &'a str,
}

impl<'a> From<&'a LedgerEntry> for ExportRow<'a> {
    fn from(entry: &'a LedgerEntry) -> Self {
        Self {
            date: entry.date.to_string(),
            kind: entry.kind.as_str(),
            amount: entry.amount,
            principal_balance: entry.principal_balance,
            interest_accrued: entry.interest_accrued,
            notes: entry.notes.as_deref().unwrap_or_default(),
        }
    }
}

/// Write `entries` as CSV with a header row, keeping the order of `entries`.
///
/// # Errors
/// Returns [Error::CsvError] if a row could not be written.
pub fn write_csv(entries: &[LedgerEntry]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if entries.is_empty() {
        writer.write_record([
            "date",
            "type",
            "amount",
            "principal_balance",
            "interest_accrued",
            "notes",
        ])?;
    }

    for entry in entries {
        writer.serialize(ExportRow::from(entry))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

/// The download name for the export, e.g. `loan_report_Somchai.csv`.
///
/// Only ASCII letters, digits, `-` and `_` are kept from `borrower_name`.
pub fn export_file_name(borrower_name: &str) -> String {
    let name: String = borrower_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if name.is_empty() {
        "loan_report_export.csv".to_owned()
    } else {
        format!("loan_report_{name}.csv")
    }
}

fn build_export(connection: &Connection) -> Result<(String, String), Error> {
    let entries = get_all_entries(connection)?;
    let settings = Settings::from_map(&get_settings(connection)?);

    Ok((write_csv(&entries)?, export_file_name(&settings.borrower_name)))
}

/// Download every ledger entry as a CSV file, newest first.
pub async fn export_csv_endpoint(State(state): State<LedgerState>) -> Result<Response, JsonError> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (csv, file_name) = build_export(&connection)?;
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|error| Error::CsvError(error.to_string()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
