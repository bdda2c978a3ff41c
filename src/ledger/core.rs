//! The loan transaction record and its table.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, OptionalExtension, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::Serialize;
use time::Date;

use crate::{Error, database_id::DatabaseId, settings::reset_settings};

/// The columns of the `loan` table in the order [map_row_to_entry] expects.
const ENTRY_COLUMNS: &str =
    "id, date, type, amount, balance, principal_balance, interest_accrued, notes, interest_rate";

/// What a ledger entry did to the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionType {
    /// More money was lent, increasing the principal.
    Draw,
    /// Money was paid back, reducing the principal.
    Repayment,
    /// Interest was charged on the principal. The principal does not change.
    InterestCharge,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Draw => "Draw",
            TransactionType::Repayment => "Repayment",
            TransactionType::InterestCharge => "InterestCharge",
        }
    }

    /// A short name for display.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Draw => "Draw",
            TransactionType::Repayment => "Repayment",
            TransactionType::InterestCharge => "Interest",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim() {
            "Draw" => Ok(TransactionType::Draw),
            "Repayment" => Ok(TransactionType::Repayment),
            "InterestCharge" => Ok(TransactionType::InterestCharge),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A transaction in the loan ledger.
///
/// Entries are never changed once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    /// The ID assigned by the database, increasing with each insert.
    pub id: DatabaseId,
    /// When the transaction happened.
    pub date: Date,
    /// What the transaction did to the loan.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The size of the transaction, never negative.
    pub amount: f64,
    /// The total owed after this transaction: principal plus unpaid interest.
    pub balance: f64,
    /// The principal owed after this transaction, excluding interest.
    pub principal_balance: f64,
    /// The part of `amount` that is interest, only non-zero for interest charges.
    pub interest_accrued: f64,
    /// Free text from the user.
    pub notes: Option<String>,
    /// The interest rate in effect when the transaction was recorded.
    pub interest_rate: f64,
}

/// The fields of a ledger entry before the database assigns an ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub date: Date,
    pub kind: TransactionType,
    pub amount: f64,
    pub balance: f64,
    pub principal_balance: f64,
    pub interest_accrued: f64,
    pub notes: Option<String>,
    pub interest_rate: f64,
}

pub fn create_ledger_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS loan (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            type TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            balance REAL NOT NULL,
            principal_balance REAL NOT NULL,
            interest_accrued REAL NOT NULL DEFAULT 0,
            notes TEXT,
            interest_rate REAL NOT NULL DEFAULT 0
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_loan_date_id ON loan(date, id)",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_entry(row: &Row) -> Result<LedgerEntry, rusqlite::Error> {
    Ok(LedgerEntry {
        id: row.get(0)?,
        date: row.get(1)?,
        kind: row.get(2)?,
        amount: row.get(3)?,
        balance: row.get(4)?,
        principal_balance: row.get(5)?,
        interest_accrued: row.get(6)?,
        notes: row.get(7)?,
        interest_rate: row.get(8)?,
    })
}

/// Append `entry` to the ledger.
///
/// # Errors
/// Returns [Error::SqlError] if the insert fails, e.g. a negative amount.
pub fn insert_entry(entry: &NewEntry, connection: &Connection) -> Result<LedgerEntry, Error> {
    connection.execute(
        "INSERT INTO loan (date, type, amount, balance, principal_balance, interest_accrued, notes, interest_rate)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.date,
            entry.kind,
            entry.amount,
            entry.balance,
            entry.principal_balance,
            entry.interest_accrued,
            entry.notes,
            entry.interest_rate,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(LedgerEntry {
        id,
        date: entry.date,
        kind: entry.kind,
        amount: entry.amount,
        balance: entry.balance,
        principal_balance: entry.principal_balance,
        interest_accrued: entry.interest_accrued,
        notes: entry.notes.clone(),
        interest_rate: entry.interest_rate,
    })
}

/// Get the most recent entry by date, using the ID to break ties.
///
/// Returns `None` if the ledger is empty.
pub fn get_latest_entry(connection: &Connection) -> Result<Option<LedgerEntry>, Error> {
    let entry = connection
        .query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM loan ORDER BY date DESC, id DESC LIMIT 1"),
            [],
            map_row_to_entry,
        )
        .optional()?;

    Ok(entry)
}

/// Get every entry, newest first (by date, then ID).
pub fn get_all_entries(connection: &Connection) -> Result<Vec<LedgerEntry>, Error> {
    let mut stmt =
        connection.prepare(&format!("SELECT {ENTRY_COLUMNS} FROM loan ORDER BY date DESC, id DESC"))?;

    let entries = stmt
        .query_map([], map_row_to_entry)?
        .collect::<Result<Vec<LedgerEntry>, rusqlite::Error>>()?;

    Ok(entries)
}

/// Delete every ledger entry and restore the default settings.
///
/// Both happen in one SQL transaction, so a failure leaves everything as it was.
/// `today` becomes the default start date.
///
/// # Errors
/// Returns [Error::SqlError] if any statement fails.
pub fn reset_ledger(today: Date, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let deleted = transaction.execute("DELETE FROM loan", ())?;
    reset_settings(today, &transaction)?;

    transaction.commit()?;

    tracing::info!("Reset the ledger, deleted {deleted} entries");

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        settings::{get_settings, upsert_setting},
    };

    use super::{
        NewEntry, TransactionType, get_all_entries, get_latest_entry, insert_entry, reset_ledger,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn, date!(2024 - 01 - 01)).unwrap();
        conn
    }

    fn draw(date: time::Date, amount: f64) -> NewEntry {
        NewEntry {
            date,
            kind: TransactionType::Draw,
            amount,
            balance: amount,
            principal_balance: amount,
            interest_accrued: 0.0,
            notes: None,
            interest_rate: 5.0,
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let conn = get_test_connection();

        let first = insert_entry(&draw(date!(2024 - 01 - 01), 100.0), &conn).unwrap();
        let second = insert_entry(&draw(date!(2024 - 01 - 01), 200.0), &conn).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn insert_round_trips_all_fields() {
        let conn = get_test_connection();
        let want = NewEntry {
            date: date!(2024 - 02 - 01),
            kind: TransactionType::InterestCharge,
            amount: 50.0,
            balance: 1050.0,
            principal_balance: 1000.0,
            interest_accrued: 50.0,
            notes: Some("Monthly interest (5%)".to_owned()),
            interest_rate: 5.0,
        };

        let inserted = insert_entry(&want, &conn).unwrap();
        let got = get_latest_entry(&conn).unwrap();

        assert_eq!(got, Some(inserted));
    }

    #[test]
    fn negative_amount_is_rejected_by_the_table() {
        let conn = get_test_connection();

        let result = insert_entry(&draw(date!(2024 - 01 - 01), -1.0), &conn);

        assert!(matches!(result, Err(Error::SqlError(_))), "got {result:?}");
        assert!(get_all_entries(&conn).unwrap().is_empty());
    }

    #[test]
    fn latest_is_none_for_empty_ledger() {
        let conn = get_test_connection();

        assert_eq!(get_latest_entry(&conn), Ok(None));
    }

    #[test]
    fn latest_orders_by_date_then_id() {
        let conn = get_test_connection();
        insert_entry(&draw(date!(2024 - 03 - 01), 1.0), &conn).unwrap();
        let want = insert_entry(&draw(date!(2024 - 03 - 01), 2.0), &conn).unwrap();
        // Back-dated entries are older even though they were inserted later.
        insert_entry(&draw(date!(2024 - 02 - 01), 3.0), &conn).unwrap();

        assert_eq!(get_latest_entry(&conn), Ok(Some(want)));
    }

    #[test]
    fn all_entries_are_newest_first() {
        let conn = get_test_connection();
        let a = insert_entry(&draw(date!(2024 - 01 - 10), 1.0), &conn).unwrap();
        let b = insert_entry(&draw(date!(2024 - 01 - 20), 2.0), &conn).unwrap();
        let c = insert_entry(&draw(date!(2024 - 01 - 10), 3.0), &conn).unwrap();

        let got = get_all_entries(&conn).unwrap();

        assert_eq!(got, vec![b, c, a]);
    }

    #[test]
    fn reset_deletes_entries_and_restores_settings() {
        let conn = get_test_connection();
        insert_entry(&draw(date!(2024 - 01 - 10), 1.0), &conn).unwrap();
        upsert_setting("interestRate", "9", &conn).unwrap();
        upsert_setting("theme", "light", &conn).unwrap();

        reset_ledger(date!(2024 - 05 - 05), &conn).unwrap();

        assert!(get_all_entries(&conn).unwrap().is_empty());
        let settings = get_settings(&conn).unwrap();
        assert_eq!(
            settings.keys().collect::<Vec<_>>(),
            vec!["borrowerName", "interestRate", "startDate"]
        );
        assert_eq!(settings["interestRate"], "5");
    }

    #[test]
    fn transaction_type_parses_stored_names() {
        for kind in [
            TransactionType::Draw,
            TransactionType::Repayment,
            TransactionType::InterestCharge,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionType>(), Ok(kind));
        }

        assert_eq!(
            "Loan".parse::<TransactionType>(),
            Err(Error::InvalidTransactionType("Loan".to_owned()))
        );
    }
}
