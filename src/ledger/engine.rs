//! The balance engine: how each transaction changes the principal and the total owed.
//!
//! Interest is simple interest. An interest charge adds to the total owed but
//! never to the principal, so interest is never charged on interest.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    ledger::core::{LedgerEntry, NewEntry, TransactionType, get_latest_entry, insert_entry},
    settings::get_interest_rate,
};

/// What the caller wants to record.
///
/// Interest charges carry no amount: the amount is always calculated from
/// the outstanding principal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryAction {
    /// Lend `amount` more.
    Draw {
        /// How much was lent.
        amount: f64,
    },
    /// The borrower paid back `amount`.
    Repayment {
        /// How much was paid back.
        amount: f64,
    },
    /// Charge interest on the principal.
    InterestCharge {
        /// The rate in percent, or `None` to use the configured rate.
        rate_override: Option<f64>,
    },
}

impl EntryAction {
    /// The type of transaction this action is recorded as.
    pub fn kind(&self) -> TransactionType {
        match self {
            EntryAction::Draw { .. } => TransactionType::Draw,
            EntryAction::Repayment { .. } => TransactionType::Repayment,
            EntryAction::InterestCharge { .. } => TransactionType::InterestCharge,
        }
    }
}

/// A request to add an entry to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRequest {
    /// When the transaction happened.
    pub date: Date,
    /// What to record.
    pub action: EntryAction,
    /// Free text from the user, never blank.
    pub notes: Option<String>,
}

impl EntryRequest {
    /// Create a request, dropping `notes` if it is only whitespace.
    pub fn new(date: Date, action: EntryAction, notes: Option<String>) -> Self {
        Self {
            date,
            action,
            notes: notes
                .map(|notes| notes.trim().to_owned())
                .filter(|notes| !notes.is_empty()),
        }
    }
}

/// Totals over the whole ledger for display.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregates {
    /// The sum of every draw.
    pub total_drawn: f64,
    /// The sum of every repayment.
    pub total_repaid: f64,
    /// The sum of every interest charge.
    pub total_interest_accrued: f64,
    /// The principal after the latest entry.
    pub current_principal: f64,
    /// The total owed after the latest entry.
    pub current_balance: f64,
}

/// Calculate the entry to store for `request`, given the `latest` entry in the ledger.
///
/// `settings_rate` is the configured interest rate, used for interest charges
/// without an override and recorded on every entry.
///
/// # Errors
/// - [Error::InvalidAmount] if a draw or repayment amount is not a positive, finite number,
///   or if the new balances would not be finite.
/// - [Error::InvalidInterestRate] if the rate for an interest charge is negative or not finite.
/// - [Error::NoPrincipal] if interest is requested while the principal is zero or less.
/// - [Error::DateBeforeLatestEntry] if `request` is dated before `latest`.
pub fn compute_next_entry(
    latest: Option<&LedgerEntry>,
    request: &EntryRequest,
    settings_rate: f64,
) -> Result<NewEntry, Error> {
    // Same-day entries are fine, the ID orders them.
    if let Some(latest) = latest.filter(|latest| request.date < latest.date) {
        return Err(Error::DateBeforeLatestEntry {
            date: request.date,
            latest: latest.date,
        });
    }

    let principal_before = latest.map_or(0.0, |entry| entry.principal_balance);
    let balance_before = latest.map_or(0.0, |entry| entry.balance);

    let (amount, principal_after, balance_after, interest_accrued, interest_rate, notes) =
        match request.action {
            EntryAction::Draw { amount } => {
                validate_amount(amount)?;
                (
                    amount,
                    principal_before + amount,
                    balance_before + amount,
                    0.0,
                    settings_rate,
                    request.notes.clone(),
                )
            }
            // Overpaying is allowed and leaves a negative principal.
            EntryAction::Repayment { amount } => {
                validate_amount(amount)?;
                (
                    amount,
                    principal_before - amount,
                    balance_before - amount,
                    0.0,
                    settings_rate,
                    request.notes.clone(),
                )
            }
            EntryAction::InterestCharge { rate_override } => {
                let rate = rate_override.unwrap_or(settings_rate);

                if !rate.is_finite() || rate < 0.0 {
                    return Err(Error::InvalidInterestRate(rate.to_string()));
                }

                if principal_before <= 0.0 {
                    return Err(Error::NoPrincipal(principal_before));
                }

                let interest = principal_before * rate / 100.0;
                let notes = request
                    .notes
                    .clone()
                    .or_else(|| Some(format!("Monthly interest ({rate}%)")));

                (
                    interest,
                    principal_before,
                    balance_before + interest,
                    interest,
                    rate,
                    notes,
                )
            }
        };

    if !principal_after.is_finite() || !balance_after.is_finite() {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    Ok(NewEntry {
        date: request.date,
        kind: request.action.kind(),
        amount,
        balance: balance_after,
        principal_balance: principal_after,
        interest_accrued,
        notes,
        interest_rate,
    })
}

fn validate_amount(amount: f64) -> Result<(), Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidAmount(amount.to_string()))
    }
}

/// Get the most recent entry in `history` by date, using the ID to break ties.
pub fn latest_entry(history: &[LedgerEntry]) -> Option<&LedgerEntry> {
    history.iter().max_by_key(|entry| (entry.date, entry.id))
}

/// Sum draws, repayments and interest over `history`, which may be in any order.
pub fn compute_aggregates(history: &[LedgerEntry]) -> Aggregates {
    let mut aggregates = history
        .iter()
        .fold(Aggregates::default(), |mut totals, entry| {
            match entry.kind {
                TransactionType::Draw => totals.total_drawn += entry.amount,
                TransactionType::Repayment => totals.total_repaid += entry.amount,
                TransactionType::InterestCharge => {}
            }

            totals.total_interest_accrued += entry.interest_accrued;
            totals
        });

    if let Some(latest) = latest_entry(history) {
        aggregates.current_principal = latest.principal_balance;
        aggregates.current_balance = latest.balance;
    }

    aggregates
}

/// Calculate and store the next ledger entry for `request`.
///
/// Reading the latest entry, reading the interest rate and inserting the new
/// entry happen in one SQL transaction, so the new balances are always based
/// on what is in the database. Nothing is written if any step fails.
///
/// # Errors
/// Returns the validation errors of [compute_next_entry], or [Error::SqlError]
/// if the database could not be read or written.
pub fn record_entry(request: &EntryRequest, connection: &Connection) -> Result<LedgerEntry, Error> {
    let transaction = connection.unchecked_transaction()?;

    let latest = get_latest_entry(&transaction)?;
    let settings_rate = get_interest_rate(&transaction)?;
    let new_entry = compute_next_entry(latest.as_ref(), request, settings_rate)?;
    let entry = insert_entry(&new_entry, &transaction)?;

    transaction.commit()?;

    tracing::info!(
        "Recorded {} of {} on {}, principal is now {} and balance {}",
        entry.kind,
        entry.amount,
        entry.date,
        entry.principal_balance,
        entry.balance
    );

    Ok(entry)
}
