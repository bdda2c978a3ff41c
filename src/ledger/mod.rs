//! The loan ledger: an append-only list of draws, repayments and interest charges.

mod api;
mod core;
mod engine;
mod export;

pub use api::{create_loan_endpoint, get_loans_endpoint, reset_endpoint};
pub use core::{LedgerEntry, TransactionType, create_ledger_table, get_all_entries};
pub use engine::{
    Aggregates, EntryAction, EntryRequest, compute_aggregates, latest_entry, record_entry,
};
pub use export::export_csv_endpoint;
