//! Dashboard module
//!
//! Provides the overview page with the loan totals, a chart of the principal,
//! the list of transactions and the forms for adding to the ledger.

mod cards;
mod charts;
mod forms;
mod handlers;
mod tables;
mod view;

pub use handlers::{
    DashboardState, charge_interest_endpoint, create_transaction_endpoint, get_dashboard_page,
};
