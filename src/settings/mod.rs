//! Loan settings: interest rate, start date, borrower name and theme.

mod api;
mod core;
mod page;

pub use api::{get_settings_endpoint, update_setting_endpoint};
pub use core::{
    Settings, Theme, create_settings_table, get_interest_rate, get_settings, reset_settings,
    seed_default_settings, upsert_setting,
};
pub use page::{get_settings_page, update_settings_endpoint, update_theme_endpoint};
