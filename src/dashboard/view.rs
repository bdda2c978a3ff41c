//! The data shown on the dashboard, built from the ledger and settings.

use crate::{
    ledger::{Aggregates, LedgerEntry, compute_aggregates, latest_entry},
    settings::Settings,
};

/// The number of most recent entries plotted on the principal chart.
pub(super) const CHART_ENTRY_COUNT: usize = 10;

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardView {
    pub settings: Settings,
    pub aggregates: Aggregates,
    /// The rate new interest charges use, or `None` if the stored rate is invalid.
    pub interest_rate: Option<f64>,
    /// Every entry, newest first.
    pub rows: Vec<LedgerEntry>,
    /// `(date, principal balance)` for the most recent entries, oldest first.
    pub chart_points: Vec<(String, f64)>,
    /// The interest that would be charged now at the configured rate, if
    /// there is principal to charge it on.
    pub interest_preview: Option<f64>,
}

impl DashboardView {
    /// Build the view from `entries` in any order.
    ///
    /// `interest_rate` should be the rate that charging interest would use.
    pub fn new(
        mut entries: Vec<LedgerEntry>,
        settings: Settings,
        interest_rate: Option<f64>,
    ) -> Self {
        let aggregates = compute_aggregates(&entries);
        let principal = latest_entry(&entries)
            .map(|entry| entry.principal_balance)
            .filter(|principal| *principal > 0.0);
        let interest_preview = principal
            .zip(interest_rate)
            .map(|(principal, rate)| principal * rate / 100.0);

        entries.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));

        let chart_points = entries
            .iter()
            .take(CHART_ENTRY_COUNT)
            .rev()
            .map(|entry| (entry.date.to_string(), entry.principal_balance))
            .collect();

        Self {
            settings,
            aggregates,
            interest_rate,
            rows: entries,
            chart_points,
            interest_preview,
        }
    }
}
