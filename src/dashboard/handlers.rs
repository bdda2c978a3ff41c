//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - The form handlers for recording transactions and charging interest
//! - The HTML view for the whole page

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    dashboard::{
        cards::summary_cards_view,
        charts::{DashboardChart, charts_script, principal_chart},
        forms::{interest_form, ledger_actions, reset_script, transaction_form},
        tables::transactions_table,
        view::DashboardView,
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    ledger::{EntryAction, EntryRequest, TransactionType, get_all_entries, record_entry},
    navigation::NavBar,
    settings::{Settings, get_interest_rate, get_settings},
    timezone::{local_today, parse_date},
};

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard page and handling its forms.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for the ledger and settings.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Bangkok".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Form data for recording a draw or repayment.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionForm {
    fn into_entry_request(self) -> Result<EntryRequest, Error> {
        let kind: TransactionType = self.kind.parse()?;
        let amount = self.amount.trim();
        let amount: f64 = amount
            .parse()
            .map_err(|_| Error::InvalidAmount(amount.to_owned()))?;

        let action = match kind {
            TransactionType::Draw => EntryAction::Draw { amount },
            TransactionType::Repayment => EntryAction::Repayment { amount },
            TransactionType::InterestCharge => return Err(Error::InterestAmountNotAllowed),
        };

        Ok(EntryRequest::new(parse_date(&self.date)?, action, self.notes))
    }
}

/// Form data for charging interest.
#[derive(Debug, Deserialize)]
pub struct InterestForm {
    /// Defaults to today when missing or empty.
    #[serde(default)]
    pub date: Option<String>,
}

/// Display the ledger totals, chart, transactions and forms.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let (entries, settings, interest_rate) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let entries = get_all_entries(&connection)
            .inspect_err(|error| tracing::error!("could not get ledger entries: {error}"))?;
        let settings = Settings::from_map(&get_settings(&connection)?);
        let interest_rate = get_interest_rate(&connection)
            .inspect_err(|error| tracing::warn!("could not read the interest rate: {error}"))
            .ok();

        (entries, settings, interest_rate)
    };

    let view = DashboardView::new(entries, settings, interest_rate);

    Ok(dashboard_view(&view, today).into_response())
}

/// A route handler for recording a draw or repayment, redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<DashboardState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let request = match form.into_entry_request() {
        Ok(request) => request,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match record_entry(&request, &connection) {
        Ok(_) => redirect_to_dashboard(),
        Err(error) => error.into_alert_response(),
    }
}

/// A route handler for charging interest at the configured rate, redirects to the dashboard on success.
pub async fn charge_interest_endpoint(
    State(state): State<DashboardState>,
    Form(form): Form<InterestForm>,
) -> Response {
    let date = match form.date.filter(|date| !date.trim().is_empty()) {
        Some(date) => parse_date(&date),
        None => local_today(&state.local_timezone),
    };

    let date = match date {
        Ok(date) => date,
        Err(error) => return error.into_alert_response(),
    };

    let request = EntryRequest::new(
        date,
        EntryAction::InterestCharge {
            rate_override: None,
        },
        None,
    );

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match record_entry(&request, &connection) {
        Ok(_) => redirect_to_dashboard(),
        Err(error) if error.status_code().is_client_error() => {
            error.into_alert_response_with_message("Cannot charge interest")
        }
        Err(error) => error.into_alert_response(),
    }
}

fn redirect_to_dashboard() -> Response {
    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn dashboard_view(view: &DashboardView, today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, view.settings.theme).into_html();
    let has_entries = !view.rows.is_empty();
    let charts = [DashboardChart {
        id: "principal-chart",
        options: principal_chart(&view.chart_points).to_string(),
    }];

    let content = html!(
        (nav_bar)

        div id="dashboard-content" class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full mb-6"
            {
                h2 class="text-2xl font-bold" { (view.settings.borrower_name) }

                @if let Some(start_date) = view.settings.start_date {
                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "Loan started " (start_date)
                    }
                }
            }

            (summary_cards_view(&view.aggregates))

            @if has_entries {
                section id="charts" class="w-full mb-8"
                {
                    @for chart in &charts {
                        div id=(chart.id) class="min-h-[320px] rounded" {}
                    }
                }
            }

            div class="w-full grid grid-cols-1 lg:grid-cols-2 gap-4 mb-8"
            {
                (transaction_form(today))
                (interest_form(today, view.interest_rate, view.interest_preview))
            }

            section class="w-full mb-8"
            {
                h3 class="text-xl font-semibold mb-4" { "Transactions" }
                (transactions_table(&view.rows))
            }

            (ledger_actions())
        }
    );

    let mut scripts = vec![reset_script()];

    if has_entries {
        scripts.push(HeadElement::ScriptLink(ECHARTS_URL.to_owned()));
        scripts.push(charts_script(&charts, view.settings.theme));
    }

    base("Dashboard", view.settings.theme, &scripts, &content)
}
