//! The settings page and the form endpoints for saving settings and the theme.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRefresh;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    settings::{
        api::SettingsState,
        core::{SettingKey, Settings, get_settings, upsert_setting},
    },
};

/// The form data for the loan settings.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub borrower_name: String,
    pub interest_rate: String,
    pub start_date: String,
}

/// The form data for switching themes.
#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub theme: String,
}

fn settings_view(settings: &Settings) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW, settings.theme).into_html();
    let spinner = loading_spinner();
    let start_date = settings.start_date.map(|date| date.to_string());

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md"
            {
                form
                    id="settings-form"
                    hx-post=(endpoints::SETTINGS_FORM)
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    class=(FORM_CONTAINER_STYLE)
                {
                    h2 class="text-xl font-bold" { "Loan Settings" }

                    div
                    {
                        label for="borrower_name" class=(FORM_LABEL_STYLE) { "Borrower" }

                        input
                            name="borrower_name"
                            id="borrower_name"
                            type="text"
                            value=(settings.borrower_name)
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="interest_rate" class=(FORM_LABEL_STYLE) { "Interest rate (% per month)" }

                        input
                            name="interest_rate"
                            id="interest_rate"
                            type="number"
                            step="0.01"
                            min="0"
                            value=(settings.interest_rate)
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="start_date" class=(FORM_LABEL_STYLE) { "Loan start date" }

                        input
                            name="start_date"
                            id="start_date"
                            type="date"
                            value=[start_date]
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE)
                    {
                        span id="indicator" class="inline htmx-indicator" { (spinner) }
                        "Save Settings"
                    }
                }
            }
        }
    };

    base("Settings", settings.theme, &[], &content)
}

/// Display the form for editing the loan settings.
pub async fn get_settings_page(State(state): State<SettingsState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let settings = Settings::from_map(&get_settings(&connection)?);

    Ok(settings_view(&settings).into_response())
}

/// Store every value in `form`, or none of them if any value is invalid.
fn save_settings_form(form: &SettingsForm, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    for (key, value) in [
        (SettingKey::BorrowerName, &form.borrower_name),
        (SettingKey::InterestRate, &form.interest_rate),
        (SettingKey::StartDate, &form.start_date),
    ] {
        upsert_setting(key.as_str(), value, &transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

/// A route handler for saving the loan settings, responds with an alert.
pub async fn update_settings_endpoint(
    State(state): State<SettingsState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = save_settings_form(&form, &connection) {
        tracing::debug!("Could not save settings {form:?}: {error}");
        return error.into_alert_response();
    }

    tracing::info!("Updated the loan settings");

    Alert::Success {
        message: "Settings saved".to_owned(),
        details: "New interest charges will use the new rate.".to_owned(),
    }
    .into_html()
    .into_response()
}

/// A route handler for storing the theme, tells HTMX to reload the page on success.
pub async fn update_theme_endpoint(
    State(state): State<SettingsState>,
    Form(form): Form<ThemeForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match upsert_setting(SettingKey::Theme.as_str(), &form.theme, &connection) {
        Ok(()) => (HxRefresh(true), StatusCode::OK).into_response(),
        Err(error) => error.into_alert_response(),
    }
}
