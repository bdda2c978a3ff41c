//! JSON endpoints for reading and changing settings.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    AppState, Error,
    error::JsonError,
    settings::core::{SettingsMap, get_settings, upsert_setting},
};

/// The state needed by the settings endpoints and page.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// The database connection for managing settings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a request to change one setting.
///
/// `value` may be a JSON string or number, e.g. `{"key": "interestRate", "value": 4.5}`.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub key: String,
    pub value: Value,
}

impl UpdateSettingRequest {
    fn value_text(&self) -> Result<String, Error> {
        match &self.value {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(number.to_string()),
            _ => Err(Error::InvalidSetting {
                key: self.key.clone(),
                reason: "the value must be a string or a number".to_owned(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SettingsUpdatedResponse {
    pub message: &'static str,
}

/// Get every stored setting as a JSON object.
pub async fn get_settings_endpoint(
    State(state): State<SettingsState>,
) -> Result<Json<SettingsMap>, JsonError> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(Json(get_settings(&connection)?))
}

/// Insert or replace one setting.
pub async fn update_setting_endpoint(
    State(state): State<SettingsState>,
    payload: Result<Json<UpdateSettingRequest>, JsonRejection>,
) -> Result<Json<SettingsUpdatedResponse>, JsonError> {
    let Json(payload) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let value = payload.value_text()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    upsert_setting(&payload.key, &value, &connection)?;

    Ok(Json(SettingsUpdatedResponse {
        message: "Settings updated",
    }))
}
