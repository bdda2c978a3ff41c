//! The key/value settings table and the typed view of it.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use rusqlite::{Connection, OptionalExtension};
use time::Date;

use crate::{Error, timezone::parse_date};

/// The interest rate, as a percentage charged per period, used when none has been set.
pub const DEFAULT_INTEREST_RATE: f64 = 5.0;

/// The borrower name used until the user sets one.
pub const DEFAULT_BORROWER_NAME: &str = "Default Borrower";

/// All settings as stored, keyed by setting name.
pub type SettingsMap = BTreeMap<String, String>;

/// The settings the application understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// Percentage charged per period when interest is calculated.
    InterestRate,
    /// The date the loan started.
    StartDate,
    /// Who the loan was made to.
    BorrowerName,
    /// Dark or light display. Has no effect on any calculation.
    Theme,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::InterestRate => "interestRate",
            SettingKey::StartDate => "startDate",
            SettingKey::BorrowerName => "borrowerName",
            SettingKey::Theme => "theme",
        }
    }
}

impl FromStr for SettingKey {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "interestRate" => Ok(SettingKey::InterestRate),
            "startDate" => Ok(SettingKey::StartDate),
            "borrowerName" => Ok(SettingKey::BorrowerName),
            "theme" => Ok(SettingKey::Theme),
            other => Err(Error::UnknownSetting(other.to_owned())),
        }
    }
}

impl Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The colour scheme for the web UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The class to put on the root `html` element.
    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "",
        }
    }

    /// The opposite theme, for the theme toggle.
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(Error::InvalidSetting {
                key: SettingKey::Theme.to_string(),
                reason: format!("\"{other}\" is not a theme, expected dark or light"),
            }),
        }
    }
}

/// Typed settings for the presentation layer.
///
/// Values that are missing or cannot be parsed fall back to the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub interest_rate: f64,
    pub start_date: Option<Date>,
    pub borrower_name: String,
    pub theme: Theme,
}

impl Settings {
    pub fn from_map(map: &SettingsMap) -> Self {
        let get = |key: SettingKey| map.get(key.as_str()).map(String::as_str);

        Self {
            interest_rate: get(SettingKey::InterestRate)
                .and_then(|rate| parse_interest_rate(rate).ok())
                .unwrap_or(DEFAULT_INTEREST_RATE),
            start_date: get(SettingKey::StartDate).and_then(|date| parse_date(date).ok()),
            borrower_name: get(SettingKey::BorrowerName)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_BORROWER_NAME)
                .to_owned(),
            theme: get(SettingKey::Theme)
                .and_then(|theme| theme.parse().ok())
                .unwrap_or_default(),
        }
    }
}

pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS setting (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Insert the default interest rate, start date and borrower name, keeping any existing values.
///
/// `today` is used as the default start date.
pub fn seed_default_settings(today: Date, connection: &Connection) -> Result<(), rusqlite::Error> {
    let defaults = [
        (SettingKey::InterestRate, DEFAULT_INTEREST_RATE.to_string()),
        (SettingKey::StartDate, today.to_string()),
        (SettingKey::BorrowerName, DEFAULT_BORROWER_NAME.to_owned()),
    ];

    let mut stmt = connection.prepare("INSERT OR IGNORE INTO setting (key, value) VALUES (?1, ?2)")?;

    for (key, value) in defaults {
        stmt.execute((key.as_str(), value))?;
    }

    Ok(())
}

/// Get every stored setting.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_settings(connection: &Connection) -> Result<SettingsMap, Error> {
    let mut stmt = connection.prepare("SELECT key, value FROM setting")?;

    let settings = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<SettingsMap, rusqlite::Error>>()?;

    Ok(settings)
}

/// Get the interest rate used for new interest charges.
///
/// Falls back to [DEFAULT_INTEREST_RATE] if the rate has not been stored.
///
/// # Errors
/// Returns [Error::InvalidSetting] if the stored rate is not a valid rate, or
/// [Error::SqlError] if the query fails.
pub fn get_interest_rate(connection: &Connection) -> Result<f64, Error> {
    let rate: Option<String> = connection
        .query_row(
            "SELECT value FROM setting WHERE key = ?1",
            [SettingKey::InterestRate.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    match rate {
        Some(rate) => parse_interest_rate(&rate),
        None => Ok(DEFAULT_INTEREST_RATE),
    }
}

/// Insert or replace the setting `key` with `value`.
///
/// The value is validated for the key and stored in a normalised form.
///
/// # Errors
/// Returns [Error::UnknownSetting] or [Error::InvalidSetting] without writing
/// anything if the key or value is invalid, or [Error::SqlError] if the write fails.
pub fn upsert_setting(key: &str, value: &str, connection: &Connection) -> Result<(), Error> {
    let key: SettingKey = key.parse()?;
    let value = normalize_setting(key, value)?;

    connection.execute(
        "INSERT INTO setting (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (key.as_str(), &value),
    )?;

    tracing::debug!("Set {key} to {value:?}");

    Ok(())
}

/// Delete every setting and restore the defaults.
pub fn reset_settings(today: Date, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM setting", ())?;
    seed_default_settings(today, connection)?;

    Ok(())
}

/// Check `value` is valid for `key` and return the form to store.
pub fn normalize_setting(key: SettingKey, value: &str) -> Result<String, Error> {
    match key {
        SettingKey::InterestRate => parse_interest_rate(value).map(|rate| rate.to_string()),
        SettingKey::StartDate => parse_date(value)
            .map(|date| date.to_string())
            .map_err(|error| Error::InvalidSetting {
                key: key.to_string(),
                reason: error.to_string(),
            }),
        SettingKey::BorrowerName => {
            let name = value.trim();

            if name.is_empty() {
                Err(Error::InvalidSetting {
                    key: key.to_string(),
                    reason: "the borrower name cannot be empty".to_owned(),
                })
            } else {
                Ok(name.to_owned())
            }
        }
        SettingKey::Theme => value.parse::<Theme>().map(|theme| theme.as_str().to_owned()),
    }
}

fn parse_interest_rate(value: &str) -> Result<f64, Error> {
    let invalid = || Error::InvalidSetting {
        key: SettingKey::InterestRate.to_string(),
        reason: format!("\"{value}\" is not a percentage of zero or more"),
    };

    let rate: f64 = value.trim().parse().map_err(|_| invalid())?;

    if rate.is_finite() && rate >= 0.0 {
        Ok(rate)
    } else {
        Err(invalid())
    }
}
