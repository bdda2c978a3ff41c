//! Helpers for local dates and ISO 8601 date strings.

use time::{
    Date, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};
use time_tz::{Offset, TimeZone};

use crate::Error;

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in `canonical_timezone`, e.g. "Asia/Bangkok".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the timezone name is not a
/// canonical IANA timezone name.
pub fn local_today(canonical_timezone: &str) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })?;

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}

/// Parse a date in the form `YYYY-MM-DD`.
///
/// Leading and trailing whitespace is ignored.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is empty or not a valid calendar date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    Date::parse(text, ISO_DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}
