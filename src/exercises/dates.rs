use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime, UtcOffset};

use crate::error::AppError;

/// Storage and log form, e.g. `2023-05-10`.
const SHORT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Add-response form, e.g. `Wed May 10 2023`.
const LONG: &[FormatItem<'static>] =
    format_description!("[weekday repr:short] [month repr:short] [day] [year]");

pub fn today(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}

/// Parses a `YYYY-MM-DD` date. Years outside 0001..=9999 are refused so that
/// both output forms keep a four-digit year and Postgres never sees a date it
/// cannot store.
pub fn parse_short(field: &str, value: &str) -> Result<Date, AppError> {
    let invalid = || AppError::bad_request(format!("{field} must be a date in YYYY-MM-DD form"));
    let date = Date::parse(value.trim(), SHORT).map_err(|_| invalid())?;
    if !(1..=9999).contains(&date.year()) {
        return Err(invalid());
    }
    Ok(date)
}

pub fn format_short(date: Date) -> String {
    // a Date always fits the description, so formatting cannot fail
    date.format(SHORT).unwrap_or_default()
}

pub fn format_long(date: Date) -> String {
    date.format(LONG).unwrap_or_default()
}
