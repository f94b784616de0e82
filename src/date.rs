//! Parsing and serializing calendar dates in the `YYYY-MM-DD` format.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The only date format accepted from and sent to clients, e.g. "2024-01-05".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date string.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid date in that format.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    parse_strict(text).ok_or_else(|| Error::InvalidDate(text.to_owned()))
}

/// Parse `text` only if it is exactly four year digits, a month and a day.
///
/// `[year]` on its own also accepts a leading sign and more than four digits.
fn parse_strict(text: &str) -> Option<Date> {
    if text.len() != 10 || !text.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }

    Date::parse(text, DATE_FORMAT).ok()
}

/// Parse an optional date query parameter, treating an empty string as absent.
///
/// # Errors
/// Returns [Error::InvalidDate] if a non-empty `text` is not a valid `YYYY-MM-DD` date.
pub fn parse_optional_date(text: Option<&str>) -> Result<Option<Date>, Error> {
    match text {
        None | Some("") => Ok(None),
        Some(text) => parse_date(text).map(Some),
    }
}

/// Parse a date query parameter that must be present.
///
/// # Errors
/// Returns [Error::MissingDateParameter] naming `parameter` if `text` is absent or empty, or
/// [Error::InvalidDate] if it is not a valid `YYYY-MM-DD` date.
pub fn parse_required_date(text: Option<&str>, parameter: &'static str) -> Result<Date, Error> {
    parse_optional_date(text)?.ok_or(Error::MissingDateParameter(parameter))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    // Formatting with a static description only fails for dates outside four digit years.
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// An inclusive range of calendar dates.
///
/// Both `start` and `end` are part of the range, so a range covering a single day has equal
/// start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// A range covering the days from `start` to `end`, both included.
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one day.
    pub fn single_day(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }
}

/// Serialize and deserialize a [Date] as a `YYYY-MM-DD` string.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::{DATE_FORMAT, parse_strict};

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_strict(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid date \"{s}\", use the format YYYY-MM-DD"))
        })
    }
}
