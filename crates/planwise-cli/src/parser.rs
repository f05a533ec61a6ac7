use chrono::{Local, NaiveDate};
use chrono_english::{parse_date_string, Dialect};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("Failed to parse date '{input}': {reason}")]
pub struct DateParseError {
    input: String,
    reason: String,
}

/// Parses a calendar date: `YYYY-MM-DD` first, then natural language
/// ("tomorrow", "next friday") relative to now in the local zone.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    parse_date_string(input, Local::now(), Dialect::Us)
        .map(|datetime| datetime.date_naive())
        .map_err(|e| DateParseError {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

pub fn parse_optional_date(input: Option<&str>) -> Result<Option<NaiveDate>, DateParseError> {
    input.map(parse_date).transpose()
}
