use crate::error::CoreError;
use chrono::{NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use std::str::FromStr;

/// Validate IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone)
        .map_err(|_| CoreError::Validation(format!("Invalid timezone: {}", timezone)))
}

/// Milliseconds since the Unix epoch of 12:00 local time on `date` in `tz`.
///
/// Noon keeps the date stable when a client renders the timestamp in a
/// nearby zone. If noon is skipped or repeated by a transition, the earliest
/// valid instant wins, falling back to noon UTC.
pub fn local_noon_millis(date: NaiveDate, tz: Tz) -> i64 {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    match tz.from_local_datetime(&noon).earliest() {
        Some(local) => local.timestamp_millis(),
        None => noon.and_utc().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_timezone() {
        assert!(validate_timezone("Europe/Berlin").is_ok());
        assert!(matches!(validate_timezone("Mars/Olympus"), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_local_noon_in_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        // 2024-01-01T12:00:00Z
        assert_eq!(local_noon_millis(date, Tz::UTC), 1_704_110_400_000);
    }

    #[test]
    fn test_local_noon_respects_offset() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let utc = local_noon_millis(date, Tz::UTC);
        // New York is UTC-4 in July, so local noon is four hours later in UTC.
        let new_york = local_noon_millis(date, chrono_tz::America::New_York);
        assert_eq!(new_york - utc, 4 * 60 * 60 * 1000);
    }
}
