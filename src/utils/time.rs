use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

/// `2024-03-01T10:15:00+0100`
const LOCAL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Format epoch seconds as local wall-clock time with a numeric UTC offset
pub fn format_local_iso(epoch: i64) -> String {
    let utc = DateTime::<Utc>::from_timestamp(epoch, 0).unwrap_or_default();
    utc.with_timezone(&Local)
        .format(LOCAL_ISO_FORMAT)
        .to_string()
}

/// Parse a timestamp as written by git (`%aI`) or by `format_local_iso`.
///
/// A bare `YYYY-MM-DD` date is taken as local midnight.
pub fn parse_epoch(value: &str) -> Option<i64> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }

    if let Ok(dt) = DateTime::parse_from_str(value, LOCAL_ISO_FORMAT) {
        return Some(dt.timestamp());
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
}

/// Current time in epoch seconds
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}
