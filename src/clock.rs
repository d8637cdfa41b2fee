use time::{Date, OffsetDateTime};
use time_tz::{ToTimezone, timezones};

/// Current time in `tz`, or UTC when `tz` is unset or unknown.
pub fn now(tz: Option<&str>) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    match tz.and_then(timezones::get_by_name) {
        Some(tz) => now.to_timezone(tz),
        None => now,
    }
}

/// Calendar date the rotation is computed for.
pub fn today(tz: Option<&str>) -> Date {
    now(tz).date()
}
