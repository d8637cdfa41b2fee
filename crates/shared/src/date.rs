use time::{Date, Duration};

/// Julian day number of 1970-01-01.
const UNIX_EPOCH_JULIAN_DAY: i64 = 2_440_588;

pub const DAYS_PER_WEEK: i64 = 7;

/// Days elapsed between the unix epoch and the UTC midnight of `date`.
///
/// The value only depends on the calendar date, so every caller that agrees on
/// "today" gets the same number regardless of its local offset.
pub fn day_number(date: Date) -> i64 {
    date.to_julian_day() as i64 - UNIX_EPOCH_JULIAN_DAY
}

/// Day number of `date` shifted by `offset` days (positive looks ahead).
pub fn day_number_with_offset(date: Date, offset: i64) -> i64 {
    day_number(date) + offset
}

/// Week counter used to scope the grocery checklist.
pub fn week_number(day_number: i64) -> i64 {
    day_number.div_euclid(DAYS_PER_WEEK)
}

/// Calendar date `offset` days after `date`, saturating at the supported range.
pub fn shift_date(date: Date, offset: i64) -> Date {
    date.checked_add(Duration::days(offset)).unwrap_or(if offset < 0 {
        Date::MIN
    } else {
        Date::MAX
    })
}
