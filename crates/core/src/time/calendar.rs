use chrono::{Datelike, Days, Duration, NaiveDate};

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

/// Advances `date` by `n` qualifying days, or `None` past the end of the calendar.
///
/// With `exclude_weekends`, Saturdays and Sundays are stepped over and do not count toward `n`,
/// so for `n > 0` the result is always a weekday. `n = 0` returns `date` unchanged.
pub fn add_days(date: NaiveDate, n: u32, exclude_weekends: bool) -> Option<NaiveDate> {
    if !exclude_weekends || n == 0 {
        return date.checked_add_days(Days::new(u64::from(n)));
    }

    // A weekend start counts the same as starting from the Friday before it.
    let weekday = i64::from(date.weekday().num_days_from_monday());
    let back = (weekday - 4).max(0);
    let from_friday = weekday - back;

    let n = i64::from(n);
    let mut offset = n / 5 * 7;
    let rem = n % 5;
    offset += if from_friday + rem >= 5 { rem + 2 } else { rem };
    date.checked_add_signed(Duration::days(offset - back))
}

/// Counts qualifying days in `(start, end]`. Returns 0 when `end <= start`.
pub fn days_between(start: NaiveDate, end: NaiveDate, exclude_weekends: bool) -> u32 {
    if end <= start {
        return 0;
    }
    let total = (end - start).num_days();
    if !exclude_weekends {
        return u32::try_from(total).unwrap_or(u32::MAX);
    }

    let weekday = i64::from(start.weekday().num_days_from_monday());
    let tail = (1..=total % 7).filter(|k| (weekday + k) % 7 < 5).count() as i64;
    u32::try_from(total / 7 * 5 + tail).unwrap_or(u32::MAX)
}
