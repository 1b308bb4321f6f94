//! ISO-week and calendar-month helpers.

use chrono::{Datelike, Duration, NaiveDate};

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sunday of the ISO week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// ISO week number; week 1 contains January 4th.
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// First day of the month a week is attributed to: the month of its Monday.
pub fn month_of_week(week_start: NaiveDate) -> NaiveDate {
    week_start.with_day(1).unwrap_or(week_start)
}

/// `"September 2024"`.
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
