use chrono::{Datelike, NaiveDate};

use crate::models::ViewMode;

/// Canonical bucket key for `date` under the given view.
pub fn period_key(date: NaiveDate, view: ViewMode) -> String {
    match view {
        ViewMode::Daily => day_key(date),
        ViewMode::Weekly => week_key(date),
        ViewMode::Monthly => month_key(date),
    }
}

pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 1-based week-of-month by day-of-month: days 1-7 are week 1, days 8-14
/// week 2, and so on up to week 5. The numbering resets with each calendar
/// month and is NOT an ISO week; a calendar week spanning a month boundary
/// falls under two different keys.
pub fn week_of_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

pub fn week_key(date: NaiveDate) -> String {
    format!("{}-{:02}-W{}", date.year(), date.month(), week_of_month(date))
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}
