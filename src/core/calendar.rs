//! Pure date arithmetic behind the week and month grids.
//!
//! Months are 1-based (January = 1). Inputs naming a day that does not exist
//! in the given month are rejected by the typed callers before reaching here.

use crate::extensions::chrono::{NaiveDateExt, WeekdayExt};
use chrono::{Datelike, Duration, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Number of days in `month` of `year` (28..=31).
pub fn days_in_month(month: u32, year: i32) -> u32 {
    let (next_year, next_month) = shift_month(year, month, 1);
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1);
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    match (first, first_of_next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 31,
    }
}

pub fn weekday_name(day: u32, month: u32, year: i32) -> &'static str {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| d.weekday().short_name())
        .unwrap_or("")
}

pub fn is_weekend(day: u32, month: u32, year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| d.weekday().is_weekend())
        .unwrap_or(false)
}

pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date.week_start()
}

/// The 7 consecutive dates of the Monday-starting week containing `anchor`.
pub fn week_dates(anchor: NaiveDate) -> [NaiveDate; 7] {
    let monday = monday_of(anchor);
    std::array::from_fn(|offset| monday + Duration::days(offset as i64))
}

/// Every date of `month` in order.
pub fn month_dates(month: u32, year: i32) -> Vec<NaiveDate> {
    (1..=days_in_month(month, year))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

/// Step `delta` months from (`year`, `month`), rolling the year over.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = year * 12 + (month as i32 - 1) + delta;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

/// Clamp `day` into `1..=days_in_month(month, year)`.
pub fn clamp_day(day: u32, month: u32, year: i32) -> u32 {
    day.clamp(1, days_in_month(month, year))
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}
