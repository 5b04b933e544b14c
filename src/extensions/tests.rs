use super::{
    chrono::{NaiveDateExt, WeekdayExt},
    enums::valid_csv,
    string::{NameKey, ToDashSeparators},
};
use crate::core::types::Role;
use chrono::{NaiveDate, Weekday};

#[test]
fn weekday_ext_names_and_weekends() {
    assert_eq!(Weekday::Mon.short_name(), "Mon");
    assert_eq!(Weekday::Sun.short_name(), "Sun");
    assert!(Weekday::Sat.is_weekend());
    assert!(Weekday::Sun.is_weekend());
    assert!(!Weekday::Fri.is_weekend());
}

#[test]
fn week_start_rewinds_to_monday() {
    // 2025-01-05 is a Sunday.
    let sunday = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    assert_eq!(sunday.week_start(), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
    let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    assert_eq!(monday.week_start(), monday);
}

#[test]
fn valid_csv_lists_enum_variants_as_strings() {
    let csv = valid_csv::<Role>();
    assert_eq!(csv, "admin, client");
}

#[test]
fn to_dash_separators_replaces_and_trims() {
    assert_eq!(" 2025/01/02 ".to_dash_separators(), "2025-01-02");
    assert_eq!("a/b/c".to_string().to_dash_separators(), "a-b-c");
}

#[test]
fn name_key_ignores_case_and_spaces() {
    assert_eq!("Heng  Thirith".name_key(), "hengthirith");
    assert_eq!("HENGTHIRITH".name_key(), "Heng Thirith".name_key());
}
