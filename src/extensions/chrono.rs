use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub trait WeekdayExt {
    /// English three-letter abbreviation ("Mon", "Tue", ...).
    fn short_name(self) -> &'static str;
    fn is_weekend(self) -> bool;
}

impl WeekdayExt for Weekday {
    fn short_name(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    fn is_weekend(self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }
}

pub trait NaiveDateExt {
    /// The Monday on or before this date.
    fn week_start(self) -> NaiveDate;
}

impl NaiveDateExt for NaiveDate {
    fn week_start(self) -> NaiveDate {
        self - Duration::days(self.weekday().num_days_from_monday() as i64)
    }
}
