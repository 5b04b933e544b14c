use crate::core::calendar::{
    clamp_day, days_in_month, monday_of, month_dates, month_name, shift_month, week_dates,
};
use crate::errors::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterDerive, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum PeriodKind {
    Week,
    Month,
}

/// The span a schedule screen displays; weeks are anchored on their Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week { monday: NaiveDate },
    Month { year: i32, month: u32 },
}

impl Period {
    pub fn containing(kind: PeriodKind, date: NaiveDate) -> Self {
        match kind {
            PeriodKind::Week => Period::Week {
                monday: monday_of(date),
            },
            PeriodKind::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Period::Week { .. } => PeriodKind::Week,
            Period::Month { .. } => PeriodKind::Month,
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        match *self {
            Period::Week { monday } => week_dates(monday).to_vec(),
            Period::Month { year, month } => month_dates(month, year),
        }
    }

    pub fn len(&self) -> usize {
        match *self {
            Period::Week { .. } => 7,
            Period::Month { year, month } => days_in_month(month, year) as usize,
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        match *self {
            Period::Week { monday } => monday,
            Period::Month { year, month } => {
                NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
            }
        }
    }

    /// Day index of `date` within the period.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.first_day()).num_days();
        if offset >= 0 && (offset as usize) < self.len() {
            Some(offset as usize)
        } else {
            None
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.index_of(date).is_some()
    }

    /// Move by `delta` weeks or months.
    pub fn step(&self, delta: i32) -> Self {
        match *self {
            Period::Week { monday } => Period::Week {
                monday: monday + Duration::days(7 * delta as i64),
            },
            Period::Month { year, month } => {
                let (year, month) = shift_month(year, month, delta);
                Period::Month { year, month }
            }
        }
    }

    /// Stable identifier used to file saved schedules.
    pub fn key(&self) -> String {
        match *self {
            Period::Week { monday } => format!("week-{}", monday.format("%Y-%m-%d")),
            Period::Month { year, month } => format!("month-{year:04}-{month:02}"),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Period::Week { monday } => {
                let sunday = monday + Duration::days(6);
                write!(
                    f,
                    "Week {} - {}",
                    monday.format("%d %b %Y"),
                    sunday.format("%d %b %Y")
                )
            }
            Period::Month { year, month } => write!(f, "{} {}", month_name(month), year),
        }
    }
}

/// Table column showing `selected`; column 0 holds the roster names.
pub fn scroll_target(selected: NaiveDate, period: &Period) -> Option<usize> {
    period.index_of(selected).map(|idx| idx + 1)
}

/// Candidate date held while the picker is open. Fields may name a day the
/// month does not have; confirming clamps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerDraft {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl PickerDraft {
    fn from_date(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }

    /// Days to offer in the picker grid for the staged month.
    pub fn days_available(&self) -> u32 {
        days_in_month(self.month, self.year)
    }

    fn resolve(&self) -> Option<NaiveDate> {
        let day = clamp_day(self.day, self.month, self.year);
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    period: Period,
    selected: NaiveDate,
    picker: Option<PickerDraft>,
    today: NaiveDate,
}

impl Navigator {
    pub fn new(kind: PeriodKind, today: NaiveDate) -> Self {
        Self {
            period: Period::containing(kind, today),
            selected: today,
            picker: None,
            today,
        }
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn picker(&self) -> Option<&PickerDraft> {
        self.picker.as_ref()
    }

    pub fn prev(&mut self) -> bool {
        self.move_by(-1)
    }

    pub fn next(&mut self) -> bool {
        self.move_by(1)
    }

    fn move_by(&mut self, delta: i32) -> bool {
        self.period = self.period.step(delta);
        // Week moves put the highlight on the new Monday; month moves keep it.
        if let Period::Week { monday } = self.period {
            self.selected = monday;
        }
        true
    }

    /// Back to the period containing today; reports whether the anchor moved.
    pub fn today(&mut self) -> bool {
        let target = Period::containing(self.period.kind(), self.today);
        self.selected = self.today;
        self.set_period(target)
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    pub fn open_picker(&mut self) {
        self.picker = Some(PickerDraft::from_date(self.selected));
    }

    pub fn set_picker_day(&mut self, day: u32) -> Result<()> {
        if !(1..=31).contains(&day) {
            return Err(Error::parse(format!("Invalid day: {day}. Expected 1-31.")));
        }
        self.picker_mut()?.day = day;
        Ok(())
    }

    pub fn set_picker_month(&mut self, month: u32) -> Result<()> {
        if !(1..=12).contains(&month) {
            return Err(Error::parse(format!("Invalid month: {month}. Expected 1-12.")));
        }
        self.picker_mut()?.month = month;
        Ok(())
    }

    pub fn set_picker_year(&mut self, year: i32) -> Result<()> {
        if !(1..=9999).contains(&year) {
            return Err(Error::parse(format!("Invalid year: {year}.")));
        }
        self.picker_mut()?.year = year;
        Ok(())
    }

    pub fn set_picker_date(&mut self, date: NaiveDate) -> Result<()> {
        *self.picker_mut()? = PickerDraft::from_date(date);
        Ok(())
    }

    /// Commit the staged date; reports whether the anchor moved.
    pub fn confirm_picker(&mut self) -> Result<bool> {
        let draft = self
            .picker
            .take()
            .ok_or_else(|| Error::Domain("Date picker is not open.".into()))?;
        let date = draft
            .resolve()
            .ok_or_else(|| Error::parse("Picked date is not a calendar date."))?;
        self.selected = date;
        Ok(self.set_period(Period::containing(self.period.kind(), date)))
    }

    pub fn cancel_picker(&mut self) {
        self.picker = None;
    }

    pub fn scroll_target(&self) -> Option<usize> {
        scroll_target(self.selected, &self.period)
    }

    fn picker_mut(&mut self) -> Result<&mut PickerDraft> {
        self.picker
            .as_mut()
            .ok_or_else(|| Error::Domain("Date picker is not open.".into()))
    }

    fn set_period(&mut self, period: Period) -> bool {
        let moved = self.period != period;
        self.period = period;
        moved
    }
}
