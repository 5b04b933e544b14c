use crate::core::types::{CellStatus, format_clock, parse_clock};
use crate::errors::{Error, Result};
use chrono::NaiveTime;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Built-in catalog used when the configuration does not override it.
pub static DEFAULT_TEMPLATES: Lazy<Vec<ShiftTemplate>> = Lazy::new(|| {
    ["06:00-16:36", "08:00-17:36", "13:00-22:36", "23:00-06:36"]
        .iter()
        .filter_map(|label| ShiftTemplate::try_from_str(label).ok())
        .collect()
});

pub const DEFAULT_SHIFT_LABEL: &str = "08:00-17:36";

/// A named working window. `end < start` marks an overnight shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftTemplate {
    start: NaiveTime,
    end: NaiveTime,
}

impl ShiftTemplate {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start == end {
            return Err(Error::Parse(format!(
                "Shift start '{}' cannot equal its end.",
                format_clock(start)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses `HH:MM-HH:MM`.
    pub fn try_from_str(s: &str) -> Result<Self> {
        let (start, end) = s.trim().split_once('-').ok_or_else(|| {
            Error::Parse(format!(
                "Invalid shift: '{}'. Expected format: 'HH:MM-HH:MM'.",
                s.trim()
            ))
        })?;
        Self::new(parse_clock(start)?, parse_clock(end)?)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }
}

impl fmt::Display for ShiftTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_clock(self.start), format_clock(self.end))
    }
}

impl Serialize for ShiftTemplate {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<<S as Serializer>::Ok, <S as Serializer>::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ShiftTemplate {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<ShiftTemplate, <D as Deserializer<'de>>::Error> {
        let s = String::deserialize(deserializer)?;
        ShiftTemplate::try_from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// What a batch apply writes into the selected cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftChoice {
    Shift(ShiftTemplate),
    DayOff,
}

impl fmt::Display for ShiftChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftChoice::Shift(t) => write!(f, "{t}"),
            ShiftChoice::DayOff => write!(f, "Day Off"),
        }
    }
}

/// Ordered set of assignable shifts plus the one used for default weekdays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCatalog {
    templates: Vec<ShiftTemplate>,
    default_idx: usize,
}

impl Default for ShiftCatalog {
    fn default() -> Self {
        let templates = DEFAULT_TEMPLATES.clone();
        let default_idx = templates
            .iter()
            .position(|t| t.label() == DEFAULT_SHIFT_LABEL)
            .unwrap_or(0);
        Self {
            templates,
            default_idx,
        }
    }
}

impl ShiftCatalog {
    pub fn new(templates: Vec<ShiftTemplate>, default_label: &str) -> Result<Self> {
        if templates.is_empty() {
            return Err(Error::config("Shift catalog must contain at least one shift."));
        }
        let default_idx = templates
            .iter()
            .position(|t| t.label() == default_label.trim())
            .ok_or_else(|| {
                Error::config(format!(
                    "Default shift '{}' is not in the shift catalog.",
                    default_label.trim()
                ))
            })?;
        Ok(Self {
            templates,
            default_idx,
        })
    }

    pub fn templates(&self) -> &[ShiftTemplate] {
        &self.templates
    }

    pub fn default_shift(&self) -> &ShiftTemplate {
        &self.templates[self.default_idx]
    }

    pub fn lookup(&self, label: &str) -> Option<&ShiftTemplate> {
        let label = label.trim();
        self.templates
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }

    /// Resolve a user token: `off`, a 1-based catalog position, or a label.
    pub fn choice(&self, token: &str) -> Result<ShiftChoice> {
        let token = token.trim();
        if ["off", "dayoff", "day-off"]
            .iter()
            .any(|t| token.eq_ignore_ascii_case(t))
        {
            return Ok(ShiftChoice::DayOff);
        }
        if let Ok(pos) = token.parse::<usize>() {
            return pos
                .checked_sub(1)
                .and_then(|i| self.templates.get(i))
                .cloned()
                .map(ShiftChoice::Shift)
                .ok_or_else(|| {
                    Error::Parse(format!(
                        "No shift at position {pos}. Catalog has {} shift(s).",
                        self.templates.len()
                    ))
                });
        }
        self.lookup(token)
            .cloned()
            .map(ShiftChoice::Shift)
            .ok_or_else(|| {
                Error::Parse(format!(
                    "Unknown shift: '{}'. Valid shifts: {}, off",
                    token,
                    self.labels().join(", ")
                ))
            })
    }

    pub fn labels(&self) -> Vec<String> {
        self.templates.iter().map(ShiftTemplate::label).collect()
    }
}

/// One (day, employee) assignment. Off cells never carry times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCell {
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
    status: CellStatus,
}

impl ShiftCell {
    pub fn off() -> Self {
        Self {
            start: None,
            end: None,
            status: CellStatus::Off,
        }
    }

    pub fn work(template: &ShiftTemplate) -> Self {
        Self {
            start: Some(template.start),
            end: Some(template.end),
            status: CellStatus::Work,
        }
    }

    pub fn from_choice(choice: &ShiftChoice) -> Self {
        match choice {
            ShiftChoice::Shift(t) => Self::work(t),
            ShiftChoice::DayOff => Self::off(),
        }
    }

    pub fn start(&self) -> Option<NaiveTime> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveTime> {
        self.end
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    pub fn is_off(&self) -> bool {
        self.status == CellStatus::Off
    }

    pub fn template(&self) -> Option<ShiftTemplate> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => ShiftTemplate::new(start, end).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ShiftCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.template() {
            Some(t) => write!(f, "{t}"),
            None => write!(f, "OFF"),
        }
    }
}

/// Staging value for the edit popup: a shift that can be flipped to Day Off
/// and back without losing the times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftDraft {
    shift: ShiftTemplate,
    day_off: bool,
}

impl ShiftDraft {
    /// Seed from a cell; off cells keep `fallback` as the shift to restore.
    pub fn from_cell(cell: &ShiftCell, fallback: &ShiftTemplate) -> Self {
        Self {
            shift: cell.template().unwrap_or_else(|| fallback.clone()),
            day_off: cell.is_off(),
        }
    }

    pub fn set_shift(&mut self, shift: ShiftTemplate) {
        self.shift = shift;
        self.day_off = false;
    }

    pub fn toggle_day_off(&mut self) {
        self.day_off = !self.day_off;
    }

    pub fn is_day_off(&self) -> bool {
        self.day_off
    }

    pub fn choice(&self) -> ShiftChoice {
        if self.day_off {
            ShiftChoice::DayOff
        } else {
            ShiftChoice::Shift(self.shift.clone())
        }
    }
}
