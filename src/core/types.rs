use crate::errors::{Error, Result};
use crate::extensions::enums::valid_csv;
use crate::extensions::string::ToDashSeparators;
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterDerive, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    Display,
    AsRefStr,
    EnumIterDerive,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    pub fn try_from(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            Error::Parse(format!(
                "Unknown role: '{}'. Valid roles: {}",
                s.trim(),
                valid_csv::<Role>()
            ))
        })
    }

    /// Admins edit grids, manage swaps and upload attachments; clients only read.
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn title(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Client => "IGS Team",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum View {
    Login,
    Dashboard,
    Weekly,
    Monthly,
    Swap,
}

impl View {
    pub fn try_from(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            Error::Parse(format!(
                "Unknown view: '{}'. Valid views: {}",
                s.trim(),
                valid_csv::<View>()
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    Work,
    Off,
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellStatus::Work => write!(f, "work"),
            CellStatus::Off => write!(f, "off"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date(pub NaiveDate);

#[derive(Copy, Clone, Debug, EnumIterDerive, AsRefStr, EnumString)]
pub enum DateFormat {
    #[strum(serialize = "%Y-%m-%d")]
    YmdDash,
    #[strum(serialize = "%d-%m-%Y")]
    DmYDash,
    #[strum(serialize = "%m-%d")]
    MdDash,
}

impl DateFormat {
    fn expand_input(self, input: &str) -> String {
        match self {
            DateFormat::MdDash => format!("{}-{input}", Local::now().date_naive().year()),
            _ => input.to_owned(),
        }
    }

    fn parse_format(self) -> &'static str {
        match self {
            DateFormat::YmdDash | DateFormat::MdDash => "%Y-%m-%d",
            DateFormat::DmYDash => "%d-%m-%Y",
        }
    }
}

impl Date {
    pub fn usage() -> String {
        let today = Local::now().date_naive();
        let formats = DateFormat::iter()
            .map(|df| today.format(df.as_ref()).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Supported formats: {}", formats)
    }

    pub fn try_from_str(input: &str) -> Result<Self> {
        let input = input.to_dash_separators();
        for f in DateFormat::iter() {
            let expanded = f.expand_input(&input);
            if let Ok(date) = NaiveDate::parse_from_str(&expanded, f.parse_format()) {
                return Ok(Date(date));
            }
        }
        Err(Error::Parse(format!(
            "Invalid date format: '{}'. {}",
            input,
            Self::usage()
        )))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Wall-clock time written as 24-hour `HH:MM`.
pub fn parse_clock(token: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(token.trim(), "%H:%M").map_err(|_| {
        Error::Parse(format!(
            "Invalid time: '{}'. Expected 24-hour HH:MM.",
            token.trim()
        ))
    })
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIterDerive)]
#[strum(ascii_case_insensitive)]
pub enum BoolFormat {
    #[strum(serialize = "true", serialize = "yes", to_string = "True")]
    TextTrue,
    #[strum(serialize = "false", serialize = "no", to_string = "False")]
    TextFalse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bool(pub bool);

impl Bool {
    pub fn try_from_str(s: &str) -> Result<Self> {
        match BoolFormat::from_str(s.trim()) {
            Ok(fmt) => Ok(Bool(matches!(fmt, BoolFormat::TextTrue))),
            Err(_) => Err(Error::Parse(format!(
                "Invalid string value for boolean: '{}'. Valid values: {}",
                s,
                valid_csv::<BoolFormat>()
            ))),
        }
    }
}

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.0 { "True" } else { "False" })
    }
}

impl Serialize for Bool {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<<S as Serializer>::Ok, <S as Serializer>::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Bool {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Bool, <D as Deserializer<'de>>::Error> {
        let b = String::deserialize(deserializer)?;
        Bool::try_from_str(&b).map_err(serde::de::Error::custom)
    }
}
