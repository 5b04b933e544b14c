use crate::core::grid::Roster;
use crate::core::shifts::{DEFAULT_SHIFT_LABEL, DEFAULT_TEMPLATES, ShiftTemplate};
use crate::core::types::Bool;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROSTER: [&str; 7] = [
    "SUONG SOVOTANAK",
    "HENG MENGLY",
    "POR KIMHUCHOR",
    "ORN TAK",
    "SOTH SOKLAY",
    "PHOEUN SOPHANY",
    "HENG THIRITH",
];

pub trait ConfigItem<T> {
    fn get_value(&self) -> &T;
    fn set_value(&mut self, new_value: &str) -> Result<()>;
    fn description(&self) -> &str;
}

fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfigItem {
    pub value: Vec<String>,
    pub description: String,
}

impl Default for RosterConfigItem {
    fn default() -> Self {
        Self {
            value: DEFAULT_ROSTER.iter().map(|n| n.to_string()).collect(),
            description: "Employees shown as schedule rows, comma separated.".into(),
        }
    }
}

impl ConfigItem<Vec<String>> for RosterConfigItem {
    fn get_value(&self) -> &Vec<String> {
        &self.value
    }
    /// Comma separated names; empty lists and duplicates are rejected.
    fn set_value(&mut self, new_value: &str) -> Result<()> {
        let roster = Roster::new(split_list(new_value))?;
        self.value = roster.names().to_vec();
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCatalogConfigItem {
    pub value: Vec<ShiftTemplate>,
    pub description: String,
}

impl Default for ShiftCatalogConfigItem {
    fn default() -> Self {
        Self {
            value: DEFAULT_TEMPLATES.clone(),
            description: "Shift templates offered when editing, HH:MM-HH:MM comma separated."
                .into(),
        }
    }
}

impl ConfigItem<Vec<ShiftTemplate>> for ShiftCatalogConfigItem {
    fn get_value(&self) -> &Vec<ShiftTemplate> {
        &self.value
    }
    fn set_value(&mut self, new_value: &str) -> Result<()> {
        let templates = split_list(new_value)
            .iter()
            .map(|s| ShiftTemplate::try_from_str(s))
            .collect::<Result<Vec<_>>>()?;
        if templates.is_empty() {
            return Err(Error::config("Shift catalog must list at least one shift."));
        }
        self.value = templates;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultShiftConfigItem {
    pub value: ShiftTemplate,
    pub description: String,
}

impl Default for DefaultShiftConfigItem {
    fn default() -> Self {
        let value = DEFAULT_TEMPLATES
            .iter()
            .find(|t| t.label() == DEFAULT_SHIFT_LABEL)
            .unwrap_or(&DEFAULT_TEMPLATES[0])
            .clone();
        Self {
            value,
            description: "Shift given to every weekday cell of a fresh schedule.".into(),
        }
    }
}

impl ConfigItem<ShiftTemplate> for DefaultShiftConfigItem {
    fn get_value(&self) -> &ShiftTemplate {
        &self.value
    }
    fn set_value(&mut self, new_value: &str) -> Result<()> {
        self.value = ShiftTemplate::try_from_str(new_value)?;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadMaxMbConfigItem {
    pub value: u64,
    pub description: String,
}

impl UploadMaxMbConfigItem {
    pub const MAX: u64 = 1024;

    pub fn check(mb: u64) -> Result<()> {
        if mb == 0 || mb > Self::MAX {
            return Err(Error::config(format!(
                "Upload limit must be between 1 and {} MB.",
                Self::MAX
            )));
        }
        Ok(())
    }
}

impl Default for UploadMaxMbConfigItem {
    fn default() -> Self {
        Self {
            value: crate::core::upload::DEFAULT_MAX_MB,
            description: "Largest attachment accepted by upload, in megabytes.".into(),
        }
    }
}

impl ConfigItem<u64> for UploadMaxMbConfigItem {
    fn get_value(&self) -> &u64 {
        &self.value
    }
    fn set_value(&mut self, new_value: &str) -> Result<()> {
        let mb: u64 = new_value.trim().parse().map_err(|_| {
            Error::parse(format!("Invalid size '{}'. Expected a whole number of MB.", new_value.trim()))
        })?;
        Self::check(mb)?;
        self.value = mb;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLoggingConfigItem {
    pub value: Bool,
    pub description: String,
}

impl Default for FileLoggingConfigItem {
    fn default() -> Self {
        Self {
            value: Bool(true),
            description: "Enable writing log messages to file.".into(),
        }
    }
}

impl ConfigItem<Bool> for FileLoggingConfigItem {
    fn get_value(&self) -> &Bool {
        &self.value
    }
    fn set_value(&mut self, new_value: &str) -> Result<()> {
        self.value = Bool::try_from_str(new_value)?;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
}
