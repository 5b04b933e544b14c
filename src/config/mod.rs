pub mod models;

use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterDerive, EnumString};

use crate::config::models::{
    ConfigItem, DefaultShiftConfigItem, FileLoggingConfigItem, RosterConfigItem,
    ShiftCatalogConfigItem, UploadMaxMbConfigItem,
};
use crate::core::auth::UserRecord;
use crate::core::grid::Roster;
use crate::core::shifts::ShiftCatalog;
use crate::errors::{Error, Result};
use crate::extensions::enums::valid_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIterDerive, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ConfigKey {
    Roster,
    ShiftCatalog,
    DefaultShift,
    UploadMaxMb,
    FileLoggingEnabled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub roster: RosterConfigItem,
    #[serde(default)]
    pub shift_catalog: ShiftCatalogConfigItem,
    #[serde(default)]
    pub default_shift: DefaultShiftConfigItem,
    #[serde(default)]
    pub upload_max_mb: UploadMaxMbConfigItem,
    #[serde(default)]
    pub file_logging_enabled: FileLoggingConfigItem,
    /// Credential table; not editable from the prompt.
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl ConfigFile {
    fn item(&self, key: ConfigKey) -> (&str, String) {
        match key {
            ConfigKey::Roster => (
                self.roster.description(),
                self.roster.get_value().join(", "),
            ),
            ConfigKey::ShiftCatalog => (
                self.shift_catalog.description(),
                self.shift_catalog
                    .get_value()
                    .iter()
                    .map(|t| t.label())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            ConfigKey::DefaultShift => (
                self.default_shift.description(),
                self.default_shift.get_value().label(),
            ),
            ConfigKey::UploadMaxMb => (
                self.upload_max_mb.description(),
                self.upload_max_mb.get_value().to_string(),
            ),
            ConfigKey::FileLoggingEnabled => (
                self.file_logging_enabled.description(),
                self.file_logging_enabled.get_value().to_string(),
            ),
        }
    }

    fn set(&mut self, key: ConfigKey, new_value: &str) -> Result<()> {
        match key {
            ConfigKey::Roster => self.roster.set_value(new_value),
            ConfigKey::ShiftCatalog => self.shift_catalog.set_value(new_value),
            ConfigKey::DefaultShift => self.default_shift.set_value(new_value),
            ConfigKey::UploadMaxMb => self.upload_max_mb.set_value(new_value),
            ConfigKey::FileLoggingEnabled => self.file_logging_enabled.set_value(new_value),
        }
    }

    /// Cross-item rules: the roster is valid, the default shift is in the
    /// catalog and the upload limit is in range.
    fn validate(&self) -> Result<()> {
        UploadMaxMbConfigItem::check(*self.upload_max_mb.get_value())?;
        self.roster()?;
        self.catalog()?;
        Ok(())
    }

    fn roster(&self) -> Result<Roster> {
        Roster::new(self.roster.get_value().iter().cloned())
    }

    fn catalog(&self) -> Result<ShiftCatalog> {
        ShiftCatalog::new(
            self.shift_catalog.get_value().clone(),
            &self.default_shift.get_value().label(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    data: ConfigFile,
    pub last_change: Option<(String, String, String)>,
}

#[derive(Debug, Clone)]
pub struct ConfigRows(Vec<(String, String, String)>);

impl ConfigRows {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &(String, String, String)> {
        self.0.iter()
    }
    pub fn get(&self, index: usize) -> Option<&(String, String, String)> {
        self.0.get(index)
    }
}
impl Index<usize> for ConfigRows {
    type Output = (String, String, String);
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Config {
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(Error::Parse(format!(
                "Configuration file '{}' not found.",
                path.display()
            )));
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::Parse(format!("Failed to read {}: {}", path.display(), e)))?;
        let data: ConfigFile = serde_json::from_str(&text)
            .map_err(|e| Error::Parse(format!("Invalid JSON in '{}': {}", path.display(), e)))?;
        data.validate()?;
        Ok(Self {
            path,
            data,
            last_change: None,
        })
    }

    /// Write a fresh file with every default and return it loaded.
    pub fn create_default<P: AsRef<Path>>(path: P, users: Vec<UserRecord>) -> Result<Self> {
        let config = Self {
            path: path.as_ref().to_path_buf(),
            data: ConfigFile {
                users,
                ..ConfigFile::default()
            },
            last_change: None,
        };
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        config.save()?;
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn view(&self) -> &ConfigFile {
        &self.data
    }

    pub fn roster(&self) -> Result<Roster> {
        self.data.roster()
    }

    pub fn catalog(&self) -> Result<ShiftCatalog> {
        self.data.catalog()
    }

    pub fn upload_max_mb(&self) -> u64 {
        *self.data.upload_max_mb.get_value()
    }

    pub fn file_logging_enabled(&self) -> bool {
        self.data.file_logging_enabled.get_value().0
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.data.users
    }

    pub fn rows(&self) -> ConfigRows {
        ConfigRows(
            ConfigKey::iter()
                .map(|key| {
                    let (description, value) = self.data.item(key);
                    (key.to_string(), description.to_string(), value)
                })
                .collect(),
        )
    }

    pub fn set_key(&mut self, key: ConfigKey, new_value: &str) -> Result<()> {
        let (_, old) = self.data.item(key);
        self.edit(|cfg| cfg.set(key, new_value))?;
        let (_, new_val) = self.data.item(key);
        self.last_change = Some((key.to_string(), old, new_val));
        Ok(())
    }

    pub fn take_last_change(&mut self) -> Option<(String, String, String)> {
        self.last_change.take()
    }

    pub fn parse_key(key_str: &str) -> Result<ConfigKey> {
        ConfigKey::from_str(key_str.trim()).map_err(|_| {
            Error::Parse(format!(
                "Unknown configuration key '{}'. Valid keys: {}",
                key_str.trim(),
                valid_csv::<ConfigKey>()
            ))
        })
    }

    pub fn set(&mut self, key_str: &str, new_value: &str) -> Result<()> {
        let key = Self::parse_key(key_str)?;
        self.set_key(key, new_value)
    }

    /// Apply every pair or none of them.
    pub fn set_many<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.edit(|cfg| {
            for (k, v) in pairs {
                let key = Self::parse_key(k.as_ref())?;
                cfg.set(key, v.as_ref())?;
            }
            Ok(())
        })
    }

    /// Changes are staged on a copy and only kept when they validate and save.
    fn edit<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ConfigFile) -> Result<()>,
    {
        let mut staged = self.data.clone();
        f(&mut staged)?;
        staged.validate()?;
        let previous = std::mem::replace(&mut self.data, staged);
        if let Err(err) = self.save() {
            self.data = previous;
            return Err(err);
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| Error::Parse(format!("Failed to encode config: {}", e)))?;
        fs::write(&self.path, json)
            .map_err(|e| Error::Parse(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}
