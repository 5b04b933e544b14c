use crate::core::grid::{CellPos, Roster};
use crate::core::navigation::Period;
use crate::core::shifts::{ShiftCell, ShiftTemplate};
use crate::core::types::CellStatus;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One stored cell. Employees are saved by name so a reordered roster still
/// lines up on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCell {
    pub day: usize,
    pub employee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<ShiftTemplate>,
    pub status: CellStatus,
}

impl SavedCell {
    fn to_cell(&self) -> Result<ShiftCell> {
        match (self.status, &self.shift) {
            (CellStatus::Off, _) => Ok(ShiftCell::off()),
            (CellStatus::Work, Some(shift)) => Ok(ShiftCell::work(shift)),
            (CellStatus::Work, None) => Err(Error::store(format!(
                "Saved cell for '{}' on day {} has no shift.",
                self.employee,
                self.day + 1
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSchedule {
    pub period: String,
    pub cells: Vec<SavedCell>,
}

pub trait ScheduleStore {
    fn save(&self, period: &Period, roster: &Roster, cells: &[(CellPos, ShiftCell)]) -> Result<usize>;

    /// Saved cells for `period` mapped onto `roster`; empty when nothing was saved.
    fn load(&self, period: &Period, roster: &Roster) -> Result<Vec<(CellPos, ShiftCell)>>;
}

/// `<dir>/<period key>.json`, one file per week or month.
#[derive(Debug, Clone)]
pub struct JsonScheduleStore {
    dir: PathBuf,
}

impl JsonScheduleStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, period: &Period) -> PathBuf {
        self.dir.join(format!("{}.json", period.key()))
    }
}

impl ScheduleStore for JsonScheduleStore {
    fn save(&self, period: &Period, roster: &Roster, cells: &[(CellPos, ShiftCell)]) -> Result<usize> {
        let mut merged: Vec<SavedCell> = self
            .read(period)?
            .map(|s| s.cells)
            .unwrap_or_default();
        let mut written = 0;
        for (pos, cell) in cells {
            let Some(name) = roster.get(pos.employee) else {
                continue;
            };
            let saved = SavedCell {
                day: pos.day,
                employee: name.to_string(),
                shift: cell.template(),
                status: cell.status(),
            };
            match merged
                .iter_mut()
                .find(|c| c.day == saved.day && roster.find(&c.employee) == Some(name))
            {
                Some(slot) => *slot = saved,
                None => merged.push(saved),
            }
            written += 1;
        }
        merged.sort_by(|a, b| a.day.cmp(&b.day).then_with(|| a.employee.cmp(&b.employee)));

        fs::create_dir_all(&self.dir)
            .map_err(|e| Error::store(format!("Failed to create {}: {}", self.dir.display(), e)))?;
        let doc = SavedSchedule {
            period: period.key(),
            cells: merged,
        };
        let path = self.path_for(period);
        fs::write(&path, serde_json::to_string_pretty(&doc)?)
            .map_err(|e| Error::store(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(written)
    }

    fn load(&self, period: &Period, roster: &Roster) -> Result<Vec<(CellPos, ShiftCell)>> {
        let Some(saved) = self.read(period)? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::with_capacity(saved.cells.len());
        for cell in &saved.cells {
            let Some(employee) = roster
                .find(&cell.employee)
                .and_then(|name| roster.names().iter().position(|n| n == name))
            else {
                continue;
            };
            if cell.day >= period.len() {
                continue;
            }
            out.push((CellPos::new(cell.day, employee), cell.to_cell()?));
        }
        Ok(out)
    }
}

impl JsonScheduleStore {
    fn read(&self, period: &Period) -> Result<Option<SavedSchedule>> {
        let path = self.path_for(period);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::store(format!("Failed to read {}: {}", path.display(), e)))?;
        let saved: SavedSchedule = serde_json::from_str(&text)
            .map_err(|e| Error::store(format!("Invalid schedule file {}: {}", path.display(), e)))?;
        if saved.period != period.key() {
            return Err(Error::store(format!(
                "{} holds '{}', expected '{}'.",
                path.display(),
                saved.period,
                period.key()
            )));
        }
        Ok(Some(saved))
    }
}
