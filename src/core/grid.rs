use crate::core::navigation::Period;
use crate::core::shifts::{ShiftCatalog, ShiftCell, ShiftChoice, ShiftDraft};
use crate::errors::{Error, Result};
use crate::extensions::chrono::WeekdayExt;
use crate::extensions::string::NameKey;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, HashSet};

/// Ordered employee names; the position is the grid's employee index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster(Vec<String>);

impl Roster {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| Into::<String>::into(n).trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(Error::config("Roster must list at least one employee."));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.name_key()) {
                return Err(Error::config(format!("Roster lists '{name}' twice.")));
            }
        }
        Ok(Self(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    /// Case- and whitespace-insensitive match, returning the canonical name.
    pub fn find(&self, name: &str) -> Option<&str> {
        let key = name.name_key();
        self.0.iter().find(|n| n.name_key() == key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPos {
    pub day: usize,
    pub employee: usize,
}

impl CellPos {
    pub fn new(day: usize, employee: usize) -> Self {
        Self { day, employee }
    }
}

/// Day-major table of cells with dimensions fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleGrid {
    period: Period,
    dates: Vec<NaiveDate>,
    employees: usize,
    cells: Vec<Vec<ShiftCell>>,
}

impl ScheduleGrid {
    /// Weekend days default to off, every other day to the catalog default.
    pub fn initialize(period: Period, roster: &Roster, catalog: &ShiftCatalog) -> Self {
        let dates = period.dates();
        let employees = roster.len();
        let cells = dates
            .iter()
            .map(|date| {
                let cell = if date.weekday().is_weekend() {
                    ShiftCell::off()
                } else {
                    ShiftCell::work(catalog.default_shift())
                };
                vec![cell; employees]
            })
            .collect();
        Self {
            period,
            dates,
            employees,
            cells,
        }
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn days(&self) -> usize {
        self.cells.len()
    }

    pub fn employees(&self) -> usize {
        self.employees
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.day < self.days() && pos.employee < self.employees
    }

    pub fn cell(&self, pos: CellPos) -> Option<&ShiftCell> {
        self.cells.get(pos.day).and_then(|row| row.get(pos.employee))
    }

    pub fn day_cells(&self, day: usize) -> &[ShiftCell] {
        self.cells.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    fn set(&mut self, pos: CellPos, cell: ShiftCell) -> bool {
        match self.cells.get_mut(pos.day).and_then(|row| row.get_mut(pos.employee)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet(BTreeSet<CellPos>);

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove `(day, employee)`. Out-of-bounds positions leave the set
    /// unchanged and return false.
    pub fn toggle(&mut self, grid: &ScheduleGrid, day: usize, employee: usize) -> bool {
        let pos = CellPos::new(day, employee);
        if !grid.contains(pos) {
            return false;
        }
        if !self.0.remove(&pos) {
            self.0.insert(pos);
        }
        true
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.0.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellPos> {
        self.0.iter()
    }

    /// Positions still inside `grid`; stale ones are skipped.
    pub fn in_bounds(&self, grid: &ScheduleGrid) -> Vec<CellPos> {
        self.0.iter().copied().filter(|p| grid.contains(*p)).collect()
    }

    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, pos: CellPos) {
        self.0.insert(pos);
    }
}

/// Cells explicitly modified since the grid was initialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditedSet(BTreeSet<CellPos>);

impl EditedSet {
    pub fn insert(&mut self, pos: CellPos) -> bool {
        self.0.insert(pos)
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.0.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellPos> {
        self.0.iter()
    }
}

/// A grid together with its selection and edit bookkeeping.
#[derive(Debug, Clone)]
pub struct ScheduleBoard {
    grid: ScheduleGrid,
    selection: SelectionSet,
    edited: EditedSet,
}

impl ScheduleBoard {
    pub fn initialize(period: Period, roster: &Roster, catalog: &ShiftCatalog) -> Self {
        Self {
            grid: ScheduleGrid::initialize(period, roster, catalog),
            selection: SelectionSet::new(),
            edited: EditedSet::default(),
        }
    }

    pub fn grid(&self) -> &ScheduleGrid {
        &self.grid
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn edited(&self) -> &EditedSet {
        &self.edited
    }

    pub fn toggle(&mut self, day: usize, employee: usize) -> bool {
        self.selection.toggle(&self.grid, day, employee)
    }

    /// Write `choice` into every selected in-bounds cell and clear the
    /// selection. Returns how many cells were written.
    pub fn apply_batch(&mut self, choice: &ShiftChoice) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let targets = self.selection.in_bounds(&self.grid);
        let cell = ShiftCell::from_choice(choice);
        let mut written = 0;
        for pos in targets {
            if self.grid.set(pos, cell.clone()) {
                self.edited.insert(pos);
                written += 1;
            }
        }
        self.selection.clear();
        written
    }

    /// Draft seeded from the first valid selected cell. A selection that is
    /// entirely stale is cleared and yields `None`.
    pub fn edit_seed(&mut self, catalog: &ShiftCatalog) -> Option<ShiftDraft> {
        let first = self.selection.in_bounds(&self.grid).into_iter().next();
        match first.and_then(|pos| self.grid.cell(pos)) {
            Some(cell) => Some(ShiftDraft::from_cell(cell, catalog.default_shift())),
            None => {
                self.selection.clear();
                None
            }
        }
    }

    /// Lay previously saved cells over the defaults, marking them edited.
    pub fn overlay<I>(&mut self, cells: I) -> usize
    where
        I: IntoIterator<Item = (CellPos, ShiftCell)>,
    {
        let mut applied = 0;
        for (pos, cell) in cells {
            if self.grid.set(pos, cell) {
                self.edited.insert(pos);
                applied += 1;
            }
        }
        applied
    }

    pub fn edited_cells(&self) -> Vec<(CellPos, ShiftCell)> {
        self.edited
            .iter()
            .filter_map(|pos| self.grid.cell(*pos).map(|c| (*pos, c.clone())))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }
}
