use crate::core::grid::{Roster, ScheduleBoard, ScheduleGrid};
use crate::core::navigation::{Navigator, Period, PeriodKind};
use crate::core::shifts::{ShiftCatalog, ShiftChoice, ShiftDraft};
use crate::core::store::ScheduleStore;
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use std::rc::Rc;

/// Week or month schedule view: a navigator, the board for its current
/// period and the store saved cells come from.
///
/// Whenever the period changes the board is rebuilt from defaults and the
/// saved cells for the new period are laid over it. Unsaved edits do not
/// survive the move.
pub struct ScheduleScreen {
    navigator: Navigator,
    board: ScheduleBoard,
    roster: Roster,
    catalog: ShiftCatalog,
    store: Rc<dyn ScheduleStore>,
    read_only: bool,
}

impl ScheduleScreen {
    pub fn open(
        kind: PeriodKind,
        today: NaiveDate,
        roster: Roster,
        catalog: ShiftCatalog,
        store: Rc<dyn ScheduleStore>,
        read_only: bool,
    ) -> Result<Self> {
        let navigator = Navigator::new(kind, today);
        let board = ScheduleBoard::initialize(*navigator.period(), &roster, &catalog);
        let mut screen = Self {
            navigator,
            board,
            roster,
            catalog,
            store,
            read_only,
        };
        screen.reload()?;
        Ok(screen)
    }

    pub fn kind(&self) -> PeriodKind {
        self.navigator.period().kind()
    }

    pub fn period(&self) -> &Period {
        self.navigator.period()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn board(&self) -> &ScheduleBoard {
        &self.board
    }

    pub fn grid(&self) -> &ScheduleGrid {
        self.board.grid()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn catalog(&self) -> &ShiftCatalog {
        &self.catalog
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn prev(&mut self) -> Result<bool> {
        let moved = self.navigator.prev();
        self.after_move(moved)
    }

    pub fn next(&mut self) -> Result<bool> {
        let moved = self.navigator.next();
        self.after_move(moved)
    }

    pub fn today(&mut self) -> Result<bool> {
        let moved = self.navigator.today();
        self.after_move(moved)
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.navigator.select_date(date);
    }

    pub fn open_picker(&mut self) {
        self.navigator.open_picker();
    }

    pub fn set_picker_day(&mut self, day: u32) -> Result<()> {
        self.navigator.set_picker_day(day)
    }

    pub fn set_picker_month(&mut self, month: u32) -> Result<()> {
        self.navigator.set_picker_month(month)
    }

    pub fn set_picker_year(&mut self, year: i32) -> Result<()> {
        self.navigator.set_picker_year(year)
    }

    pub fn set_picker_date(&mut self, date: NaiveDate) -> Result<()> {
        self.navigator.set_picker_date(date)
    }

    pub fn confirm_picker(&mut self) -> Result<bool> {
        let moved = self.navigator.confirm_picker()?;
        self.after_move(moved)
    }

    pub fn cancel_picker(&mut self) {
        self.navigator.cancel_picker();
    }

    pub fn toggle(&mut self, day: usize, employee: usize) -> Result<bool> {
        self.ensure_editable()?;
        Ok(self.board.toggle(day, employee))
    }

    pub fn edit_seed(&mut self) -> Result<Option<ShiftDraft>> {
        self.ensure_editable()?;
        Ok(self.board.edit_seed(&self.catalog))
    }

    pub fn apply(&mut self, choice: &ShiftChoice) -> Result<usize> {
        self.ensure_editable()?;
        Ok(self.board.apply_batch(choice))
    }

    /// Persist the edited cells of the current period.
    pub fn save(&self) -> Result<usize> {
        self.ensure_editable()?;
        let cells = self.board.edited_cells();
        if cells.is_empty() {
            return Ok(0);
        }
        self.store.save(self.navigator.period(), &self.roster, &cells)
    }

    fn after_move(&mut self, moved: bool) -> Result<bool> {
        if moved {
            self.reload()?;
        }
        Ok(moved)
    }

    fn reload(&mut self) -> Result<()> {
        let period = *self.navigator.period();
        self.board = ScheduleBoard::initialize(period, &self.roster, &self.catalog);
        let saved = self.store.load(&period, &self.roster)?;
        self.board.overlay(saved);
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::domain("This schedule is read-only."));
        }
        Ok(())
    }
}
