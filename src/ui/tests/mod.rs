mod display_manager_tests;

use crate::core::grid::Roster;
use crate::core::navigation::PeriodKind;
use crate::core::screen::ScheduleScreen;
use crate::core::shifts::ShiftCatalog;
use crate::core::store::{JsonDocumentStore, JsonScheduleStore};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub(super) fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let uniq = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("igs-ui-{name}-{nanos}-{uniq}"))
}

pub(super) fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
}

pub(super) fn screen(kind: PeriodKind, read_only: bool) -> ScheduleScreen {
    ScheduleScreen::open(
        kind,
        wednesday(),
        Roster::new(["ORN TAK", "SOTH SOKLAY"]).unwrap(),
        ShiftCatalog::default(),
        Rc::new(JsonScheduleStore::new(temp_dir("sched"))),
        read_only,
    )
    .unwrap()
}

pub(super) fn documents() -> Rc<JsonDocumentStore> {
    Rc::new(JsonDocumentStore::new(temp_dir("docs")))
}
