use super::{documents, screen, temp_dir};
use crate::config::Config;
use crate::core::auth::{Session, UserRecord};
use crate::core::navigation::PeriodKind;
use crate::core::shifts::{ShiftCatalog, ShiftCell, ShiftDraft};
use crate::core::swap::{SwapDraft, SwapFeed};
use crate::core::types::Role;
use crate::core::upload::UploadedFile;
use crate::ui::display_manager::DisplayManager;

fn capture<F>(f: F) -> String
where
    F: FnOnce(&DisplayManager, &mut Vec<u8>) -> std::io::Result<()>,
{
    let mut buf = Vec::new();
    f(&DisplayManager::plain(), &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn schedule_view_shows_period_mode_and_status_lines() {
    let mut screen = screen(PeriodKind::Week, false);
    screen.toggle(0, 1).unwrap();
    let out = capture(|dm, buf| dm.render_schedule(&screen, buf));

    assert!(out.contains("WEEK 04 MAR 2024 - 10 MAR 2024 (EDITABLE)"));
    assert!(out.contains("1. ORN TAK"));
    assert!(out.contains("Selected date: Wed 06 Mar 2024 (column 3)"));
    assert!(out.contains("Selected cells: 1   Unsaved edits: 0"));
    assert!(!out.contains("Picker:"));
}

#[test]
fn read_only_schedule_hides_edit_counters_and_shows_picker() {
    let mut screen = screen(PeriodKind::Month, true);
    screen.open_picker();
    screen.set_picker_month(2).unwrap();
    let out = capture(|dm, buf| dm.render_schedule(&screen, buf));

    assert!(out.contains("MARCH 2024 (READ-ONLY)"));
    assert!(!out.contains("Selected cells"));
    assert!(out.contains("Picker: day 6 / month 2 / year 2024 (1-29 this month)"));
}

#[test]
fn swap_view_lists_newest_first_with_manage_hints() {
    let feed = SwapFeed::new(documents()).with_clock(|| 1_700_000_000);
    feed.submit(&mut SwapDraft::new("ORN TAK", "SOTH SOKLAY", "2024-03-06", "family"))
        .unwrap();
    let live = feed.open();

    let admin = capture(|dm, buf| dm.render_swaps(&live, true, buf));
    assert!(admin.contains("EMPLOYEE 1 | EMPLOYEE 2"));
    assert!(admin.contains("ORN TAK"));
    assert!(admin.contains("swap del <id>"));

    let client = capture(|dm, buf| dm.render_swaps(&live, false, buf));
    assert!(!client.contains("swap del"));
}

#[test]
fn empty_swap_view_shows_placeholder() {
    let live = SwapFeed::new(documents()).open();
    let out = capture(|dm, buf| dm.render_swaps(&live, false, buf));
    assert!(out.contains("No swap requests yet."));
}

#[test]
fn config_view_lists_every_key() {
    let path = temp_dir("cfg").with_extension("json");
    let cfg = Config::create_default(&path, vec![UserRecord::new("a", "b", Role::Admin)]).unwrap();
    let out = capture(|dm, buf| dm.render_config(&cfg, buf));
    for key in [
        "ROSTER",
        "SHIFT_CATALOG",
        "DEFAULT_SHIFT",
        "UPLOAD_MAX_MB",
        "FILE_LOGGING_ENABLED",
    ] {
        assert!(out.contains(key), "missing {key}");
    }
    assert!(!out.contains("password"));
}

#[test]
fn dashboard_and_login_views_name_the_role() {
    let session = Session {
        username: "team".into(),
        role: Role::Client,
    };
    let out = capture(|dm, buf| dm.render_dashboard(&session, buf));
    assert!(out.contains("IGS TEAM DASHBOARD"));
    assert!(out.contains("Signed in as team."));

    let login = capture(|dm, buf| dm.render_login(Role::Admin, buf));
    assert!(login.contains("ADMIN LOGIN"));

    let roles = capture(|dm, buf| dm.render_role_choice(buf));
    assert!(roles.contains("role <admin|client>"));
}

#[test]
fn edit_seed_view_shows_current_choice() {
    let catalog = ShiftCatalog::default();
    let draft = ShiftDraft::from_cell(&ShiftCell::off(), catalog.default_shift());
    let out = capture(|dm, buf| dm.render_edit_seed(&draft, &catalog, buf));
    assert!(out.contains("Current: Day Off"));
    assert!(out.contains("23:00-06:36"));
}

#[test]
fn help_log_and_upload_views() {
    let help = capture(|dm, buf| dm.render_help(&[("prev", "Previous period")], buf));
    assert!(help.contains("prev    | Previous period"));

    let log = capture(|dm, buf| dm.render_log(&[], buf));
    assert!(log.contains("Nothing logged yet."));

    let file = UploadedFile {
        name: "roster.xlsx".into(),
        url: "file:///tmp/roster.xlsx".into(),
        size: 12,
        content_type: "application/octet-stream".into(),
        uploaded_at: "2024-03-06T00:00:00.000Z".into(),
        path: "uploads/1_roster.xlsx".into(),
    };
    let out = capture(|dm, buf| dm.render_upload(&file, buf));
    assert!(out.contains("12 bytes"));
    assert!(out.contains("UPLOAD COMPLETE"));
}
