use igs::core::grid::CellPos;
use igs::core::shifts::ShiftTemplate;

use crate::common::{
    build_context, execute_command, make_temp_dir, run_with_input, stderr_text, stdout_text,
    write_valid_config,
};

fn admin_context(dir: &std::path::Path) -> igs::AppContext {
    let mut ctx = build_context(dir);
    execute_command("role admin", &mut ctx);
    execute_command("login admin admin-pw", &mut ctx);
    ctx
}

#[test]
fn saved_edits_are_shown_to_the_next_session() {
    let dir = make_temp_dir("schedule");
    write_valid_config(&dir);
    {
        let mut ctx = admin_context(&dir);
        execute_command("view weekly", &mut ctx);
        execute_command("cell 3 2", &mut ctx);
        execute_command("cell 4 2", &mut ctx);
        let applied = execute_command("apply 13:00-22:36", &mut ctx);
        assert!(applied.starts_with("Applied 13:00-22:36 to 2 cell(s)."));
        execute_command("save", &mut ctx);
        execute_command("logout", &mut ctx);
    }

    let mut ctx = build_context(&dir);
    execute_command("role client", &mut ctx);
    execute_command("login team team-pw", &mut ctx);
    let shown = execute_command("view weekly", &mut ctx);
    assert!(shown.contains("(READ-ONLY)"));

    let late = ShiftTemplate::try_from_str("13:00-22:36").unwrap();
    let grid = ctx.screen().unwrap().grid();
    assert_eq!(grid.cell(CellPos::new(2, 1)).unwrap().template(), Some(late.clone()));
    assert_eq!(grid.cell(CellPos::new(3, 1)).unwrap().template(), Some(late));
    assert!(grid.cell(CellPos::new(2, 0)).unwrap().template().is_some());
}

#[test]
fn unsaved_edits_are_dropped_when_the_period_changes() {
    let dir = make_temp_dir("schedule");
    write_valid_config(&dir);
    let mut ctx = admin_context(&dir);
    execute_command("view weekly", &mut ctx);
    execute_command("cell 1 1", &mut ctx);
    execute_command("apply off", &mut ctx);
    assert_eq!(ctx.screen().unwrap().board().edited().len(), 1);

    execute_command("next", &mut ctx);
    execute_command("prev", &mut ctx);
    assert!(ctx.screen().unwrap().board().edited().is_empty());
    assert!(!ctx.screen().unwrap().grid().cell(CellPos::new(0, 0)).unwrap().is_off());
}

#[test]
fn weekly_and_monthly_saves_are_kept_apart() {
    let dir = make_temp_dir("schedule");
    write_valid_config(&dir);
    let mut ctx = admin_context(&dir);
    execute_command("view monthly", &mut ctx);
    // Day 6 of March 2024 is the Wednesday of the fixed test week.
    execute_command("cell 6 1", &mut ctx);
    execute_command("apply off", &mut ctx);
    execute_command("save", &mut ctx);

    execute_command("view weekly", &mut ctx);
    assert!(!ctx.screen().unwrap().grid().cell(CellPos::new(2, 0)).unwrap().is_off());

    execute_command("view monthly", &mut ctx);
    assert!(ctx.screen().unwrap().grid().cell(CellPos::new(5, 0)).unwrap().is_off());
}

#[test]
fn weekly_view_runs_through_the_binary() {
    let dir = make_temp_dir("schedule");
    write_valid_config(&dir);
    let input = "role admin\nlogin admin admin-pw\nview weekly\ncell 1 1\napply off\nsave\nnext\ntoday\nexit\n";
    let output = run_with_input(&dir, input);

    assert!(output.status.success());
    let stdout = stdout_text(&output);
    assert!(stdout.contains("(EDITABLE)"));
    assert!(stdout.contains("Applied Day Off to 1 cell(s)."));
    assert!(stdout.contains("Saved 1 edited cell(s) for Week"));
    assert!(stdout.contains("Unsaved edits: 1"));
    assert!(dir.join("data").join("schedules").exists());
}

#[test]
fn clients_cannot_edit_through_the_binary() {
    let dir = make_temp_dir("schedule");
    write_valid_config(&dir);
    let input = "role client\nlogin team team-pw\nview monthly\ncell 1 1\nnext\nexit\n";
    let output = run_with_input(&dir, input);

    assert!(output.status.success());
    assert!(stdout_text(&output).contains("(READ-ONLY)"));
    assert!(stderr_text(&output).contains("This schedule is read-only."));
}

#[test]
fn picker_jumps_to_the_staged_month() {
    let dir = make_temp_dir("schedule");
    write_valid_config(&dir);
    let mut ctx = admin_context(&dir);
    execute_command("view monthly", &mut ctx);
    let staged = execute_command("pick 2024-02-29", &mut ctx);
    assert!(staged.contains("Picker: day 29 / month 2 / year 2024"));
    execute_command("pick year 2023", &mut ctx);
    let jumped = execute_command("pick ok", &mut ctx);

    assert!(jumped.contains("FEBRUARY 2023"));
    assert_eq!(
        ctx.screen().unwrap().navigator().selected().to_string(),
        "2023-02-28"
    );
}
