use super::main_flow::MainFlow;
use crate::command::commands::PendingAction;
use crate::config::Config;
use crate::core::auth::UserRecord;
use crate::core::cli::CliPaths;
use crate::core::context::AppContext;
use crate::core::store::DocumentStore;
use crate::core::types::Role;
use crate::logging::Logger;
use crate::prompter::models::{Flow, FlowCtrl};
use crate::prompter::prompter::Prompter;
use chrono::NaiveDate;
use std::cell::RefCell;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let uniq = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("igs-flow-{nanos}-{uniq}"))
}

fn make_ctx() -> AppContext {
    let root = temp_dir();
    let paths = CliPaths {
        config_path: root.join("config.json"),
        data_dir: root.join("data"),
        logs_dir: root.join("logs"),
    };
    Config::create_default(
        &paths.config_path,
        vec![
            UserRecord::new("admin", "pw", Role::Admin),
            UserRecord::new("team", "pw", Role::Client),
        ],
    )
    .unwrap();
    let mut ctx = AppContext::with_logger(paths, Logger::quiet()).unwrap();
    ctx.today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
    ctx
}

#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn run_script(ctx: &mut AppContext, script: &'static str) -> String {
    let buf = SharedBuf::default();
    let flow = MainFlow::with_output(ctx, Box::new(buf.clone()));
    Prompter::plain()
        .run_with_reader(flow, false, Cursor::new(script.as_bytes()))
        .unwrap();
    buf.text()
}

fn history_has(ctx: &AppContext, needle: &str) -> bool {
    ctx.logger.history().iter().any(|l| l.contains(needle))
}

#[test]
fn startup_prints_banner_paths_and_role_choice_once() {
    let mut ctx = make_ctx();
    let buf = SharedBuf::default();
    {
        let mut flow = MainFlow::with_output(&mut ctx, Box::new(buf.clone()));
        flow.render().unwrap();
        flow.render().unwrap();
    }
    let text = buf.text();
    assert!(ctx.startup_displayed);
    assert_eq!(text.matches("I G S").count(), 1);
    assert!(text.contains("Config path: "));
    assert!(text.contains("WHO ARE YOU?"));
    assert!(!text.contains('\x1B'));
    assert!(text.ends_with("> > "));
}

#[test]
fn blank_lines_continue_and_exit_finishes() {
    let mut ctx = make_ctx();
    let mut flow = MainFlow::with_output(&mut ctx, Box::new(Vec::<u8>::new()));
    assert!(matches!(flow.handle_input("   ").unwrap(), FlowCtrl::Continue));
    assert!(matches!(flow.handle_input("exit").unwrap(), FlowCtrl::Finish));
}

#[test]
fn commands_run_in_order_and_are_logged() {
    let mut ctx = make_ctx();
    let out = run_script(&mut ctx, "role admin\nlogin admin pw\nview weekly\nlog\n");
    assert!(out.contains("Welcome, admin."));
    assert!(out.contains("(EDITABLE)"));
    assert!(history_has(&ctx, "Command run: view weekly"));
    assert!(history_has(&ctx, "Command run: login admin ***"));
    assert!(!history_has(&ctx, "admin pw"));
    assert!(!ctx.logger.history().iter().any(|l| l.ends_with("Command run: log")));
}

#[test]
fn unknown_commands_and_bad_quotes_are_reported() {
    let mut ctx = make_ctx();
    run_script(&mut ctx, "bogus\nlogin \"admin\n");
    assert!(history_has(&ctx, "Command resolution failed for 'bogus'"));
    assert!(history_has(&ctx, "Could not read 'login \"admin'"));
}

#[test]
fn unreadable_login_lines_hide_the_password() {
    let mut ctx = make_ctx();
    run_script(&mut ctx, "login admin \"se cret\nlogin \"admin\n");
    assert!(history_has(&ctx, "Could not read 'login admin ***'"));
    assert!(!history_has(&ctx, "se cret"));
    assert!(history_has(&ctx, "Could not read 'login \"admin'"));
}

#[test]
fn usage_errors_keep_the_usage_line_out_of_the_file_log() {
    let mut ctx = make_ctx();
    run_script(&mut ctx, "role\n");
    let line = ctx
        .logger
        .history()
        .into_iter()
        .find(|l| l.contains("Command execution failed for 'role'"))
        .unwrap();
    assert!(line.contains("Missing role."));
    assert!(!line.contains("Usage:"));
}

#[test]
fn swap_delete_waits_for_a_yes() {
    let mut ctx = make_ctx();
    let out = run_script(
        &mut ctx,
        "role admin\nlogin admin pw\nview swap\nswap add \"ORN TAK\" \"SOTH SOKLAY\" 2024-03-06 cover\nswap del 000001\nmaybe\ny\n",
    );
    assert!(out.contains("Please answer Y or N."));
    assert!(out.contains("(Y/N) "));
    assert!(ctx.documents.list("swaps").unwrap().is_empty());
    assert!(history_has(&ctx, "Swap request 000001 deleted."));
}

#[test]
fn swap_delete_answered_no_keeps_the_request() {
    let mut ctx = make_ctx();
    let buf = SharedBuf::default();
    {
        let mut flow = MainFlow::with_output(&mut ctx, Box::new(buf.clone()));
        for line in [
            "role admin",
            "login admin pw",
            "view swap",
            r#"swap add "ORN TAK" "SOTH SOKLAY" 2024-03-06 cover"#,
            "swap del 000001",
        ] {
            flow.handle_input(line).unwrap();
        }
        assert_eq!(
            flow.pending(),
            Some(&PendingAction::DeleteSwap {
                id: "000001".into()
            })
        );
        flow.handle_input("N").unwrap();
        assert!(flow.pending().is_none());
    }
    assert!(buf.text().contains("Delete cancelled."));
    assert_eq!(ctx.documents.list("swaps").unwrap().len(), 1);
}
