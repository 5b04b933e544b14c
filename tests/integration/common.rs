use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use igs::command::args::tokenize;
use igs::command::command_parser::CommandParser;
use igs::command::commands::Outcome;
use igs::config::Config;
use igs::core::auth::UserRecord;
use igs::core::types::Role;
use igs::logging::Logger;
use igs::{AppContext, CliPaths};

pub fn binary_path() -> String {
    let raw = PathBuf::from(env!("CARGO_BIN_EXE_igs"));
    if raw.is_absolute() {
        return raw.to_string_lossy().to_string();
    }
    let from_manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(&raw);
    if from_manifest.exists() {
        return from_manifest.to_string_lossy().to_string();
    }
    raw.to_string_lossy().to_string()
}

static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn make_temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "igs-{prefix}-{}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = fs::create_dir_all(&dir);
    dir
}

/// `config.json` with the built-in defaults and two accounts:
/// `admin`/`admin-pw` and `team`/`team-pw`.
pub fn write_valid_config(dir: &Path) {
    Config::create_default(
        dir.join("config.json"),
        vec![
            UserRecord::new("admin", "admin-pw", Role::Admin),
            UserRecord::new("team", "team-pw", Role::Client),
        ],
    )
    .expect("config should be written");
}

pub fn run_with_input(dir: &Path, input: &str) -> Output {
    run_with_args(dir, &[], input)
}

pub fn run_with_args(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(binary_path())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn binary");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    child.wait_with_output().unwrap()
}

fn strip_ansi_and_control(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1B' && matches!(chars.peek(), Some('[')) {
            let _ = chars.next();
            for nc in chars.by_ref() {
                if nc.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        if c.is_control() {
            continue;
        }
        out.push(c);
    }

    out
}

/// Output lines without styling, surrounding blanks or the `> ` prompt.
pub fn normalized_lines(buf: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(buf)
        .lines()
        .map(|l| {
            let stripped = strip_ansi_and_control(l);
            let mut trimmed = stripped.trim();
            while let Some(rest) = trimmed.strip_prefix('>') {
                trimmed = rest.trim_start();
            }
            trimmed.to_string()
        })
        .filter(|l| !l.is_empty())
        .collect()
}

pub fn stdout_text(output: &Output) -> String {
    normalized_lines(&output.stdout).join("\n")
}

pub fn stderr_text(output: &Output) -> String {
    normalized_lines(&output.stderr).join("\n")
}

/// Context over `dir` with a fixed "today" of Wednesday 6 March 2024.
pub fn build_context(dir: &Path) -> AppContext {
    let paths = CliPaths {
        config_path: dir.join("config.json"),
        data_dir: dir.join("data"),
        logs_dir: dir.join("logs"),
    };
    let mut ctx = AppContext::with_logger(paths, Logger::quiet()).expect("context should load");
    ctx.today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
    ctx
}

/// Run one line against `ctx`; panics on any error or pending question.
pub fn execute_command(line: &str, ctx: &mut AppContext) -> String {
    let tokens = tokenize(line).unwrap_or_else(|e| panic!("tokenize failed for '{line}': {e}"));
    let (command, args) = tokens.split_first().expect("empty line");
    let cmd = CommandParser::new()
        .parse(command, args)
        .unwrap_or_else(|e| panic!("command parse failed for '{line}': {e}"));
    let mut out = Vec::new();
    match cmd.execute(ctx, &mut out) {
        Ok(Outcome::Done) => {}
        Ok(Outcome::Confirm(action)) => panic!("'{line}' asked: {}", action.prompt()),
        Err(e) => panic!("command execute failed for '{line}': {e}"),
    }
    String::from_utf8(out).unwrap()
}

pub fn read_log_contents(dir: &Path) -> Option<String> {
    let logs_dir = dir.join("logs");
    let mut contents = String::new();
    for entry in fs::read_dir(logs_dir).ok()?.flatten() {
        contents.push_str(&fs::read_to_string(entry.path()).ok()?);
    }
    Some(contents)
}
