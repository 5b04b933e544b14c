use igs::config::Config;

use crate::common::{
    build_context, execute_command, make_temp_dir, read_log_contents, run_with_args,
    run_with_input, stderr_text, stdout_text, write_valid_config,
};

#[test]
fn config_command_lists_every_item() {
    let dir = make_temp_dir("config");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "config\nexit\n");

    assert!(output.status.success());
    let stdout = stdout_text(&output);
    for key in [
        "CONFIG",
        "ROSTER",
        "SHIFT_CATALOG",
        "DEFAULT_SHIFT",
        "UPLOAD_MAX_MB",
        "FILE_LOGGING_ENABLED",
    ] {
        assert!(stdout.contains(key), "missing {key}");
    }
}

#[test]
fn config_edit_persists_and_is_logged() {
    let dir = make_temp_dir("config");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "config UPLOAD_MAX_MB 3\nexit\n");

    assert!(output.status.success());
    assert!(stdout_text(&output).contains("Config UPLOAD_MAX_MB changed from '10' to '3'."));
    let cfg = Config::load_from(dir.join("config.json")).expect("config should reload");
    assert_eq!(cfg.upload_max_mb(), 3);
    assert_eq!(cfg.users().len(), 2);

    let log = read_log_contents(&dir).expect("log file should exist");
    assert!(log.contains("Config UPLOAD_MAX_MB changed"));
}

#[test]
fn invalid_config_edit_is_rejected() {
    let dir = make_temp_dir("config");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "config DEFAULT_SHIFT 01:00-02:00\nconfig NOPE 1\nexit\n");

    let stderr = stderr_text(&output);
    assert!(stderr.contains("Command execution failed for 'config'"));
    assert!(stderr.contains("NOPE"));
    let cfg = Config::load_from(dir.join("config.json")).unwrap();
    assert_eq!(cfg.catalog().unwrap().default_shift().label(), "08:00-17:36");
}

#[test]
fn disabling_file_logging_stops_new_log_files() {
    let dir = make_temp_dir("config");
    write_valid_config(&dir);
    run_with_input(&dir, "config FILE_LOGGING_ENABLED no\nexit\n");
    let _ = std::fs::remove_dir_all(dir.join("logs"));

    run_with_input(&dir, "help\nexit\n");
    assert!(read_log_contents(&dir).is_none());
}

#[test]
fn roster_edit_changes_the_grid() {
    let dir = make_temp_dir("config");
    write_valid_config(&dir);
    let mut ctx = build_context(&dir);
    execute_command("config ROSTER ALPHA, BRAVO", &mut ctx);
    execute_command("role client", &mut ctx);
    execute_command("login team team-pw", &mut ctx);
    let shown = execute_command("view weekly", &mut ctx);

    assert!(shown.contains("1. ALPHA"));
    assert!(shown.contains("2. BRAVO"));
    assert_eq!(ctx.screen().unwrap().grid().employees(), 2);
}

#[test]
fn paths_can_be_given_on_the_command_line() {
    let dir = make_temp_dir("config");
    let conf_dir = dir.join("conf");
    std::fs::create_dir_all(&conf_dir).unwrap();
    write_valid_config(&conf_dir);

    let output = run_with_args(
        &dir,
        &["--config", "conf/config.json", "--data", "store", "--logs", "out"],
        "role admin\nlogin admin admin-pw\nexit\n",
    );
    assert!(output.status.success(), "stderr: {}", stderr_text(&output));
    assert!(stdout_text(&output).contains("Config path: conf/config.json"));
    assert!(dir.join("store").join("session.json").exists());
    assert!(dir.join("out").exists());
}
