use crate::common::{
    make_temp_dir, normalized_lines, read_log_contents, run_with_args, run_with_input,
    stderr_text, stdout_text, write_valid_config,
};

#[test]
fn missing_config_fails_startup() {
    let dir = make_temp_dir("session");
    let output = run_with_input(&dir, "exit\n");

    assert!(!output.status.success());
    let stderr = stderr_text(&output);
    assert!(
        stderr.contains("config.json"),
        "stderr should name the config file. stderr was: {stderr}"
    );
}

#[test]
fn unknown_cli_argument_fails_with_usage() {
    let dir = make_temp_dir("session");
    write_valid_config(&dir);
    let output = run_with_args(&dir, &["--bogus"], "exit\n");

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_text(&output);
    assert!(stderr.contains("Unknown argument: --bogus"));
    assert!(stderr.contains("usage: igs"));
}

#[test]
fn startup_shows_banner_and_role_choice() {
    let dir = make_temp_dir("session");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "exit\n");

    assert!(output.status.success());
    let lines = normalized_lines(&output.stdout);
    assert!(lines.iter().any(|l| l.contains("I G S")));
    assert!(lines.iter().any(|l| l == "WHO ARE YOU?"));
    assert!(lines.iter().any(|l| l == "Config path: config.json"));
}

#[test]
fn unknown_command_reports_error_and_continues() {
    let dir = make_temp_dir("session");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "frobnicate\nhelp\nexit\n");

    assert!(output.status.success());
    let expected = "Command resolution failed for 'frobnicate'. Unknown command: frobnicate";
    assert!(
        normalized_lines(&output.stderr).iter().any(|l| l == expected),
        "stderr was: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout_text(&output).contains("COMMANDS"));
}

#[test]
fn admin_signs_in_and_sees_dashboard() {
    let dir = make_temp_dir("session");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "role admin\nlogin admin admin-pw\nexit\n");

    assert!(output.status.success());
    let stdout = stdout_text(&output);
    assert!(stdout.contains("ADMIN LOGIN"));
    assert!(stdout.contains("Welcome, admin."));
    assert!(stdout.contains("ADMIN DASHBOARD"));
    assert!(stdout.contains("Signed in as admin."));
}

#[test]
fn wrong_password_is_rejected_without_logging_it() {
    let dir = make_temp_dir("session");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "role admin\nlogin admin nope\nexit\n");

    assert!(output.status.success());
    assert!(stderr_text(&output).contains("Invalid username or password"));
    assert!(!stdout_text(&output).contains("DASHBOARD"));

    let log = read_log_contents(&dir).expect("log file should exist");
    assert!(log.contains("Command run: login admin ***"));
    assert!(!log.contains("nope"));
}

#[test]
fn client_cannot_sign_in_through_the_admin_role() {
    let dir = make_temp_dir("session");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "role admin\nlogin team team-pw\nexit\n");

    assert!(stderr_text(&output).contains("Invalid username or password"));
    assert!(!stdout_text(&output).contains("Welcome"));
}

#[test]
fn session_survives_restart_until_logout() {
    let dir = make_temp_dir("session");
    write_valid_config(&dir);
    run_with_input(&dir, "role client\nlogin team team-pw\nexit\n");

    let second = run_with_input(&dir, "logout\nexit\n");
    let stdout = stdout_text(&second);
    assert!(stdout.contains("IGS TEAM DASHBOARD"));
    assert!(stdout.contains("Signed out."));

    let third = run_with_input(&dir, "exit\n");
    assert!(!stdout_text(&third).contains("DASHBOARD"));
}

#[test]
fn views_need_a_session() {
    let dir = make_temp_dir("session");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "view weekly\nexit\n");

    assert!(stderr_text(&output).contains("Cannot open 'weekly': sign in first"));
}
