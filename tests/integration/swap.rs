use igs::core::store::DocumentStore;

use crate::common::{
    build_context, execute_command, make_temp_dir, run_with_input, stderr_text, stdout_text,
    write_valid_config,
};

#[test]
fn admin_adds_and_client_sees_swap_requests() {
    let dir = make_temp_dir("swap");
    write_valid_config(&dir);
    let admin = run_with_input(
        &dir,
        "role admin\nlogin admin admin-pw\nview swap\nswap add \"ORN TAK\" \"SOTH SOKLAY\" 2024-03-06 family event\nlogout\nexit\n",
    );
    assert!(admin.status.success());
    assert!(stdout_text(&admin).contains("Swap request 000001 added."));

    let client = run_with_input(&dir, "role client\nlogin team team-pw\nview swap\nexit\n");
    let stdout = stdout_text(&client);
    assert!(stdout.contains("SWAP REQUESTS"));
    assert!(stdout.contains("ORN TAK"));
    assert!(stdout.contains("family event"));
    assert!(!stdout.contains("Delete with"));
}

#[test]
fn empty_feed_shows_placeholder() {
    let dir = make_temp_dir("swap");
    write_valid_config(&dir);
    let output = run_with_input(&dir, "role client\nlogin team team-pw\nview swap\nexit\n");
    assert!(stdout_text(&output).contains("No swap requests yet."));
}

#[test]
fn delete_asks_before_removing() {
    let dir = make_temp_dir("swap");
    write_valid_config(&dir);
    let input = "role admin\nlogin admin admin-pw\nview swap\nswap add \"ORN TAK\" \"SOTH SOKLAY\" 2024-03-06 cover\nswap del 000001\nn\nswap del 000001\nyes\nexit\n";
    let output = run_with_input(&dir, input);

    let stdout = stdout_text(&output);
    assert!(stdout.contains("Are you sure you want to delete this swap request? (Y/N)"));
    assert!(stdout.contains("Delete cancelled."));
    assert!(stdout.contains("Swap request 000001 deleted."));

    let ctx = build_context(&dir);
    assert!(ctx.documents.list("swaps").unwrap().is_empty());
}

#[test]
fn invalid_drafts_are_rejected() {
    let dir = make_temp_dir("swap");
    write_valid_config(&dir);
    let input = "role admin\nlogin admin admin-pw\nswap add A A 2024-03-06 same\nswap add A B 2024-13-01 bad\nswap add Nobody \"ORN TAK\" 2024-03-06 x\nswap add \"orn tak\" ORNTAK 2024-03-06 x\nexit\n";
    let output = run_with_input(&dir, input);

    let stderr = stderr_text(&output);
    assert!(stderr.contains("Employees must be different."));
    assert!(stderr.contains("'Nobody' is not on the roster."));
    assert_eq!(stderr.matches("Employees must be different.").count(), 2);
    assert!(stderr.contains("Command execution failed for 'swap'"));
    let ctx = build_context(&dir);
    assert!(ctx.documents.list("swaps").unwrap().is_empty());
}

#[test]
fn swaps_are_newest_first() {
    let dir = make_temp_dir("swap");
    write_valid_config(&dir);
    let mut ctx = build_context(&dir);
    execute_command("role admin", &mut ctx);
    execute_command("login admin admin-pw", &mut ctx);
    execute_command("view swap", &mut ctx);
    execute_command(r#"swap add "ORN TAK" "SOTH SOKLAY" 2024-03-06 first"#, &mut ctx);
    // Stamps are whole seconds.
    std::thread::sleep(std::time::Duration::from_millis(1100));
    execute_command(r#"swap add "HENG MENGLY" "PHOEUN SOPHANY" 2024-03-07 second"#, &mut ctx);

    let items = ctx.swaps().unwrap().items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].remark, "second");
}

#[test]
fn clients_are_told_they_cannot_add() {
    let dir = make_temp_dir("swap");
    write_valid_config(&dir);
    let output = run_with_input(
        &dir,
        "role client\nlogin team team-pw\nswap add A B 2024-03-06 x\nexit\n",
    );
    assert!(stderr_text(&output).contains("Only admins can submit swap requests."));
}

#[test]
fn client_opens_full_request_details() {
    let dir = make_temp_dir("swap");
    write_valid_config(&dir);
    run_with_input(
        &dir,
        "role admin\nlogin admin admin-pw\nswap add \"HENG MENGLY\" \"ORN TAK\" 2024-03-08 covering the night shift while the other team is away at training\nlogout\nexit\n",
    );
    let output = run_with_input(&dir, "role client\nlogin team team-pw\nswap show 000001\nexit\n");
    let stdout = stdout_text(&output);
    assert!(stdout.contains("Swap: HENG MENGLY <-> ORN TAK"));
    assert!(stdout.contains("Remark: covering the night shift while the other team is away at training"));
}
