//! Exit status and stderr of the deploy binary on failures that happen before
//! any network or build step.

use assert_cmd::Command;

fn deploy() -> Command {
    let mut cmd = Command::cargo_bin("deploy").expect("deploy binary is built for tests");
    cmd.env("NOTE_NOOK_RPC", "testnet").env_remove("NOTE_NOOK_DEPLOYER");
    cmd
}

#[test]
fn bad_timeout_exits_with_status_one() {
    let output = deploy().env("NOTE_NOOK_RPC_TIMEOUT_MS", "abc").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "no addresses are printed on failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NOTE_NOOK_RPC_TIMEOUT_MS"), "stderr was: {stderr}");
}

#[test]
fn bad_deployer_exits_with_status_one() {
    let output = deploy()
        .env("NOTE_NOOK_RPC_TIMEOUT_MS", "10000")
        .env("NOTE_NOOK_DEPLOYER", "0xnothex")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid account id"), "stderr was: {stderr}");
}
