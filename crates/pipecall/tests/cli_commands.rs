#![cfg(feature = "cli")]

use std::process::Command;

fn pipecall() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pipecall"));
    cmd.arg("--log-level").arg("error");
    cmd
}

#[test]
fn path_prints_local_pipe_path() {
    let output = pipecall()
        .args(["--format", "raw", "path", "seafile"])
        .output()
        .expect("path should run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), r"\\.\pipe\seafile");
}

#[test]
fn path_json_output() {
    let output = pipecall()
        .args(["--format", "json", "path", "seafile"])
        .output()
        .expect("path should run");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["name"], "seafile");
    assert_eq!(value["path"], r"\\.\pipe\seafile");
}

#[test]
fn path_keeps_full_paths() {
    let output = pipecall()
        .args(["--format", "raw", "path", r"\\server\pipe\seafile"])
        .output()
        .expect("path should run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), r"\\server\pipe\seafile");
}

#[test]
fn version_prints_name_and_version() {
    let output = pipecall().arg("version").output().expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("pipecall {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_extended_reports_build_target() {
    let output = pipecall()
        .args(["version", "--extended"])
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("build_target: "));
    assert!(stdout.contains(r"pipe_prefix: \\.\pipe\"));
}

#[test]
fn usage_errors_exit_with_clap_code() {
    let output = pipecall()
        .args(["send", "seafile", "--json", "{}", "--data", "x"])
        .output()
        .expect("send should run");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_json_payload_exits_64() {
    let output = pipecall()
        .args(["send", "seafile", "--json", "{not json"])
        .output()
        .expect("send should run");

    assert_eq!(output.status.code(), Some(64));
}

#[cfg(not(windows))]
#[test]
fn call_without_named_pipes_fails_cleanly() {
    let output = pipecall()
        .args([
            "call",
            "seafile",
            "--service",
            "seafile-rpcserver",
            "--request",
            "[]",
        ])
        .output()
        .expect("call should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("call failed"));
    assert!(stderr.contains("not supported"));
}

#[cfg(windows)]
#[test]
fn call_to_missing_pipe_is_transport_error() {
    let output = pipecall()
        .args([
            "call",
            &format!("pipecall-missing-{}", std::process::id()),
            "--service",
            "svc",
            "--request",
            "[]",
        ])
        .output()
        .expect("call should run");

    assert_eq!(output.status.code(), Some(3));
}
