//! CLI integration tests

use std::process::Command;

fn voice_consult_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voice-consult"))
}

#[test]
fn help_output() {
    let output = voice_consult_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--audio"));
    assert!(stdout.contains("--image"));
    assert!(stdout.contains("--output-dir"));
    assert!(stdout.contains("--tts"));
    assert!(stdout.contains("--fallback"));
    assert!(stdout.contains("--json"));
}

#[test]
fn version_output() {
    let output = voice_consult_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice-consult"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let output = voice_consult_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice-consult"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_help() {
    let output = voice_consult_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn missing_audio_is_usage_error() {
    let output = voice_consult_bin()
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--audio"), "got: {}", stderr);
}

#[test]
fn unknown_tts_provider_is_usage_error() {
    let output = voice_consult_bin()
        .args(["--audio", "q.mp3", "--tts", "festival"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_timeout_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = voice_consult_bin()
        .args(["--audio", "q.mp3", "--timeout", "forever"])
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("timeout"), "got: {}", stderr);
}

#[test]
fn config_set_get_round_trip_in_isolated_home() {
    let dir = tempfile::tempdir().unwrap();

    let set = voice_consult_bin()
        .args(["config", "set", "tts_provider", "espeak"])
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(set.status.success(), "{}", String::from_utf8_lossy(&set.stderr));

    let get = voice_consult_bin()
        .args(["config", "get", "tts_provider"])
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(get.status.success());
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "local");
}
