//! Integration tests for the vidqa binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{temp_file, temp_video, MockBackend};

/// vidqa with an isolated config dir and no colors.
fn vidqa(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vidqa").expect("vidqa binary");
    cmd.env("VIDQA_CONFIG_DIR", config_dir.path())
        .env("NO_COLOR", "1")
        .env_remove("VIDQA_BACKEND_URL")
        .env_remove("VIDQA_LOG");
    cmd
}

// ============================================================================
// Help and usage
// ============================================================================

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    vidqa(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("timecode"));
}

#[test]
fn version_includes_build_date() {
    let dir = TempDir::new().unwrap();
    vidqa(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("("));
}

#[test]
fn missing_arguments_exit_2() {
    let dir = TempDir::new().unwrap();
    vidqa(&dir)
        .arg("ask")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<VIDEO>"));
}

// ============================================================================
// timecode
// ============================================================================

#[test]
fn timecode_converts_frame() {
    let dir = TempDir::new().unwrap();
    vidqa(&dir)
        .args(["timecode", "2700", "--total-frames", "9000", "--duration", "300"])
        .assert()
        .success()
        .stdout("01:30\n");
}

#[test]
fn timecode_uses_configured_interval() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[playback]\ninterval_secs = 30\n").unwrap();
    vidqa(&dir)
        .args(["timecode", "2700", "--total-frames", "9000", "--duration", "300"])
        .assert()
        .success()
        .stdout("03:00\n");
}

#[test]
fn timecode_with_invalid_metrics_fails() {
    let dir = TempDir::new().unwrap();
    vidqa(&dir)
        .args(["timecode", "5", "--total-frames", "0", "--duration", "10"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid video metrics"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_path_honors_override() {
    let dir = TempDir::new().unwrap();
    vidqa(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains(dir.path().to_string_lossy().as_ref()));
}

#[test]
fn config_init_then_show() {
    let dir = TempDir::new().unwrap();
    vidqa(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join("config.toml").exists());

    vidqa(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url = \"http://localhost:7071/api\""))
        .stdout(predicate::str::contains("interval_secs = 60"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    vidqa(&dir).args(["config", "init"]).assert().success();
    vidqa(&dir)
        .args(["config", "init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--force"));
    vidqa(&dir).args(["config", "init", "--force"]).assert().success();
}

#[test]
fn broken_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[playback]\ninterval_secs = 0\n").unwrap();
    vidqa(&dir)
        .args(["timecode", "1", "--total-frames", "10", "--duration", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("interval"));
}

// ============================================================================
// Backend commands
// ============================================================================

#[test]
fn list_prints_catalog() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    vidqa(&dir)
        .args(["--backend-url", backend.base_url.as_str(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abc.mp4"))
        .stdout(predicate::str::contains("def.mp4"))
        .stdout(predicate::str::contains("30s"));
}

#[test]
fn backend_url_from_environment() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    vidqa(&dir)
        .env("VIDQA_BACKEND_URL", &backend.base_url)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("abc.mp4"));
}

#[test]
fn ask_prints_time_codes() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    vidqa(&dir)
        .args(["--backend-url", backend.base_url.as_str(), "ask", "abc", "where is the cat?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 matching frame(s)"))
        .stdout(predicate::str::contains("00:04  frame 120"))
        .stdout(predicate::str::contains("00:10  frame 300"));
}

#[test]
fn ask_with_composite_id_sends_bare_hash() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    vidqa(&dir)
        .args([
            "--backend-url",
            backend.base_url.as_str(),
            "ask",
            "abc1800",
            "where?",
            "--total-frames",
            "1800",
        ])
        .assert()
        .success();
    assert_eq!(backend.questions()[0].0, "abc");
}

#[test]
fn ask_about_unknown_video_fails() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    vidqa(&dir)
        .args(["--backend-url", backend.base_url.as_str(), "ask", "zzz", "where?"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Video not found"));
}

#[test]
fn search_groups_hits_by_video() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    vidqa(&dir)
        .args(["--backend-url", backend.base_url.as_str(), "search", "dog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] abc.mp4 (abc1800)"))
        .stdout(predicate::str::contains("[2] def.mp4 (def900)"))
        .stdout(predicate::str::contains("00:15  frame 450"));
}

#[test]
fn search_failure_exits_1_with_banner() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    vidqa(&dir)
        .args(["--backend-url", backend.base_url.as_str(), "search", "fail"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("The backend reported an error (500)."));
}

#[test]
fn unreachable_backend_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    vidqa(&dir)
        .args(["--backend-url", "http://127.0.0.1:9/api", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not reach the backend."));
}

#[test]
fn upload_reports_identity() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    let (_video_dir, path) = temp_video();
    vidqa(&dir)
        .args(["--backend-url", backend.base_url.as_str(), "upload"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("hash: deadbeef"))
        .stdout(predicate::str::contains("id: deadbeef1800"));
}

#[test]
fn upload_of_non_video_fails_before_contacting_backend() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    let (_file_dir, path) = temp_file("notes.txt", b"hello there");
    vidqa(&dir)
        .args(["--backend-url", backend.base_url.as_str(), "upload"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("The file is not a valid video."));
    assert!(backend.recorded.lock().unwrap().analyzed.is_empty());
}

// ============================================================================
// shell
// ============================================================================

#[test]
fn shell_runs_scripted_session() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    vidqa(&dir)
        .args(["--backend-url", backend.base_url.as_str(), "shell"])
        .write_stdin("open 1\nseek 00:07\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("loading http://media.test/abc.mp4"))
        .stdout(predicate::str::contains("video: abc"));
}

#[test]
fn shell_reports_bad_commands_and_continues() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::start();
    vidqa(&dir)
        .args(["--backend-url", backend.base_url.as_str(), "shell"])
        .write_stdin("dance\nselect 1\nhelp\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown command 'dance'"))
        .stdout(predicate::str::contains("Commands:"));
}
