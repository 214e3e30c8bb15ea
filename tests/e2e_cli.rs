//! CLI end-to-end tests
//!
//! Tests for the ffmovie command-line interface.

mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the ffmovie binary
#[allow(deprecated)]
fn ffmovie_cmd() -> Command {
    Command::cargo_bin("ffmovie").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = ffmovie_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = ffmovie_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmovie"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = ffmovie_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "ffmovie {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = ffmovie_cmd();
    cmd.arg("check-tools").assert().success().stdout(
        predicate::str::contains("ffmpeg").and(predicate::str::contains("ffprobe")),
    );
}

#[test]
fn test_cli_probe_help() {
    let mut cmd = ffmovie_cmd();
    cmd.args(["probe", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--backend"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_cli_probe_nonexistent_file() {
    let mut cmd = ffmovie_cmd();
    cmd.args(["probe", "/nonexistent/movie.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_probe_rejects_unknown_backend() {
    let mut cmd = ffmovie_cmd();
    cmd.args(["probe", "movie.mkv", "--backend", "mediainfo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown probe backend"));
}

#[test]
fn test_cli_frame_index_and_at_conflict() {
    let mut cmd = ffmovie_cmd();
    cmd.args([
        "frame", "movie.mkv", "--output", "out.jpg", "--index", "3", "--at", "1.5",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_cli_frame_rejects_bad_quality() {
    let mut cmd = ffmovie_cmd();
    cmd.args(["frame", "movie.mkv", "--output", "out.jpg", "--quality", "40"])
        .assert()
        .failure();
}

#[test]
fn test_cli_validate_valid_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(
        &config_file,
        "[probe]\nbackend = \"ffprobe\"\npersistent = true\n\n[frames]\nwidth = 320\nheight = 180\nquality = 4\n",
    )
    .unwrap();

    let mut cmd = ffmovie_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Ffprobe"))
        .stdout(predicate::str::contains("320x180"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("config.toml");
    fs::write(&config_file, "[frames]\nwidth = 320\n").unwrap();

    let mut cmd = ffmovie_cmd();
    cmd.args(["--config", config_file.to_str().unwrap(), "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("set together"));
}

#[cfg(unix)]
#[test]
fn test_cli_probe_with_fake_ffmpeg() {
    let fake = common::fake_ffmpeg();
    let config = common::write_config(fake.dir.path(), &fake.binary, "");

    let mut cmd = ffmovie_cmd();
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "probe",
        fake.movie.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Video: vp9 (Profile 0) 640x360"))
    .stdout(predicate::str::contains("24.000 fps, 2400 frames"))
    .stdout(predicate::str::contains("Audio: opus 48000 Hz, 1ch"))
    .stdout(predicate::str::contains("Title: Test Clip"));
}

#[cfg(unix)]
#[test]
fn test_cli_probe_json_output() {
    let fake = common::fake_ffmpeg();
    let config = common::write_config(fake.dir.path(), &fake.binary, "");

    let output = ffmovie_cmd()
        .args([
            "--config",
            config.to_str().unwrap(),
            "probe",
            "--json",
            fake.movie.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["duration"], 100.0);
    assert_eq!(json["frame_count"], 2400);
    assert_eq!(json["frame_width"], 640);
    assert_eq!(json["bit_rate"], 800_000);
    assert_eq!(json["audio_channels"], 1);
    assert_eq!(json["file_size"], 11);
    assert_eq!(json["tags"]["comment"], "made for tests");
}

#[cfg(unix)]
#[test]
fn test_cli_frame_writes_output() {
    let fake = common::fake_ffmpeg();
    let config = common::write_config(fake.dir.path(), &fake.binary, "");
    let out = fake.dir.path().join("poster.jpg");

    let mut cmd = ffmovie_cmd();
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "frame",
        fake.movie.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
        "--at",
        "50",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote 16x9 frame at 50.0000s"));

    assert!(out.exists());
}

#[cfg(unix)]
#[test]
fn test_cli_frame_out_of_range() {
    let fake = common::fake_ffmpeg();
    let config = common::write_config(fake.dir.path(), &fake.binary, "");

    let mut cmd = ffmovie_cmd();
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "frame",
        fake.movie.to_str().unwrap(),
        "--output",
        "/tmp/never-written.jpg",
        "--index",
        "5000",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid frame number"));
}
