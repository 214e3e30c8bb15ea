//! Shared helpers for integration tests.
//!
//! [`fake_ffmpeg`] writes a shell script standing in for ffmpeg: it prints a
//! stream report for `-i` and copies a small PNG to its last argument when
//! asked for a frame.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT: &str = "\
ffmpeg version 6.1.1 Copyright (c) 2000-2023 the FFmpeg developers
Input #0, matroska,webm, from 'clip.mkv':
  Metadata:
    title           : Test Clip
    comment         : made for tests
  Duration: 00:01:40.00, start: 0.000000, bitrate: 800 kb/s
    Stream #0:0: Video: vp9 (Profile 0), yuv420p(tv), 640x360, SAR 1:1 DAR 16:9, 24 fps, 24 tbr, 1k tbn (default)
    Stream #0:1: Audio: opus, 48000 Hz, mono, fltp (default)
At least one output file must be specified";

pub struct FakeFfmpeg {
    pub dir: tempfile::TempDir,
    pub binary: PathBuf,
    pub movie: PathBuf,
}

/// Write a fake ffmpeg and a placeholder movie into a fresh temp dir.
#[cfg(unix)]
pub fn fake_ffmpeg() -> FakeFfmpeg {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let binary = dir.path().join("ffmpeg");
    let movie = dir.path().join("clip.mkv");
    let report = dir.path().join("report.txt");
    let fixture = dir.path().join("fixture.png");

    fs::write(&movie, b"placeholder").unwrap();
    fs::write(&report, REPORT).unwrap();
    image::RgbImage::from_pixel(16, 9, image::Rgb([0, 128, 255]))
        .save_with_format(&fixture, image::ImageFormat::Png)
        .unwrap();

    let script = format!(
        "#!/bin/sh\ncase \"$*\" in\n  *-vframes*) for last; do :; done; cp '{}' \"$last\" ;;\n  *) cat '{}' >&2 ;;\nesac\n",
        fixture.display(),
        report.display()
    );
    fs::write(&binary, script).unwrap();
    fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();

    FakeFfmpeg { dir, binary, movie }
}

/// Write a config file pointing at `ffmpeg` plus any `extra` TOML.
pub fn write_config(dir: &Path, ffmpeg: &Path, extra: &str) -> PathBuf {
    let path = dir.join("ffmovie.toml");
    fs::write(
        &path,
        format!("[tools]\nffmpeg_path = \"{}\"\n{}", ffmpeg.display(), extra),
    )
    .unwrap();
    path
}
