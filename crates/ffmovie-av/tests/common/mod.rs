//! Shared harness for integration tests.
//!
//! [`FakeTool`] writes a shell script standing in for ffmpeg (or ffprobe)
//! into a private temp directory, next to a placeholder movie file. Every
//! invocation appends its arguments to a log so tests can count and inspect
//! calls.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const FFMPEG_BANNER: &str =
    "ffmpeg version 6.1.1 Copyright (c) 2000-2023 the FFmpeg developers";
pub const FFPROBE_BANNER: &str =
    "ffprobe version 6.1.1 Copyright (c) 2007-2023 the FFmpeg developers";

/// Stream report for a 150.5 s, 25 fps, 1280x720 movie with stereo audio.
pub const SAMPLE_REPORT: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'sample.mp4':
  Metadata:
    title           : Sample Reel
    artist          : Jane Doe
    genre           : Documentary
    date            : 2019
  Duration: 00:02:30.50, start: 0.000000, bitrate: 500 kb/s
    Stream #0:0(und): Video: h264 (High), yuv420p, 1280x720, 2000 kb/s, 25 fps, 25 tbr, 12800 tbn
    Stream #0:1(und): Audio: aac (LC), 44100 Hz, stereo, fltp, 128 kb/s
At least one output file must be specified";

/// Width of the frame fixture the fake tool writes.
pub const FRAME_WIDTH: u32 = 8;
/// Height of the frame fixture the fake tool writes.
pub const FRAME_HEIGHT: u32 = 6;

/// A scripted stand-in for an ffmpeg-family tool.
pub struct FakeTool {
    dir: TempDir,
    pub binary: PathBuf,
    pub movie: PathBuf,
    log: PathBuf,
}

impl FakeTool {
    /// An ffmpeg that prints `report` for `-i` and writes an 8x6 PNG to its
    /// last argument when asked for a frame.
    pub fn ffmpeg(report: &str) -> Self {
        let tool = Self::empty("ffmpeg");
        let fixture = tool.dir.path().join("fixture.png");
        image::RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, image::Rgb([200, 40, 40]))
            .save_with_format(&fixture, image::ImageFormat::Png)
            .unwrap();

        let report_file = tool.write_report(&format!("{FFMPEG_BANNER}\n{report}"));
        tool.write_script(&format!(
            "case \"$*\" in\n  *-vframes*) for last; do :; done; cp '{}' \"$last\" ;;\n  *) cat '{}' >&2 ;;\nesac\n",
            fixture.display(),
            report_file.display()
        ));
        tool
    }

    /// An ffmpeg that probes fine but prints `stderr` and writes nothing when
    /// asked for a frame.
    pub fn failing_ffmpeg(report: &str, stderr: &str) -> Self {
        let tool = Self::empty("ffmpeg");
        let report_file = tool.write_report(&format!("{FFMPEG_BANNER}\n{report}"));
        let stderr_file = tool.dir.path().join("stderr.txt");
        fs::write(&stderr_file, stderr).unwrap();

        tool.write_script(&format!(
            "case \"$*\" in\n  *-vframes*) cat '{}' >&2 ;;\n  *) cat '{}' >&2 ;;\nesac\n",
            stderr_file.display(),
            report_file.display()
        ));
        tool
    }

    /// A tool that prints `text` verbatim, whatever it is asked.
    pub fn printing(name: &str, text: &str) -> Self {
        let tool = Self::empty(name);
        let report_file = tool.write_report(text);
        tool.write_script(&format!("cat '{}'\n", report_file.display()));
        tool
    }

    fn empty(name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join(name);
        let movie = dir.path().join("sample.mp4");
        let log = dir.path().join("calls.log");
        fs::write(&movie, b"not really a movie").unwrap();
        fs::write(&log, b"").unwrap();
        Self {
            dir,
            binary,
            movie,
            log,
        }
    }

    fn write_report(&self, text: &str) -> PathBuf {
        let path = self.dir.path().join("report.txt");
        fs::write(&path, text).unwrap();
        path
    }

    fn write_script(&self, body: &str) {
        let script = format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\n{}",
            self.log.display(),
            body
        );
        fs::write(&self.binary, script).unwrap();
        fs::set_permissions(&self.binary, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Arguments of every invocation so far, one entry per call.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    /// Scratch directory inside the tool's temp dir.
    pub fn scratch(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Number of entries in `dir`.
pub fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}
