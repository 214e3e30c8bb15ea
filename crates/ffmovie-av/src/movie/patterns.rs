//! Field extraction from ffmpeg's human-readable stream report.
//!
//! Every function here is pure: it takes the raw text and returns the field's
//! value, or the field's default when the pattern does not match.

use std::sync::LazyLock;

use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid metadata pattern")
}

static DURATION: LazyLock<Regex> =
    LazyLock::new(|| regex(r"Duration: ([0-9]{2}):([0-9]{2}):([0-9]{2})(\.([0-9]+))?"));
static FRAME_RATE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(?:([0-9.]+)\sfps,\s)?([0-9.]+)\stbr"));
static COMMENT: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)comment\s*(:|=)\s*(.+)"));
static TITLE: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)title\s*(:|=)\s*(.+)"));
static ARTIST: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)(artist|author)\s*(:|=)\s*(.+)"));
static COPYRIGHT: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)copyright\s*(:|=)\s*(.+)"));
static GENRE: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)genre\s*(:|=)\s*(.+)"));
static TRACK_NUMBER: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)track\s*(:|=)\s*(.+)"));
static YEAR: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)year\s*(:|=)\s*(.+)"));
static FRAME_SIZE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"Video:.+?([1-9][0-9]*)x([1-9][0-9]*)"));
static PIXEL_FORMAT: LazyLock<Regex> = LazyLock::new(|| regex(r"Video: [^,]+, ([^,]+)"));
static BIT_RATE: LazyLock<Regex> = LazyLock::new(|| regex(r"bitrate: ([0-9]+) kb/s"));
static VIDEO_BIT_RATE: LazyLock<Regex> = LazyLock::new(|| regex(r"Video:.+?([0-9]+) kb/s"));
static AUDIO_BIT_RATE: LazyLock<Regex> = LazyLock::new(|| regex(r"Audio:.+?([0-9]+) kb/s"));
static AUDIO_SAMPLE_RATE: LazyLock<Regex> = LazyLock::new(|| regex(r"Audio:.+?([0-9]+) Hz"));
static VIDEO_CODEC: LazyLock<Regex> = LazyLock::new(|| regex(r"Video:\s([^,]+),"));
static AUDIO_CODEC: LazyLock<Regex> = LazyLock::new(|| regex(r"Audio:\s([^,]+),"));
static AUDIO_CHANNELS: LazyLock<Regex> =
    LazyLock::new(|| regex(r"Audio:\s[^,]+,[^,]+,([^,]+)"));
static HAS_AUDIO: LazyLock<Regex> = LazyLock::new(|| regex(r"Stream.+Audio"));
static HAS_VIDEO: LazyLock<Regex> = LazyLock::new(|| regex(r"Stream.+Video"));

/// Capture group `group` of the first match, if both exist.
fn capture<'t>(re: &Regex, text: &'t str, group: usize) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}

/// Trimmed text of capture group `group`, or an empty string.
fn text_field(re: &Regex, text: &str, group: usize) -> String {
    capture(re, text, group)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Leading unsigned integer of `s` after trimming, or 0.
fn leading_int(s: &str) -> u64 {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().unwrap_or(0)
}

/// Leading decimal number of `s`, or 0.0.
fn leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().unwrap_or(0.0)
}

/// Leading integer of `s` when it fits in a `u32`, else 0.
fn leading_u32(s: &str) -> u32 {
    u32::try_from(leading_int(s)).unwrap_or(0)
}

/// Integer kb/s value of capture group 1, scaled to bits per second.
/// Values too large to scale count as missing.
fn kbps_field(re: &Regex, text: &str) -> u64 {
    capture(re, text, 1)
        .map(leading_int)
        .and_then(|kbps| kbps.checked_mul(1000))
        .unwrap_or(0)
}

/// Seconds from `Duration: HH:MM:SS[.fraction]`.
pub fn duration(text: &str) -> f64 {
    let Some(caps) = DURATION.captures(text) else {
        return 0.0;
    };
    let part = |i: usize| caps.get(i).map(|m| leading_int(m.as_str())).unwrap_or(0);
    let fraction = caps
        .get(5)
        .map(|m| leading_float(&format!("0.{}", m.as_str())))
        .unwrap_or(0.0);

    (part(1) * 3600 + part(2) * 60 + part(3)) as f64 + fraction
}

/// Frames per second: the `fps` value when printed, else the `tbr` value.
pub fn frame_rate(text: &str) -> f64 {
    let Some(caps) = FRAME_RATE.captures(text) else {
        return 0.0;
    };
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| leading_float(m.as_str()))
        .unwrap_or(0.0)
}

/// `floor(duration * frame_rate)`.
pub fn frame_count(duration: f64, frame_rate: f64) -> u64 {
    let frames = (duration * frame_rate).floor();
    if frames.is_finite() && frames > 0.0 {
        frames as u64
    } else {
        0
    }
}

/// Width and height from the first `Video:` line, or `(0, 0)`.
pub fn frame_size(text: &str) -> (u32, u32) {
    FRAME_SIZE
        .captures(text)
        .and_then(|caps| {
            let width = caps.get(1)?.as_str().parse().ok()?;
            let height = caps.get(2)?.as_str().parse().ok()?;
            Some((width, height))
        })
        .unwrap_or((0, 0))
}

pub fn pixel_format(text: &str) -> String {
    text_field(&PIXEL_FORMAT, text, 1)
}

/// Overall bit rate in bits per second.
pub fn bit_rate(text: &str) -> u64 {
    kbps_field(&BIT_RATE, text)
}

/// Video stream bit rate in bits per second. Only constant bit rate streams
/// print one.
pub fn video_bit_rate(text: &str) -> u64 {
    kbps_field(&VIDEO_BIT_RATE, text)
}

/// Audio stream bit rate in bits per second.
pub fn audio_bit_rate(text: &str) -> u64 {
    kbps_field(&AUDIO_BIT_RATE, text)
}

/// Audio sample rate in Hz.
pub fn audio_sample_rate(text: &str) -> u32 {
    capture(&AUDIO_SAMPLE_RATE, text, 1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

pub fn video_codec(text: &str) -> String {
    text_field(&VIDEO_CODEC, text, 1)
}

pub fn audio_codec(text: &str) -> String {
    text_field(&AUDIO_CODEC, text, 1)
}

/// Channel count from the layout column of the first `Audio:` line.
pub fn audio_channels(text: &str) -> u32 {
    capture(&AUDIO_CHANNELS, text, 1)
        .map(channel_layout)
        .unwrap_or(0)
}

/// Map a channel layout token to a channel count.
pub fn channel_layout(token: &str) -> u32 {
    match token.trim() {
        "mono" => 1,
        "stereo" => 2,
        "5.1" | "5:1" => 6,
        other => leading_u32(other),
    }
}

pub fn has_audio(text: &str) -> bool {
    HAS_AUDIO.is_match(text)
}

pub fn has_video(text: &str) -> bool {
    HAS_VIDEO.is_match(text)
}

pub fn comment(text: &str) -> String {
    text_field(&COMMENT, text, 2)
}

pub fn title(text: &str) -> String {
    text_field(&TITLE, text, 2)
}

/// Artist, or author when the container calls it that.
pub fn artist(text: &str) -> String {
    text_field(&ARTIST, text, 3)
}

pub fn copyright(text: &str) -> String {
    text_field(&COPYRIGHT, text, 2)
}

pub fn genre(text: &str) -> String {
    text_field(&GENRE, text, 2)
}

/// Track number, e.g. `3` from `track : 3/12`.
pub fn track_number(text: &str) -> u32 {
    capture(&TRACK_NUMBER, text, 2)
        .map(leading_u32)
        .unwrap_or(0)
}

pub fn year(text: &str) -> u32 {
    capture(&YEAR, text, 2)
        .map(leading_u32)
        .unwrap_or(0)
}
