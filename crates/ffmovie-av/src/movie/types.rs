//! Serializable views of a movie.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::provider::ProviderConfig;

/// Everything needed to rebuild a [`super::Movie`] without running a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieState {
    /// ffmpeg used for frame extraction.
    pub binary: PathBuf,
    /// Path to the movie file.
    pub movie_file: PathBuf,
    /// Raw diagnostic text the fields are parsed from.
    pub output: String,
    /// Zero-based frame cursor.
    pub frame_number: u64,
    /// The attached provider.
    pub provider: ProviderConfig,
}

/// All parsed fields of a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieReport {
    /// Path to the movie file.
    pub file_path: PathBuf,
    /// File size in bytes, when the file exists locally.
    pub file_size: Option<u64>,
    /// Duration in seconds.
    pub duration: f64,
    /// Frames per second.
    pub frame_rate: f64,
    /// Estimated number of frames.
    pub frame_count: u64,
    /// Width in pixels.
    pub frame_width: u32,
    /// Height in pixels.
    pub frame_height: u32,
    pub pixel_format: String,
    /// Overall bit rate in bits per second.
    pub bit_rate: u64,
    /// Video stream bit rate in bits per second.
    pub video_bit_rate: u64,
    /// Audio stream bit rate in bits per second.
    pub audio_bit_rate: u64,
    /// Sample rate in Hz.
    pub audio_sample_rate: u32,
    pub video_codec: String,
    pub audio_codec: String,
    pub audio_channels: u32,
    pub has_audio: bool,
    pub has_video: bool,
    pub tags: MovieTags,
}

/// Free-text metadata tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieTags {
    pub title: String,
    pub artist: String,
    pub comment: String,
    pub copyright: String,
    pub genre: String,
    pub track_number: u32,
    pub year: u32,
}

impl MovieReport {
    /// Get a human-readable resolution name.
    pub fn resolution_name(&self) -> Option<&'static str> {
        if !self.has_video || (self.frame_width == 0 && self.frame_height == 0) {
            return None;
        }
        Some(match (self.frame_width, self.frame_height) {
            (w, h) if w >= 3840 || h >= 2160 => "4K",
            (w, h) if w >= 1920 || h >= 1080 => "1080p",
            (w, h) if w >= 1280 || h >= 720 => "720p",
            (w, h) if w >= 720 || h >= 480 => "480p",
            _ => "SD",
        })
    }
}
