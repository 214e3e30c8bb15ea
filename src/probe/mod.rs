// Re-export the movie API from ffmovie-av
pub use ffmovie_av::{
    check_tool, check_tools, get_tool_path, require_tool, Frame, FrameOptions, Movie,
    MovieReport, MovieTags, ToolInfo,
};

use crate::config::{Config, ProbeBackend};
use anyhow::{Context, Result};
use ffmovie_av::{FfmpegOutputProvider, FfprobeOutputProvider, OutputProvider};
use std::path::{Path, PathBuf};

/// Resolve the ffmpeg binary from config or `PATH`.
pub fn ffmpeg_binary(config: &Config) -> Result<PathBuf> {
    get_tool_path("ffmpeg", config.tools.ffmpeg_path.as_deref()).context("ffmpeg not found")
}

/// Open a movie with the configured backend, tool paths and temp dir.
pub fn open_movie(path: &Path, config: &Config) -> Result<Movie> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {:?}", path);
    }

    let (provider, ffmpeg): (Box<dyn OutputProvider>, PathBuf) = match config.probe.backend {
        ProbeBackend::Ffmpeg => {
            let ffmpeg = ffmpeg_binary(config)?;
            let provider = FfmpegOutputProvider::new(&ffmpeg, config.probe.persistent);
            (Box::new(provider), ffmpeg)
        }
        ProbeBackend::Ffprobe => {
            let ffprobe = get_tool_path("ffprobe", config.tools.ffprobe_path.as_deref())
                .context("ffprobe not found")?;
            // Frames still come from ffmpeg; a missing one only matters once a
            // frame is requested.
            let ffmpeg = ffmpeg_binary(config)
                .unwrap_or_else(|_| PathBuf::from(ffmovie_av::DEFAULT_FFMPEG_BINARY));
            let provider = FfprobeOutputProvider::new(ffprobe, config.probe.persistent);
            (Box::new(provider), ffmpeg)
        }
    };

    tracing::debug!(
        "Opening {:?} with {} (persistent: {})",
        path,
        provider.kind(),
        provider.is_persistent()
    );

    let movie = Movie::open_with_binary(path, provider, ffmpeg)
        .with_context(|| format!("Failed to probe {:?}", path))?;

    Ok(match &config.frames.temp_dir {
        Some(dir) => movie.with_temp_dir(shellexpand::tilde(&dir.to_string_lossy()).into_owned()),
        None => movie,
    })
}

/// Frame request defaults from config.
pub fn frame_options(config: &Config) -> FrameOptions {
    let mut options = FrameOptions::new();
    if let (Some(width), Some(height)) = (config.frames.width, config.frames.height) {
        options = options.with_size(width, height);
    }
    if let Some(quality) = config.frames.quality {
        options = options.with_quality(quality);
    }
    options
}
