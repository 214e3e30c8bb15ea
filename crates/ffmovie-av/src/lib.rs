//! # ffmovie-av
//!
//! Movie metadata and frame extraction on top of the ffmpeg command line.
//!
//! This crate provides:
//! - Output providers that obtain ffmpeg's (or ffprobe's) diagnostic text for
//!   a file, optionally shared through a process-wide cache
//! - A [`Movie`] model parsing duration, frame rate, dimensions, bit rates,
//!   codecs, audio layout and tags out of that text on demand
//! - Single frame extraction by frame index or timestamp
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use ffmovie_av::{FrameOptions, Movie};
//!
//! let mut movie = Movie::new("/path/to/video.mkv", "/usr/bin/ffmpeg")?;
//! println!("Duration: {}s, {} frames", movie.duration(), movie.frame_count());
//!
//! let frame = movie.fetch_frame_at_time(10.0, &FrameOptions::new())?;
//! println!("{}x{}", frame.width(), frame.height());
//! # Ok::<(), ffmovie_av::Error>(())
//! ```

mod cache;
mod command;
mod error;
pub mod frame;
pub mod movie;
pub mod provider;
pub mod tools;
pub mod workspace;

// Re-exports
pub use cache::{CacheKey, OutputCache};
pub use command::{ToolCommand, ToolOutput};
pub use error::{
    Error, ErrorKind, Result, CODE_EXTRACTION_FAILED, CODE_FILE_NOT_FOUND,
    CODE_FRAME_NOT_WRITTEN, CODE_FRAME_TIME_OUT_OF_RANGE, CODE_INVALID_FRAME_NUMBER,
    CODE_NO_FFMPEG, CODE_NO_FFPROBE,
};
pub use frame::{Frame, FrameExtractor, FrameImporter, FrameOptions, ImageImporter};
pub use movie::{Movie, MovieReport, MovieState, MovieTags};
pub use provider::{
    FfmpegOutputProvider, FfprobeOutputProvider, LiteralOutputProvider, OutputProvider,
    ProviderConfig, ProviderKind, DEFAULT_FFMPEG_BINARY, DEFAULT_FFPROBE_BINARY,
};
pub use tools::{check_tool, check_tools, get_tool_path, require_tool, ToolInfo};
pub use workspace::Workspace;
