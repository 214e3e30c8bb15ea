//! Error types for ffmovie-av.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// ffmpeg output did not carry its version banner.
pub const CODE_NO_FFMPEG: u32 = 334560;
/// The movie file handed to a provider does not exist.
pub const CODE_FILE_NOT_FOUND: u32 = 334561;
/// ffprobe output did not carry its version banner.
pub const CODE_NO_FFPROBE: u32 = 334563;
/// Frame number outside of `0..=frame_count`.
pub const CODE_INVALID_FRAME_NUMBER: u32 = 1359623542;
/// Frame time outside of `0..=duration`.
pub const CODE_FRAME_TIME_OUT_OF_RANGE: u32 = 1359623543;
/// ffmpeg reported a known error while extracting a frame.
pub const CODE_EXTRACTION_FAILED: u32 = 1359623669;
/// ffmpeg exited without writing the frame and without a recognizable error.
pub const CODE_FRAME_NOT_WRITTEN: u32 = 1359623670;

/// Coarse classification of an [`Error`], for caller-side branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The external tool is not installed or not executable. Not retryable
    /// without operator intervention.
    BinaryMissing,
    /// A caller-supplied value is outside of its valid domain.
    InvalidArgument,
    /// The tool ran but the invocation failed.
    Runtime,
    /// Local filesystem or decoding failure.
    Io,
}

/// Errors that can occur while probing movies or extracting frames.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The invoked tool is missing, or its output lacks the version banner.
    #[error("{tool} is not installed on host server")]
    BinaryMissing { tool: String, code: u32 },

    /// Invalid input provided.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String, code: u32 },

    /// The tool ran and reported an error.
    #[error("{message}")]
    Runtime { message: String, code: u32 },

    /// Frame extraction produced no output file.
    #[error("frame image not found/written: {}", path.display())]
    FrameNotWritten { path: PathBuf },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The extracted frame could not be decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Create a binary missing error.
    pub fn binary_missing(tool: impl Into<String>, code: u32) -> Self {
        Self::BinaryMissing {
            tool: tool.into(),
            code,
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>, code: u32) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            code,
        }
    }

    /// Create a runtime error.
    pub fn runtime(message: impl Into<String>, code: u32) -> Self {
        Self::Runtime {
            message: message.into(),
            code,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BinaryMissing { .. } => ErrorKind::BinaryMissing,
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::Runtime { .. } | Error::FrameNotWritten { .. } => ErrorKind::Runtime,
            Error::Io(_) | Error::Json(_) | Error::Image(_) => ErrorKind::Io,
        }
    }

    /// Stable numeric code, when the error carries one.
    pub fn code(&self) -> Option<u32> {
        match self {
            Error::BinaryMissing { code, .. }
            | Error::InvalidArgument { code, .. }
            | Error::Runtime { code, .. } => Some(*code),
            Error::FrameNotWritten { .. } => Some(CODE_FRAME_NOT_WRITTEN),
            _ => None,
        }
    }
}
