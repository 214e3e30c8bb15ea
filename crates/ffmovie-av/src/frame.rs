//! Single frame extraction.
//!
//! A frame is pulled by running ffmpeg a second time, seeking to a timestamp
//! and writing exactly one image:
//!
//! ```text
//! ffmpeg -i <movie> -f image2 -ss <seconds> -vframes 1 [-s WxH] [-qscale Q] <out>
//! ```
//!
//! Success is judged by whether `<out>` exists afterwards; the exit status is
//! ignored. When it is missing, the tool's output is searched for a known
//! error line so callers get something better than "file not found".

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use image::DynamicImage;
use regex::Regex;

use crate::error::CODE_EXTRACTION_FAILED;
use crate::{Error, Result, ToolCommand, Workspace};

static ERRORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i).*(Error|Permission denied|could not seek to position|Invalid pixel format|Unknown encoder|could not find codec|does not contain any stream).*",
    )
    .expect("valid error pattern")
});

/// Optional knobs for a frame request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOptions {
    /// Resize to `(width, height)`.
    pub size: Option<(u32, u32)>,
    /// ffmpeg `-qscale` value, 1 (best) to 31.
    pub quality: Option<u32>,
    /// Write the frame here and keep it. Without it a temporary file is used
    /// and removed once the frame is loaded.
    ///
    /// An existing file at this path is removed before ffmpeg runs.
    pub output: Option<PathBuf>,
}

impl FrameOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Turns a written frame file into the caller's image type.
///
/// Called while the file still exists; a temporary file is removed right
/// after `import` returns, so implementations must read it fully.
pub trait FrameImporter {
    type Frame;

    fn import(&self, path: &Path, time: f64) -> Result<Self::Frame>;
}

/// A decoded frame.
#[derive(Debug, Clone)]
pub struct Frame {
    image: DynamicImage,
    time: f64,
}

impl Frame {
    pub fn new(image: DynamicImage, time: f64) -> Self {
        Self { image, time }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Position of the frame in the movie, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Decodes frames with the `image` crate, sniffing the format from content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageImporter;

impl FrameImporter for ImageImporter {
    type Frame = Frame;

    fn import(&self, path: &Path, time: f64) -> Result<Frame> {
        let image = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(Frame::new(image, time))
    }
}

/// Runs ffmpeg to pull one frame out of a movie.
#[derive(Debug, Clone)]
pub struct FrameExtractor {
    binary: PathBuf,
    movie_file: PathBuf,
    temp_dir: Option<PathBuf>,
}

impl FrameExtractor {
    pub fn new(binary: impl Into<PathBuf>, movie_file: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            movie_file: movie_file.into(),
            temp_dir: None,
        }
    }

    /// Root for temporary frame files instead of the system temp directory.
    pub fn with_temp_dir(mut self, temp_dir: Option<PathBuf>) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// The ffmpeg invocation writing the frame at `seconds` to `output`.
    pub fn command(&self, seconds: f64, options: &FrameOptions, output: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.binary);
        cmd.arg("-i")
            .arg(&self.movie_file)
            .args(["-f", "image2"])
            .arg("-ss")
            .arg(seconds.to_string())
            .args(["-vframes", "1"]);

        if let Some((width, height)) = options.size {
            cmd.arg("-s").arg(format!("{width}x{height}"));
        }
        if let Some(quality) = options.quality {
            cmd.arg("-qscale").arg(quality.to_string());
        }

        cmd.arg(output);
        cmd
    }

    /// Extract the frame at `seconds` and hand it to `importer`.
    ///
    /// The time is not range checked here; [`crate::Movie`] does that against
    /// its duration.
    pub fn extract<I: FrameImporter>(
        &self,
        importer: &I,
        seconds: f64,
        options: &FrameOptions,
    ) -> Result<I::Frame> {
        // The workspace lives until the end of this call so it outlives the import.
        let (output_path, _workspace) = match &options.output {
            Some(path) => {
                remove_stale(path)?;
                (path.clone(), None)
            }
            None => {
                let workspace = Workspace::new(self.temp_dir.as_deref())?;
                (workspace.frame_path().to_path_buf(), Some(workspace))
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            movie = %self.movie_file.display(),
            seconds,
            output = %output_path.display(),
            "Extracting frame"
        );

        let result = self.command(seconds, options, &output_path).execute()?;

        if !output_path.exists() {
            let err = match classify_failure(&result.text) {
                Some(line) => Error::runtime(line, CODE_EXTRACTION_FAILED),
                None => Error::FrameNotWritten { path: output_path },
            };

            #[cfg(feature = "tracing")]
            tracing::warn!(movie = %self.movie_file.display(), "Frame extraction failed: {}", err);

            return Err(err);
        }

        importer.import(&output_path, seconds)
    }
}

/// Remove a leftover file at a caller-supplied output path.
fn remove_stale(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(output = %path.display(), "Removed stale frame output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// The first line of tool output naming a known failure, trimmed.
pub fn classify_failure(text: &str) -> Option<String> {
    ERRORS
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|line| !line.is_empty())
}

/// Round to four decimal places, the precision handed to `-ss`.
pub fn round_time(seconds: f64) -> f64 {
    (seconds * 10_000.0).round() / 10_000.0
}
