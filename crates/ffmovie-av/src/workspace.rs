//! Scratch space for frame extraction.

use crate::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name ffmpeg writes the extracted frame to.
const FRAME_FILE_NAME: &str = "frame.jpg";

/// Private temporary directory holding one extracted frame.
///
/// The directory and everything in it are removed when the workspace is
/// dropped, whether extraction succeeded or not.
///
/// # Example
///
/// ```no_run
/// use ffmovie_av::Workspace;
///
/// let workspace = Workspace::new(None)?;
/// // ffmpeg writes to workspace.frame_path()
/// workspace.cleanup();
/// # Ok::<(), ffmovie_av::Error>(())
/// ```
#[derive(Debug)]
pub struct Workspace {
    temp_dir: TempDir,
    frame_path: PathBuf,
}

impl Workspace {
    /// Create a workspace under `root`, or under the system temp directory.
    pub fn new(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ffmovie-frame-");

        let temp_dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        let frame_path = temp_dir.path().join(FRAME_FILE_NAME);

        Ok(Self {
            temp_dir,
            frame_path,
        })
    }

    /// Where the frame should be written.
    pub fn frame_path(&self) -> &Path {
        &self.frame_path
    }

    /// Get the temp directory path.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Remove the directory now instead of on drop.
    pub fn cleanup(self) {
        drop(self.temp_dir);
    }
}
