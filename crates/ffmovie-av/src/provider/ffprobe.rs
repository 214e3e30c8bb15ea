//! `ffprobe` output provider.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::{probe_with_tool, OutputProvider, ProviderBase, ProviderConfig, ProviderKind};
use crate::cache::OutputCache;
use crate::error::CODE_NO_FFPROBE;
use crate::Result;

/// Default ffprobe location, resolved through `PATH`.
pub const DEFAULT_FFPROBE_BINARY: &str = "ffprobe";

static BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FFprobe version").expect("valid banner regex"));

/// Runs `<ffprobe> <file>`. Its default report has the same shape as
/// ffmpeg's, so the movie parses either.
#[derive(Debug, Clone)]
pub struct FfprobeOutputProvider {
    base: ProviderBase,
}

impl FfprobeOutputProvider {
    pub fn new(binary: impl Into<PathBuf>, persistent: bool) -> Self {
        Self {
            base: ProviderBase::new(binary.into(), persistent),
        }
    }

    /// Use `cache` instead of the process-wide one.
    pub fn with_cache(mut self, cache: OutputCache) -> Self {
        self.base.cache = cache;
        self
    }
}

impl Default for FfprobeOutputProvider {
    fn default() -> Self {
        Self::new(DEFAULT_FFPROBE_BINARY, false)
    }
}

impl OutputProvider for FfprobeOutputProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ffprobe
    }

    fn binary(&self) -> &Path {
        &self.base.binary
    }

    fn movie_file(&self) -> &Path {
        &self.base.movie_file
    }

    fn is_persistent(&self) -> bool {
        self.base.persistent
    }

    fn set_movie_file(&mut self, movie_file: &Path) {
        self.base.movie_file = movie_file.to_path_buf();
    }

    fn fetch_output(&self) -> Result<String> {
        probe_with_tool(
            &self.base,
            ProviderKind::Ffprobe,
            &[],
            &BANNER,
            "FFprobe",
            CODE_NO_FFPROBE,
        )
    }

    fn box_clone(&self) -> Box<dyn OutputProvider> {
        Box::new(self.clone())
    }

    fn config(&self) -> ProviderConfig {
        ProviderConfig::Ffprobe {
            binary: self.base.binary.clone(),
            persistent: self.base.persistent,
        }
    }
}
