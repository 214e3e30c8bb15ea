//! `ffmpeg -i` output provider.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::{probe_with_tool, OutputProvider, ProviderBase, ProviderConfig, ProviderKind};
use crate::cache::OutputCache;
use crate::error::CODE_NO_FFMPEG;
use crate::Result;

/// Default ffmpeg location.
pub const DEFAULT_FFMPEG_BINARY: &str = "/usr/local/bin/ffmpeg";

static BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FFmpeg version").expect("valid banner regex"));

/// Runs `<ffmpeg> -i <file>` and returns everything it printed.
///
/// ffmpeg complains about the missing output file and exits non-zero, but the
/// stream description it prints first is exactly what the movie parses.
#[derive(Debug, Clone)]
pub struct FfmpegOutputProvider {
    base: ProviderBase,
}

impl FfmpegOutputProvider {
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

impl Default for FfmpegOutputProvider {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG_BINARY, false)
    }
}

impl OutputProvider for FfmpegOutputProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ffmpeg
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
            ProviderKind::Ffmpeg,
            &["-i"],
            &BANNER,
            "FFmpeg",
            CODE_NO_FFMPEG,
        )
    }

    fn box_clone(&self) -> Box<dyn OutputProvider> {
        Box::new(self.clone())
    }

    fn config(&self) -> ProviderConfig {
        ProviderConfig::Ffmpeg {
            binary: self.base.binary.clone(),
            persistent: self.base.persistent,
        }
    }
}
