//! Output provider backed by a fixed string.

use std::path::{Path, PathBuf};

use super::{OutputProvider, ProviderBase, ProviderConfig, ProviderKind};
use crate::cache::OutputCache;
use crate::Result;

/// Returns text supplied up front instead of running a tool.
///
/// Useful for tests and for hosts that captured ffmpeg's output elsewhere.
/// When persistent it still goes through the cache, so a literal provider can
/// seed output that later movies with the same key will see.
///
/// # Example
///
/// ```
/// use ffmovie_av::{LiteralOutputProvider, Movie};
///
/// let provider = LiteralOutputProvider::from_output("Duration: 00:01:00.00, start: 0.0");
/// let movie = Movie::open("/movies/clip.mp4", Box::new(provider))?;
/// assert_eq!(movie.duration(), 60.0);
/// # Ok::<(), ffmovie_av::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LiteralOutputProvider {
    base: ProviderBase,
    output: String,
}

impl LiteralOutputProvider {
    pub fn new(binary: impl Into<PathBuf>, persistent: bool) -> Self {
        Self {
            base: ProviderBase::new(binary.into(), persistent),
            output: String::new(),
        }
    }

    /// A non-persistent provider returning `output`.
    pub fn from_output(output: impl Into<String>) -> Self {
        let mut provider = Self::new("ffmpeg", false);
        provider.output = output.into();
        provider
    }

    /// Use `cache` instead of the process-wide one.
    pub fn with_cache(mut self, cache: OutputCache) -> Self {
        self.base.cache = cache;
        self
    }

    /// Replace the text, storing it in the cache when persistent.
    pub fn set_output(&mut self, output: impl Into<String>) {
        self.output = output.into();
        self.base.store(ProviderKind::Literal, &self.output);
    }

    /// Replace the text without touching the cache.
    pub(crate) fn replace_output(&mut self, output: String) {
        self.output = output;
    }
}

impl OutputProvider for LiteralOutputProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Literal
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
        if let Some(output) = self.base.cached(ProviderKind::Literal) {
            return Ok(output);
        }
        self.base.store(ProviderKind::Literal, &self.output);
        Ok(self.output.clone())
    }

    fn box_clone(&self) -> Box<dyn OutputProvider> {
        Box::new(self.clone())
    }

    fn config(&self) -> ProviderConfig {
        ProviderConfig::Literal {
            binary: self.base.binary.clone(),
            persistent: self.base.persistent,
            output: self.output.clone(),
        }
    }
}
