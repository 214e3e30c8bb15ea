//! Output providers.
//!
//! A provider produces the raw diagnostic text a [`crate::Movie`] parses:
//!
//! - [`FfmpegOutputProvider`] runs `ffmpeg -i <file>`
//! - [`FfprobeOutputProvider`] runs `ffprobe <file>`
//! - [`LiteralOutputProvider`] hands back a pre-supplied string
//!
//! Any provider built as persistent consults an [`OutputCache`] before doing
//! work and stores what it produced.

mod ffmpeg;
mod ffprobe;
mod literal;

pub use ffmpeg::{FfmpegOutputProvider, DEFAULT_FFMPEG_BINARY};
pub use ffprobe::{FfprobeOutputProvider, DEFAULT_FFPROBE_BINARY};
pub use literal::LiteralOutputProvider;

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheKey, OutputCache};
use crate::error::CODE_FILE_NOT_FOUND;
use crate::{Error, Result, ToolCommand};

/// Which provider implementation produced a piece of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Ffmpeg,
    Ffprobe,
    Literal,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Ffmpeg => write!(f, "ffmpeg"),
            ProviderKind::Ffprobe => write!(f, "ffprobe"),
            ProviderKind::Literal => write!(f, "literal"),
        }
    }
}

/// Source of the raw diagnostic text for one movie file.
pub trait OutputProvider: fmt::Debug + Send {
    /// The implementation kind, part of the cache key.
    fn kind(&self) -> ProviderKind;

    /// Path of the tool this provider runs.
    fn binary(&self) -> &Path;

    /// Movie file the output describes.
    fn movie_file(&self) -> &Path;

    /// Whether fetched output is shared through the cache.
    fn is_persistent(&self) -> bool;

    /// Point the provider at a movie file.
    fn set_movie_file(&mut self, movie_file: &Path);

    /// Produce the raw diagnostic text, invoking the tool when needed.
    fn fetch_output(&self) -> Result<String>;

    /// Deep copy behind a fresh box.
    fn box_clone(&self) -> Box<dyn OutputProvider>;

    /// Serializable description from which the provider can be rebuilt.
    fn config(&self) -> ProviderConfig;
}

impl Clone for Box<dyn OutputProvider> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Serializable provider description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    Ffmpeg {
        binary: PathBuf,
        #[serde(default)]
        persistent: bool,
    },
    Ffprobe {
        binary: PathBuf,
        #[serde(default)]
        persistent: bool,
    },
    Literal {
        binary: PathBuf,
        #[serde(default)]
        persistent: bool,
        #[serde(default)]
        output: String,
    },
}

impl ProviderConfig {
    /// Rebuild a provider sharing `cache`. The movie file is set by the
    /// movie the provider gets attached to.
    pub fn into_provider(self, cache: &OutputCache) -> Box<dyn OutputProvider> {
        match self {
            ProviderConfig::Ffmpeg { binary, persistent } => Box::new(
                FfmpegOutputProvider::new(binary, persistent).with_cache(cache.clone()),
            ),
            ProviderConfig::Ffprobe { binary, persistent } => Box::new(
                FfprobeOutputProvider::new(binary, persistent).with_cache(cache.clone()),
            ),
            ProviderConfig::Literal {
                binary,
                persistent,
                output,
            } => {
                let mut provider =
                    LiteralOutputProvider::new(binary, persistent).with_cache(cache.clone());
                provider.replace_output(output);
                Box::new(provider)
            }
        }
    }
}

/// State common to every provider: what to run, on what, and whether to
/// share the result.
#[derive(Debug, Clone)]
pub(crate) struct ProviderBase {
    pub(crate) binary: PathBuf,
    pub(crate) movie_file: PathBuf,
    pub(crate) persistent: bool,
    pub(crate) cache: OutputCache,
}

impl ProviderBase {
    pub(crate) fn new(binary: PathBuf, persistent: bool) -> Self {
        Self {
            binary,
            movie_file: PathBuf::new(),
            persistent,
            cache: OutputCache::global(),
        }
    }

    fn key(&self, kind: ProviderKind) -> CacheKey {
        CacheKey::new(kind, &self.binary, &self.movie_file)
    }

    /// Cached output for this invocation, if persistent and present.
    pub(crate) fn cached(&self, kind: ProviderKind) -> Option<String> {
        if !self.persistent {
            return None;
        }
        let hit = self.cache.get(&self.key(kind));

        #[cfg(feature = "tracing")]
        if hit.is_some() {
            tracing::trace!(
                provider = %kind,
                file = %self.movie_file.display(),
                "Reusing cached tool output"
            );
        }

        hit
    }

    /// Remember `output` when persistent.
    pub(crate) fn store(&self, kind: ProviderKind, output: &str) {
        if self.persistent {
            self.cache.insert(self.key(kind), output.to_string());
        }
    }
}

/// Run a probing tool against the movie file and check its banner.
///
/// Shared by the ffmpeg and ffprobe providers, which differ only in their
/// argument prefix, banner and error code.
pub(crate) fn probe_with_tool(
    base: &ProviderBase,
    kind: ProviderKind,
    args: &[&str],
    banner: &Regex,
    tool_name: &str,
    missing_code: u32,
) -> Result<String> {
    if let Some(output) = base.cached(kind) {
        return Ok(output);
    }

    if !base.movie_file.exists() {
        return Err(Error::invalid_argument(
            format!("Movie file not found: {}", base.movie_file.display()),
            CODE_FILE_NOT_FOUND,
        ));
    }

    let output = ToolCommand::new(&base.binary)
        .args(args.iter().copied())
        .arg(&base.movie_file)
        .execute()
        .map_err(|e| match e {
            Error::Io(io)
                if matches!(
                    io.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
                ) =>
            {
                Error::binary_missing(tool_name, missing_code)
            }
            other => other,
        })?;

    if !banner.is_match(&output.text) {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            binary = %base.binary.display(),
            "{} banner missing from tool output",
            tool_name
        );
        return Err(Error::binary_missing(tool_name, missing_code));
    }

    base.store(kind, &output.text);
    Ok(output.text)
}
