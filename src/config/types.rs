use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub frames: FramesConfig,
}

/// Explicit tool locations. Unset tools are looked up on `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Which tool produces the stream report
    #[serde(default)]
    pub backend: ProbeBackend,

    /// Share tool output between movies opened in the same process
    #[serde(default)]
    pub persistent: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeBackend {
    #[default]
    Ffmpeg,
    Ffprobe,
}

impl std::str::FromStr for ProbeBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ffmpeg" => Ok(ProbeBackend::Ffmpeg),
            "ffprobe" => Ok(ProbeBackend::Ffprobe),
            other => Err(format!("unknown probe backend '{other}' (expected ffmpeg or ffprobe)")),
        }
    }
}

/// Defaults applied to every frame request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FramesConfig {
    /// Directory for temporary frame files (default: system temp dir)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// ffmpeg `-qscale`, 1 (best) to 31
    #[serde(default)]
    pub quality: Option<u32>,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,
}
