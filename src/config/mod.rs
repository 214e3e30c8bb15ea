mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./ffmovie.toml",
        "~/.config/ffmovie/config.toml",
        "/etc/ffmovie/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    for (name, path) in [
        ("ffmpeg_path", &config.tools.ffmpeg_path),
        ("ffprobe_path", &config.tools.ffprobe_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} does not exist: {:?}", name, path);
            }
        }
    }

    if let Some(quality) = config.frames.quality {
        if !(1..=31).contains(&quality) {
            anyhow::bail!("Frame quality must be between 1 and 31, got {}", quality);
        }
    }

    match (config.frames.width, config.frames.height) {
        (Some(0), _) | (_, Some(0)) => anyhow::bail!("Frame width and height must be positive"),
        (Some(_), None) | (None, Some(_)) => {
            anyhow::bail!("Frame width and height must be set together")
        }
        _ => {}
    }

    Ok(())
}
