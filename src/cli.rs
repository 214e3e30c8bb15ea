use clap::{Args, Parser, Subcommand};
use ffmovie::config::ProbeBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffmovie")]
#[command(author, version, about = "Movie metadata and frame grabbing via ffmpeg")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a movie file and display its metadata
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Tool producing the stream report (overrides config)
        #[arg(long)]
        backend: Option<ProbeBackend>,

        /// Cache tool output for the lifetime of the process
        #[arg(long)]
        persistent: bool,
    },

    /// Extract a single frame to an image file
    Frame {
        /// Movie file
        #[arg(required = true)]
        file: PathBuf,

        /// Where to write the frame
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        position: FramePosition,

        /// Resize to WIDTHxHEIGHT
        #[arg(long, value_parser = parse_size)]
        size: Option<(u32, u32)>,

        /// JPEG quality, 1 (best) to 31
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=31))]
        quality: Option<u32>,
    },

    /// Check that ffmpeg and ffprobe are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

/// Which frame to extract. Defaults to the first one.
#[derive(Args)]
#[group(multiple = false)]
pub struct FramePosition {
    /// One-based frame number
    #[arg(long)]
    pub index: Option<u64>,

    /// Timestamp in seconds
    #[arg(long)]
    pub at: Option<f64>,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: u32 = w.parse().map_err(|_| format!("invalid width '{w}'"))?;
    let height: u32 = h.parse().map_err(|_| format!("invalid height '{h}'"))?;
    if width == 0 || height == 0 {
        return Err("width and height must be positive".to_string());
    }
    Ok((width, height))
}
