mod cli;

use ffmovie::config::{self, ProbeBackend};
use ffmovie::probe;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, FramePosition};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "ffmovie=debug,ffmovie_av=debug".to_string()
        } else {
            "ffmovie=info,ffmovie_av=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Probe {
            file,
            json,
            backend,
            persistent,
        } => probe_file(&file, cli.config.as_deref(), json, backend, persistent),
        Commands::Frame {
            file,
            output,
            position,
            size,
            quality,
        } => extract_frame(
            &file,
            cli.config.as_deref(),
            &output,
            position,
            size,
            quality,
        ),
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("ffmovie {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn probe_file(
    file: &Path,
    config_path: Option<&Path>,
    json: bool,
    backend: Option<ProbeBackend>,
    persistent: bool,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    if let Some(backend) = backend {
        config.probe.backend = backend;
    }
    config.probe.persistent |= persistent;

    let movie = probe::open_movie(file, &config)?;
    let report = movie.report();

    if json {
        let json_str = serde_json::to_string_pretty(&report)?;
        println!("{}", json_str);
        return Ok(());
    }

    println!("File: {}", report.file_path.display());
    if let Some(size) = report.file_size {
        println!("Size: {} bytes", size);
    }
    let secs = report.duration as u64;
    println!(
        "Duration: {:02}:{:02}:{:02} ({:.2}s)",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        report.duration
    );
    if report.bit_rate > 0 {
        println!("Bit rate: {} kb/s", report.bit_rate / 1000);
    }

    if report.has_video {
        print!(
            "\nVideo: {} {}x{}",
            report.video_codec, report.frame_width, report.frame_height
        );
        if let Some(name) = report.resolution_name() {
            print!(" [{}]", name);
        }
        println!();
        println!("  Pixel format: {}", report.pixel_format);
        println!(
            "  {:.3} fps, {} frames",
            report.frame_rate, report.frame_count
        );
        if report.video_bit_rate > 0 {
            println!("  {} kb/s", report.video_bit_rate / 1000);
        }
    }

    if report.has_audio {
        println!(
            "\nAudio: {} {} Hz, {}ch",
            report.audio_codec, report.audio_sample_rate, report.audio_channels
        );
        if report.audio_bit_rate > 0 {
            println!("  {} kb/s", report.audio_bit_rate / 1000);
        }
    }

    let tags = &report.tags;
    let text_tags = [
        ("Title", &tags.title),
        ("Artist", &tags.artist),
        ("Comment", &tags.comment),
        ("Copyright", &tags.copyright),
        ("Genre", &tags.genre),
    ];
    if text_tags.iter().any(|(_, v)| !v.is_empty()) || tags.track_number > 0 || tags.year > 0 {
        println!("\nTags:");
        for (name, value) in text_tags {
            if !value.is_empty() {
                println!("  {}: {}", name, value);
            }
        }
        if tags.track_number > 0 {
            println!("  Track: {}", tags.track_number);
        }
        if tags.year > 0 {
            println!("  Year: {}", tags.year);
        }
    }

    Ok(())
}

fn extract_frame(
    file: &Path,
    config_path: Option<&Path>,
    output: &Path,
    position: FramePosition,
    size: Option<(u32, u32)>,
    quality: Option<u32>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let mut movie = probe::open_movie(file, &config)?;

    let mut options = probe::frame_options(&config).with_output(output);
    if let Some((width, height)) = size {
        options = options.with_size(width, height);
    }
    if let Some(quality) = quality {
        options = options.with_quality(quality);
    }

    tracing::info!("Extracting frame from {:?} to {:?}", file, output);

    let frame = match (position.index, position.at) {
        (_, Some(seconds)) => movie.fetch_frame_at_time(seconds, &options)?,
        (index, None) => movie.fetch_frame(index, &options)?,
    };

    println!(
        "Wrote {}x{} frame at {:.4}s to {}",
        frame.width(),
        frame.height(),
        frame.time(),
        output.display()
    );

    Ok(())
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = probe::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to probe movies and grab frames.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let show = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(PATH)".to_string())
    };
    println!("  ffmpeg: {}", show(&config.tools.ffmpeg_path));
    println!("  ffprobe: {}", show(&config.tools.ffprobe_path));
    println!("  Probe backend: {:?}", config.probe.backend);
    println!("  Persistent output: {}", config.probe.persistent);
    if let (Some(w), Some(h)) = (config.frames.width, config.frames.height) {
        println!("  Frame size: {}x{}", w, h);
    }
    if let Some(q) = config.frames.quality {
        println!("  Frame quality: {}", q);
    }

    Ok(())
}
