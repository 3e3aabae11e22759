//! vtex CLI - Command-line tool for Valve Texture Format files.
//!
//! This is the main entry point for the vtex command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use vtex::prelude::*;
use vtex::vtf::{high_res_size, mip_size};

/// vtex - Valve Texture Format inspection and decoding tool
#[derive(Parser)]
#[command(name = "vtex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print header fields and the mip chain layout
    Info {
        /// Input VTF file
        #[arg(short, long, env = "VTEX_INPUT")]
        input: PathBuf,
    },

    /// Decode frames to PNG files
    Decode {
        /// Input VTF file
        #[arg(short, long, env = "VTEX_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "VTEX_OUTPUT")]
        output: PathBuf,

        /// Only write this frame (0-based)
        #[arg(short, long)]
        frame: Option<usize>,

        /// Bytes fed to the loader per increment
        #[arg(long, default_value_t = 64 * 1024)]
        chunk_size: usize,
    },

    /// Report which files carry the VTF signature
    Sniff {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Decode {
            input,
            output,
            frame,
            chunk_size,
        } => {
            cmd_decode(&input, &output, frame, chunk_size)?;
        }
        Commands::Sniff { files } => {
            cmd_sniff(&files)?;
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let header = VtfHeader::parse(&data).context("Failed to parse VTF header")?;

    println!("File:        {}", input.display());
    println!("Version:     {}.{}", header.version[0], header.version[1]);
    println!("Header size: {}", header.header_size);
    println!("Dimensions:  {}x{}x{}", header.width, header.height, header.depth);
    println!("Flags:       {:#010x}", header.flags);
    println!("Frames:      {} (first {})", header.frames, header.first_frame);
    println!(
        "Reflectivity: {:.3} {:.3} {:.3}",
        header.reflectivity[0], header.reflectivity[1], header.reflectivity[2]
    );
    println!("Bumpmap scale: {:.3}", header.bumpmap_scale);
    println!(
        "Format:      {} ({}){}",
        header.high_res_format,
        header.high_res_format.tag(),
        if header.high_res_format.is_supported() { "" } else { " - unsupported" }
    );
    println!(
        "Thumbnail:   {} {}x{}",
        header.low_res_format, header.low_res_width, header.low_res_height
    );
    println!("Mipmaps:     {}", header.mipmap_count);

    if header.high_res_format.is_supported() {
        let depth = u32::from(header.depth);
        for level in 0..u32::from(header.mipmap_count) {
            println!(
                "  mip {:>2}: {:>6}x{:<6} {:>12} bytes/frame",
                level,
                vtex::vtf::layout::mip_extent(u32::from(header.width), level),
                vtex::vtf::layout::mip_extent(u32::from(header.height), level),
                mip_size(&header, level, depth)
            );
        }
        println!("Image data:  {} bytes", high_res_size(&header));
    }

    Ok(())
}

/// Ticks a progress bar for every decoded frame.
struct ProgressSink {
    progress: ProgressBar,
}

impl ImageSink for ProgressSink {
    fn notify_geometry(&mut self, width: u32, height: u32, _animation: &Animation) {
        debug!("geometry known: {}x{}", width, height);
    }

    fn append_frame(&mut self, animation: &mut Animation, frame: PixelBuffer) {
        animation.add_frame(frame);
        self.progress.inc(1);
    }
}

fn cmd_decode(input: &Path, output: &Path, only: Option<usize>, chunk_size: usize) -> Result<()> {
    info!("Decoding: {} -> {}", input.display(), output.display());

    let data = fs::read(input).context("Failed to read input file")?;
    let header = VtfHeader::parse(&data).context("Failed to parse VTF header")?;

    let progress = ProgressBar::new(u64::from(header.frames));
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut loader = VtfLoader::new().context("Failed to start load")?;
    for chunk in data.chunks(chunk_size.max(1)) {
        loader.load_increment(chunk).context("Failed to buffer input")?;
    }

    let mut sink = ProgressSink { progress };
    let animation = loader.stop_load(&mut sink).context("Failed to decode VTF")?;
    sink.progress.finish_and_clear();

    info!(
        "Decoded {} frame(s) of {}x{} in {:?}",
        animation.len(),
        animation.width(),
        animation.height(),
        start.elapsed()
    );

    fs::create_dir_all(output)?;
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("frame");

    let mut written = 0;
    for (index, frame) in animation.iter().enumerate() {
        if only.is_some_and(|only| only != index) {
            continue;
        }

        let path = if animation.len() == 1 {
            output.join(format!("{}.png", stem))
        } else {
            output.join(format!("{}_{:03}.png", stem, index))
        };
        let color = if frame.has_alpha() {
            image::ColorType::Rgba8
        } else {
            image::ColorType::Rgb8
        };

        image::save_buffer(&path, &frame.to_packed(), frame.width(), frame.height(), color)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("wrote {}", path.display());
        written += 1;
    }

    if let (Some(index), 0) = (only, written) {
        anyhow::bail!("Frame {} out of range ({} frames)", index, animation.len());
    }

    println!("Wrote {} PNG file(s) to {}", written, output.display());

    Ok(())
}

fn cmd_sniff(files: &[PathBuf]) -> Result<()> {
    let mut matches = 0;

    for path in files {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if is_vtf(&data) {
            println!("{}: {}", path.display(), FORMAT_INFO.description);
            matches += 1;
        } else {
            println!("{}: not VTF", path.display());
        }
    }

    println!("\nTotal: {} of {} files", matches, files.len());

    Ok(())
}
