//! CMIP CLI Tool
//!
//! Command-line interface for inspecting, extracting and packing CMIP
//! mipmap containers.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cmip_core::{AstcLevelHeader, MipmapContainer, MipmapLevel};
use cmip_decoder::{ContainerDecoder, DecoderConfig, ImageDescriptor, ResourceType};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cmip")]
#[command(about = "CMIP - ASTC compressed mipmap containers")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a container or ASTC file
    Info {
        /// Input file path
        input: PathBuf,

        /// Print the information as JSON
        #[arg(long)]
        json: bool,

        /// Reject levels whose block size differs from the base level
        #[arg(long)]
        strict: bool,
    },

    /// Write the concatenated color data of every level to a file
    Extract {
        /// Input file path
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Reject levels whose block size differs from the base level
        #[arg(long)]
        strict: bool,
    },

    /// Pack standalone .astc files into a container, base level first
    Pack {
        /// Input .astc files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output container path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info {
            input,
            json,
            strict,
        } => show_info(input, json, strict)?,

        Commands::Extract {
            input,
            output,
            strict,
        } => extract_payload(input, output, strict)?,

        Commands::Pack { inputs, output } => pack_levels(inputs, output)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn decoder(strict: bool) -> ContainerDecoder {
    ContainerDecoder::new(DecoderConfig {
        strict_block_size: strict,
    })
}

fn show_info(input: PathBuf, json: bool, strict: bool) -> Result<()> {
    let data = std::fs::read(&input).context("Failed to read input file")?;
    let descriptor = decoder(strict)
        .decode(&data, ResourceType::ASTC)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    if json {
        let summary = serde_json::to_string_pretty(&descriptor.summary())
            .context("Failed to serialize image information")?;
        println!("{summary}");
    } else {
        print_info(&input, &descriptor);
    }

    Ok(())
}

fn extract_payload(input: PathBuf, output: PathBuf, strict: bool) -> Result<()> {
    println!("Decoding: {}", input.display());

    let data = std::fs::read(&input).context("Failed to read input file")?;
    let descriptor = decoder(strict)
        .decode(&data, ResourceType::ASTC)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    let file = File::create(&output).context("Failed to create output file")?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&descriptor.payload)
        .context("Failed to write payload")?;
    writer.flush().context("Failed to flush output file")?;

    println!(
        "Wrote {} bytes ({} levels, {}) to {}",
        descriptor.payload.len(),
        descriptor.level_count(),
        descriptor.format,
        output.display()
    );

    Ok(())
}

fn pack_levels(inputs: Vec<PathBuf>, output: PathBuf) -> Result<()> {
    let mut levels = Vec::with_capacity(inputs.len());

    for input in &inputs {
        let data = std::fs::read(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let (header, color_data) = AstcLevelHeader::parse_file(&data)
            .with_context(|| format!("Invalid ASTC file {}", input.display()))?;

        if let Some(base) = levels.first().map(|l: &MipmapLevel| l.header) {
            if base.block_dimensions() != header.block_dimensions() {
                bail!(
                    "{} uses {}x{} blocks but the base level uses {}x{}",
                    input.display(),
                    header.block_dim_x,
                    header.block_dim_y,
                    base.block_dim_x,
                    base.block_dim_y
                );
            }
        }

        tracing::debug!(
            path = %input.display(),
            width = header.size_x,
            height = header.size_y,
            bytes = color_data.len(),
            "adding level"
        );
        levels.push(MipmapLevel::new(header, color_data.to_vec()));
    }

    let container = MipmapContainer::new(levels);
    let file = File::create(&output).context("Failed to create output file")?;
    let mut writer = BufWriter::new(file);
    container
        .write(&mut writer)
        .context("Failed to write container")?;
    writer.flush().context("Failed to flush output file")?;

    println!(
        "Packed {} levels into {}",
        container.levels.len(),
        output.display()
    );

    Ok(())
}

fn print_info(input: &std::path::Path, descriptor: &ImageDescriptor<'_>) {
    println!("\n=== {} ===", input.display());
    println!("Resolution: {}x{}", descriptor.width, descriptor.height);
    println!("Format: {}", descriptor.format);
    if let Some((x, y)) = descriptor.format.astc_block_dimensions() {
        println!("Block size: {}x{}", x, y);
    }
    println!("Levels: {}", descriptor.level_count());
    println!(
        "Payload size: {} bytes ({:.2} KB)",
        descriptor.payload.len(),
        descriptor.payload.len() as f64 / 1024.0
    );

    if !descriptor.level_byte_sizes.is_empty() {
        println!("\n=== Levels ===");
        for (i, size) in descriptor.level_byte_sizes.iter().enumerate() {
            println!("  Level {}: {} bytes", i, size);
        }
    }
}
