use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use watermark_fighter_core::config::{Operation, ProcessingConfig};
use watermark_fighter_core::format::OutputFormat;

/// Add or remove a white border that keeps watermark-cropping tools off your images
#[derive(Debug, Parser)]
#[command(name = "watermark_fighter", version, about)]
#[command(after_help = "Examples:
  watermark_fighter enlarge image.jpg
  watermark_fighter enlarge '*.jpg' --output-dir ./processed
  watermark_fighter restore image-enlarge.jpg
  watermark_fighter enlarge ./images/ -r -o ./output

Exit status: 0 when every file succeeded, 1 when any file failed or no
input matched, 2 on invalid arguments.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a white border: 10% of the width on the right, 10% of the height at the bottom
    Enlarge(ProcessArgs),

    /// Remove a border previously added by `enlarge`
    Restore(ProcessArgs),
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::Enlarge(_) => Operation::Enlarge,
            Command::Restore(_) => Operation::Restore,
        }
    }

    pub fn args(&self) -> &ProcessArgs {
        match self {
            Command::Enlarge(args) | Command::Restore(args) => args,
        }
    }
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files, directories, or glob patterns
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// Output directory (default: next to each input file)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format (png, jpg, webp, bmp, tiff); default keeps the input format
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// JPEG quality 1-100
    #[arg(short, long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Search directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Process files one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl ProcessArgs {
    pub fn to_config(&self) -> ProcessingConfig {
        ProcessingConfig {
            output_dir: self.output_dir.clone(),
            format: self.format,
            jpeg_quality: self.quality,
            parallel: !self.sequential,
        }
    }
}
