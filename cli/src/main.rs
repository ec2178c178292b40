use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use watermark_fighter::cli::Cli;
use watermark_fighter::io::collect_inputs;
use watermark_fighter_core::batch::{process_batch, BatchInput};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let operation = cli.command.operation();
    let args = cli.command.args();
    let config = args.to_config();

    let collected = collect_inputs(&args.inputs, args.recursive, operation)
        .context("Failed to collect input files")?;

    if collected.files.is_empty() {
        eprintln!("Error: no input files found.");
        return Ok(ExitCode::FAILURE);
    }

    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        log::debug!("Output directory: {}", dir.display());
    }

    let total = collected.files.len();
    if !args.json {
        println!("Found {} image(s) to {}.", total, operation);
    }

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );

    let inputs = collected.files.into_iter().map(BatchInput::Path).collect();
    let result = process_batch(operation, inputs, &config, |item| {
        let name = Path::new(&item.source)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.source.clone());
        pb.set_message(if item.is_success() { name } else { format!("{} (failed)", name) });
        pb.inc(1);
    });

    pb.finish_with_message("Done!");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.summary())?);
    } else {
        result.print_summary();
    }

    Ok(if result.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
