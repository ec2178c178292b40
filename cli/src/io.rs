use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use watermark_fighter_core::config::Operation;
use watermark_fighter_core::format::is_supported_image;

/// Files gathered from the command line.
#[derive(Debug, Default)]
pub struct CollectedInputs {
    pub files: Vec<PathBuf>,
    /// Arguments that matched nothing.
    pub unmatched: Vec<String>,
}

/// Expand every argument into image files, keeping argument order.
///
/// An existing file is taken as-is. A directory contributes the supported
/// images inside it (all levels with `recursive`), minus earlier outputs of
/// `operation`. Anything else is treated as a glob pattern; a malformed
/// pattern counts as unmatched.
pub fn collect_inputs(
    specs: &[String],
    recursive: bool,
    operation: Operation,
) -> Result<CollectedInputs> {
    let mut collected = CollectedInputs::default();

    for spec in specs {
        let files = collect_spec(spec, recursive, operation)?;
        if files.is_empty() {
            log::warn!("No files found for '{}'", spec);
            collected.unmatched.push(spec.clone());
        } else {
            log::debug!("'{}' matched {} file(s)", spec, files.len());
            collected.files.extend(files);
        }
    }

    Ok(collected)
}

fn collect_spec(spec: &str, recursive: bool, operation: Operation) -> Result<Vec<PathBuf>> {
    let path = Path::new(spec);

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        return collect_dir(path, recursive, operation);
    }

    let pattern = match glob::glob(spec) {
        Ok(pattern) => pattern,
        Err(e) => {
            log::warn!("Invalid glob pattern '{}': {}", spec, e);
            return Ok(Vec::new());
        }
    };
    Ok(pattern
        .filter_map(|entry| match entry {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("Skipping unreadable glob match: {}", e);
                None
            }
        })
        .filter(|p| p.is_file())
        .collect())
}

fn collect_dir(dir: &Path, recursive: bool, operation: Operation) -> Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).max_depth(max_depth).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
        if !entry.file_type().is_file() || !is_supported_image(entry.path()) {
            continue;
        }
        if is_previous_output(entry.path(), operation) {
            log::debug!("Skipping earlier {} output {}", operation, entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

fn is_previous_output(path: &Path, operation: Operation) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(operation.suffix()))
}
