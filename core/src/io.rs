use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Operation;
use crate::error::ProcessingError;
use crate::format::OutputFormat;

/// Where and how the result for `input` gets written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub format: OutputFormat,
}

/// Resolve the output file for `input`: `<stem><suffix>.<ext>`.
///
/// The input extension is kept when it names a writable format. A forced
/// `format` replaces it with that format's canonical extension, and an
/// unknown extension falls back to PNG. Outputs go to `output_dir` when set,
/// otherwise next to the input.
pub fn resolve_output(
    input: &Path,
    operation: Operation,
    output_dir: Option<&Path>,
    format: Option<OutputFormat>,
) -> OutputTarget {
    let detected = OutputFormat::from_path(input);
    let (format, extension) = match (format, detected) {
        (Some(forced), _) => (forced, forced.extension().to_string()),
        (None, Some(detected)) => (
            detected,
            input
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_else(|| detected.extension().to_string()),
        ),
        (None, None) => (OutputFormat::Png, OutputFormat::Png.extension().to_string()),
    };

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let file_name = format!("{}{}.{}", stem, operation.suffix(), extension);

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    OutputTarget {
        path: dir.join(file_name),
        format,
    }
}

/// Read file contents.
pub fn read_file(path: &Path) -> Result<Vec<u8>, ProcessingError> {
    fs::read(path).map_err(|e| ProcessingError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write file contents, creating parent directories as needed.
pub fn write_file(path: &Path, data: &[u8]) -> Result<(), ProcessingError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ProcessingError::WriteFile {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, data).map_err(|e| ProcessingError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
