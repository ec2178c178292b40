use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("image too small to restore: {width}x{height}")]
    ImageTooSmall { width: u32, height: u32 },

    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("encoding failed: {0}")]
    Encode(String),
}

impl ProcessingError {
    /// True for failures to read a source or write a destination.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::ReadFile { .. } | Self::WriteFile { .. })
    }
}
