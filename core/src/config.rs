use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::format::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Add the protective border.
    Enlarge,
    /// Remove a previously added border.
    Restore,
}

impl Operation {
    /// Suffix appended to the file stem of every output.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Enlarge => "-enlarge",
            Self::Restore => "-restore",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enlarge => write!(f, "enlarge"),
            Self::Restore => write!(f, "restore"),
        }
    }
}

impl FromStr for Operation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enlarge" | "expand" => Ok(Self::Enlarge),
            "restore" | "crop" => Ok(Self::Restore),
            _ => Err(format!("unknown operation: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Where outputs are written (default: next to each input)
    pub output_dir: Option<PathBuf>,
    /// Force an output format instead of following the input extension
    pub format: Option<OutputFormat>,
    /// JPEG quality 1-100, only used for JPEG outputs
    pub jpeg_quality: u8,
    /// Process batch items on the rayon thread pool
    pub parallel: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            format: None,
            jpeg_quality: 95,
            parallel: true,
        }
    }
}
