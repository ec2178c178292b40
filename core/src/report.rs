use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::Serialize;

use crate::config::Operation;
use crate::error::ProcessingError;

/// What a successful item produced.
#[derive(Debug)]
pub enum ItemOutput {
    /// File input: the encoded result was written here.
    Written(PathBuf),
    /// In-memory input: the transformed image, handed back to the caller.
    Image(DynamicImage),
}

/// Outcome of processing a single input.
#[derive(Debug)]
pub struct BatchItem {
    /// Path or caller-supplied name of the input.
    pub source: String,
    pub outcome: Result<ItemOutput, ProcessingError>,
}

impl BatchItem {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn output_path(&self) -> Option<&Path> {
        match &self.outcome {
            Ok(ItemOutput::Written(path)) => Some(path),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        match &self.outcome {
            Ok(ItemOutput::Image(image)) => Some(image),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ProcessingError> {
        self.outcome.as_ref().err()
    }
}

/// Aggregate result of a batch, in input order.
#[derive(Debug)]
pub struct ProcessingResult {
    pub operation: Operation,
    pub items: Vec<BatchItem>,
}

impl ProcessingResult {
    pub fn new(operation: Operation, items: Vec<BatchItem>) -> Self {
        Self { operation, items }
    }

    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.items.len() - self.success_count()
    }

    /// True when no item failed.
    pub fn all_succeeded(&self) -> bool {
        self.items.iter().all(BatchItem::is_success)
    }

    /// Paths written by successful file items.
    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.items
            .iter()
            .filter_map(|i| i.output_path().map(Path::to_path_buf))
            .collect()
    }

    /// Images produced by successful in-memory items, e.g. for a gallery.
    pub fn into_images(self) -> Vec<DynamicImage> {
        self.items
            .into_iter()
            .filter_map(|i| match i.outcome {
                Ok(ItemOutput::Image(image)) => Some(image),
                _ => None,
            })
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            operation: self.operation.to_string(),
            total: self.items.len(),
            succeeded: self.success_count(),
            failed: self.failure_count(),
            items: self
                .items
                .iter()
                .map(|i| ItemSummary {
                    source: i.source.clone(),
                    output: i.output_path().map(|p| p.display().to_string()),
                    error: i.error().map(ToString::to_string),
                })
                .collect(),
        }
    }

    pub fn print_summary(&self) {
        println!("\n--- Summary ---");
        println!(
            "Successfully processed: {}/{} | Errors: {}",
            self.success_count(),
            self.items.len(),
            self.failure_count()
        );

        let written = self.written_paths();
        if !written.is_empty() {
            println!("Output files:");
            for path in &written {
                println!("  {}", path.display());
            }
        }

        for item in &self.items {
            if let Some(err) = item.error() {
                println!("  ERROR {}: {}", item.source, err);
            }
        }
    }
}

/// Serializable view of a [`ProcessingResult`].
#[derive(Debug, Serialize)]
pub struct Summary {
    pub operation: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<ItemSummary>,
}

#[derive(Debug, Serialize)]
pub struct ItemSummary {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProcessingResult {
        ProcessingResult::new(
            Operation::Enlarge,
            vec![
                BatchItem {
                    source: "a.png".into(),
                    outcome: Ok(ItemOutput::Written(PathBuf::from("a-enlarge.png"))),
                },
                BatchItem {
                    source: "b.png".into(),
                    outcome: Err(ProcessingError::InvalidImage("truncated".into())),
                },
            ],
        )
    }

    #[test]
    fn counts_successes_and_failures() {
        let result = sample();
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.failure_count(), 1);
        assert!(!result.all_succeeded());
        assert_eq!(result.written_paths(), vec![PathBuf::from("a-enlarge.png")]);
    }

    #[test]
    fn summary_keeps_order_and_reasons() {
        let summary = sample().summary();
        assert_eq!(summary.operation, "enlarge");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.items[0].output.as_deref(), Some("a-enlarge.png"));
        assert_eq!(summary.items[1].error.as_deref(), Some("invalid image: truncated"));
    }
}
