//! Reversible white-border transforms for watermark protection.
//!
//! `enlarge` pads an image on the right and bottom with opaque white, 10% of
//! each dimension. `restore` crops that border back off. The batch runner
//! applies either operation to many inputs, isolating per-item failures.

pub mod batch;
pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod io;
pub mod processor;
pub mod report;

pub use batch::{process_batch, process_enlarge_images, process_restore_images, BatchInput};
pub use config::{Operation, ProcessingConfig};
pub use error::ProcessingError;
pub use format::OutputFormat;
pub use geometry::Dimensions;
pub use processor::{process_bytes, process_image};
pub use report::{BatchItem, ItemOutput, ProcessingResult};
