use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use rayon::prelude::*;

use crate::config::{Operation, ProcessingConfig};
use crate::error::ProcessingError;
use crate::io::{read_file, resolve_output, write_file};
use crate::processor::{decode, encode, process_image};
use crate::report::{BatchItem, ItemOutput, ProcessingResult};

/// One entry of a batch.
#[derive(Debug, Clone)]
pub enum BatchInput {
    /// Load from disk, write the result next to it or into the output dir.
    Path(PathBuf),
    /// Already decoded (e.g. an upload); the result is returned in memory.
    Image { name: String, image: DynamicImage },
}

impl BatchInput {
    pub fn label(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Image { name, .. } => name.clone(),
        }
    }
}

impl From<PathBuf> for BatchInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for BatchInput {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// Run `operation` over every input.
///
/// A failing item is recorded in the result and never stops the batch.
/// Items may execute in parallel, but the returned items always follow the
/// order of `inputs`. `on_item` fires once per finished item, in completion
/// order.
///
/// Two file inputs that resolve to the same output path (same file name in
/// different directories, written into one output dir) are not both written:
/// the first one wins and every later one fails with `WriteFile`.
pub fn process_batch<F>(
    operation: Operation,
    inputs: Vec<BatchInput>,
    config: &ProcessingConfig,
    on_item: F,
) -> ProcessingResult
where
    F: Fn(&BatchItem) + Sync,
{
    log::debug!("{} batch of {} item(s)", operation, inputs.len());

    let collisions = output_collisions(operation, &inputs, config);
    let inputs: Vec<(BatchInput, Option<PathBuf>)> = inputs.into_iter().zip(collisions).collect();

    let run = |(input, collision): (BatchInput, Option<PathBuf>)| {
        let source = input.label();
        let outcome = match collision {
            Some(path) => Err(ProcessingError::WriteFile {
                path,
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "output path already claimed by an earlier input in this batch",
                ),
            }),
            None => process_one(operation, input, config),
        };

        match &outcome {
            Ok(ItemOutput::Written(path)) => {
                log::info!("Processed: {} -> {}", source, path.display())
            }
            Ok(ItemOutput::Image(_)) => log::debug!("Processed: {}", source),
            Err(e) => log::error!("Error processing {}: {}", source, e),
        }

        let item = BatchItem { source, outcome };
        on_item(&item);
        item
    };

    let items: Vec<BatchItem> = if config.parallel {
        inputs.into_par_iter().map(run).collect()
    } else {
        inputs.into_iter().map(run).collect()
    };

    ProcessingResult::new(operation, items)
}

/// For each input, the output path it would share with an earlier input.
fn output_collisions(
    operation: Operation,
    inputs: &[BatchInput],
    config: &ProcessingConfig,
) -> Vec<Option<PathBuf>> {
    let mut claimed = HashSet::new();

    inputs
        .iter()
        .map(|input| match input {
            BatchInput::Path(path) => {
                let target = resolve_output(
                    path,
                    operation,
                    config.output_dir.as_deref(),
                    config.format,
                )
                .path;
                if claimed.insert(target.clone()) {
                    None
                } else {
                    Some(target)
                }
            }
            BatchInput::Image { .. } => None,
        })
        .collect()
}

fn process_one(
    operation: Operation,
    input: BatchInput,
    config: &ProcessingConfig,
) -> Result<ItemOutput, ProcessingError> {
    match input {
        BatchInput::Image { image, .. } => process_image(operation, &image).map(ItemOutput::Image),
        BatchInput::Path(path) => {
            let processed = {
                let data = read_file(&path)?;
                let image = decode(&data)?;
                process_image(operation, &image)?
            };

            let target = resolve_output(
                &path,
                operation,
                config.output_dir.as_deref(),
                config.format,
            );
            let encoded = encode(&processed, target.format, config.jpeg_quality)?;
            write_file(&target.path, &encoded)?;

            Ok(ItemOutput::Written(target.path))
        }
    }
}

/// Enlarge every file, returning the outputs that were written.
pub fn process_enlarge_images(input_paths: &[PathBuf], output_dir: Option<&Path>) -> Vec<PathBuf> {
    process_paths(Operation::Enlarge, input_paths, output_dir)
}

/// Restore every file, returning the outputs that were written.
pub fn process_restore_images(input_paths: &[PathBuf], output_dir: Option<&Path>) -> Vec<PathBuf> {
    process_paths(Operation::Restore, input_paths, output_dir)
}

fn process_paths(
    operation: Operation,
    input_paths: &[PathBuf],
    output_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let config = ProcessingConfig {
        output_dir: output_dir.map(Path::to_path_buf),
        ..ProcessingConfig::default()
    };
    let inputs = input_paths.iter().cloned().map(BatchInput::Path).collect();

    process_batch(operation, inputs, &config, |_| {}).written_paths()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn noise(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8])
        })
    }

    fn write_png(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
        let path = dir.join(name);
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn corrupt_item_does_not_stop_the_batch() {
        let tmp = TempDir::new().unwrap();
        let valid1 = write_png(tmp.path(), "one.png", &noise(100, 80));
        let corrupt = tmp.path().join("broken.png");
        std::fs::write(&corrupt, b"\x89PNG but not really").unwrap();
        let valid2 = write_png(tmp.path(), "two.png", &noise(50, 40));

        let inputs = vec![valid1.into(), corrupt.into(), valid2.into()];
        let result = process_batch(Operation::Enlarge, inputs, &ProcessingConfig::default(), |_| {});

        assert_eq!(result.success_count(), 2);
        assert_eq!(result.failure_count(), 1);
        assert!(result.items[0].is_success());
        assert!(matches!(result.items[1].error(), Some(ProcessingError::InvalidImage(_))));
        assert!(result.items[2].is_success());

        let first = image::open(tmp.path().join("one-enlarge.png")).unwrap();
        let second = image::open(tmp.path().join("two-enlarge.png")).unwrap();
        assert_eq!(first.dimensions(), (110, 88));
        assert_eq!(second.dimensions(), (55, 44));
        assert!(!tmp.path().join("broken-enlarge.png").exists());
    }

    #[test]
    fn results_follow_input_order_in_parallel() {
        let tmp = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..16)
            .map(|i| write_png(tmp.path(), &format!("img{i:02}.png"), &noise(20 + i, 30)))
            .collect();

        let inputs = paths.iter().cloned().map(BatchInput::Path).collect();
        let result = process_batch(Operation::Enlarge, inputs, &ProcessingConfig::default(), |_| {});

        let sources: Vec<String> = result.items.iter().map(|i| i.source.clone()).collect();
        let expected: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        assert_eq!(sources, expected);
    }

    #[test]
    fn progress_callback_fires_per_item() {
        let seen = AtomicUsize::new(0);
        let inputs = (0..5)
            .map(|i| BatchInput::Image {
                name: format!("upload-{i}"),
                image: DynamicImage::ImageRgb8(noise(30, 30)),
            })
            .collect();

        let result = process_batch(Operation::Enlarge, inputs, &ProcessingConfig::default(), |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(seen.load(Ordering::SeqCst), 5);
        assert!(result.all_succeeded());
    }

    #[test]
    fn in_memory_inputs_come_back_as_images() {
        let alpha = RgbaImage::from_pixel(40, 20, Rgba([5, 6, 7, 64]));
        let inputs = vec![
            BatchInput::Image {
                name: "a".into(),
                image: DynamicImage::ImageRgb8(noise(110, 88)),
            },
            BatchInput::Image {
                name: "tiny".into(),
                image: DynamicImage::ImageRgb8(noise(1, 30)),
            },
            BatchInput::Image {
                name: "b".into(),
                image: DynamicImage::ImageRgba8(alpha),
            },
        ];
        let config = ProcessingConfig {
            parallel: false,
            ..ProcessingConfig::default()
        };

        let result = process_batch(Operation::Restore, inputs, &config, |_| {});
        assert_eq!(result.success_count(), 2);
        assert!(matches!(
            result.items[1].error(),
            Some(ProcessingError::ImageTooSmall { width: 1, height: 30 })
        ));

        let images = result.into_images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].dimensions(), (100, 80));
        assert_eq!(images[1].dimensions(), (37, 19));
        assert!(images[1].color().has_alpha());
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let tmp = TempDir::new().unwrap();
        let inputs = vec![BatchInput::Path(tmp.path().join("gone.png"))];
        let result = process_batch(Operation::Enlarge, inputs, &ProcessingConfig::default(), |_| {});

        assert_eq!(result.failure_count(), 1);
        assert!(result.items[0].error().unwrap().is_io());
    }

    #[test]
    fn output_dir_is_created_and_used() {
        let tmp = TempDir::new().unwrap();
        let input = write_png(tmp.path(), "photo.png", &noise(100, 100));
        let out_dir = tmp.path().join("processed/nested");

        let written = process_enlarge_images(&[input], Some(&out_dir));
        assert_eq!(written, vec![out_dir.join("photo-enlarge.png")]);
        assert!(written[0].exists());
    }

    #[test]
    fn enlarge_then_restore_files_is_lossless() {
        let tmp = TempDir::new().unwrap();
        let source = noise(123, 77);
        let input = write_png(tmp.path(), "art.png", &source);

        let enlarged = process_enlarge_images(&[input], None);
        assert_eq!(enlarged, vec![tmp.path().join("art-enlarge.png")]);

        let restored = process_restore_images(&enlarged, None);
        assert_eq!(restored, vec![tmp.path().join("art-enlarge-restore.png")]);

        let back = image::open(&restored[0]).unwrap().to_rgb8();
        assert_eq!(back, source);
    }

    #[test]
    fn same_file_name_in_different_dirs_does_not_overwrite() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("2023")).unwrap();
        fs::create_dir_all(tmp.path().join("2024")).unwrap();
        let older = write_png(&tmp.path().join("2023"), "img.png", &noise(100, 100));
        let newer = write_png(&tmp.path().join("2024"), "img.png", &noise(50, 50));
        let out_dir = tmp.path().join("out");

        let config = ProcessingConfig {
            output_dir: Some(out_dir.clone()),
            ..ProcessingConfig::default()
        };
        let result = process_batch(
            Operation::Enlarge,
            vec![older.into(), newer.into()],
            &config,
            |_| {},
        );

        assert_eq!(result.success_count(), 1);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.written_paths(), vec![out_dir.join("img-enlarge.png")]);

        let err = result.items[1].error().unwrap();
        assert!(err.is_io());
        assert!(matches!(err, ProcessingError::WriteFile { path, .. } if *path == out_dir.join("img-enlarge.png")));

        let kept = image::open(out_dir.join("img-enlarge.png")).unwrap();
        assert_eq!(kept.dimensions(), (110, 110));
    }

    #[test]
    fn jpeg_inputs_keep_their_extension() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("photo.jpg");
        noise(60, 40).save(&input).unwrap();

        let written = process_enlarge_images(&[input], None);
        assert_eq!(written, vec![tmp.path().join("photo-enlarge.jpg")]);
        assert_eq!(image::open(&written[0]).unwrap().dimensions(), (66, 44));
    }
}
