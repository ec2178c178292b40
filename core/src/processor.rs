use std::borrow::Cow;
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

use crate::config::Operation;
use crate::error::ProcessingError;
use crate::format::OutputFormat;
use crate::geometry::{crop, expand};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const WHITE_OPAQUE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Decode an image from any format the `image` crate recognizes.
pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    image::load_from_memory(data).map_err(|e| ProcessingError::InvalidImage(e.to_string()))
}

/// Apply `operation` to a single image.
///
/// Sources with an alpha channel are processed as RGBA8, everything else as
/// RGB8. The input is never modified.
pub fn process_image(
    operation: Operation,
    image: &DynamicImage,
) -> Result<DynamicImage, ProcessingError> {
    let (width, height) = image.dimensions();

    let output = if image.color().has_alpha() {
        let rgba: Cow<RgbaImage> = match image.as_rgba8() {
            Some(buf) => Cow::Borrowed(buf),
            None => Cow::Owned(image.to_rgba8()),
        };
        DynamicImage::ImageRgba8(match operation {
            Operation::Enlarge => expand(&*rgba, WHITE_OPAQUE)?,
            Operation::Restore => crop(&*rgba)?,
        })
    } else {
        let rgb: Cow<RgbImage> = match image.as_rgb8() {
            Some(buf) => Cow::Borrowed(buf),
            None => Cow::Owned(image.to_rgb8()),
        };
        DynamicImage::ImageRgb8(match operation {
            Operation::Enlarge => expand(&*rgb, WHITE)?,
            Operation::Restore => crop(&*rgb)?,
        })
    };

    log::debug!(
        "{}: {}x{} -> {}x{} ({:?})",
        operation,
        width,
        height,
        output.width(),
        output.height(),
        output.color()
    );

    Ok(output)
}

/// Encode to `format`. JPEG has no alpha, so transparent pixels are
/// composited onto white first.
pub fn encode(
    image: &DynamicImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, ProcessingError> {
    let mut output = Vec::new();
    let mut cursor = Cursor::new(&mut output);

    match format {
        OutputFormat::Jpeg => {
            let rgb = flatten_onto_white(image);
            let mut encoder = JpegEncoder::new_with_quality(&mut cursor, jpeg_quality.clamp(1, 100));
            encoder
                .encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| ProcessingError::Encode(format!("Failed to encode JPEG: {}", e)))?;
        }
        other => {
            image
                .write_to(&mut cursor, other.image_format())
                .map_err(|e| {
                    ProcessingError::Encode(format!("Failed to encode {}: {}", other.as_str(), e))
                })?;
        }
    }

    Ok(output)
}

/// Decode, transform and re-encode as PNG.
///
/// PNG is lossless and keeps transparency, so repeated enlarge/restore
/// cycles through this entry point never degrade the image.
pub fn process_bytes(operation: Operation, input: &[u8]) -> Result<Vec<u8>, ProcessingError> {
    let image = decode(input)?;
    let processed = process_image(operation, &image)?;
    encode(&processed, OutputFormat::Png, 100)
}

fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
