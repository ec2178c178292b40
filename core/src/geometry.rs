//! Pure sizing rules and canvas operations for the border transforms.
//!
//! Enlarging adds `D / 10` pixels to each axis. Restoring removes
//! `D' / 11`, which is the exact integer inverse: with `D = 10q + r`
//! (`r < 10`) the enlarged size is `11q + r`, and `11q + r - q = D`.
//! For every size `enlarge` can produce this agrees with `round(D' / 1.1)`.

use image::{imageops, ImageBuffer, Pixel};

use crate::error::ProcessingError;

/// Smallest edge, in pixels, that `restore` accepts.
pub const MIN_RESTORE_DIMENSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of the canvas after adding the right and bottom border.
    pub fn expanded(self) -> Result<Self, ProcessingError> {
        self.ensure_non_empty()?;

        match (expand_axis(self.width), expand_axis(self.height)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(ProcessingError::InvalidImage(format!(
                "image too large to enlarge: {}x{}",
                self.width, self.height
            ))),
        }
    }

    /// Size of the original image, assuming `self` was produced by [`Dimensions::expanded`].
    pub fn restored(self) -> Result<Self, ProcessingError> {
        self.ensure_non_empty()?;

        if self.width < MIN_RESTORE_DIMENSION || self.height < MIN_RESTORE_DIMENSION {
            return Err(ProcessingError::ImageTooSmall {
                width: self.width,
                height: self.height,
            });
        }

        Ok(Self {
            width: restore_axis(self.width),
            height: restore_axis(self.height),
        })
    }

    fn ensure_non_empty(self) -> Result<(), ProcessingError> {
        if self.width == 0 || self.height == 0 {
            return Err(ProcessingError::InvalidImage(format!(
                "zero dimension: {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

fn expand_axis(size: u32) -> Option<u32> {
    size.checked_add(size / 10)
}

fn restore_axis(size: u32) -> u32 {
    size - size / 11
}

/// Copy `image` onto a `background`-filled canvas 10% larger on each axis.
///
/// The source lands at (0, 0) unchanged: pixels are replaced, not blended,
/// so alpha values in the original region survive as-is.
pub fn expand<P>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    background: P,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, ProcessingError>
where
    P: Pixel + 'static,
{
    let target = Dimensions::from(image.dimensions()).expanded()?;

    let mut canvas = ImageBuffer::from_pixel(target.width, target.height, background);
    imageops::replace(&mut canvas, image, 0, 0);

    Ok(canvas)
}

/// Cut the right and bottom border added by [`expand`].
///
/// Does not check whether a border is actually present.
pub fn crop<P>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, ProcessingError>
where
    P: Pixel + 'static,
{
    let target = Dimensions::from(image.dimensions()).restored()?;

    Ok(imageops::crop_imm(image, 0, 0, target.width, target.height).to_image())
}
