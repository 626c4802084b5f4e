//! # Image normalization
//!
//! Turns encoded image bytes into the flat `f32` layout the model consumes:
//! row-major (rows outer, columns inner), one red, green and blue value per
//! pixel, each scaled from `0..=255` into `[0, 1]`.
//!
//! The side length is a const generic tied to the model's input layer. Images
//! must already be `SIDE x SIDE`; nothing here resizes, crops or rotates.

use image::RgbImage;

use crate::constant::{IMAGE_SIZE, LOWER_BYTE_MASK};
use crate::error::{Error, Result};
use crate::sample::Sample;

/// Decodes and normalizes `SIDE x SIDE` RGB images.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageNormalizer<const SIDE: usize = IMAGE_SIZE>;

impl<const SIDE: usize> ImageNormalizer<SIDE> {
    /// Length of every vector this normalizer produces.
    pub const OUTPUT_LEN: usize = Sample::len_for_side(SIDE);

    pub fn new() -> Self {
        Self
    }

    /// Decode `bytes` into an 8-bit RGB grid. `path` is only used for errors.
    pub fn decode(&self, path: &str, bytes: &[u8]) -> Result<RgbImage> {
        let image = image::load_from_memory(bytes).map_err(|source| Error::Decode {
            path: path.to_string(),
            source,
        })?;
        let rgb = image.to_rgb8();
        self.check_dimensions(rgb.width(), rgb.height())?;
        Ok(rgb)
    }

    /// Normalize an already decoded grid.
    pub fn normalize_image(&self, image: &RgbImage) -> Result<Vec<f32>> {
        self.check_dimensions(image.width(), image.height())?;

        let mut normalized = Vec::with_capacity(Self::OUTPUT_LEN);
        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            push_rgb(&mut normalized, r, g, b);
        }
        Ok(normalized)
    }

    /// Decode and normalize in one step.
    pub fn normalize(&self, path: &str, bytes: &[u8]) -> Result<Vec<f32>> {
        let image = self.decode(path, bytes)?;
        self.normalize_image(&image)
    }

    /// Normalize packed 32-bit pixels laid out row-major, as produced by
    /// platform bitmaps: red in bits 16-23, green in 8-15, blue in 0-7. The
    /// top byte is ignored.
    pub fn normalize_argb(&self, pixels: &[u32]) -> Result<Vec<f32>> {
        let expected = SIDE * SIDE;
        if pixels.len() != expected {
            return Err(Error::UnexpectedDimensions {
                width: u32::try_from(pixels.len()).unwrap_or(u32::MAX),
                height: 1,
                side: SIDE,
            });
        }

        let mut normalized = Vec::with_capacity(Self::OUTPUT_LEN);
        for &packed in pixels {
            let [r, g, b] = unpack_rgb(packed);
            push_rgb(&mut normalized, r, g, b);
        }
        Ok(normalized)
    }

    fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        let matches = |dim: u32| usize::try_from(dim).is_ok_and(|d| d == SIDE);
        if matches(width) && matches(height) {
            Ok(())
        } else {
            Err(Error::UnexpectedDimensions { width, height, side: SIDE })
        }
    }
}

/// Split a packed pixel into its red, green and blue bytes.
pub fn unpack_rgb(packed: u32) -> [u8; 3] {
    let channel = |shift: u32| ((packed >> shift) & LOWER_BYTE_MASK) as u8;
    [channel(16), channel(8), channel(0)]
}

#[inline]
fn push_rgb(out: &mut Vec<f32>, r: u8, g: u8, b: u8) {
    out.push(f32::from(r) / 255.0);
    out.push(f32::from(g) / 255.0);
    out.push(f32::from(b) / 255.0);
}

#[cfg(test)]
pub(crate) mod test_images {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    /// PNG bytes of a `width x height` image filled with one colour.
    pub fn uniform_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        encode(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    pub fn encode(image: RgbImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut bytes, ImageFormat::Png)
            .expect("png encoding");
        bytes.into_inner()
    }
}
