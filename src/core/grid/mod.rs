//! # Pixel Grid Adapter
//!
//! Wraps a decoded image behind a small transformation surface: resize,
//! grayscale, rectangular subregion extraction and flattening to a
//! luminance-value sequence.
//!
//! Every operation returns a **new** grid; pixel buffers are never shared
//! mutably between adapters. A grid produced from a failed decode is the
//! zero-value (`width == height == 0`) and every operation on it is a no-op
//! or returns an empty result, never a panic.

use image::{DynamicImage, GenericImageView};
use std::path::Path;
use tracing::warn;

/// Factor widening an 8-bit channel to the 16-bit scale decode libraries
/// report (`0xff * 257 == 0xffff`).
const CHANNEL_WIDENING: u16 = 257;

/// An owned, immutable pixel grid.
#[derive(Clone)]
pub struct PixelGrid {
    image: Option<DynamicImage>,
}

impl PixelGrid {
    /// The zero-value grid. Stands in for a failed decode.
    pub fn empty() -> Self {
        Self { image: None }
    }

    /// Wrap an already-decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        if image.width() == 0 || image.height() == 0 {
            return Self::empty();
        }
        Self { image: Some(image) }
    }

    /// Decode a file into a grid.
    ///
    /// A file that cannot be decoded yields the zero-value grid; the failure
    /// is logged and every downstream algorithm degrades to an empty result.
    pub fn from_file(path: &Path) -> Self {
        match image::open(path) {
            Ok(image) => Self::from_image(image),
            Err(e) => {
                warn!("cannot read image {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    /// The wrapped image, or `None` for the zero-value grid.
    pub fn as_image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.image.as_ref().map_or(0, |i| i.width())
    }

    pub fn height(&self) -> u32 {
        self.image.as_ref().map_or(0, |i| i.height())
    }

    /// Channel intensities at (x, y) on the 16-bit scale.
    ///
    /// Out-of-bounds coordinates and the zero-value grid read as black.
    pub fn channels(&self, x: u32, y: u32) -> [u16; 3] {
        match &self.image {
            Some(image) if x < image.width() && y < image.height() => {
                let pixel = image.get_pixel(x, y);
                [
                    pixel[0] as u16 * CHANNEL_WIDENING,
                    pixel[1] as u16 * CHANNEL_WIDENING,
                    pixel[2] as u16 * CHANNEL_WIDENING,
                ]
            }
            _ => [0, 0, 0],
        }
    }

    /// A new grid resampled to the requested dimensions (Lanczos3).
    pub fn resize(&self, width: u32, height: u32) -> Self {
        match &self.image {
            Some(image) if width > 0 && height > 0 => Self::from_image(
                image.resize_exact(width, height, image::imageops::FilterType::Lanczos3),
            ),
            _ => Self::empty(),
        }
    }

    /// A new grid converted to grayscale, luminance preserved.
    pub fn grayscale(&self) -> Self {
        match &self.image {
            Some(image) => Self::from_image(image.grayscale()),
            None => Self::empty(),
        }
    }

    /// A new grid restricted to the half-open rectangle `[x0, x1) x [y0, y1)`.
    ///
    /// Returns the zero-value grid when the rectangle extends outside this
    /// grid's bounds or is degenerate.
    pub fn subregion(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        let image = match &self.image {
            Some(image) => image,
            None => return Self::empty(),
        };
        let (width, height) = (image.width() as i64, image.height() as i64);
        if x0 < 0 || y0 < 0 || x1 > width || y1 > height || x0 >= x1 || y0 >= y1 {
            return Self::empty();
        }
        Self::from_image(image.crop_imm(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }

    /// Flatten to per-pixel luminance values in row-major order.
    ///
    /// Each value is `(sqrt(R) + sqrt(G) + sqrt(B)) / 3` over the raw
    /// channel intensities. The fingerprint engine's grid means depend on
    /// this exact formula; do not replace it with a plain channel average.
    pub fn to_luminance_sequence(&self) -> Vec<f64> {
        let image = match &self.image {
            Some(image) => image,
            None => return Vec::new(),
        };
        let mut values = Vec::with_capacity(image.width() as usize * image.height() as usize);
        for y in 0..image.height() {
            for x in 0..image.width() {
                let [r, g, b] = self.channels(x, y);
                let sum = (r as f64).sqrt() + (g as f64).sqrt() + (b as f64).sqrt();
                values.push(sum / 3.0);
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid_grid(width: u32, height: u32, r: u8, g: u8, b: u8) -> PixelGrid {
        let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([r, g, b]));
        PixelGrid::from_image(DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn channels_are_widened_to_sixteen_bit_scale() {
        let grid = solid_grid(4, 4, 255, 0, 128);
        assert_eq!(grid.channels(0, 0), [65535, 0, 128 * 257]);
    }

    #[test]
    fn channels_out_of_bounds_read_black() {
        let grid = solid_grid(4, 4, 255, 255, 255);
        assert_eq!(grid.channels(4, 0), [0, 0, 0]);
        assert_eq!(grid.channels(0, 100), [0, 0, 0]);
    }

    #[test]
    fn empty_grid_has_zero_dimensions() {
        let grid = PixelGrid::empty();
        assert!(grid.is_empty());
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.height(), 0);
    }

    #[test]
    fn operations_on_empty_grid_stay_empty() {
        let grid = PixelGrid::empty();
        assert!(grid.resize(10, 10).is_empty());
        assert!(grid.grayscale().is_empty());
        assert!(grid.subregion(0, 0, 1, 1).is_empty());
        assert!(grid.to_luminance_sequence().is_empty());
    }

    #[test]
    fn from_file_on_missing_path_yields_empty_grid() {
        let grid = PixelGrid::from_file(Path::new("/nonexistent/image.png"));
        assert!(grid.is_empty());
    }

    #[test]
    fn resize_produces_requested_dimensions() {
        let grid = solid_grid(100, 50, 10, 20, 30);
        let resized = grid.resize(25, 25);
        assert_eq!(resized.width(), 25);
        assert_eq!(resized.height(), 25);
    }

    #[test]
    fn subregion_within_bounds_copies_the_rectangle() {
        let grid = solid_grid(20, 20, 7, 7, 7);
        let sub = grid.subregion(5, 5, 15, 10);
        assert_eq!(sub.width(), 10);
        assert_eq!(sub.height(), 5);
    }

    #[test]
    fn subregion_outside_bounds_is_empty() {
        let grid = solid_grid(20, 20, 7, 7, 7);
        assert!(grid.subregion(-1, 0, 10, 10).is_empty());
        assert!(grid.subregion(0, 0, 21, 10).is_empty());
        assert!(grid.subregion(10, 10, 10, 20).is_empty());
    }

    #[test]
    fn subregion_does_not_mutate_the_source() {
        let grid = solid_grid(20, 20, 7, 7, 7);
        let _ = grid.subregion(0, 0, 5, 5);
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 20);
    }

    #[test]
    fn luminance_sequence_uses_per_channel_square_roots() {
        let grid = solid_grid(2, 1, 100, 100, 100);
        let values = grid.to_luminance_sequence();
        assert_eq!(values.len(), 2);
        let expected = (100.0f64 * 257.0).sqrt();
        assert!((values[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn grayscale_preserves_dimensions() {
        let grid = solid_grid(8, 6, 200, 100, 50);
        let gray = grid.grayscale();
        assert_eq!(gray.width(), 8);
        assert_eq!(gray.height(), 6);
        let [r, g, b] = gray.channels(0, 0);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
