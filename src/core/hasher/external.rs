//! External hash algorithm implementations.
//!
//! `LibraryHasher` defers entirely to the `image_hasher` vision library;
//! `PixelChecksum` is an exact-content discriminator over the decoded
//! pixels. Both plug into the pipeline through [`HashAlgorithm`].

use super::HashAlgorithm;
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, Hasher, HasherConfig};
use xxhash_rust::xxh3::xxh3_128;

/// A named algorithm backed by `image_hasher`.
pub struct LibraryHasher {
    name: &'static str,
    hasher: Hasher,
}

impl LibraryHasher {
    /// Mean hash over an 8x8 downsample.
    pub fn average() -> Self {
        Self {
            name: "average",
            hasher: HasherConfig::new().hash_alg(HashAlg::Mean).to_hasher(),
        }
    }

    /// Block hash over coarse brightness blocks.
    pub fn block_mean() -> Self {
        Self {
            name: "blockmean",
            hasher: HasherConfig::new().hash_alg(HashAlg::Blockhash).to_hasher(),
        }
    }

    /// DCT-preprocessed mean hash.
    pub fn perceptual() -> Self {
        Self {
            name: "phash",
            hasher: HasherConfig::new()
                .preproc_dct()
                .hash_alg(HashAlg::Mean)
                .to_hasher(),
        }
    }
}

impl HashAlgorithm for LibraryHasher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn compute(&self, image: &DynamicImage) -> Result<Vec<u8>, HashError> {
        Ok(self.hasher.hash_image(image).as_bytes().to_vec())
    }
}

/// xxh3-128 over the raw RGBA bytes.
///
/// Unlike the perceptual algorithms this matches only bit-identical pixel
/// content, which makes it a cheap first-pass discriminator for exact
/// duplicates.
pub struct PixelChecksum;

impl HashAlgorithm for PixelChecksum {
    fn name(&self) -> &'static str {
        "checksum"
    }

    fn compute(&self, image: &DynamicImage) -> Result<Vec<u8>, HashError> {
        let pixels = image.to_rgba8();
        let digest = xxh3_128(pixels.as_raw());
        Ok(digest.to_be_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(64, 64, |_, _| Rgb([r, g, b]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn library_hash_is_deterministic() {
        let hasher = LibraryHasher::average();
        let image = solid_image(128, 64, 32);

        let first = hasher.compute(&image).unwrap();
        let second = hasher.compute(&image).unwrap();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn perceptual_hash_is_deterministic() {
        let hasher = LibraryHasher::perceptual();
        let image = solid_image(10, 200, 90);

        assert_eq!(
            hasher.compute(&image).unwrap(),
            hasher.compute(&image).unwrap()
        );
    }

    #[test]
    fn checksum_is_sixteen_bytes() {
        let digest = PixelChecksum.compute(&solid_image(1, 2, 3)).unwrap();
        assert_eq!(digest.len(), 16);
    }

    #[test]
    fn checksum_separates_different_pixel_content() {
        let a = PixelChecksum.compute(&solid_image(1, 2, 3)).unwrap();
        let b = PixelChecksum.compute(&solid_image(3, 2, 1)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn checksum_matches_identical_pixel_content() {
        let a = PixelChecksum.compute(&solid_image(9, 9, 9)).unwrap();
        let b = PixelChecksum.compute(&solid_image(9, 9, 9)).unwrap();
        assert_eq!(a, b);
    }
}
