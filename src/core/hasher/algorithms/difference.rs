//! Difference Hash (dHash).
//!
//! The image is shrunk to `(hash_size + 1) x hash_size` grayscale and each
//! bit records whether a pixel is brighter than its right-hand neighbour.

use super::super::traits::{HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use super::pack_bits;
use crate::error::HashError;
use image::imageops::FilterType;
use image::DynamicImage;

/// Difference Hash (dHash) implementation
pub struct DifferenceHasher {
    hash_size: u32,
}

impl DifferenceHasher {
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for DifferenceHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError> {
        // One extra column so every cell has a right-hand neighbour
        let gray = image
            .resize_exact(self.hash_size + 1, self.hash_size, FilterType::Triangle)
            .to_luma8();

        let size = self.hash_size;
        let pixels = &gray;
        let bits = (0..size).flat_map(move |y| {
            (0..size).map(move |x| pixels.get_pixel(x, y)[0] > pixels.get_pixel(x + 1, y)[0])
        });

        Ok(ImageHashValue::new(
            pack_bits(bits),
            HashAlgorithmKind::Difference,
        ))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Difference
    }
}
