//! Average Hash (aHash).
//!
//! The image is shrunk to `hash_size x hash_size` grayscale and every pixel
//! brighter than the mean sets its bit. Fingerprints are compared for
//! equality only, so re-encodes that keep the same coarse brightness layout
//! land in the same bucket.

use super::super::traits::{HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use super::pack_bits;
use crate::error::HashError;
use image::imageops::FilterType;
use image::DynamicImage;

/// Average Hash (aHash) implementation
pub struct AverageHasher {
    hash_size: u32,
}

impl AverageHasher {
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError> {
        let gray = image
            .resize_exact(self.hash_size, self.hash_size, FilterType::Triangle)
            .to_luma8();

        let total: u64 = gray.pixels().map(|p| u64::from(p[0])).sum();
        let count = u64::from(self.hash_size * self.hash_size).max(1);
        let average = total / count;

        let bytes = pack_bits(gray.pixels().map(|p| u64::from(p[0]) > average));

        Ok(ImageHashValue::new(bytes, HashAlgorithmKind::Average))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::PerceptualHash;
    use image::{ImageBuffer, Rgb};

    fn half_and_half(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([20, 20, 20])
            } else {
                Rgb([230, 230, 230])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn rescaled_copy_lands_in_same_bucket() {
        let hasher = AverageHasher::new(8);

        let large = hasher.hash_image(&half_and_half(800, 600)).unwrap();
        let small = hasher.hash_image(&half_and_half(640, 480)).unwrap();

        assert_eq!(large, small);
    }

    #[test]
    fn hash_is_64_bits_at_size_8() {
        let hasher = AverageHasher::new(8);
        let hash = hasher.hash_image(&half_and_half(100, 100)).unwrap();
        assert_eq!(hash.as_bytes().len(), 8);
    }

    #[test]
    fn kind_returns_average() {
        assert_eq!(AverageHasher::new(8).kind(), HashAlgorithmKind::Average);
    }
}
