//! Trait definitions for perceptual fingerprints.

use super::decode::decode_image;
use crate::error::HashError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Score of two identical fingerprints in the distance-scored family.
///
/// Sensitivity values are shifted by the same amount, so a configured
/// sensitivity of 0 accepts only identical fingerprints.
pub const SCORE_BASELINE: i64 = -100;

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Clone + Send + Sync {
    /// Compute the Hamming distance to another hash
    ///
    /// Returns the number of bits that differ between the two hashes.
    /// Lower distance = more similar images.
    fn distance(&self, other: &Self) -> u32;

    /// Get the raw hash bytes
    fn as_bytes(&self) -> &[u8];

}

/// Fingerprints that can be ranked against each other by a signed score.
///
/// Lower scores are better matches. The score may be negative.
pub trait ScoredFingerprint: Send + Sync {
    fn score(&self, other: &Self) -> i64;
}

/// How fingerprints of an algorithm are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FingerprintFamily {
    /// Compared by equality only; used as map keys
    ExactBucket,
    /// Compared by score against a sensitivity ceiling
    DistanceScored,
}

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithmKind {
    /// Average Hash (aHash) - Fast, exact buckets
    Average,
    /// Difference Hash (dHash) - Exact buckets on brightness gradients
    Difference,
    /// Perceptual Hash - Scored, tolerant of re-encoding and small edits
    Perceptual,
}

impl HashAlgorithmKind {
    /// The comparison family this algorithm belongs to
    pub fn family(&self) -> FingerprintFamily {
        match self {
            HashAlgorithmKind::Average | HashAlgorithmKind::Difference => {
                FingerprintFamily::ExactBucket
            }
            HashAlgorithmKind::Perceptual => FingerprintFamily::DistanceScored,
        }
    }

    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Average => {
                "Average Hash (aHash) - identical fingerprints only, based on average brightness"
            }
            HashAlgorithmKind::Difference => {
                "Difference Hash (dHash) - identical fingerprints only, based on brightness gradients"
            }
            HashAlgorithmKind::Perceptual => {
                "Perceptual Hash - scored matching, controlled by the sensitivity setting"
            }
        }
    }
}

impl std::fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
        }
    }
}

/// A decoded and fingerprinted image, ready for resolution
#[derive(Debug, Clone)]
pub struct ObservedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fingerprint: ImageHashValue,
}

impl ObservedImage {
    /// Pixel area, used as the quality proxy
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a hash from an already-loaded image
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError>;

    /// Decode a file and fingerprint it.
    fn observe(&self, path: &Path) -> Result<ObservedImage, HashError> {
        let image = decode_image(path)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(HashError::EmptyImage {
                path: path.to_path_buf(),
            });
        }
        let fingerprint = self.hash_image(&image)?;

        Ok(ObservedImage {
            path: path.to_path_buf(),
            width: image.width(),
            height: image.height(),
            fingerprint,
        })
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}

/// Concrete hash value type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHashValue {
    /// The raw hash bytes
    bytes: Vec<u8>,
    /// The algorithm that produced this hash
    algorithm: HashAlgorithmKind,
}

impl ImageHashValue {
    /// Create a new hash value
    pub fn new(bytes: Vec<u8>, algorithm: HashAlgorithmKind) -> Self {
        Self { bytes, algorithm }
    }

    /// Get the algorithm that produced this hash
    pub fn algorithm(&self) -> HashAlgorithmKind {
        self.algorithm
    }
}

impl PerceptualHash for ImageHashValue {
    fn distance(&self, other: &Self) -> u32 {
        // Hamming distance: count differing bits
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl ScoredFingerprint for ImageHashValue {
    fn score(&self, other: &Self) -> i64 {
        // Hashes from different algorithms or sizes are never comparable
        if self.algorithm != other.algorithm || self.bytes.len() != other.bytes.len() {
            return i64::MAX;
        }
        i64::from(self.distance(other)) + SCORE_BASELINE
    }
}
