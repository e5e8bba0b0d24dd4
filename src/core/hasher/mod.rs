//! # Hasher Module
//!
//! The fingerprint provider: decodes image files and computes perceptual
//! fingerprints.
//!
//! ## Families
//! - **Exact bucket** - aHash and dHash; fingerprints are map keys and only
//!   identical fingerprints match
//! - **Distance scored** - DCT perceptual hash; fingerprints are ranked by
//!   score and accepted under a sensitivity ceiling
//!
//! One family is active per run. Fingerprints from different algorithms
//! are never comparable.
//!
//! ## Example
//! ```rust,ignore
//! use image_dedup::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Perceptual)
//!     .build();
//!
//! let observed = hasher.observe(&path)?;
//! ```

mod algorithms;
pub mod decode;
mod traits;

pub use algorithms::{AverageHasher, DifferenceHasher, PerceptualHasher};
pub use traits::{
    FingerprintFamily, HashAlgorithm, HashAlgorithmKind, ImageHashValue, ObservedImage,
    PerceptualHash, ScoredFingerprint, SCORE_BASELINE,
};

/// Grid size of the exact-bucket hashes (64 bits)
const EXACT_HASH_SIZE: u32 = 8;

/// Grid size of the scored hash (256 bits)
const SCORED_HASH_SIZE: u32 = 16;

/// Configuration builder for hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self {
            algorithm: HashAlgorithmKind::Average,
        }
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Box<dyn HashAlgorithm> {
        match self.algorithm {
            HashAlgorithmKind::Average => {
                Box::new(AverageHasher::new(EXACT_HASH_SIZE))
            }
            HashAlgorithmKind::Difference => {
                Box::new(DifferenceHasher::new(EXACT_HASH_SIZE))
            }
            HashAlgorithmKind::Perceptual => {
                Box::new(PerceptualHasher::new(SCORED_HASH_SIZE))
            }
        }
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}
