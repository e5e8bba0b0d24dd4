//! # Index Module
//!
//! The similarity index: one record per surviving image, queried with the
//! fingerprint of each newly observed image.
//!
//! ## Variants
//! | Family          | Index         | Query                       |
//! |-----------------|---------------|-----------------------------|
//! | Exact bucket    | `ExactIndex`  | O(1) equality lookup        |
//! | Distance scored | `ScoredIndex` | O(n) scan, `score <= limit` |
//!
//! The variant is chosen once per run by [`build_index`]; the resolver only
//! sees the [`SimilarityIndex`] trait.

mod exact;
mod scored;
mod traits;

pub use exact::ExactIndex;
pub use scored::ScoredIndex;
pub use traits::SimilarityIndex;

use crate::core::hasher::{FingerprintFamily, ImageHashValue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A surviving, non-quarantined image held by the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Current location of the file
    pub path: PathBuf,
    /// Width x height, the quality proxy
    pub area: u64,
}

impl ImageRecord {
    pub fn new(path: PathBuf, area: u64) -> Self {
        Self { path, area }
    }
}

/// Answer to an index query. A `Match` has already passed the family's
/// acceptance rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    NoMatch,
    Match {
        record: ImageRecord,
        /// Score of the match (distance-scored family only)
        score: Option<i64>,
    },
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match { .. })
    }

    pub fn record(&self) -> Option<&ImageRecord> {
        match self {
            MatchResult::Match { record, .. } => Some(record),
            MatchResult::NoMatch => None,
        }
    }

    pub fn score(&self) -> Option<i64> {
        match self {
            MatchResult::Match { score, .. } => *score,
            MatchResult::NoMatch => None,
        }
    }
}

/// The index used by a run, over the crate's fingerprint type
pub type DynIndex = Box<dyn SimilarityIndex<Fingerprint = ImageHashValue>>;

/// Build the index variant for a fingerprint family.
///
/// `threshold` only applies to the distance-scored family.
pub fn build_index(family: FingerprintFamily, threshold: i64) -> DynIndex {
    match family {
        FingerprintFamily::ExactBucket => Box::new(ExactIndex::<ImageHashValue>::new()),
        FingerprintFamily::DistanceScored => {
            Box::new(ScoredIndex::<ImageHashValue>::new(threshold))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::{HashAlgorithmKind, SCORE_BASELINE};
    use crate::core::pipeline::RunConfig;
    use std::path::Path;

    fn hash(bytes: &[u8], kind: HashAlgorithmKind) -> ImageHashValue {
        ImageHashValue::new(bytes.to_vec(), kind)
    }

    #[test]
    fn exact_family_ignores_threshold() {
        let mut index = build_index(FingerprintFamily::ExactBucket, -1_000);
        index.add(
            ImageRecord::new(PathBuf::from("/a.jpg"), 10),
            hash(&[1, 2], HashAlgorithmKind::Average),
        );

        assert!(index
            .query(&hash(&[1, 2], HashAlgorithmKind::Average))
            .is_match());
        assert!(!index
            .query(&hash(&[1, 3], HashAlgorithmKind::Average))
            .is_match());
    }

    #[test]
    fn scored_family_applies_threshold() {
        let mut index = build_index(FingerprintFamily::DistanceScored, SCORE_BASELINE + 1);
        index.add(
            ImageRecord::new(PathBuf::from("/a.jpg"), 10),
            hash(&[0b0000_0000], HashAlgorithmKind::Perceptual),
        );

        // One bit away is accepted, two bits are not
        assert!(index
            .query(&hash(&[0b0000_0001], HashAlgorithmKind::Perceptual))
            .is_match());
        assert!(!index
            .query(&hash(&[0b0000_0011], HashAlgorithmKind::Perceptual))
            .is_match());

        index.delete(
            Path::new("/a.jpg"),
            &hash(&[0], HashAlgorithmKind::Perceptual),
        );
        assert!(index.is_empty());
    }

    /// 256-bit perceptual fingerprint with the first `bits` bits set
    fn perceptual_with_bits(bits: usize) -> ImageHashValue {
        let mut bytes = vec![0u8; 32];
        for bit in 0..bits {
            bytes[bit / 8] |= 0x80 >> (bit % 8);
        }
        hash(&bytes, HashAlgorithmKind::Perceptual)
    }

    #[test]
    fn configured_sensitivity_accepts_close_and_rejects_far() {
        let threshold = RunConfig {
            sensitivity: 5,
            ..Default::default()
        }
        .effective_threshold();
        assert_eq!(threshold, -95);

        let mut index = build_index(FingerprintFamily::DistanceScored, threshold);
        index.add(
            ImageRecord::new(PathBuf::from("/a.jpg"), 10),
            perceptual_with_bits(0),
        );

        let close = index.query(&perceptual_with_bits(3));
        assert_eq!(close.score(), Some(-97));
        assert_eq!(close.record().map(|r| r.path.clone()), Some(PathBuf::from("/a.jpg")));

        assert!(!index.query(&perceptual_with_bits(120)).is_match());
    }

    #[test]
    fn match_result_accessors() {
        let result = MatchResult::Match {
            record: ImageRecord::new(PathBuf::from("/a.jpg"), 4),
            score: Some(-98),
        };
        assert!(result.is_match());
        assert_eq!(result.record().map(|r| r.area), Some(4));
        assert_eq!(result.score(), Some(-98));
        assert_eq!(MatchResult::NoMatch.record(), None);
    }
}
