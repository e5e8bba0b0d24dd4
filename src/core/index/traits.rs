//! Similarity index trait definition.

use super::{ImageRecord, MatchResult};
use std::path::Path;

/// Holds the fingerprints of surviving images and answers nearest-match
/// queries under a family-specific acceptance rule.
///
/// The index performs no internal locking. A query followed by the
/// add/delete that acts on its answer must run as one exclusive section.
pub trait SimilarityIndex: Send {
    /// Fingerprint type of the active family
    type Fingerprint;

    /// Insert a record under a fingerprint.
    ///
    /// Exact-bucket indexes overwrite any record already stored under an
    /// equal fingerprint (last write wins).
    fn add(&mut self, record: ImageRecord, fingerprint: Self::Fingerprint);

    /// Remove the record for `path`. Absent entries are ignored.
    fn delete(&mut self, path: &Path, fingerprint: &Self::Fingerprint);

    /// Find the best accepted match for a fingerprint
    fn query(&self, fingerprint: &Self::Fingerprint) -> MatchResult;

    /// Number of indexed records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
