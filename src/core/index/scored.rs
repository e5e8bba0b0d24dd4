//! Distance-scored index: linear scan for the best-scoring candidate.

use super::{ImageRecord, MatchResult, SimilarityIndex};
use crate::core::hasher::ScoredFingerprint;
use std::path::Path;

/// Scans every indexed fingerprint and accepts the lowest score only if it
/// is at or below the sensitivity threshold.
///
/// When several candidates share the lowest score, the one inserted first
/// wins. Which file that is depends on enumeration order, so the winner of
/// an exact tie is not stable across differently ordered runs.
#[derive(Debug)]
pub struct ScoredIndex<F> {
    entries: Vec<(ImageRecord, F)>,
    threshold: i64,
}

impl<F: ScoredFingerprint> ScoredIndex<F> {
    /// Create an index accepting matches with `score <= threshold`.
    ///
    /// A threshold below every attainable score disables fuzzy matching
    /// while keeping the family active.
    pub fn new(threshold: i64) -> Self {
        Self {
            entries: Vec::new(),
            threshold,
        }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }
}

impl<F: ScoredFingerprint> SimilarityIndex for ScoredIndex<F> {
    type Fingerprint = F;

    fn add(&mut self, record: ImageRecord, fingerprint: F) {
        self.entries.push((record, fingerprint));
    }

    fn delete(&mut self, path: &Path, _fingerprint: &F) {
        self.entries.retain(|(record, _)| record.path != path);
    }

    fn query(&self, fingerprint: &F) -> MatchResult {
        let mut best: Option<(&ImageRecord, i64)> = None;

        for (record, candidate) in &self.entries {
            let score = fingerprint.score(candidate);
            // Strict comparison keeps the first of equal scores
            let better = match best {
                Some((_, best_score)) => score < best_score,
                None => true,
            };
            if better {
                best = Some((record, score));
            }
        }

        match best {
            Some((record, score)) if score <= self.threshold => MatchResult::Match {
                record: record.clone(),
                score: Some(score),
            },
            _ => MatchResult::NoMatch,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Points on a line, scored by absolute difference
    #[derive(Debug, Clone, Copy)]
    struct Point(i64);

    impl ScoredFingerprint for Point {
        fn score(&self, other: &Self) -> i64 {
            (self.0 - other.0).abs()
        }
    }

    fn record(path: &str) -> ImageRecord {
        ImageRecord::new(PathBuf::from(path), 100)
    }

    fn matched_path(result: &MatchResult) -> Option<PathBuf> {
        result.record().map(|r| r.path.clone())
    }

    #[test]
    fn empty_index_never_matches() {
        let index: ScoredIndex<Point> = ScoredIndex::new(1_000);
        assert!(!index.query(&Point(0)).is_match());
    }

    #[test]
    fn returns_minimum_score_candidate() {
        let mut index = ScoredIndex::new(10);
        index.add(record("/far.jpg"), Point(9));
        index.add(record("/near.jpg"), Point(2));
        index.add(record("/mid.jpg"), Point(5));

        let result = index.query(&Point(0));
        assert_eq!(matched_path(&result), Some(PathBuf::from("/near.jpg")));
        assert_eq!(result.score(), Some(2));
    }

    #[test]
    fn rejects_best_candidate_above_threshold() {
        let mut index = ScoredIndex::new(3);
        index.add(record("/a.jpg"), Point(10));
        index.add(record("/b.jpg"), Point(4));

        assert!(!index.query(&Point(0)).is_match());
    }

    #[test]
    fn accepts_score_equal_to_threshold() {
        let mut index = ScoredIndex::new(4);
        index.add(record("/b.jpg"), Point(4));

        assert!(index.query(&Point(0)).is_match());
    }

    #[test]
    fn negative_threshold_rejects_identical() {
        let mut index = ScoredIndex::new(-1);
        index.add(record("/a.jpg"), Point(0));

        assert!(!index.query(&Point(0)).is_match());
    }

    #[test]
    fn exact_tie_returns_one_of_the_tied_candidates() {
        let mut index = ScoredIndex::new(10);
        index.add(record("/left.jpg"), Point(-3));
        index.add(record("/right.jpg"), Point(3));
        index.add(record("/far.jpg"), Point(8));

        let result = index.query(&Point(0));
        let path = matched_path(&result).unwrap();
        assert!(path == Path::new("/left.jpg") || path == Path::new("/right.jpg"));
        assert_eq!(result.score(), Some(3));
    }

    #[test]
    fn delete_removes_by_path() {
        let mut index = ScoredIndex::new(10);
        index.add(record("/a.jpg"), Point(1));
        index.add(record("/b.jpg"), Point(50));
        index.delete(Path::new("/a.jpg"), &Point(1));

        assert_eq!(index.len(), 1);
        assert!(!index.query(&Point(0)).is_match());
    }

    #[test]
    fn delete_of_absent_entry_is_noop() {
        let mut index = ScoredIndex::new(10);
        index.add(record("/a.jpg"), Point(1));
        index.delete(Path::new("/missing.jpg"), &Point(1));

        assert_eq!(index.len(), 1);
    }
}
