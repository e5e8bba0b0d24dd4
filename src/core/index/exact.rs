//! Exact-bucket index: fingerprints are map keys.

use super::{ImageRecord, MatchResult, SimilarityIndex};
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

/// O(1) lookup by fingerprint equality; every hit is accepted.
#[derive(Debug)]
pub struct ExactIndex<F> {
    buckets: HashMap<F, ImageRecord>,
}

impl<F: Eq + Hash> ExactIndex<F> {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }
}

impl<F: Eq + Hash> Default for ExactIndex<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Eq + Hash + Send> SimilarityIndex for ExactIndex<F> {
    type Fingerprint = F;

    fn add(&mut self, record: ImageRecord, fingerprint: F) {
        self.buckets.insert(fingerprint, record);
    }

    fn delete(&mut self, path: &Path, fingerprint: &F) {
        // The bucket may already have been taken over by another file
        let owned = self
            .buckets
            .get(fingerprint)
            .is_some_and(|record| record.path == path);
        if owned {
            self.buckets.remove(fingerprint);
        }
    }

    fn query(&self, fingerprint: &F) -> MatchResult {
        match self.buckets.get(fingerprint) {
            Some(record) => MatchResult::Match {
                record: record.clone(),
                score: None,
            },
            None => MatchResult::NoMatch,
        }
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }
}
