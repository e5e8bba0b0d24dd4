//! # Resolver Module
//!
//! Decides which file of a duplicate pair survives and hands the pair to
//! the quarantine.
//!
//! ## Policy
//! - Larger pixel area wins
//! - On equal area the file that was indexed first wins: a newcomer must be
//!   strictly larger to displace it
//!
//! ## Dry run
//! Nothing on disk changes. Every observation is still added to the index
//! so later files in the run are compared the same way, and no record is
//! ever removed.

use crate::core::hasher::ObservedImage;
use crate::core::index::{DynIndex, ImageRecord, MatchResult};
use crate::core::quarantine::{pair_tag, Quarantine, Relocation};
use crate::error::RelocateError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which side of a pair was kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// The previously indexed file
    Existing,
    /// The newly observed file
    Incoming,
}

/// A resolved (or, in a dry run, reported) duplicate pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub keeper: ImageRecord,
    pub discarded: ImageRecord,
    pub winner: Winner,
    /// Match score, for the distance-scored family
    pub score: Option<i64>,
    /// Quarantine placement (planned only, in a dry run)
    pub relocation: Relocation,
    /// Whether the files were actually moved
    pub applied: bool,
}

/// Result of resolving one observed image
#[derive(Debug, Clone)]
pub enum Resolution {
    /// No accepted match; the image is now indexed
    Unique(ImageRecord),
    Duplicate(DuplicatePair),
}

/// Pick the keeper. Ties go to the existing record.
pub fn choose_winner(incoming: &ImageRecord, existing: &ImageRecord) -> Winner {
    if incoming.area > existing.area {
        Winner::Incoming
    } else {
        Winner::Existing
    }
}

/// Owns the similarity index and the quarantine for one run.
///
/// Single-threaded by construction: `resolve` takes `&mut self`, so a query
/// and the index update that follows it can never interleave with another
/// file's resolution.
pub struct Resolver {
    index: DynIndex,
    quarantine: Quarantine,
    dry_run: bool,
}

impl Resolver {
    pub fn new(index: DynIndex, quarantine: Quarantine, dry_run: bool) -> Self {
        Self {
            index,
            quarantine,
            dry_run,
        }
    }

    /// Number of records currently indexed
    pub fn indexed(&self) -> usize {
        self.index.len()
    }

    pub fn quarantine(&self) -> &Quarantine {
        &self.quarantine
    }

    /// Resolve one observed image against everything seen so far.
    ///
    /// The index is updated before any file is touched, so a relocation
    /// error leaves the index describing the keeper only.
    pub fn resolve(&mut self, observed: &ObservedImage) -> Result<Resolution, RelocateError> {
        let incoming = ImageRecord::new(observed.path.clone(), observed.area());
        let fingerprint = &observed.fingerprint;

        let (existing, score) = match self.index.query(fingerprint) {
            MatchResult::NoMatch => {
                debug!("{} is unique", incoming.path.display());
                self.index.add(incoming.clone(), fingerprint.clone());
                return Ok(Resolution::Unique(incoming));
            }
            MatchResult::Match { record, score } => (record, score),
        };

        info!(
            "{} matches {}",
            incoming.path.display(),
            existing.path.display()
        );

        let tag = pair_tag(&incoming.path, &existing.path);
        let winner = choose_winner(&incoming, &existing);
        let (keeper, discarded) = match winner {
            Winner::Incoming => (incoming.clone(), existing.clone()),
            Winner::Existing => (existing.clone(), incoming.clone()),
        };

        if self.dry_run {
            self.index.add(incoming, fingerprint.clone());
            let relocation = self.quarantine.plan(&keeper.path, &discarded.path, &tag)?;
            return Ok(Resolution::Duplicate(DuplicatePair {
                keeper,
                discarded,
                winner,
                score,
                relocation,
                applied: false,
            }));
        }

        if winner == Winner::Incoming {
            self.index.delete(&existing.path, fingerprint);
            self.index.add(incoming, fingerprint.clone());
        }

        let relocation = self
            .quarantine
            .relocate(&keeper.path, &discarded.path, &tag)?;

        Ok(Resolution::Duplicate(DuplicatePair {
            keeper,
            discarded,
            winner,
            score,
            relocation,
            applied: true,
        }))
    }
}
