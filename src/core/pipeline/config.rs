//! Run configuration.

use crate::core::hasher::{HashAlgorithmKind, SCORE_BASELINE};
use crate::core::quarantine::DEFAULT_QUARANTINE_DIR;
use crate::error::DedupError;
use std::path::{Component, Path, PathBuf};

/// Sensitivity used when none is given: only identical perceptual
/// fingerprints match
pub const DEFAULT_SENSITIVITY: i32 = 0;

/// Everything a single run needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory to deduplicate; also where undo restores files
    pub root: PathBuf,
    pub algorithm: HashAlgorithmKind,
    /// Score ceiling for the distance-scored family, before the baseline
    /// shift. Lower is stricter and may be negative.
    pub sensitivity: i32,
    pub dry_run: bool,
    pub recursive: bool,
    pub include_hidden: bool,
    /// Name of the quarantine directory inside `root`
    pub quarantine_dir: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            algorithm: HashAlgorithmKind::Average,
            sensitivity: DEFAULT_SENSITIVITY,
            dry_run: false,
            recursive: false,
            include_hidden: false,
            quarantine_dir: DEFAULT_QUARANTINE_DIR.to_string(),
        }
    }
}

impl RunConfig {
    /// Threshold handed to the scored index: sensitivity shifted onto the
    /// fingerprint score scale
    pub fn effective_threshold(&self) -> i64 {
        i64::from(self.sensitivity) + SCORE_BASELINE
    }

    /// Full path of the quarantine directory
    pub fn quarantine_path(&self) -> PathBuf {
        self.root.join(&self.quarantine_dir)
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        validate_quarantine_name(&self.quarantine_dir)
    }
}

/// The quarantine must be a single plain directory name inside the root
pub(crate) fn validate_quarantine_name(name: &str) -> Result<(), DedupError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(DedupError::Config(format!(
            "quarantine directory must be a plain name, got {:?}",
            name
        ))),
    }
}
