//! # Quarantine Module
//!
//! Makes duplicate resolution reversible.
//!
//! ## Relocating a pair
//! 1. The quarantine directory is created on the first real relocation
//! 2. The keeper is linked (or copied) in as `<tag>_KEPT_<name>` and stays
//!    in place
//! 3. The discarded file is renamed in as `<tag>_GONE_<name>`
//!
//! The keeper goes first so that a failure never loses it. If the move then
//! fails, the quarantine holds a spare copy of the keeper and the discarded
//! file is still in its original place.
//!
//! ## Undo
//! `KEPT` entries are deleted, `GONE` entries are renamed back into the run
//! root, and the emptied directory is removed. Files always return to the
//! run root: the name does not record sub-directories, so files discarded
//! from nested directories during a recursive run come back flat.

mod naming;
mod relocate;
mod undo;

pub use naming::{
    pair_tag, quarantine_file_name, Disposition, QuarantineName, DEFAULT_QUARANTINE_DIR,
    PAIR_TAG_LEN,
};
pub use undo::UndoReport;

use crate::error::RelocateError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the two files of a resolved pair end up in quarantine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub tag: String,
    /// Quarantined copy of the keeper
    pub kept_copy: PathBuf,
    /// New location of the discarded file
    pub discarded_to: PathBuf,
}

/// The reversible holding area for resolved duplicates
#[derive(Debug)]
pub struct Quarantine {
    /// The quarantine directory itself
    dir: PathBuf,
    /// Directory discarded files are restored into
    restore_root: PathBuf,
    /// Set once the directory is known to exist
    ready: bool,
}

impl Quarantine {
    /// Quarantine at `root/dir_name`, restoring into `root`
    pub fn new(root: &Path, dir_name: &str) -> Self {
        Self {
            dir: root.join(dir_name),
            restore_root: root.to_path_buf(),
            ready: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the quarantine directory if it does not exist yet.
    ///
    /// An existing directory, including one left over from an earlier
    /// aborted run, is used as-is.
    pub fn ensure_dir(&mut self) -> Result<(), RelocateError> {
        if self.ready {
            return Ok(());
        }

        match fs::create_dir(&self.dir) {
            Ok(()) => info!("Created quarantine directory {}", self.dir.display()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && self.dir.is_dir() => {
                debug!("Reusing quarantine directory {}", self.dir.display())
            }
            Err(source) => {
                return Err(RelocateError::QuarantineUnavailable {
                    path: self.dir.clone(),
                    source,
                })
            }
        }

        self.ready = true;
        Ok(())
    }

    /// Compute where a pair would be placed, without touching the filesystem
    pub fn plan(
        &self,
        keeper: &Path,
        discarded: &Path,
        tag: &str,
    ) -> Result<Relocation, RelocateError> {
        let entry = |disposition, path: &Path| {
            quarantine_file_name(tag, disposition, path)
                .map(|name| self.dir.join(name))
                .ok_or_else(|| RelocateError::MissingFileName {
                    path: path.to_path_buf(),
                })
        };

        Ok(Relocation {
            tag: tag.to_string(),
            kept_copy: entry(Disposition::Kept, keeper)?,
            discarded_to: entry(Disposition::Discarded, discarded)?,
        })
    }

    /// Copy the keeper in, then move the discarded file in.
    pub fn relocate(
        &mut self,
        keeper: &Path,
        discarded: &Path,
        tag: &str,
    ) -> Result<Relocation, RelocateError> {
        let relocation = self.plan(keeper, discarded, tag)?;
        self.ensure_dir()?;

        // Refuse before anything is written so a clash leaves no stray copy
        if relocation.discarded_to.exists() {
            return Err(RelocateError::DestinationExists {
                path: relocation.discarded_to.clone(),
            });
        }

        relocate::link_or_copy(keeper, &relocation.kept_copy)?;
        debug!(
            "Copied keeper {} to {}",
            keeper.display(),
            relocation.kept_copy.display()
        );

        relocate::move_file(discarded, &relocation.discarded_to)?;
        info!(
            "Moved {} to {}",
            discarded.display(),
            relocation.discarded_to.display()
        );

        Ok(relocation)
    }
}
