//! Reversing a quarantine.

use super::{Disposition, Quarantine, QuarantineName};
use crate::error::UndoError;
use crate::events::{Event, EventSender, UndoEvent};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of an undo run
#[derive(Debug, Default, Serialize)]
pub struct UndoReport {
    /// Kept copies deleted (or that would be, in a dry run)
    pub removed: Vec<PathBuf>,
    /// Discarded files moved back, as (from, to)
    pub restored: Vec<(PathBuf, PathBuf)>,
    /// Per-file failures; undo continues past each of them
    #[serde(skip)]
    pub errors: Vec<UndoError>,
    /// Whether the quarantine directory was removed at the end
    pub directory_removed: bool,
    pub dry_run: bool,
}

impl Quarantine {
    /// Undo every resolution recorded in the quarantine directory.
    ///
    /// Only a missing or unreadable directory is an error; everything else
    /// is collected into the report. In a dry run nothing is changed.
    pub fn undo(&self, dry_run: bool, events: &EventSender) -> Result<UndoReport, UndoError> {
        if !self.dir.is_dir() {
            return Err(UndoError::QuarantineMissing {
                path: self.dir.clone(),
            });
        }

        let read_error = |source| UndoError::ReadQuarantine {
            path: self.dir.clone(),
            source,
        };
        let mut entries = fs::read_dir(&self.dir)
            .map_err(read_error)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;
        entries.sort();

        events.send(Event::Undo(UndoEvent::Started {
            dir: self.dir.clone(),
            entries: entries.len(),
        }));

        let mut report = UndoReport {
            dry_run,
            ..UndoReport::default()
        };

        for path in entries {
            let parsed = path
                .file_name()
                .and_then(QuarantineName::parse)
                .filter(|_| path.is_file());

            let result = match parsed {
                Some(name) => match name.disposition {
                    Disposition::Kept => self.remove_kept(path, dry_run, &mut report),
                    Disposition::Discarded => {
                        self.restore_discarded(path, &name.original, dry_run, &mut report)
                    }
                },
                None => Err(UndoError::UnrecognizedEntry { path }),
            };

            if let Err(error) = result {
                warn!("{}", error);
                events.send(Event::Undo(UndoEvent::Error {
                    message: error.to_string(),
                }));
                report.errors.push(error);
            }
        }

        if dry_run {
            info!("Would remove directory {}", self.dir.display());
        } else {
            match fs::remove_dir(&self.dir) {
                Ok(()) => {
                    info!("Removed quarantine directory {}", self.dir.display());
                    report.directory_removed = true;
                }
                Err(source) => {
                    let error = UndoError::RemoveQuarantine {
                        path: self.dir.clone(),
                        source,
                    };
                    warn!("{}", error);
                    events.send(Event::Undo(UndoEvent::Error {
                        message: error.to_string(),
                    }));
                    report.errors.push(error);
                }
            }
        }

        events.send(Event::Undo(UndoEvent::Completed {
            removed: report.removed.len(),
            restored: report.restored.len(),
            errors: report.errors.len(),
        }));

        Ok(report)
    }

    fn remove_kept(
        &self,
        path: PathBuf,
        dry_run: bool,
        report: &mut UndoReport,
    ) -> Result<(), UndoError> {
        if dry_run {
            info!("Would remove {}", path.display());
        } else {
            fs::remove_file(&path).map_err(|source| UndoError::RemoveKept {
                path: path.clone(),
                source,
            })?;
            info!("Removed {}", path.display());
        }
        report.removed.push(path);
        Ok(())
    }

    fn restore_discarded(
        &self,
        path: PathBuf,
        original: &OsStr,
        dry_run: bool,
        report: &mut UndoReport,
    ) -> Result<(), UndoError> {
        let target = self.restore_root.join(original);
        if target.exists() {
            return Err(UndoError::RestoreTargetExists { path: target });
        }

        if dry_run {
            info!("Would move {} to {}", path.display(), target.display());
        } else {
            fs::rename(&path, &target).map_err(|source| UndoError::Restore {
                from: path.clone(),
                to: target.clone(),
                source,
            })?;
            info!("Restored {} to {}", path.display(), target.display());
        }
        report.restored.push((path, target));
        Ok(())
    }
}
