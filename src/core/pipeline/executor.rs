//! Pipeline execution implementation.

use super::config::{validate_quarantine_name, RunConfig};
use crate::core::hasher::{HashAlgorithmKind, HasherConfig, ObservedImage};
use crate::core::index::build_index;
use crate::core::quarantine::{Quarantine, UndoReport};
use crate::core::resolver::{DuplicatePair, Resolution, Resolver};
use crate::core::scanner::{PhotoScanner, ScanConfig, WalkDirScanner};
use crate::error::{DedupError, HashError, UndoError};
use crate::events::{
    null_sender, Event, EventSender, HashEvent, HashProgress, PipelineEvent, PipelinePhase,
    PipelineSummary, ResolveEvent,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// A file that could not be decoded or fingerprinted
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// A duplicate whose relocation failed; the files may be inconsistent
#[derive(Debug, Clone, Serialize)]
pub struct FailedResolution {
    pub path: PathBuf,
    pub message: String,
}

/// Result of a run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    /// Candidates found by the scanner
    pub files_scanned: usize,
    /// Records left in the index at the end
    pub images_indexed: usize,
    /// Resolved pairs, or reported ones in a dry run
    pub pairs: Vec<DuplicatePair>,
    pub failed: Vec<FailedResolution>,
    pub skipped: Vec<SkippedFile>,
    /// Every non-fatal problem, as text
    pub errors: Vec<String>,
    pub duration_ms: u64,
    pub dry_run: bool,
}

/// Builder for a [`Pipeline`]
pub struct PipelineBuilder {
    config: RunConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
        }
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Score ceiling for the perceptual family (lower is stricter)
    pub fn sensitivity(mut self, sensitivity: i32) -> Self {
        self.config.sensitivity = sensitivity;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.recursive = recursive;
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.include_hidden = include;
        self
    }

    pub fn quarantine_dir(mut self, name: impl Into<String>) -> Self {
        self.config.quarantine_dir = name.into();
        self
    }

    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One deduplication run over a directory
pub struct Pipeline {
    config: RunConfig,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, DedupError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Only a missing root or an unusable quarantine directory fail the
    /// run; every other problem is recorded per file.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, DedupError> {
        let start_time = Instant::now();
        self.config.validate()?;

        let mut result = PipelineResult {
            files_scanned: 0,
            images_indexed: 0,
            pairs: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            duration_ms: 0,
            dry_run: self.config.dry_run,
        };

        info!(
            "Deduplicating {} with {} (dry run: {})",
            self.config.root.display(),
            self.config.algorithm,
            self.config.dry_run
        );
        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = WalkDirScanner::new(ScanConfig {
            recursive: self.config.recursive,
            include_hidden: self.config.include_hidden,
            follow_symlinks: false,
            skip_dir: Some(self.config.quarantine_path()),
        });
        let scan_result = scanner.scan_with_events(&self.config.root, events)?;
        result
            .errors
            .extend(scan_result.errors.iter().map(ToString::to_string));
        let photos = scan_result.photos;
        result.files_scanned = photos.len();

        // Phase 2: Hashing
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Hashing,
        }));
        events.send(Event::Hash(HashEvent::Started {
            total_photos: photos.len(),
        }));

        let hasher = HasherConfig::new()
            .algorithm(self.config.algorithm)
            .build();
        let completed = AtomicUsize::new(0);
        let total = photos.len();

        let observations: Vec<Result<ObservedImage, HashError>> = photos
            .par_iter()
            .map(|photo| {
                let observed = hasher.observe(&photo.path);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if !events.is_listening() {
                    return observed;
                }
                match &observed {
                    Ok(_) => events.send(Event::Hash(HashEvent::Progress(HashProgress {
                        completed: done,
                        total,
                        current_path: photo.path.clone(),
                    }))),
                    Err(e) => events.send(Event::Hash(HashEvent::Error {
                        path: photo.path.clone(),
                        message: e.to_string(),
                    })),
                }
                observed
            })
            .collect();

        let mut observed = Vec::with_capacity(observations.len());
        for (photo, observation) in photos.iter().zip(observations) {
            match observation {
                Ok(image) => observed.push(image),
                Err(e) => {
                    warn!("Skipping {}: {}", photo.path.display(), e);
                    result.errors.push(e.to_string());
                    result.skipped.push(SkippedFile {
                        path: photo.path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        events.send(Event::Hash(HashEvent::Completed {
            total_hashed: observed.len(),
        }));

        // Phase 3: Resolving
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Resolving,
        }));

        let mut resolver = Resolver::new(
            build_index(
                self.config.algorithm.family(),
                self.config.effective_threshold(),
            ),
            Quarantine::new(&self.config.root, &self.config.quarantine_dir),
            self.config.dry_run,
        );

        for image in &observed {
            match resolver.resolve(image) {
                Ok(Resolution::Unique(record)) => {
                    events.send(Event::Resolve(ResolveEvent::Unique { path: record.path }));
                }
                Ok(Resolution::Duplicate(pair)) => {
                    events.send(Event::Resolve(ResolveEvent::Duplicate {
                        keeper: pair.keeper.path.clone(),
                        discarded: pair.discarded.path.clone(),
                        score: pair.score,
                        applied: pair.applied,
                    }));
                    result.pairs.push(pair);
                }
                Err(e) if e.is_fatal() => {
                    error!("Aborting run: {}", e);
                    events.send(Event::Pipeline(PipelineEvent::Error {
                        message: e.to_string(),
                    }));
                    return Err(e.into());
                }
                Err(e) => {
                    warn!("Could not resolve {}: {}", image.path.display(), e);
                    events.send(Event::Resolve(ResolveEvent::Error {
                        path: image.path.clone(),
                        message: e.to_string(),
                    }));
                    result.errors.push(e.to_string());
                    result.failed.push(FailedResolution {
                        path: image.path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        result.images_indexed = resolver.indexed();
        result.duration_ms = start_time.elapsed().as_millis() as u64;
        debug!(
            "Run finished: {} pairs, {} failed, {} skipped",
            result.pairs.len(),
            result.failed.len(),
            result.skipped.len()
        );

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_photos: result.files_scanned,
                images_indexed: result.images_indexed,
                duplicates: result.pairs.len(),
                relocation_failures: result.failed.len(),
                skipped: result.skipped.len(),
                duration_ms: result.duration_ms,
            },
        }));

        Ok(result)
    }
}

/// Undo the quarantine at `root/dir_name` without events
pub fn undo(root: &Path, dir_name: &str, dry_run: bool) -> Result<UndoReport, DedupError> {
    undo_with_events(root, dir_name, dry_run, &null_sender())
}

/// Undo the quarantine at `root/dir_name`, restoring discarded files into
/// `root`
pub fn undo_with_events(
    root: &Path,
    dir_name: &str,
    dry_run: bool,
    events: &EventSender,
) -> Result<UndoReport, DedupError> {
    validate_quarantine_name(dir_name)?;
    let quarantine = Quarantine::new(root, dir_name);
    info!(
        "Undoing {} (dry run: {})",
        quarantine.dir().display(),
        dry_run
    );

    quarantine.undo(dry_run, events).map_err(|e: UndoError| {
        events.send(Event::Pipeline(PipelineEvent::Error {
            message: e.to_string(),
        }));
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quarantine::DEFAULT_QUARANTINE_DIR;
    use crate::events::EventChannel;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    fn split(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([20, 20, 20])
            } else {
                Rgb([230, 230, 230])
            }
        })
    }

    fn save(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
        let path = dir.join(name);
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn pipeline_builder_sets_config() {
        let pipeline = Pipeline::builder()
            .root("/photos")
            .algorithm(HashAlgorithmKind::Perceptual)
            .sensitivity(5)
            .dry_run(true)
            .build();

        assert_eq!(pipeline.config().sensitivity, 5);
        assert_eq!(pipeline.config().effective_threshold(), -95);
        assert!(pipeline.config().dry_run);
    }

    #[test]
    fn pipeline_handles_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = Pipeline::builder().root(temp_dir.path()).build().run().unwrap();

        assert_eq!(result.files_scanned, 0);
        assert!(result.pairs.is_empty());
        assert!(!temp_dir.path().join(DEFAULT_QUARANTINE_DIR).exists());
    }

    #[test]
    fn missing_root_fails_the_run() {
        let result = Pipeline::builder().root("/nonexistent/12345").build().run();
        assert!(matches!(result, Err(DedupError::Scan(_))));
    }

    #[test]
    fn invalid_quarantine_name_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let result = Pipeline::builder()
            .root(temp_dir.path())
            .quarantine_dir("../elsewhere")
            .build()
            .run();
        assert!(matches!(result, Err(DedupError::Config(_))));
    }

    #[test]
    fn resized_copy_is_quarantined() {
        let temp_dir = TempDir::new().unwrap();
        let large = save(temp_dir.path(), "a.png", &split(80, 60));
        let small = save(temp_dir.path(), "b.png", &split(64, 48));

        let result = Pipeline::builder().root(temp_dir.path()).build().run().unwrap();

        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.images_indexed, 1);
        assert_eq!(result.pairs[0].keeper.path, large);
        assert!(large.exists());
        assert!(!small.exists());
    }

    #[test]
    fn undecodable_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.jpg"), b"not an image").unwrap();
        save(temp_dir.path(), "ok.png", &split(16, 16));

        let result = Pipeline::builder().root(temp_dir.path()).build().run().unwrap();

        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.skipped.len(), 1);
        assert!(result.skipped[0].path.ends_with("broken.jpg"));
        assert_eq!(result.images_indexed, 1);
    }

    #[test]
    fn quarantine_blocked_by_file_aborts_run() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(DEFAULT_QUARANTINE_DIR), b"in the way").unwrap();
        save(temp_dir.path(), "a.png", &split(80, 60));
        save(temp_dir.path(), "b.png", &split(64, 48));

        let result = Pipeline::builder().root(temp_dir.path()).build().run();

        assert!(matches!(result, Err(DedupError::Relocate(_))));
    }

    #[test]
    fn events_report_phases_and_summary() {
        let temp_dir = TempDir::new().unwrap();
        save(temp_dir.path(), "a.png", &split(80, 60));
        save(temp_dir.path(), "b.png", &split(64, 48));

        let (sender, receiver) = EventChannel::new();
        Pipeline::builder()
            .root(temp_dir.path())
            .dry_run(true)
            .build()
            .run_with_events(&sender)
            .unwrap();
        drop(sender);

        let events: Vec<Event> = receiver.iter().collect();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::Resolve(ResolveEvent::Duplicate { applied: false, .. })
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            Event::Pipeline(PipelineEvent::Completed { summary }) if summary.duplicates == 1
        )));
    }

    #[test]
    fn undo_without_quarantine_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = undo(temp_dir.path(), DEFAULT_QUARANTINE_DIR, false);
        assert!(matches!(
            result,
            Err(DedupError::Undo(UndoError::QuarantineMissing { .. }))
        ));
    }
}
