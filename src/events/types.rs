//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while scanning, resolving or undoing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Scan(ScanEvent),
    Hash(HashEvent),
    Resolve(ResolveEvent),
    Undo(UndoEvent),
    Pipeline(PipelineEvent),
}

/// Events while enumerating candidate files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    Started { root: PathBuf },
    PhotoFound { path: PathBuf },
    /// An entry could not be read; scanning continues
    Error { path: PathBuf, message: String },
    Completed { total_photos: usize },
}

/// Events while decoding and fingerprinting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    Started { total_photos: usize },
    Progress(HashProgress),
    /// The file was skipped
    Error { path: PathBuf, message: String },
    Completed { total_hashed: usize },
}

/// Progress information during hashing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    pub completed: usize,
    pub total: usize,
    pub current_path: PathBuf,
}

/// Events while resolving duplicates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResolveEvent {
    /// No match; the image joined the index
    Unique { path: PathBuf },
    /// A pair was resolved (or reported, when `applied` is false)
    Duplicate {
        keeper: PathBuf,
        discarded: PathBuf,
        score: Option<i64>,
        applied: bool,
    },
    /// Relocation failed for this file; the run continues
    Error { path: PathBuf, message: String },
}

/// Events while undoing a quarantine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UndoEvent {
    Started { dir: PathBuf, entries: usize },
    Error { message: String },
    Completed {
        removed: usize,
        restored: usize,
        errors: usize,
    },
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    Started,
    PhaseChanged { phase: PipelinePhase },
    Completed { summary: PipelineSummary },
    /// The run was aborted
    Error { message: String },
}

/// Phases of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Hashing,
    Resolving,
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub total_photos: usize,
    /// Records left in the index at the end
    pub images_indexed: usize,
    pub duplicates: usize,
    pub relocation_failures: usize,
    pub skipped: usize,
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Hashing => write!(f, "Hashing"),
            PipelinePhase::Resolving => write!(f, "Resolving"),
        }
    }
}
