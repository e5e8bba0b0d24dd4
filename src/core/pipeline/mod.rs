//! # Pipeline Module
//!
//! The run driver: one pass over a directory, and the matching undo.
//!
//! ## Stages
//! 1. **Scan** - enumerate candidate images under the root
//! 2. **Hash** - decode and fingerprint in parallel
//! 3. **Resolve** - query the index and relocate duplicates, one file at a
//!    time in scan order
//!
//! ## Parallelism
//! Hashing fans out over rayon and is collected back in scan order. The
//! resolver owns the index and runs on the calling thread only, so a
//! query and the add/delete that follows it are never interleaved.

mod config;
mod executor;

pub use config::{RunConfig, DEFAULT_SENSITIVITY};
pub use executor::{
    undo, undo_with_events, FailedResolution, Pipeline, PipelineBuilder, PipelineResult,
    SkippedFile,
};
