//! # Core Module
//!
//! The duplicate resolution engine, free of any UI concerns.
//!
//! ## Modules
//! - `scanner` - Enumerates candidate images
//! - `hasher` - Decodes images and computes fingerprints
//! - `index` - Holds one record per surviving image
//! - `resolver` - Decides which copy of a duplicate pair survives
//! - `quarantine` - Moves the loser aside reversibly, and undoes it
//! - `pipeline` - Runs the whole thing over a directory

pub mod hasher;
pub mod index;
pub mod pipeline;
pub mod quarantine;
pub mod resolver;
pub mod scanner;

// Re-export commonly used types
pub use hasher::{HashAlgorithmKind, ObservedImage};
pub use index::{ImageRecord, MatchResult, SimilarityIndex};
pub use pipeline::{Pipeline, PipelineResult, RunConfig};
pub use quarantine::{Quarantine, UndoReport};
pub use resolver::{DuplicatePair, Resolution, Resolver, Winner};
pub use scanner::PhotoFile;
