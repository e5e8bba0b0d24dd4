//! # Image Dedup
//!
//! Finds near-duplicate images in a directory, keeps the larger copy and
//! moves the other into a quarantine directory that can be undone.
//!
//! ## Safety
//! - **Reversible** - the keeper is copied into quarantine before the
//!   discarded file is moved there, and `undo` puts everything back
//! - **Dry run** - report what would happen without touching a file
//!
//! ## Architecture
//! - `core` - scanning, fingerprinting, the similarity index, resolution
//!   and the quarantine
//! - `events` - progress reporting over channels
//! - `error` - error types

pub mod core;
pub mod error;
pub mod events;

pub use error::{DedupError, Result};

/// Initialize tracing for the binary.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug over warn.
/// Calling it twice leaves the first subscriber in place.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
