//! # imgdedup CLI
//!
//! Command-line interface for the image deduplicator.
//!
//! ## Usage
//! ```bash
//! imgdedup scan ~/Pictures --dry-run
//! imgdedup scan ~/Pictures --algorithm perceptual --sensitivity 5
//! imgdedup undo ~/Pictures
//! ```

mod cli;

use image_dedup::Result;

fn main() -> Result<()> {
    cli::run()
}
