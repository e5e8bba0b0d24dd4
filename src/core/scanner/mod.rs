//! # Scanner Module
//!
//! Enumerates the candidate images under a run root.
//!
//! ## Candidates
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//! - GIF (.gif)
//!
//! Extensions are matched case-insensitively. The quarantine directory is
//! never descended into, and hidden entries are skipped unless asked for.
//! Entries are yielded in file-name order so runs are repeatable.
//!
//! ## Example
//! ```rust,ignore
//! use image_dedup::core::scanner::{PhotoScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("/Users/me/Pictures"))?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A candidate image found on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoFile {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Format implied by the extension
    pub format: ImageFormat,
}

/// Formats the scanner treats as candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Unknown,
}

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            _ => ImageFormat::Unknown,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageFormat::Unknown)
    }
}

/// Result of a scan
#[derive(Debug)]
pub struct ScanResult {
    /// Candidates in enumeration order
    pub photos: Vec<PhotoFile>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Source of candidate images
pub trait PhotoScanner: Send + Sync {
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;

    fn scan_with_events(&self, root: &Path, events: &EventSender)
        -> Result<ScanResult, ScanError>;
}
