//! Candidate filtering for the scanner.

use super::ImageFormat;
use std::path::Path;

/// Decides which files are candidate images
#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    include_hidden: bool,
}

impl ImageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include dot-files
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }
        self.get_format(path).is_supported()
    }

    pub fn get_format(&self, path: &Path) -> ImageFormat {
        path.extension()
            .and_then(|e| e.to_str())
            .map(ImageFormat::from_extension)
            .unwrap_or(ImageFormat::Unknown)
    }
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().starts_with(b"."))
}
