//! Locations of lines within the files taking part in an expansion
//!
//! A [`Location`] names one line of one file, together with the text of that
//! line. Diagnostics carry one so that a renderer can show the offending
//! directive without reopening the file.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

/// A single line within a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The file, as it was joined during resolution
    file: PathBuf,
    /// The 1-indexed line number
    line: usize,
    /// The text of the line, without its terminator
    text: String,
}

impl Location {
    /// Create a new [`Location`]
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            text: text.into(),
        }
    }

    /// The file this location points into
    #[must_use]
    #[inline]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The 1-indexed line number
    #[must_use]
    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// The text of the line
    #[must_use]
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}
