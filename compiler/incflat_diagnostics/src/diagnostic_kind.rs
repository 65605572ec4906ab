//! Defines all possible incflat diagnostics.

use incflat_utils::location::Location;
use thiserror::Error;

use crate::{Diagnostic, Severity};

/// The list of possible errors
// Paths are kept as the display strings the user passed in, so the rendered
// text matches the command line byte for byte.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An include reference matched no existing path, or the path it matched
    /// could not be opened
    #[error("unknown include file {reference} at file {root} at line {line}")]
    UnknownIncludeFile {
        /// The reference text between the delimiters
        reference: String,
        /// The root file of the expansion
        root: String,
        /// The line within the file containing the directive
        line: usize,
    },
    /// An include resolved to a file that is already being expanded
    #[error("cyclic include of {reference} at file {root} at line {line}")]
    CyclicInclude {
        /// The reference text between the delimiters
        reference: String,
        /// The root file of the expansion
        root: String,
        /// The line within the file containing the directive
        line: usize,
    },
    /// An opened file failed part way through reading
    #[error("cannot read {path}: {error}")]
    CannotReadFile {
        /// The file being read
        path: String,
        /// The underlying I/O error
        error: String,
    },
    /// The output sink rejected a write
    #[error("cannot write output: {0}")]
    CannotWriteOutput(String),
}

impl DiagnosticKind {
    /// Create an [error] diagnostic at a given [`Location`]
    ///
    /// [error]: [`Severity::Error`]
    #[must_use]
    #[inline]
    pub const fn error_at(self, location: Location) -> Diagnostic {
        Diagnostic(Severity::Error, self, Some(location))
    }

    /// Create an [error] diagnostic with no associated line
    ///
    /// [error]: [`Severity::Error`]
    #[must_use]
    #[inline]
    pub const fn error(self) -> Diagnostic {
        Diagnostic(Severity::Error, self, None)
    }
}
