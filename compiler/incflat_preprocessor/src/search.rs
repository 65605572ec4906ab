//! Resolution of include references to paths on disk

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::directive::{IncludeDirective, IncludeKind};

/// The ordered list of directories consulted when resolving includes
///
/// Angle includes are only ever looked up here. Quoted includes fall back to
/// these directories when the file is not found next to the including file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    /// The directories, in priority order
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    /// Create a new, empty [`SearchPaths`]
    #[must_use]
    pub const fn new() -> Self {
        Self { dirs: Vec::new() }
    }

    /// Append a directory with the lowest priority so far
    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    /// The directories, in priority order
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Find `reference` in the search directories
    ///
    /// Returns the first joined path that exists.
    #[must_use]
    pub fn find(&self, reference: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| dir.join(reference))
            .find(|candidate| candidate.exists())
    }

    /// Resolve a directive found in `including_file` to an existing path
    ///
    /// Quoted references are tried relative to the directory of
    /// `including_file` first, then in the search directories. Angle
    /// references are only tried in the search directories.
    ///
    /// Existence is a plain path check: a directory matches as well as a
    /// file. No canonicalization is done.
    #[must_use]
    pub fn resolve(
        &self,
        directive: &IncludeDirective<'_>,
        including_file: &Path,
    ) -> Option<PathBuf> {
        if directive.kind == IncludeKind::Quoted {
            let sibling = including_file
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(directive.reference);
            if sibling.exists() {
                debug!(
                    reference = directive.reference,
                    path = %sibling.display(),
                    "resolved next to including file"
                );
                return Some(sibling);
            }
        }

        let found = self.find(directive.reference);
        if let Some(ref path) = found {
            debug!(
                reference = directive.reference,
                path = %path.display(),
                "resolved in search paths"
            );
        }
        found
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for SearchPaths {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            dirs: iter.into_iter().map(Into::into).collect(),
        }
    }
}
