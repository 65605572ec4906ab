//! Recursive, depth-first inlining of include directives
//!
//! [`Inliner`] reads one file line by line. Plain lines are written to the
//! output followed by a single `\n`. Include directives are resolved through
//! the [`SearchPaths`] and replaced, in place, by the full expansion of the
//! file they name.
//!
//! The first failure anywhere in the tree is turned into a [`Diagnostic`] at
//! the point where it happens. Every enclosing frame stops reading and hands
//! that same diagnostic up unchanged.

use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use incflat_diagnostics::{Diagnostic, DiagnosticKind};
use incflat_utils::{
    io::{open_input, ByteLines},
    location::Location,
};
use tracing::{debug, trace};

use crate::{
    directive::{classify, IncludeDirective, LineKind},
    search::SearchPaths,
};

/// State shared by every level of one expansion
pub struct Inliner<'ctx, W: Write + ?Sized> {
    /// Where included files are looked up
    search: &'ctx SearchPaths,
    /// The root file, as it is shown in diagnostics
    root: String,
    /// The flattened output
    out: &'ctx mut W,
    /// Canonical paths of the files currently being expanded, outermost
    /// first. Only tracked when cycle detection is on.
    active: Option<Vec<PathBuf>>,
}

/// The path a file is known by on the cycle stack
///
/// Spellings through `..` or symlinks collapse to one canonical path. A path
/// that cannot be canonicalized stands for itself.
fn file_identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

impl<W: Write + ?Sized> std::fmt::Debug for Inliner<'_, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inliner")
            .field("search", &self.search)
            .field("root", &self.root)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl<'ctx, W: Write + ?Sized> Inliner<'ctx, W> {
    /// Create a new [`Inliner`] for an expansion rooted at `root`
    ///
    /// Without `detect_cycles` a cyclic include graph recurses until the
    /// stack is exhausted.
    pub fn new(
        search: &'ctx SearchPaths,
        root: &Path,
        out: &'ctx mut W,
        detect_cycles: bool,
    ) -> Self {
        Self {
            search,
            root: root.display().to_string(),
            out,
            active: detect_cycles.then(|| vec![file_identity(root)]),
        }
    }

    /// Expand every line of `reader`, which holds the contents of `file`
    ///
    /// # Errors
    /// Returns the diagnostic of the first include that cannot be resolved or
    /// opened, or of a failed read or write.
    pub fn expand<R: BufRead>(&mut self, reader: R, file: &Path) -> Result<(), Diagnostic> {
        trace!(file = %file.display(), "expanding");

        for (index, line) in ByteLines::new(reader).enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|err| {
                DiagnosticKind::CannotReadFile {
                    path: file.display().to_string(),
                    error: err.to_string(),
                }
                .error()
            })?;

            // a line which is not UTF-8 cannot name a file, so it is copied
            // through like any other text
            let directive = std::str::from_utf8(&line)
                .ok()
                .and_then(|text| match classify(text) {
                    LineKind::Include(directive) => Some((text, directive)),
                    LineKind::Plain => None,
                });

            match directive {
                Some((text, directive)) => {
                    self.include(&directive, Location::new(file, line_number, text))?;
                }
                None => self.emit(&line)?,
            }
        }

        Ok(())
    }

    /// Write one plain line
    fn emit(&mut self, line: &[u8]) -> Result<(), Diagnostic> {
        self.out
            .write_all(line)
            .and_then(|()| self.out.write_all(b"\n"))
            .map_err(|err| DiagnosticKind::CannotWriteOutput(err.to_string()).error())
    }

    /// Replace the directive at `location` with the expansion of its target
    fn include(
        &mut self,
        directive: &IncludeDirective<'_>,
        location: Location,
    ) -> Result<(), Diagnostic> {
        let Some(path) = self.search.resolve(directive, location.file()) else {
            debug!(
                reference = directive.reference,
                file = %location.file().display(),
                line = location.line(),
                "include not found"
            );
            return Err(self.unknown(directive.reference, location));
        };

        let identity = self.active.is_some().then(|| file_identity(&path));
        if let (Some(active), Some(identity)) = (&self.active, &identity) {
            if active.contains(identity) {
                return Err(DiagnosticKind::CyclicInclude {
                    reference: directive.reference.to_string(),
                    root: self.root.clone(),
                    line: location.line(),
                }
                .error_at(location));
            }
        }

        let reader = match open_input(&path) {
            Ok(reader) => reader,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cannot open include");
                let name = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |name| name.to_string_lossy().into_owned(),
                );
                return Err(self.unknown(&name, location));
            }
        };

        if let (Some(active), Some(identity)) = (&mut self.active, identity) {
            active.push(identity);
        }
        let result = self.expand(reader, &path);
        if let Some(ref mut active) = self.active {
            active.pop();
        }
        result
    }

    /// Build the diagnostic for a reference that led nowhere
    fn unknown(&self, reference: &str, location: Location) -> Diagnostic {
        DiagnosticKind::UnknownIncludeFile {
            reference: reference.to_string(),
            root: self.root.clone(),
            line: location.line(),
        }
        .error_at(location)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use indoc::indoc;

    use super::*;

    fn expand_file(
        file: &Path,
        search: &SearchPaths,
        detect_cycles: bool,
    ) -> (String, Result<(), Diagnostic>) {
        let mut out = Vec::new();
        let reader = open_input(file).expect("root should open");
        let result = Inliner::new(search, file, &mut out, detect_cycles).expand(reader, file);
        (String::from_utf8(out).expect("output should be UTF-8"), result)
    }

    #[test]
    fn plain_lines_pass_through_with_newlines() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let main = dir.path().join("main.c");
        fs::write(&main, "int a;\r\n\n  spaced  \nlast").expect("should write");

        let (out, result) = expand_file(&main, &SearchPaths::new(), false);
        assert!(result.is_ok());
        assert_eq!(out, "int a;\n\n  spaced  \nlast\n");
    }

    #[test]
    fn nested_includes_are_spliced_depth_first() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        fs::write(
            dir.path().join("main.c"),
            indoc! {r#"
                first
                #include "a.h"
                last
            "#},
        )
        .expect("should write");
        fs::write(
            dir.path().join("a.h"),
            indoc! {r#"
                a before
                #include "b.h"
                a after
            "#},
        )
        .expect("should write");
        fs::write(dir.path().join("b.h"), "b\n").expect("should write");

        let (out, result) = expand_file(&dir.path().join("main.c"), &SearchPaths::new(), false);
        assert!(result.is_ok());
        assert_eq!(out, "first\na before\nb\na after\nlast\n");
    }

    #[test]
    fn unresolved_include_reports_root_and_local_line() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let main = dir.path().join("main.c");
        fs::write(&main, "one\n#include \"a.h\"\nnever\n").expect("should write");
        fs::write(dir.path().join("a.h"), "in a\n\n#include <missing.h>\nnever\n")
            .expect("should write");

        let (out, result) = expand_file(&main, &SearchPaths::new(), false);
        let diagnostic = result.expect_err("expansion should fail");

        assert_eq!(out, "one\nin a\n\n");
        assert_eq!(
            diagnostic.kind(),
            &DiagnosticKind::UnknownIncludeFile {
                reference: "missing.h".to_string(),
                root: main.display().to_string(),
                line: 3,
            }
        );
        let location = diagnostic.location().expect("should have a location");
        assert_eq!(location.file(), dir.path().join("a.h"));
        assert_eq!(location.text(), "#include <missing.h>");
    }

    #[test]
    fn directory_include_expands_to_nothing() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let main = dir.path().join("main.c");
        let inc = dir.path().join("inc");
        fs::create_dir_all(inc.join("sub")).expect("should create dirs");
        fs::write(&main, "a\n#include <sub>\nb\n").expect("should write");

        let (out, result) = expand_file(&main, &[inc].into_iter().collect(), false);
        assert!(result.is_ok());
        assert_eq!(out, "a\nb\n");
    }

    #[test]
    fn cycles_are_reported_when_detection_is_on() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let main = dir.path().join("main.c");
        fs::write(&main, "#include \"a.h\"\n").expect("should write");
        fs::write(dir.path().join("a.h"), "a\n#include \"b.h\"\n").expect("should write");
        fs::write(dir.path().join("b.h"), "b\n#include \"a.h\"\n").expect("should write");

        let (out, result) = expand_file(&main, &SearchPaths::new(), true);
        assert_eq!(out, "a\nb\n");
        assert_eq!(
            result.expect_err("expansion should fail").kind(),
            &DiagnosticKind::CyclicInclude {
                reference: "a.h".to_string(),
                root: main.display().to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn cycles_through_parent_directories_are_reported() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let main = dir.path().join("main.c");
        fs::create_dir(dir.path().join("d")).expect("should create dir");
        fs::write(&main, "#include \"d/a.h\"\n").expect("should write");
        fs::write(dir.path().join("d/a.h"), "x\n#include \"../d/a.h\"\n")
            .expect("should write");

        let (out, result) = expand_file(&main, &SearchPaths::new(), true);
        assert_eq!(out, "x\n");
        assert_eq!(
            result.expect_err("expansion should fail").kind(),
            &DiagnosticKind::CyclicInclude {
                reference: "../d/a.h".to_string(),
                root: main.display().to_string(),
                line: 2,
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn cycles_through_symlinks_are_reported() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let main = dir.path().join("main.c");
        fs::write(&main, "#include \"a.h\"\n").expect("should write");
        fs::write(dir.path().join("a.h"), "a\n#include \"link.h\"\n").expect("should write");
        std::os::unix::fs::symlink(dir.path().join("a.h"), dir.path().join("link.h"))
            .expect("should create symlink");

        let (out, result) = expand_file(&main, &SearchPaths::new(), true);
        assert_eq!(out, "a\n");
        assert!(matches!(
            result.expect_err("expansion should fail").kind(),
            DiagnosticKind::CyclicInclude { line: 2, .. }
        ));
    }

    #[test]
    fn repeated_includes_are_not_cycles() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let main = dir.path().join("main.c");
        fs::write(&main, "#include \"a.h\"\n#include \"a.h\"\n").expect("should write");
        fs::write(dir.path().join("a.h"), "a\n").expect("should write");

        let (out, result) = expand_file(&main, &SearchPaths::new(), true);
        assert!(result.is_ok());
        assert_eq!(out, "a\na\n");
    }

    #[test]
    fn non_utf8_lines_are_copied_verbatim() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let main = dir.path().join("main.c");
        fs::write(&main, b"\xff\xfe #include <x.h>\r\nok\n").expect("should write");

        let mut out = Vec::new();
        let reader = open_input(&main).expect("root should open");
        let search = SearchPaths::new();
        let result = Inliner::new(&search, &main, &mut out, false).expand(reader, &main);

        assert!(result.is_ok());
        assert_eq!(out, b"\xff\xfe #include <x.h>\nok\n");
    }

    /// Accepts `limit` bytes, then fails every write
    struct FullDisk {
        written: Vec<u8>,
        limit: usize,
        rejected: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let room = self.limit - self.written.len();
            if room == 0 {
                self.rejected += 1;
                return Err(std::io::Error::other("no space left"));
            }
            let len = room.min(buf.len());
            self.written.extend_from_slice(&buf[..len]);
            Ok(len)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_stops_the_expansion() {
        let search = SearchPaths::new();
        let file = Path::new("main.c");
        let mut out = FullDisk {
            written: Vec::new(),
            limit: 4,
            rejected: 0,
        };

        let result = Inliner::new(&search, file, &mut out, false)
            .expand(&b"one\ntwo\nthree\n"[..], file);

        assert!(matches!(
            result.expect_err("expansion should fail").kind(),
            DiagnosticKind::CannotWriteOutput(_)
        ));
        assert_eq!(out.written, b"one\n");
        assert_eq!(out.rejected, 1);
    }

    /// Hands out `data` once, then fails every read
    struct FailingRead {
        data: &'static [u8],
    }

    impl std::io::Read for FailingRead {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.data.is_empty() {
                return Err(std::io::Error::other("device went away"));
            }
            let len = self.data.len().min(buf.len());
            buf[..len].copy_from_slice(&self.data[..len]);
            self.data = &self.data[len..];
            Ok(len)
        }
    }

    #[test]
    fn read_failure_reports_the_file_being_read() {
        let search = SearchPaths::new();
        let file = Path::new("main.c");
        let reader = std::io::BufReader::new(FailingRead {
            data: b"first\nsecond",
        });
        let mut out = Vec::new();

        let result = Inliner::new(&search, file, &mut out, false).expand(reader, file);

        assert_eq!(
            result.expect_err("expansion should fail").kind(),
            &DiagnosticKind::CannotReadFile {
                path: "main.c".to_string(),
                error: "device went away".to_string(),
            }
        );
        assert_eq!(out, b"first\n");
    }
}
