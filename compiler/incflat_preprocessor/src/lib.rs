#![doc = r"Flattens a source file and everything it includes into a single stream"]
#![allow(unknown_lints)] // in case you use non-nightly clippy
#![warn(
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    clippy::missing_docs_in_private_items,
    missing_docs,
    clippy::absolute_paths,
    clippy::as_conversions,
    clippy::dbg_macro,
    clippy::decimal_literal_representation,
    clippy::deref_by_slicing,
    clippy::disallowed_script_idents,
    clippy::else_if_without_else,
    clippy::empty_structs_with_brackets,
    clippy::format_push_string,
    clippy::if_then_some_else_none,
    clippy::let_underscore_must_use,
    clippy::min_ident_chars,
    clippy::mixed_read_write_in_expression,
    clippy::multiple_inherent_impl,
    clippy::multiple_unsafe_ops_per_block,
    clippy::non_ascii_literal,
    clippy::redundant_type_annotations,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_name_method,
    clippy::semicolon_inside_block,
    clippy::unseparated_literal_suffix,
    clippy::implicit_clone,
    clippy::todo,
    clippy::undocumented_unsafe_blocks,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::wildcard_enum_match_arm,
    let_underscore_drop,
    macro_use_extern_crate,
    missing_debug_implementations,
    non_exhaustive_omitted_patterns,
    unsafe_op_in_unsafe_fn,
    unused_crate_dependencies,
    variant_size_differences,
    unused_qualifications,
    clippy::unwrap_used,
    clippy::print_stderr,
    clippy::print_stdout
)]
#![allow(
    clippy::multiple_crate_versions,
    clippy::cargo_common_metadata,
    clippy::module_name_repetitions,
    clippy::doc_comment_double_space_linebreaks
)]

use std::{
    io::{self, BufRead, BufWriter, Write},
    path::{Path, PathBuf},
};

use incflat_diagnostics::{Diagnostic, DiagnosticKind};
use incflat_utils::io::{open_input, open_output};
use thiserror::Error;
use tracing::debug;

pub mod directive;
mod expand;
pub mod search;

pub use expand::Inliner;
pub use search::SearchPaths;

/// Switches for one expansion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Fail with [`DiagnosticKind::CyclicInclude`] when a file includes
    /// itself, directly or through other files. When off, a cycle recurses
    /// until the stack is exhausted.
    pub detect_cycles: bool,
}

/// Why a call to [`preprocess`] failed
#[derive(Error, Debug)]
pub enum PreprocessError {
    /// The root input could not be opened
    #[error("cannot open input {}: {source}", .path.display())]
    OpenInput {
        /// The path that was given
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
    /// The output could not be opened for writing
    #[error("cannot open output {}: {source}", .path.display())]
    OpenOutput {
        /// The path that was given
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
    /// The expansion itself failed
    #[error(transparent)]
    Diagnostic(#[from] Diagnostic),
}

/// Flatten `input` and everything it includes into the file `output`
///
/// The output is created, or truncated if it exists. A path of "-" writes to
/// standard output instead. If the expansion fails part way through, the
/// lines written so far are left in the output.
///
/// # Errors
/// Returns [`PreprocessError::OpenInput`] or [`PreprocessError::OpenOutput`]
/// if either end cannot be opened (the input is opened first), and
/// [`PreprocessError::Diagnostic`] for the first include that cannot be
/// resolved or opened.
pub fn preprocess(
    input: &Path,
    output: &Path,
    search: &SearchPaths,
) -> Result<(), PreprocessError> {
    preprocess_with(input, output, search, PreprocessOptions::default())
}

/// [`preprocess`], with [`PreprocessOptions`]
///
/// # Errors
/// See [`preprocess`].
pub fn preprocess_with(
    input: &Path,
    output: &Path,
    search: &SearchPaths,
    options: PreprocessOptions,
) -> Result<(), PreprocessError> {
    let reader = open_root(input)?;
    let mut out = BufWriter::new(open_output(output).map_err(|source| {
        PreprocessError::OpenOutput {
            path: output.to_path_buf(),
            source,
        }
    })?);

    expand_root(reader, input, &mut out, search, options)?;
    out.flush()
        .map_err(|err| DiagnosticKind::CannotWriteOutput(err.to_string()).error())?;
    Ok(())
}

/// Flatten `input` and everything it includes into any writer
///
/// # Errors
/// See [`preprocess`]; [`PreprocessError::OpenOutput`] is never returned.
pub fn preprocess_to_writer<W: Write + ?Sized>(
    input: &Path,
    out: &mut W,
    search: &SearchPaths,
    options: PreprocessOptions,
) -> Result<(), PreprocessError> {
    let reader = open_root(input)?;
    expand_root(reader, input, out, search, options)
}

/// Flatten `input` into `output`, reporting failures as a single line
///
/// On an include failure the plain diagnostic text, e.g.
/// `unknown include file dummy.txt at file sources/a.cpp at line 8`, is
/// written to `report` once. Failures to open the input or the output are not
/// reported. Returns whether the expansion succeeded.
pub fn preprocess_reporting<R: Write + ?Sized>(
    input: &Path,
    output: &Path,
    search: &SearchPaths,
    report: &mut R,
) -> bool {
    match preprocess(input, output, search) {
        Ok(()) => true,
        Err(PreprocessError::Diagnostic(diagnostic)) => {
            if let Err(err) = writeln!(report, "{}", diagnostic.plain()) {
                debug!(error = %err, "cannot write diagnostic report");
            }
            false
        }
        Err(err) => {
            debug!(error = %err, "preprocessing did not start");
            false
        }
    }
}

/// Open the root file of an expansion
fn open_root(input: &Path) -> Result<impl BufRead, PreprocessError> {
    open_input(input).map_err(|source| PreprocessError::OpenInput {
        path: input.to_path_buf(),
        source,
    })
}

/// Run the [`Inliner`] over an already opened root file
fn expand_root<W: Write + ?Sized>(
    reader: impl BufRead,
    input: &Path,
    out: &mut W,
    search: &SearchPaths,
    options: PreprocessOptions,
) -> Result<(), PreprocessError> {
    debug!(
        input = %input.display(),
        search = ?search.dirs(),
        detect_cycles = options.detect_cycles,
        "preprocessing"
    );
    Inliner::new(search, input, out, options.detect_cycles).expand(reader, input)?;
    Ok(())
}
