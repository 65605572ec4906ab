//! Command line interface declarations for incflat

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use clap::Parser;
use incflat_preprocessor::{PreprocessOptions, SearchPaths};

/// The environment variable holding extra search directories
pub const INCLUDE_PATH_VAR: &str = "INCFLAT_INCLUDE_PATH";

/// Flatten a source file and everything it includes into one file
#[derive(Parser, Debug)]
#[command(version=None)]
pub struct Cli {
    /// See what version of incflat you are using
    #[arg(short, long)]
    pub version: bool,

    /// The path of the root file to flatten
    pub path: Option<PathBuf>,

    /// The path of the file to write the output to
    /// If not provided, the output will be written to stdout
    #[arg(short, long)]
    #[clap(default_value = "-")]
    pub out_file: PathBuf,

    /// Add a directory to the include search path
    #[arg(short = 'I', long = "include", action = clap::ArgAction::Append)]
    pub include_paths: Vec<PathBuf>,

    /// Fail on cyclic includes instead of recursing until the stack runs out
    #[arg(long)]
    pub detect_cycles: bool,

    /// Set the diagnostic output format
    #[arg(long = "diagnostic-emit")]
    #[clap(default_value = "human")]
    pub diagnostic_emit: DiagnosticFormat,
}

impl Cli {
    /// The [`PreprocessOptions`] selected on the command line
    pub const fn options(&self) -> PreprocessOptions {
        PreprocessOptions {
            detect_cycles: self.detect_cycles,
        }
    }
}

/// The format to emit diagnostics in
#[derive(Debug, Clone, Copy, clap::ValueEnum, PartialEq, Eq)]
pub enum DiagnosticFormat {
    /// Colored text showing the offending line (default)
    Human,
    /// The bare one-line message
    Plain,
}

/// Resolve a path to an absolute path based on the current working directory.
///
/// If the path is relative, it is resolved to an absolute path by joining it
/// with the current working directory and canonicalizing it. If the path is
/// already absolute or canonicalization fails, the path is returned as-is.
fn resolve_include_path(path: &Path) -> PathBuf {
    if path.is_relative() {
        std::env::current_dir()
            .ok()
            .and_then(|cwd| cwd.join(path).canonicalize().ok())
            .unwrap_or_else(|| path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}

/// Build the search path from `-I` arguments followed by the entries of a
/// platform path list, usually the value of [`INCLUDE_PATH_VAR`]
pub fn search_paths_from(cli_paths: &[PathBuf], env_paths: Option<&OsStr>) -> SearchPaths {
    cli_paths
        .iter()
        .map(PathBuf::as_path)
        .map(resolve_include_path)
        .chain(
            env_paths
                .into_iter()
                .flat_map(std::env::split_paths)
                .filter(|path| !path.as_os_str().is_empty())
                .map(|path| resolve_include_path(&path)),
        )
        .collect()
}

/// Get the search path from the CLI `-I` arguments and the environment
///
/// Relative paths are resolved relative to the current working directory.
pub fn get_include_paths(cli: &Cli) -> SearchPaths {
    // append paths in the following order:
    // 1. CLI
    // 2. INCFLAT_INCLUDE_PATH env var
    search_paths_from(
        &cli.include_paths,
        std::env::var_os(INCLUDE_PATH_VAR).as_deref(),
    )
}
