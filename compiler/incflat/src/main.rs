#![doc = r"incflat: flatten a source file and everything it includes into one file"]
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
    clippy::unwrap_used
)]
#![allow(
    clippy::multiple_crate_versions,
    clippy::cargo_common_metadata,
    clippy::module_name_repetitions,
    clippy::doc_comment_double_space_linebreaks
)]

mod build_info;
mod cli;
mod ice;

use anyhow::bail;
use clap::Parser;
use cli::{Cli, DiagnosticFormat};
use incflat_diagnostics::Diagnostic;
use incflat_preprocessor::{preprocess_with, PreprocessError};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr logger, filtered by `RUST_LOG` (default `warn`)
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Print a diagnostic to stderr in the requested format
fn emit_diagnostic(diagnostic: &Diagnostic, format: DiagnosticFormat) {
    match format {
        DiagnosticFormat::Human => eprintln!("{}", diagnostic.print()),
        DiagnosticFormat::Plain => eprintln!("{}", diagnostic.plain()),
    }
}

fn main() -> anyhow::Result<()> {
    ice::setup_panic_hook();
    init_tracing();

    let cli = Cli::parse();

    if cli.version {
        println!("{}", build_info::version());
        return Ok(());
    }

    let Some(ref path) = cli.path else {
        bail!("no input file provided");
    };

    let search = cli::get_include_paths(&cli);
    debug!(search = ?search.dirs(), "search paths");

    match preprocess_with(path, &cli.out_file, &search, cli.options()) {
        Ok(()) => {
            info!(input = %path.display(), output = %cli.out_file.display(), "flattened");
            Ok(())
        }
        Err(PreprocessError::Diagnostic(diagnostic)) => {
            emit_diagnostic(&diagnostic, cli.diagnostic_emit);
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
