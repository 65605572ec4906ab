//! Internal error handling for incflat
//!
//! A panic is always a bug in incflat, never a problem with the files being
//! flattened. This module installs a panic hook that says so before handing
//! over to the default hook.

use std::panic::PanicHookInfo;

/// Print the internal error banner, then run the default hook
fn internal_error_hook(
    default_panic_hook: &'static (dyn Fn(&PanicHookInfo<'_>) + Send + Sync),
    panic_info: &PanicHookInfo,
) {
    eprintln!("error: internal error encountered: thread panicked");
    eprintln!("note: this is a bug in incflat, not in your sources");
    eprintln!();
    eprintln!(
        "{}",
        super::build_info::version()
            .lines()
            .map(|line| format!("note: {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
    eprintln!(
        "note: command line arguments: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );
    eprintln!();
    default_panic_hook(panic_info);
    eprintln!();
    eprintln!("error: end internal error. no output was completed.");
}

/// Configure the global panic hook
///
/// `RUST_BACKTRACE` is forced to `1` unless it is already `full`.
pub fn setup_panic_hook() {
    // the hook API needs a 'static reference to the previous hook, and the
    // process ends shortly after a panic anyway
    let default_panic_hook: &'static _ = Box::leak(std::panic::take_hook());

    std::panic::set_hook(Box::new(|panic_info| {
        internal_error_hook(default_panic_hook, panic_info);
    }));

    if std::env::var("RUST_BACKTRACE").ok().as_deref() != Some("full") {
        // no other threads exist yet
        std::env::set_var("RUST_BACKTRACE", "1");
    }
}
