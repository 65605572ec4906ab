//! Build information, generated at build time by `shadow-rs`

#[doc(hidden)]
#[allow(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::restriction
)]
pub mod build {
    include!(concat!(env!("OUT_DIR"), "/shadow.rs"));
}

/// The full description of this build, as printed by `--version`
pub fn version() -> String {
    format!(
        concat!(
            "{name} {version} ({commit}{dirty})\n",
            "built for {target} on {time} ({mode} mode)\n",
            "{rust_version} ({rust_channel} on {build_os})\n",
            "{cargo_version}"
        ),
        name = build::PROJECT_NAME,
        version = build::PKG_VERSION,
        commit = build::SHORT_COMMIT,
        dirty = if build::GIT_CLEAN { "" } else { ", dirty" },
        target = build::BUILD_TARGET,
        time = build::BUILD_TIME_3339,
        mode = build::BUILD_RUST_CHANNEL,
        rust_version = build::RUST_VERSION,
        rust_channel = build::RUST_CHANNEL,
        build_os = build::BUILD_OS,
        cargo_version = build::CARGO_VERSION,
    )
}
