//! Purpose: Link the system `libqconf` when the `native` feature is enabled.
//! Role: Cargo build-script; emits link directives and rebuild triggers only.
//! Invariants: Without the `native` feature nothing is linked, so the crate builds anywhere.
//! Invariants: `QCONF_LIB_DIR` (optional) adds a native search path ahead of the system defaults.
//! Invariants: Uses only Cargo-provided env vars plus `QCONF_LIB_DIR`.
use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=QCONF_LIB_DIR");

    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("QCONF_LIB_DIR") {
        let dir = PathBuf::from(dir);
        if !dir.is_dir() {
            panic!(
                "QCONF_LIB_DIR `{}` is not a directory.\n\
                 Fix: point it at the directory containing libqconf, or unset it to use the \
                 system search path.",
                dir.display()
            );
        }
        println!("cargo:rustc-link-search=native={}", dir.display());
    }

    println!("cargo:rustc-link-lib=qconf");

    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("windows") {
        println!("cargo:rustc-link-lib=m");
    }
}
