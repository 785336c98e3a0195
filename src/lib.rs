//! Purpose: Read-only Rust client for the QConf configuration and service-discovery store.
//! Exports: `api` (client surface), `core` (backend capability, native boundary, errors).
//! Role: Library backing the `qconf` CLI and embedding applications.
//! Invariants: The store itself lives in libqconf; this crate only marshals calls into it.
//! Invariants: Native linkage is opt-in through the `native` feature.
pub mod api;
pub mod core;
