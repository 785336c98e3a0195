//! Purpose: Define the stable public Rust API boundary for the qconf client.
//! Exports: `Client`, backends, options, and error types needed by applications and the CLI.
//! Role: Public, additive-only surface; hides the resource guards and raw bindings.
//! Invariants: With the `native` feature, the process-wide client is created at most once.

mod client;
#[cfg(feature = "native")]
mod global;

pub use crate::core::backend::{Backend, FetchMode};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
#[cfg(feature = "native")]
pub use crate::core::ffi::NativeBackend;
pub use crate::core::memory::{Fixture, MemoryBackend, ZoneFixture};
pub use crate::core::options::ClientOptions;
pub use client::{ApiResult, Client, version};
#[cfg(feature = "native")]
pub use global::{get_all_host, get_batch_conf, get_batch_keys, get_conf, get_host, global};
