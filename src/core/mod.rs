// Core modules: backend capability, native boundary, in-memory store, options, errors.
pub mod backend;
pub mod error;
pub mod ffi;
pub mod memory;
pub mod options;
pub(crate) mod resource;
