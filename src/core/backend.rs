//! Purpose: The capability boundary between the client shim and a configuration store.
//! Exports: `Backend`, `FetchMode`.
//! Role: Mirrors the libqconf calling convention so the client logic is backend-agnostic.
//! Invariants: Every method returns a libqconf code; `QCONF_OK` (0) is the only success value.
//! Invariants: Arrays handed to `get_*` were produced by the matching `init_*` and are later
//! passed to the matching `destroy_*` exactly once.
//! Invariants: Strings a backend places in arrays or buffers are NUL-terminated and stay valid
//! until the owning array is destroyed or the buffer is reused.
use std::ffi::CStr;
use std::os::raw::c_int;
use std::sync::Arc;

use crate::core::ffi::sys;

/// Whether a lookup may block until the local agent has fetched the value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FetchMode {
    /// Wait for the agent to populate the value (`qconf_get_*`).
    #[default]
    Wait,
    /// Return immediately if the value is not cached yet (`qconf_aget_*`).
    NoWait,
}

pub trait Backend: Send + Sync {
    /// One-time initialization. Must be idempotent; later calls report the first outcome.
    fn init(&self) -> c_int;

    /// Writes the value of `path` into `buf` as a NUL-terminated string.
    /// Returns `QCONF_ERR_BUF_NOT_ENOUGH` if the value plus terminator does not fit.
    fn get_conf(&self, path: &CStr, buf: &mut [u8], idc: Option<&CStr>, mode: FetchMode)
    -> c_int;

    /// Writes one endpoint of the service at `path` into `buf`.
    fn get_host(&self, path: &CStr, buf: &mut [u8], idc: Option<&CStr>, mode: FetchMode)
    -> c_int;

    fn init_string_vector(&self, nodes: &mut sys::string_vector_t) -> c_int;

    fn destroy_string_vector(&self, nodes: &mut sys::string_vector_t) -> c_int;

    fn init_batch_nodes(&self, bnodes: &mut sys::qconf_batch_nodes) -> c_int;

    fn destroy_batch_nodes(&self, bnodes: &mut sys::qconf_batch_nodes) -> c_int;

    fn get_allhost(
        &self,
        path: &CStr,
        nodes: &mut sys::string_vector_t,
        idc: Option<&CStr>,
        mode: FetchMode,
    ) -> c_int;

    fn get_batch_conf(
        &self,
        path: &CStr,
        bnodes: &mut sys::qconf_batch_nodes,
        idc: Option<&CStr>,
        mode: FetchMode,
    ) -> c_int;

    fn get_batch_keys(
        &self,
        path: &CStr,
        nodes: &mut sys::string_vector_t,
        idc: Option<&CStr>,
        mode: FetchMode,
    ) -> c_int;

    /// Version string reported by the store library, if it has one.
    fn library_version(&self) -> Option<String> {
        None
    }
}

macro_rules! forward_backend {
    ($($ty:ty),+ $(,)?) => {$(
        impl<B: Backend + ?Sized> Backend for $ty {
            fn init(&self) -> c_int {
                (**self).init()
            }

            fn get_conf(
                &self,
                path: &CStr,
                buf: &mut [u8],
                idc: Option<&CStr>,
                mode: FetchMode,
            ) -> c_int {
                (**self).get_conf(path, buf, idc, mode)
            }

            fn get_host(
                &self,
                path: &CStr,
                buf: &mut [u8],
                idc: Option<&CStr>,
                mode: FetchMode,
            ) -> c_int {
                (**self).get_host(path, buf, idc, mode)
            }

            fn init_string_vector(&self, nodes: &mut sys::string_vector_t) -> c_int {
                (**self).init_string_vector(nodes)
            }

            fn destroy_string_vector(&self, nodes: &mut sys::string_vector_t) -> c_int {
                (**self).destroy_string_vector(nodes)
            }

            fn init_batch_nodes(&self, bnodes: &mut sys::qconf_batch_nodes) -> c_int {
                (**self).init_batch_nodes(bnodes)
            }

            fn destroy_batch_nodes(&self, bnodes: &mut sys::qconf_batch_nodes) -> c_int {
                (**self).destroy_batch_nodes(bnodes)
            }

            fn get_allhost(
                &self,
                path: &CStr,
                nodes: &mut sys::string_vector_t,
                idc: Option<&CStr>,
                mode: FetchMode,
            ) -> c_int {
                (**self).get_allhost(path, nodes, idc, mode)
            }

            fn get_batch_conf(
                &self,
                path: &CStr,
                bnodes: &mut sys::qconf_batch_nodes,
                idc: Option<&CStr>,
                mode: FetchMode,
            ) -> c_int {
                (**self).get_batch_conf(path, bnodes, idc, mode)
            }

            fn get_batch_keys(
                &self,
                path: &CStr,
                nodes: &mut sys::string_vector_t,
                idc: Option<&CStr>,
                mode: FetchMode,
            ) -> c_int {
                (**self).get_batch_keys(path, nodes, idc, mode)
            }

            fn library_version(&self) -> Option<String> {
                (**self).library_version()
            }
        }
    )+};
}

forward_backend!(&B, Box<B>, Arc<B>);
