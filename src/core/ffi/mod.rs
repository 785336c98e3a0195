//! Purpose: Native libqconf boundary: raw declarations plus the `NativeBackend` adapter.
//! Exports: `sys` (always; codes and array layouts), `NativeBackend` (feature `native`).
//! Role: The only place that calls into libqconf.
//! Invariants: `qconf_init` runs at most once per process; its code is cached for later callers.
//! Invariants: A null `idc` pointer selects the store's default zone.
pub mod sys;

#[cfg(feature = "native")]
pub use native::NativeBackend;

#[cfg(feature = "native")]
mod native {
    use std::ffi::CStr;
    use std::os::raw::{c_char, c_int, c_uint};
    use std::ptr;
    use std::sync::OnceLock;

    use tracing::warn;

    use super::sys;
    use crate::core::backend::{Backend, FetchMode};

    static INIT_CODE: OnceLock<c_int> = OnceLock::new();

    /// Process-wide handle onto the linked libqconf. Copies share the same native state.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct NativeBackend {
        _private: (),
    }

    impl NativeBackend {
        pub fn new() -> Self {
            Self { _private: () }
        }
    }

    fn idc_ptr(idc: Option<&CStr>) -> *const c_char {
        idc.map_or(ptr::null(), CStr::as_ptr)
    }

    fn buf_len(buf: &[u8]) -> c_uint {
        c_uint::try_from(buf.len()).unwrap_or(c_uint::MAX)
    }

    impl Backend for NativeBackend {
        fn init(&self) -> c_int {
            *INIT_CODE.get_or_init(|| {
                let code = unsafe { sys::qconf_init() };
                if code != sys::QCONF_OK {
                    warn!(code, "qconf_init failed");
                }
                code
            })
        }

        fn get_conf(
            &self,
            path: &CStr,
            buf: &mut [u8],
            idc: Option<&CStr>,
            mode: FetchMode,
        ) -> c_int {
            let len = buf_len(buf);
            let out = buf.as_mut_ptr() as *mut c_char;
            unsafe {
                match mode {
                    FetchMode::Wait => sys::qconf_get_conf(path.as_ptr(), out, len, idc_ptr(idc)),
                    FetchMode::NoWait => {
                        sys::qconf_aget_conf(path.as_ptr(), out, len, idc_ptr(idc))
                    }
                }
            }
        }

        fn get_host(
            &self,
            path: &CStr,
            buf: &mut [u8],
            idc: Option<&CStr>,
            mode: FetchMode,
        ) -> c_int {
            let len = buf_len(buf);
            let out = buf.as_mut_ptr() as *mut c_char;
            unsafe {
                match mode {
                    FetchMode::Wait => sys::qconf_get_host(path.as_ptr(), out, len, idc_ptr(idc)),
                    FetchMode::NoWait => {
                        sys::qconf_aget_host(path.as_ptr(), out, len, idc_ptr(idc))
                    }
                }
            }
        }

        fn init_string_vector(&self, nodes: &mut sys::string_vector_t) -> c_int {
            unsafe { sys::init_string_vector(nodes as *mut sys::string_vector_t) }
        }

        fn destroy_string_vector(&self, nodes: &mut sys::string_vector_t) -> c_int {
            unsafe { sys::destroy_string_vector(nodes as *mut sys::string_vector_t) }
        }

        fn init_batch_nodes(&self, bnodes: &mut sys::qconf_batch_nodes) -> c_int {
            unsafe { sys::init_qconf_batch_nodes(bnodes as *mut sys::qconf_batch_nodes) }
        }

        fn destroy_batch_nodes(&self, bnodes: &mut sys::qconf_batch_nodes) -> c_int {
            unsafe { sys::destroy_qconf_batch_nodes(bnodes as *mut sys::qconf_batch_nodes) }
        }

        fn get_allhost(
            &self,
            path: &CStr,
            nodes: &mut sys::string_vector_t,
            idc: Option<&CStr>,
            mode: FetchMode,
        ) -> c_int {
            let nodes = nodes as *mut sys::string_vector_t;
            unsafe {
                match mode {
                    FetchMode::Wait => sys::qconf_get_allhost(path.as_ptr(), nodes, idc_ptr(idc)),
                    FetchMode::NoWait => {
                        sys::qconf_aget_allhost(path.as_ptr(), nodes, idc_ptr(idc))
                    }
                }
            }
        }

        fn get_batch_conf(
            &self,
            path: &CStr,
            bnodes: &mut sys::qconf_batch_nodes,
            idc: Option<&CStr>,
            mode: FetchMode,
        ) -> c_int {
            let bnodes = bnodes as *mut sys::qconf_batch_nodes;
            unsafe {
                match mode {
                    FetchMode::Wait => {
                        sys::qconf_get_batch_conf(path.as_ptr(), bnodes, idc_ptr(idc))
                    }
                    FetchMode::NoWait => {
                        sys::qconf_aget_batch_conf(path.as_ptr(), bnodes, idc_ptr(idc))
                    }
                }
            }
        }

        fn get_batch_keys(
            &self,
            path: &CStr,
            nodes: &mut sys::string_vector_t,
            idc: Option<&CStr>,
            mode: FetchMode,
        ) -> c_int {
            let nodes = nodes as *mut sys::string_vector_t;
            unsafe {
                match mode {
                    FetchMode::Wait => {
                        sys::qconf_get_batch_keys(path.as_ptr(), nodes, idc_ptr(idc))
                    }
                    FetchMode::NoWait => {
                        sys::qconf_aget_batch_keys(path.as_ptr(), nodes, idc_ptr(idc))
                    }
                }
            }
        }

        fn library_version(&self) -> Option<String> {
            let ptr = unsafe { sys::qconf_version() };
            if ptr.is_null() {
                return None;
            }
            let version = unsafe { CStr::from_ptr(ptr) };
            Some(version.to_string_lossy().into_owned())
        }
    }
}
