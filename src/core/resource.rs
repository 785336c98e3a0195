// Scoped ownership of native arrays: acquired through `init_*`, released through `destroy_*` on drop.
use std::ffi::CStr;
use std::os::raw::c_char;

use tracing::{debug, warn};

use crate::core::backend::Backend;
use crate::core::error::{Error, ErrorKind};
use crate::core::ffi::sys;

pub(crate) struct StringVector<'a, B: Backend + ?Sized> {
    backend: &'a B,
    raw: sys::string_vector_t,
}

impl<'a, B: Backend + ?Sized> StringVector<'a, B> {
    pub(crate) fn acquire(backend: &'a B) -> Result<Self, Error> {
        let mut raw = sys::string_vector_t::empty();
        let code = backend.init_string_vector(&mut raw);
        if code != sys::QCONF_OK {
            return Err(Error::from_code(code));
        }
        Ok(Self { backend, raw })
    }

    pub(crate) fn raw_mut(&mut self) -> &mut sys::string_vector_t {
        &mut self.raw
    }

    pub(crate) fn to_strings(&self) -> Result<Vec<String>, Error> {
        if self.raw.data.is_null() || self.raw.count <= 0 {
            return Ok(Vec::new());
        }
        let items = unsafe { std::slice::from_raw_parts(self.raw.data, self.raw.count as usize) };
        items
            .iter()
            .map(|&item| {
                if item.is_null() {
                    return Err(null_entry("string vector"));
                }
                unsafe { owned_string(item) }
            })
            .collect()
    }
}

impl<B: Backend + ?Sized> Drop for StringVector<'_, B> {
    fn drop(&mut self) {
        let code = self.backend.destroy_string_vector(&mut self.raw);
        if code == sys::QCONF_OK {
            debug!("released string vector");
        } else {
            warn!(code, "failed to release string vector");
        }
    }
}

pub(crate) struct BatchNodes<'a, B: Backend + ?Sized> {
    backend: &'a B,
    raw: sys::qconf_batch_nodes,
}

impl<'a, B: Backend + ?Sized> BatchNodes<'a, B> {
    pub(crate) fn acquire(backend: &'a B) -> Result<Self, Error> {
        let mut raw = sys::qconf_batch_nodes::empty();
        let code = backend.init_batch_nodes(&mut raw);
        if code != sys::QCONF_OK {
            return Err(Error::from_code(code));
        }
        Ok(Self { backend, raw })
    }

    pub(crate) fn raw_mut(&mut self) -> &mut sys::qconf_batch_nodes {
        &mut self.raw
    }

    pub(crate) fn to_pairs(&self) -> Result<Vec<(String, String)>, Error> {
        if self.raw.nodes.is_null() || self.raw.count <= 0 {
            return Ok(Vec::new());
        }
        let nodes = unsafe { std::slice::from_raw_parts(self.raw.nodes, self.raw.count as usize) };
        let mut pairs = Vec::with_capacity(nodes.len());
        for node in nodes {
            if node.key.is_null() {
                return Err(null_entry("batch node key"));
            }
            let key = unsafe { owned_string(node.key) }?;
            let value = if node.value.is_null() {
                String::new()
            } else {
                unsafe { owned_string(node.value) }?
            };
            pairs.push((key, value));
        }
        Ok(pairs)
    }
}

impl<B: Backend + ?Sized> Drop for BatchNodes<'_, B> {
    fn drop(&mut self) {
        let code = self.backend.destroy_batch_nodes(&mut self.raw);
        if code == sys::QCONF_OK {
            debug!("released batch nodes");
        } else {
            warn!(code, "failed to release batch nodes");
        }
    }
}

fn null_entry(what: &str) -> Error {
    Error::new(ErrorKind::MalformedData).with_message(format!("store returned a null {what}"))
}

/// Copies a NUL-terminated native string into an owned `String`.
///
/// # Safety
/// `ptr` must be non-null and point at a NUL-terminated string that outlives this call.
unsafe fn owned_string(ptr: *const c_char) -> Result<String, Error> {
    let text = unsafe { CStr::from_ptr(ptr) };
    text.to_str().map(str::to_owned).map_err(|err| {
        Error::new(ErrorKind::MalformedData)
            .with_message("store returned non utf-8 text")
            .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use std::os::raw::c_char;

    use super::{BatchNodes, StringVector};
    use crate::core::error::ErrorKind;
    use crate::core::ffi::sys;
    use crate::core::memory::MemoryBackend;

    #[test]
    fn null_string_entries_are_malformed() {
        let backend = MemoryBackend::new();
        let mut nodes = StringVector::acquire(&backend).expect("acquire");
        let data = unsafe { libc::calloc(2, std::mem::size_of::<*mut c_char>()) }
            as *mut *mut c_char;
        assert!(!data.is_null());
        unsafe { *data = libc::strdup(c"10.0.0.1:80".as_ptr()) };
        *nodes.raw_mut() = sys::string_vector_t { count: 2, data };

        let err = nodes.to_strings().expect_err("null entry");
        assert_eq!(err.kind(), ErrorKind::MalformedData);
        drop(nodes);
        assert_eq!(backend.resources_released(), 1);
    }

    #[test]
    fn null_batch_keys_are_malformed() {
        let backend = MemoryBackend::new();
        let mut bnodes = BatchNodes::acquire(&backend).expect("acquire");
        let nodes = unsafe { libc::calloc(1, std::mem::size_of::<sys::qconf_node>()) }
            as *mut sys::qconf_node;
        assert!(!nodes.is_null());
        unsafe { (*nodes).value = libc::strdup(c"1".as_ptr()) };
        *bnodes.raw_mut() = sys::qconf_batch_nodes { count: 1, nodes };

        let err = bnodes.to_pairs().expect_err("null key");
        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }
}
