//! Purpose: In-process `Backend` that honors the libqconf calling convention without the native library.
//! Exports: `MemoryBackend`, `Fixture`, `ZoneFixture`.
//! Role: Stand-in store for tests, demos, and the CLI's `--fixture` mode.
//! Invariants: Arrays are allocated with the C allocator and freed only by the `destroy_*` calls.
//! Invariants: Paths are rooted and stripped of leading/trailing `/` before any lookup or insert.
//! Invariants: Batch lookups return the direct children of a namespace, keyed by child name.
//! Invariants: A missing zone reports `QCONF_ERR_GET_IDC`; a missing key `QCONF_ERR_NOT_FOUND`.
use std::collections::BTreeMap;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::Deserialize;

use crate::core::backend::{Backend, FetchMode};
use crate::core::error::{Error, ErrorKind};
use crate::core::ffi::sys;

/// Serialized form of a memory store.
///
/// ```json
/// {
///   "default_idc": "corp",
///   "zones": {
///     "corp": {
///       "confs": { "/demo/confs/conf": "v1" },
///       "services": { "/demo/hosts": ["10.0.0.1:8080"] }
///     }
///   }
/// }
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub default_idc: Option<String>,
    #[serde(default)]
    pub zones: BTreeMap<String, ZoneFixture>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneFixture {
    #[serde(default)]
    pub confs: BTreeMap<String, String>,
    #[serde(default)]
    pub services: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default)]
struct Zone {
    confs: BTreeMap<String, CString>,
    services: BTreeMap<String, Vec<CString>>,
}

impl Zone {
    /// Direct children of a normalized namespace as `(name, value)` pairs.
    fn children(&self, namespace: &str) -> Option<Vec<(&str, &CStr)>> {
        let prefix = format!("{namespace}/");
        let children: Vec<(&str, &CStr)> = self
            .confs
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| (&key[prefix.len()..], value.as_c_str()))
            .filter(|(name, _)| !name.is_empty() && !name.contains('/'))
            .collect();
        if children.is_empty() && !self.confs.contains_key(namespace) {
            return None;
        }
        Some(children)
    }
}

#[derive(Debug)]
pub struct MemoryBackend {
    zones: RwLock<BTreeMap<String, Zone>>,
    default_idc: Option<String>,
    init_code: AtomicI32,
    fail_allocations: AtomicBool,
    next_host: AtomicUsize,
    calls: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(BTreeMap::new()),
            default_idc: None,
            init_code: AtomicI32::new(sys::QCONF_OK),
            fail_allocations: AtomicBool::new(false),
            next_host: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    /// Zone used when a lookup passes no idc.
    pub fn with_default_idc(mut self, idc: impl Into<String>) -> Self {
        self.default_idc = Some(idc.into());
        self
    }

    /// Code returned by `init`; nonzero simulates a failed native initialization.
    pub fn with_init_code(self, code: c_int) -> Self {
        self.init_code.store(code, Ordering::Relaxed);
        self
    }

    pub fn from_fixture(fixture: Fixture) -> Result<Self, Error> {
        let mut backend = Self::new();
        backend.default_idc = fixture.default_idc;
        for (idc, zone) in fixture.zones {
            backend.add_zone(&idc);
            for (key, value) in zone.confs {
                backend.set_conf(&idc, &key, &value)?;
            }
            for (key, hosts) in zone.services {
                backend.set_hosts(&idc, &key, hosts)?;
            }
        }
        Ok(backend)
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let fixture: Fixture = serde_json::from_str(json).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("invalid fixture json")
                .with_source(err)
        })?;
        Self::from_fixture(fixture)
    }

    pub fn from_fixture_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read fixture {}", path.display()))
                .with_source(err)
        })?;
        Self::from_json_str(&json)
    }

    /// Registers an empty zone so lookups against it resolve.
    pub fn add_zone(&self, idc: &str) {
        self.write_zones().entry(idc.to_string()).or_default();
    }

    pub fn set_conf(&self, idc: &str, key: &str, value: &str) -> Result<(), Error> {
        let path = checked_path(key)?;
        let value = c_string(value, key)?;
        self.write_zones()
            .entry(idc.to_string())
            .or_default()
            .confs
            .insert(path, value);
        Ok(())
    }

    pub fn remove_conf(&self, idc: &str, key: &str) -> bool {
        let Some(path) = node_path(key) else {
            return false;
        };
        self.write_zones()
            .get_mut(idc)
            .is_some_and(|zone| zone.confs.remove(&path).is_some())
    }

    pub fn set_hosts<I, S>(&self, idc: &str, key: &str, hosts: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = checked_path(key)?;
        let hosts = hosts
            .into_iter()
            .map(|host| c_string(host.as_ref(), key))
            .collect::<Result<Vec<_>, _>>()?;
        self.write_zones()
            .entry(idc.to_string())
            .or_default()
            .services
            .insert(path, hosts);
        Ok(())
    }

    /// Makes every later `init_*` array call fail with `QCONF_ERR_MEM`.
    pub fn fail_allocations(&self, fail: bool) {
        self.fail_allocations.store(fail, Ordering::Relaxed);
    }

    /// Number of lookup calls served (array init/destroy excluded).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn resources_acquired(&self) -> usize {
        self.acquired.load(Ordering::Relaxed)
    }

    pub fn resources_released(&self) -> usize {
        self.released.load(Ordering::Relaxed)
    }

    fn write_zones(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Zone>> {
        self.zones.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_zone<F>(&self, path: &CStr, idc: Option<&CStr>, f: F) -> c_int
    where
        F: FnOnce(&Zone, &str) -> c_int,
    {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let Some(path) = path.to_str().ok().and_then(node_path) else {
            return sys::QCONF_ERR_PARAM;
        };
        let idc = match idc {
            Some(idc) => match idc.to_str() {
                Ok(idc) => idc,
                Err(_) => return sys::QCONF_ERR_PARAM,
            },
            None => match self.default_idc.as_deref() {
                Some(idc) => idc,
                None => return sys::QCONF_ERR_GET_IDC,
            },
        };
        let zones = self.zones.read().unwrap_or_else(PoisonError::into_inner);
        match zones.get(idc) {
            Some(zone) => f(zone, &path),
            None => sys::QCONF_ERR_GET_IDC,
        }
    }
}

impl Backend for MemoryBackend {
    fn init(&self) -> c_int {
        self.init_code.load(Ordering::Relaxed)
    }

    fn get_conf(
        &self,
        path: &CStr,
        buf: &mut [u8],
        idc: Option<&CStr>,
        _mode: FetchMode,
    ) -> c_int {
        self.with_zone(path, idc, |zone, path| match zone.confs.get(path) {
            Some(value) => copy_to_buf(value, buf),
            None => sys::QCONF_ERR_NOT_FOUND,
        })
    }

    fn get_host(
        &self,
        path: &CStr,
        buf: &mut [u8],
        idc: Option<&CStr>,
        _mode: FetchMode,
    ) -> c_int {
        self.with_zone(path, idc, |zone, path| {
            let Some(hosts) = zone.services.get(path) else {
                return sys::QCONF_ERR_NOT_FOUND;
            };
            if hosts.is_empty() {
                if let Some(first) = buf.first_mut() {
                    *first = 0;
                }
                return sys::QCONF_OK;
            }
            let index = self.next_host.fetch_add(1, Ordering::Relaxed) % hosts.len();
            copy_to_buf(&hosts[index], buf)
        })
    }

    fn init_string_vector(&self, nodes: &mut sys::string_vector_t) -> c_int {
        if self.fail_allocations.load(Ordering::Relaxed) {
            return sys::QCONF_ERR_MEM;
        }
        *nodes = sys::string_vector_t::empty();
        self.acquired.fetch_add(1, Ordering::Relaxed);
        sys::QCONF_OK
    }

    fn destroy_string_vector(&self, nodes: &mut sys::string_vector_t) -> c_int {
        unsafe { free_string_vector(nodes) };
        self.released.fetch_add(1, Ordering::Relaxed);
        sys::QCONF_OK
    }

    fn init_batch_nodes(&self, bnodes: &mut sys::qconf_batch_nodes) -> c_int {
        if self.fail_allocations.load(Ordering::Relaxed) {
            return sys::QCONF_ERR_MEM;
        }
        *bnodes = sys::qconf_batch_nodes::empty();
        self.acquired.fetch_add(1, Ordering::Relaxed);
        sys::QCONF_OK
    }

    fn destroy_batch_nodes(&self, bnodes: &mut sys::qconf_batch_nodes) -> c_int {
        unsafe { free_batch_nodes(bnodes) };
        self.released.fetch_add(1, Ordering::Relaxed);
        sys::QCONF_OK
    }

    fn get_allhost(
        &self,
        path: &CStr,
        nodes: &mut sys::string_vector_t,
        idc: Option<&CStr>,
        _mode: FetchMode,
    ) -> c_int {
        self.with_zone(path, idc, |zone, path| match zone.services.get(path) {
            Some(hosts) => {
                let hosts: Vec<&CStr> = hosts.iter().map(CString::as_c_str).collect();
                fill_string_vector(nodes, &hosts)
            }
            None => sys::QCONF_ERR_NOT_FOUND,
        })
    }

    fn get_batch_conf(
        &self,
        path: &CStr,
        bnodes: &mut sys::qconf_batch_nodes,
        idc: Option<&CStr>,
        _mode: FetchMode,
    ) -> c_int {
        self.with_zone(path, idc, |zone, path| match zone.children(path) {
            Some(children) => fill_batch_nodes(bnodes, &children),
            None => sys::QCONF_ERR_NOT_FOUND,
        })
    }

    fn get_batch_keys(
        &self,
        path: &CStr,
        nodes: &mut sys::string_vector_t,
        idc: Option<&CStr>,
        _mode: FetchMode,
    ) -> c_int {
        self.with_zone(path, idc, |zone, path| {
            let Some(children) = zone.children(path) else {
                return sys::QCONF_ERR_NOT_FOUND;
            };
            let keys = match children
                .iter()
                .map(|(key, _)| CString::new(*key))
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(keys) => keys,
                Err(_) => return sys::QCONF_ERR_DATA_FORMAT,
            };
            let keys: Vec<&CStr> = keys.iter().map(CString::as_c_str).collect();
            fill_string_vector(nodes, &keys)
        })
    }

    fn library_version(&self) -> Option<String> {
        Some(format!("memory-{}", env!("CARGO_PKG_VERSION")))
    }
}

/// Roots `path` at `/` with leading and trailing separators stripped; `None` when nothing remains.
fn node_path(path: &str) -> Option<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("/{trimmed}"))
}

fn checked_path(key: &str) -> Result<String, Error> {
    match node_path(key) {
        Some(path) if !path.contains('\0') => Ok(path),
        _ => Err(Error::new(ErrorKind::Usage)
            .with_message("key must name a node and be free of NUL bytes")
            .with_key(key)),
    }
}

fn c_string(text: &str, key: &str) -> Result<CString, Error> {
    CString::new(text).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("value contains a NUL byte")
            .with_key(key)
            .with_source(err)
    })
}

fn copy_to_buf(value: &CStr, buf: &mut [u8]) -> c_int {
    let bytes = value.to_bytes();
    if bytes.len() >= buf.len() {
        return sys::QCONF_ERR_BUF_NOT_ENOUGH;
    }
    buf[..bytes.len()].copy_from_slice(bytes);
    buf[bytes.len()] = 0;
    sys::QCONF_OK
}

fn fill_string_vector(nodes: &mut sys::string_vector_t, items: &[&CStr]) -> c_int {
    unsafe { free_string_vector(nodes) };
    let Ok(count) = c_int::try_from(items.len()) else {
        return sys::QCONF_ERR_MEM;
    };
    let data = unsafe {
        libc::calloc(items.len().max(1), std::mem::size_of::<*mut c_char>()) as *mut *mut c_char
    };
    if data.is_null() {
        return sys::QCONF_ERR_MEM;
    }
    for (index, item) in items.iter().enumerate() {
        let copy = unsafe { libc::strdup(item.as_ptr()) };
        if copy.is_null() {
            let mut partial = sys::string_vector_t {
                count: index as c_int,
                data,
            };
            unsafe { free_string_vector(&mut partial) };
            return sys::QCONF_ERR_MEM;
        }
        unsafe { *data.add(index) = copy };
    }
    nodes.count = count;
    nodes.data = data;
    sys::QCONF_OK
}

fn fill_batch_nodes(bnodes: &mut sys::qconf_batch_nodes, children: &[(&str, &CStr)]) -> c_int {
    unsafe { free_batch_nodes(bnodes) };
    let Ok(count) = c_int::try_from(children.len()) else {
        return sys::QCONF_ERR_MEM;
    };
    let nodes = unsafe {
        libc::calloc(children.len().max(1), std::mem::size_of::<sys::qconf_node>())
            as *mut sys::qconf_node
    };
    if nodes.is_null() {
        return sys::QCONF_ERR_MEM;
    }
    let mut filled = sys::qconf_batch_nodes { count: 0, nodes };
    for (key, value) in children {
        let Ok(key) = CString::new(*key) else {
            unsafe { free_batch_nodes(&mut filled) };
            return sys::QCONF_ERR_DATA_FORMAT;
        };
        let node = sys::qconf_node {
            key: unsafe { libc::strdup(key.as_ptr()) },
            value: unsafe { libc::strdup(value.as_ptr()) },
        };
        let complete = !node.key.is_null() && !node.value.is_null();
        unsafe { *nodes.add(filled.count as usize) = node };
        filled.count += 1;
        if !complete {
            unsafe { free_batch_nodes(&mut filled) };
            return sys::QCONF_ERR_MEM;
        }
    }
    debug_assert_eq!(filled.count, count);
    *bnodes = filled;
    sys::QCONF_OK
}

/// # Safety
/// `nodes` must be empty or hold `count` C-allocated strings in a C-allocated array.
unsafe fn free_string_vector(nodes: &mut sys::string_vector_t) {
    if !nodes.data.is_null() {
        for index in 0..nodes.count.max(0) as usize {
            unsafe { libc::free(*nodes.data.add(index) as *mut libc::c_void) };
        }
        unsafe { libc::free(nodes.data as *mut libc::c_void) };
    }
    *nodes = sys::string_vector_t::empty();
}

/// # Safety
/// `bnodes` must be empty or hold `count` C-allocated key/value pairs in a C-allocated array.
unsafe fn free_batch_nodes(bnodes: &mut sys::qconf_batch_nodes) {
    if !bnodes.nodes.is_null() {
        for index in 0..bnodes.count.max(0) as usize {
            let node = unsafe { &*bnodes.nodes.add(index) };
            unsafe {
                libc::free(node.key as *mut libc::c_void);
                libc::free(node.value as *mut libc::c_void);
            }
        }
        unsafe { libc::free(bnodes.nodes as *mut libc::c_void) };
    }
    *bnodes = sys::qconf_batch_nodes::empty();
}

#[cfg(test)]
mod tests {
    use std::ffi::{CStr, CString};

    use super::MemoryBackend;
    use crate::core::backend::{Backend, FetchMode};
    use crate::core::error::ErrorKind;
    use crate::core::ffi::sys;

    fn c(text: &str) -> CString {
        CString::new(text).expect("cstring")
    }

    #[test]
    fn conf_lookup_respects_buffer_size() {
        let backend = MemoryBackend::new().with_default_idc("corp");
        backend.set_conf("corp", "/demo/conf", "abcd").expect("set");

        let mut small = [0u8; 4];
        let code = backend.get_conf(&c("/demo/conf"), &mut small, None, FetchMode::Wait);
        assert_eq!(code, sys::QCONF_ERR_BUF_NOT_ENOUGH);

        let mut exact = [0xffu8; 5];
        let code = backend.get_conf(&c("/demo/conf"), &mut exact, None, FetchMode::Wait);
        assert_eq!(code, sys::QCONF_OK);
        assert_eq!(&exact, b"abcd\0");
    }

    #[test]
    fn zone_resolution_failures() {
        let backend = MemoryBackend::new();
        backend.set_conf("corp", "/demo/conf", "v").expect("set");
        let mut buf = [0u8; 16];

        let code = backend.get_conf(&c("/demo/conf"), &mut buf, None, FetchMode::Wait);
        assert_eq!(code, sys::QCONF_ERR_GET_IDC);

        let code = backend.get_conf(
            &c("/demo/conf"),
            &mut buf,
            Some(c("bjt").as_c_str()),
            FetchMode::Wait,
        );
        assert_eq!(code, sys::QCONF_ERR_GET_IDC);

        let code = backend.get_conf(
            &c("/missing"),
            &mut buf,
            Some(c("corp").as_c_str()),
            FetchMode::Wait,
        );
        assert_eq!(code, sys::QCONF_ERR_NOT_FOUND);

        let code = backend.get_conf(
            &c(""),
            &mut buf,
            Some(c("corp").as_c_str()),
            FetchMode::Wait,
        );
        assert_eq!(code, sys::QCONF_ERR_PARAM);
    }

    #[test]
    fn batch_children_are_direct_only() {
        let backend = MemoryBackend::new().with_default_idc("corp");
        backend.set_conf("corp", "/demo/confs/a", "1").expect("set");
        backend.set_conf("corp", "/demo/confs/b", "2").expect("set");
        backend.set_conf("corp", "/demo/confs/b/deep", "3").expect("set");
        backend.set_conf("corp", "/demo/confsx", "4").expect("set");

        let mut nodes = sys::string_vector_t::empty();
        assert_eq!(backend.init_string_vector(&mut nodes), sys::QCONF_OK);
        let code = backend.get_batch_keys(&c("/demo/confs"), &mut nodes, None, FetchMode::Wait);
        assert_eq!(code, sys::QCONF_OK);
        assert_eq!(nodes.count, 2);
        let names: Vec<&str> = (0..2)
            .map(|index| unsafe { CStr::from_ptr(*nodes.data.add(index)) })
            .map(|name| name.to_str().expect("utf8"))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(backend.destroy_string_vector(&mut nodes), sys::QCONF_OK);
        assert!(nodes.data.is_null());
        assert_eq!(backend.resources_acquired(), 1);
        assert_eq!(backend.resources_released(), 1);
    }

    #[test]
    fn batch_conf_is_keyed_by_child_name() {
        let backend = MemoryBackend::new().with_default_idc("corp");
        backend.set_conf("corp", "/demo/confs/a", "1").expect("set");

        let mut bnodes = sys::qconf_batch_nodes::empty();
        assert_eq!(backend.init_batch_nodes(&mut bnodes), sys::QCONF_OK);
        let code = backend.get_batch_conf(&c("demo/confs/"), &mut bnodes, None, FetchMode::Wait);
        assert_eq!(code, sys::QCONF_OK);
        assert_eq!(bnodes.count, 1);
        let node = unsafe { &*bnodes.nodes };
        assert_eq!(unsafe { CStr::from_ptr(node.key) }.to_bytes(), b"a");
        assert_eq!(unsafe { CStr::from_ptr(node.value) }.to_bytes(), b"1");
        assert_eq!(backend.destroy_batch_nodes(&mut bnodes), sys::QCONF_OK);
    }

    #[test]
    fn paths_are_normalized_like_the_native_library() {
        let backend = MemoryBackend::new().with_default_idc("corp");
        backend.set_conf("corp", "/demo/conf", "v1").expect("set");
        backend.set_conf("corp", "other/conf/", "v2").expect("set");

        for path in ["/demo/conf", "demo/conf", "/demo/conf/", "//demo/conf", "demo/conf//"] {
            let mut buf = [0u8; 8];
            let code = backend.get_conf(&c(path), &mut buf, None, FetchMode::Wait);
            assert_eq!(code, sys::QCONF_OK, "path {path}");
            assert_eq!(&buf[..3], b"v1\0");
        }

        let mut buf = [0u8; 8];
        let code = backend.get_conf(&c("/other/conf"), &mut buf, None, FetchMode::Wait);
        assert_eq!(code, sys::QCONF_OK);

        for path in ["/", "///"] {
            let code = backend.get_conf(&c(path), &mut buf, None, FetchMode::Wait);
            assert_eq!(code, sys::QCONF_ERR_PARAM, "path {path}");
        }
        let err = backend.set_conf("corp", "/", "v").expect_err("root");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(backend.remove_conf("corp", "demo/conf/"));
    }

    #[test]
    fn hosts_rotate() {
        let backend = MemoryBackend::new().with_default_idc("corp");
        backend
            .set_hosts("corp", "/demo/hosts", ["h1:80", "h2:80"])
            .expect("set");
        let mut seen = Vec::new();
        for _ in 0..2 {
            let mut buf = [0u8; 16];
            let code = backend.get_host(&c("/demo/hosts"), &mut buf, None, FetchMode::Wait);
            assert_eq!(code, sys::QCONF_OK);
            let end = buf.iter().position(|b| *b == 0).expect("nul");
            seen.push(String::from_utf8(buf[..end].to_vec()).expect("utf8"));
        }
        seen.sort();
        assert_eq!(seen, vec!["h1:80", "h2:80"]);
    }

    #[test]
    fn fixture_json_is_loaded() {
        let json = r#"{
            "default_idc": "corp",
            "zones": {
                "corp": {
                    "confs": {"/demo/confs/conf": "v1"},
                    "services": {"/demo/hosts": ["10.0.0.1:80"]}
                },
                "bjt": {}
            }
        }"#;
        let backend = MemoryBackend::from_json_str(json).expect("fixture");
        let mut buf = [0u8; 8];
        let code = backend.get_conf(&c("/demo/confs/conf"), &mut buf, None, FetchMode::Wait);
        assert_eq!(code, sys::QCONF_OK);
        let code = backend.get_conf(
            &c("/demo/confs/conf"),
            &mut buf,
            Some(c("bjt").as_c_str()),
            FetchMode::Wait,
        );
        assert_eq!(code, sys::QCONF_ERR_NOT_FOUND);
    }

    #[test]
    fn removed_conf_is_not_found() {
        let backend = MemoryBackend::new().with_default_idc("corp");
        backend.set_conf("corp", "/demo/conf", "v").expect("set");
        assert!(backend.remove_conf("corp", "/demo/conf"));
        assert!(!backend.remove_conf("corp", "/demo/conf"));
        assert!(!backend.remove_conf("bjt", "/demo/conf"));

        let mut buf = [0u8; 8];
        let code = backend.get_conf(&c("/demo/conf"), &mut buf, None, FetchMode::Wait);
        assert_eq!(code, sys::QCONF_ERR_NOT_FOUND);
    }

    #[test]
    fn fixture_rejects_unknown_fields_and_nul_values() {
        let err = MemoryBackend::from_json_str(r#"{"zonez": {}}"#).expect_err("unknown field");
        assert_eq!(err.kind(), ErrorKind::Usage);

        let backend = MemoryBackend::new();
        let err = backend.set_conf("corp", "/k", "a\0b").expect_err("nul");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }
}
