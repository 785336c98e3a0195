//! Purpose: The read-only client shim over a configuration store backend.
//! Exports: `Client`, `ApiResult`, `version`.
//! Role: Marshals keys/zones into C strings, manages buffers and native arrays, maps codes to errors.
//! Invariants: Holds no cache and no mutable state; every call is one synchronous round-trip.
//! Invariants: Only `get_conf` retries, and only on buffer-too-small, bounded by `conf_buf_max`.
//! Invariants: Native arrays are released exactly once on every exit path after acquisition.
use std::collections::BTreeMap;
use std::ffi::CString;
use std::os::raw::c_int;

use tracing::{debug, warn};

use crate::core::backend::Backend;
use crate::core::error::{Error, ErrorKind};
use crate::core::ffi::sys;
use crate::core::options::ClientOptions;
use crate::core::resource::{BatchNodes, StringVector};

pub type ApiResult<T> = Result<T, Error>;

/// Client library version. Never touches the store.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[derive(Debug)]
pub struct Client<B> {
    backend: B,
    options: ClientOptions,
}

impl<B: Backend> Client<B> {
    /// Initializes the backend with default options. Failure is fatal for this backend.
    pub fn connect(backend: B) -> ApiResult<Self> {
        Self::connect_with(backend, ClientOptions::default())
    }

    pub fn connect_with(backend: B, options: ClientOptions) -> ApiResult<Self> {
        options.validate()?;
        let code = backend.init();
        if code != sys::QCONF_OK {
            warn!(code, "configuration store initialization failed");
            let reason = Error::from_code(code);
            return Err(Error::new(ErrorKind::Init)
                .with_code(code)
                .with_message(format!(
                    "failed to initialize qconf: {}",
                    reason.message().unwrap_or("unknown")
                )));
        }
        Ok(Self { backend, options })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn version(&self) -> &'static str {
        version()
    }

    pub fn library_version(&self) -> Option<String> {
        self.backend.library_version()
    }

    /// Fetches one configuration value as text.
    pub fn get_conf(&self, key: &str, idc: Option<&str>) -> ApiResult<String> {
        let call = Call::new(key, idc)?;
        let bytes = self.fetch_conf(&call)?;
        String::from_utf8(bytes).map_err(|err| {
            call.annotate(
                Error::new(ErrorKind::MalformedData)
                    .with_message("value is not valid utf-8")
                    .with_source(err),
            )
        })
    }

    /// Fetches one configuration value as raw bytes.
    pub fn get_conf_bytes(&self, key: &str, idc: Option<&str>) -> ApiResult<Vec<u8>> {
        let call = Call::new(key, idc)?;
        self.fetch_conf(&call)
    }

    /// Fetches one endpoint of a service into a fixed-size buffer.
    pub fn get_host(&self, key: &str, idc: Option<&str>) -> ApiResult<String> {
        let call = Call::new(key, idc)?;
        let mut buf = vec![0u8; self.options.host_buf_len()];
        let code = self
            .backend
            .get_host(&call.c_key, &mut buf, call.c_idc(), self.options.mode());
        if code != sys::QCONF_OK {
            return Err(call.error(code));
        }
        String::from_utf8(take_c_bytes(buf)).map_err(|err| {
            call.annotate(
                Error::new(ErrorKind::MalformedData)
                    .with_message("host is not valid utf-8")
                    .with_source(err),
            )
        })
    }

    /// Fetches every endpoint of a service.
    pub fn get_all_host(&self, key: &str, idc: Option<&str>) -> ApiResult<Vec<String>> {
        let call = Call::new(key, idc)?;
        let mut nodes = StringVector::acquire(&self.backend).map_err(|err| call.annotate(err))?;
        let code = self.backend.get_allhost(
            &call.c_key,
            nodes.raw_mut(),
            call.c_idc(),
            self.options.mode(),
        );
        if code != sys::QCONF_OK {
            return Err(call.error(code));
        }
        nodes.to_strings().map_err(|err| call.annotate(err))
    }

    /// Fetches every key/value pair directly under a namespace.
    pub fn get_batch_conf(
        &self,
        key: &str,
        idc: Option<&str>,
    ) -> ApiResult<BTreeMap<String, String>> {
        let call = Call::new(key, idc)?;
        let mut bnodes = BatchNodes::acquire(&self.backend).map_err(|err| call.annotate(err))?;
        let code = self.backend.get_batch_conf(
            &call.c_key,
            bnodes.raw_mut(),
            call.c_idc(),
            self.options.mode(),
        );
        if code != sys::QCONF_OK {
            return Err(call.error(code));
        }
        let pairs = bnodes.to_pairs().map_err(|err| call.annotate(err))?;
        Ok(pairs.into_iter().collect())
    }

    /// Fetches every key directly under a namespace.
    pub fn get_batch_keys(&self, key: &str, idc: Option<&str>) -> ApiResult<Vec<String>> {
        let call = Call::new(key, idc)?;
        let mut nodes = StringVector::acquire(&self.backend).map_err(|err| call.annotate(err))?;
        let code = self.backend.get_batch_keys(
            &call.c_key,
            nodes.raw_mut(),
            call.c_idc(),
            self.options.mode(),
        );
        if code != sys::QCONF_OK {
            return Err(call.error(code));
        }
        nodes.to_strings().map_err(|err| call.annotate(err))
    }

    fn fetch_conf(&self, call: &Call<'_>) -> ApiResult<Vec<u8>> {
        let max = self.options.conf_buf_max();
        let multiple = self.options.conf_buf_multiple();
        let mut buf_len = self.options.conf_buf_init();
        loop {
            let mut buf = vec![0u8; buf_len];
            let code =
                self.backend
                    .get_conf(&call.c_key, &mut buf, call.c_idc(), self.options.mode());
            match code {
                sys::QCONF_OK => return Ok(take_c_bytes(buf)),
                sys::QCONF_ERR_BUF_NOT_ENOUGH => {
                    let next = buf_len.saturating_mul(multiple);
                    if next > max {
                        return Err(call.error(code));
                    }
                    debug!(key = call.key, from = buf_len, to = next, "growing conf buffer");
                    buf_len = next;
                }
                _ => return Err(call.error(code)),
            }
        }
    }
}

/// Arguments of one lookup, marshalled for the native boundary.
struct Call<'a> {
    key: &'a str,
    idc: Option<&'a str>,
    c_key: CString,
    c_idc: Option<CString>,
}

impl<'a> Call<'a> {
    fn new(key: &'a str, idc: Option<&'a str>) -> ApiResult<Self> {
        let idc = idc.filter(|idc| !idc.is_empty());
        let c_key = CString::new(key).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("key contains a NUL byte")
                .with_key(key)
                .with_source(err)
        })?;
        let c_idc = idc
            .map(|idc| {
                CString::new(idc).map_err(|err| {
                    Error::new(ErrorKind::Usage)
                        .with_message("idc contains a NUL byte")
                        .with_key(key)
                        .with_source(err)
                })
            })
            .transpose()?;
        Ok(Self {
            key,
            idc,
            c_key,
            c_idc,
        })
    }

    fn c_idc(&self) -> Option<&std::ffi::CStr> {
        self.c_idc.as_deref()
    }

    fn annotate(&self, err: Error) -> Error {
        let err = err.with_key(self.key);
        match self.idc {
            Some(idc) => err.with_idc(idc),
            None => err,
        }
    }

    fn error(&self, code: c_int) -> Error {
        self.annotate(Error::from_code(code))
    }
}

fn take_c_bytes(mut buf: Vec<u8>) -> Vec<u8> {
    let end = buf.iter().position(|byte| *byte == 0).unwrap_or(buf.len());
    buf.truncate(end);
    buf
}
