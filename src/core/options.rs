//! Purpose: Tunables for the client shim: receiving buffer sizes and fetch mode.
//! Exports: `ClientOptions` and the default size constants.
//! Invariants: `validate` guarantees the conf buffer growth loop terminates.
use std::os::raw::c_uint;

use crate::core::backend::FetchMode;
use crate::core::error::{Error, ErrorKind};

pub const CONF_BUF_INIT_LEN: usize = 2 * 1024;
pub const CONF_BUF_MAX_LEN: usize = 1024 * 1024;
pub const CONF_BUF_MULTIPLE: usize = 8;
pub const HOST_BUF_LEN: usize = 256;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    conf_buf_init: usize,
    conf_buf_max: usize,
    conf_buf_multiple: usize,
    host_buf_len: usize,
    mode: FetchMode,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            conf_buf_init: CONF_BUF_INIT_LEN,
            conf_buf_max: CONF_BUF_MAX_LEN,
            conf_buf_multiple: CONF_BUF_MULTIPLE,
            host_buf_len: HOST_BUF_LEN,
            mode: FetchMode::Wait,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conf_buf_init(mut self, len: usize) -> Self {
        self.conf_buf_init = len;
        self
    }

    pub fn with_conf_buf_max(mut self, len: usize) -> Self {
        self.conf_buf_max = len;
        self
    }

    pub fn with_conf_buf_multiple(mut self, multiple: usize) -> Self {
        self.conf_buf_multiple = multiple;
        self
    }

    pub fn with_host_buf_len(mut self, len: usize) -> Self {
        self.host_buf_len = len;
        self
    }

    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn conf_buf_init(&self) -> usize {
        self.conf_buf_init
    }

    pub fn conf_buf_max(&self) -> usize {
        self.conf_buf_max
    }

    pub fn conf_buf_multiple(&self) -> usize {
        self.conf_buf_multiple
    }

    pub fn host_buf_len(&self) -> usize {
        self.host_buf_len
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.conf_buf_init == 0 || self.host_buf_len == 0 {
            return Err(Error::new(ErrorKind::Usage).with_message("buffer sizes must be positive"));
        }
        if self.conf_buf_multiple < 2 {
            return Err(
                Error::new(ErrorKind::Usage).with_message("conf buffer multiple must be at least 2")
            );
        }
        if self.conf_buf_init > self.conf_buf_max {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("initial conf buffer exceeds the maximum conf buffer"));
        }
        let native_max = c_uint::MAX as usize;
        if self.conf_buf_max > native_max || self.host_buf_len > native_max {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("buffer sizes must fit the native length type"));
        }
        Ok(())
    }
}
