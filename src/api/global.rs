//! Purpose: Process-wide client over the linked libqconf, plus free-function shortcuts.
//! Exports: `global`, `get_conf`, `get_host`, `get_all_host`, `get_batch_conf`, `get_batch_keys`.
//! Invariants: Native initialization runs once; a failure is reported on every later call.
//! Invariants: There is no teardown; process exit releases the native handle.
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::client::{ApiResult, Client};
use crate::core::ffi::NativeBackend;

static GLOBAL: OnceLock<Client<NativeBackend>> = OnceLock::new();

/// Returns the process-wide native client, initializing libqconf on first use.
pub fn global() -> ApiResult<&'static Client<NativeBackend>> {
    if let Some(client) = GLOBAL.get() {
        return Ok(client);
    }
    let client = Client::connect(NativeBackend::new())?;
    Ok(GLOBAL.get_or_init(|| client))
}

pub fn get_conf(key: &str, idc: Option<&str>) -> ApiResult<String> {
    global()?.get_conf(key, idc)
}

pub fn get_host(key: &str, idc: Option<&str>) -> ApiResult<String> {
    global()?.get_host(key, idc)
}

pub fn get_all_host(key: &str, idc: Option<&str>) -> ApiResult<Vec<String>> {
    global()?.get_all_host(key, idc)
}

pub fn get_batch_conf(key: &str, idc: Option<&str>) -> ApiResult<BTreeMap<String, String>> {
    global()?.get_batch_conf(key, idc)
}

pub fn get_batch_keys(key: &str, idc: Option<&str>) -> ApiResult<Vec<String>> {
    global()?.get_batch_keys(key, idc)
}
