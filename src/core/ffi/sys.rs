// Raw FFI surface of libqconf: return codes, array structs, and (with `native`) the C entry points.
#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_int};

pub const QCONF_ERR_OTHER: c_int = -1;
pub const QCONF_OK: c_int = 0;
pub const QCONF_ERR_PARAM: c_int = 1;
pub const QCONF_ERR_MEM: c_int = 2;
pub const QCONF_ERR_TBL_SET: c_int = 3;
pub const QCONF_ERR_GET_HOST: c_int = 4;
pub const QCONF_ERR_GET_IDC: c_int = 5;
pub const QCONF_ERR_BUF_NOT_ENOUGH: c_int = 6;
pub const QCONF_ERR_DATA_TYPE: c_int = 7;
pub const QCONF_ERR_DATA_FORMAT: c_int = 8;
pub const QCONF_ERR_NULL_VALUE: c_int = 9;
pub const QCONF_ERR_NOT_FOUND: c_int = 10;
pub const QCONF_ERR_OPEN_DUMP: c_int = 11;
pub const QCONF_ERR_OPEN_TMP_DUMP: c_int = 12;
pub const QCONF_ERR_NOT_IN_DUMP: c_int = 13;
pub const QCONF_ERR_RENAME_DUMP: c_int = 14;
pub const QCONF_ERR_WRITE_DUMP: c_int = 15;
pub const QCONF_ERR_SAME_VALUE: c_int = 16;
pub const QCONF_ERR_LEN_NON_POSITIVE: c_int = 17;
pub const QCONF_ERR_TBL_DATA_MESS: c_int = 18;
pub const QCONF_ERR_OUT_OF_RANGE: c_int = 20;
pub const QCONF_ERR_NOT_NUMBER: c_int = 21;
pub const QCONF_ERR_OTHER_CHARACTER: c_int = 22;
pub const QCONF_ERR_INVALID_IP: c_int = 30;
pub const QCONF_ERR_INVALID_PORT: c_int = 31;
pub const QCONF_ERR_NO_MESSAGE: c_int = 40;
pub const QCONF_ERR_E2BIG: c_int = 41;
pub const QCONF_ERR_MSGGET: c_int = 42;
pub const QCONF_ERR_MSGSND: c_int = 43;
pub const QCONF_ERR_MSGRCV: c_int = 44;
pub const QCONF_ERR_MSGIDRM: c_int = 45;
pub const QCONF_ERR_HOSTNAME: c_int = 71;
pub const QCONF_ERR_CC_NOT_INIT: c_int = 81;
pub const QCONF_ERR_SEND_MSG_FAILED: c_int = 91;

#[repr(C)]
#[derive(Debug)]
pub struct string_vector_t {
    pub count: c_int,
    pub data: *mut *mut c_char,
}

#[repr(C)]
#[derive(Debug)]
pub struct qconf_node {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

#[repr(C)]
#[derive(Debug)]
pub struct qconf_batch_nodes {
    pub count: c_int,
    pub nodes: *mut qconf_node,
}

impl string_vector_t {
    pub const fn empty() -> Self {
        Self {
            count: 0,
            data: std::ptr::null_mut(),
        }
    }
}

impl qconf_batch_nodes {
    pub const fn empty() -> Self {
        Self {
            count: 0,
            nodes: std::ptr::null_mut(),
        }
    }
}

#[cfg(feature = "native")]
unsafe extern "C" {
    pub fn qconf_init() -> c_int;

    pub fn init_string_vector(nodes: *mut string_vector_t) -> c_int;
    pub fn destroy_string_vector(nodes: *mut string_vector_t) -> c_int;
    pub fn init_qconf_batch_nodes(bnodes: *mut qconf_batch_nodes) -> c_int;
    pub fn destroy_qconf_batch_nodes(bnodes: *mut qconf_batch_nodes) -> c_int;

    pub fn qconf_get_conf(
        path: *const c_char,
        buf: *mut c_char,
        buf_len: std::os::raw::c_uint,
        idc: *const c_char,
    ) -> c_int;
    pub fn qconf_aget_conf(
        path: *const c_char,
        buf: *mut c_char,
        buf_len: std::os::raw::c_uint,
        idc: *const c_char,
    ) -> c_int;

    pub fn qconf_get_host(
        path: *const c_char,
        buf: *mut c_char,
        buf_len: std::os::raw::c_uint,
        idc: *const c_char,
    ) -> c_int;
    pub fn qconf_aget_host(
        path: *const c_char,
        buf: *mut c_char,
        buf_len: std::os::raw::c_uint,
        idc: *const c_char,
    ) -> c_int;

    pub fn qconf_get_allhost(
        path: *const c_char,
        nodes: *mut string_vector_t,
        idc: *const c_char,
    ) -> c_int;
    pub fn qconf_aget_allhost(
        path: *const c_char,
        nodes: *mut string_vector_t,
        idc: *const c_char,
    ) -> c_int;

    pub fn qconf_get_batch_conf(
        path: *const c_char,
        bnodes: *mut qconf_batch_nodes,
        idc: *const c_char,
    ) -> c_int;
    pub fn qconf_aget_batch_conf(
        path: *const c_char,
        bnodes: *mut qconf_batch_nodes,
        idc: *const c_char,
    ) -> c_int;

    pub fn qconf_get_batch_keys(
        path: *const c_char,
        nodes: *mut string_vector_t,
        idc: *const c_char,
    ) -> c_int;
    pub fn qconf_aget_batch_keys(
        path: *const c_char,
        nodes: *mut string_vector_t,
        idc: *const c_char,
    ) -> c_int;

    pub fn qconf_version() -> *const c_char;
}
