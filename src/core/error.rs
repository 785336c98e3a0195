use std::error::Error as StdError;
use std::fmt;

use crate::core::ffi::sys;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Init,
    NotFound,
    BufferTooSmall,
    MalformedData,
    ZoneResolution,
    HostResolution,
    ResourceAllocation,
    Store,
    Io,
    Unknown,
}

/// Reason text for a native return code, if the code is a known one.
pub fn reason(code: i32) -> Option<&'static str> {
    let text = match code {
        sys::QCONF_ERR_OTHER => "Execute failure!",
        sys::QCONF_OK => "Success",
        sys::QCONF_ERR_PARAM => "Error parameter!",
        sys::QCONF_ERR_MEM => "Failed to malloc memory!",
        sys::QCONF_ERR_TBL_SET => "Failed to set share memory!",
        sys::QCONF_ERR_GET_HOST => "Failed to get zookeeper host!",
        sys::QCONF_ERR_GET_IDC => "Failed to get idc!",
        sys::QCONF_ERR_BUF_NOT_ENOUGH => "Buffer not enough!",
        sys::QCONF_ERR_DATA_TYPE => "Illegal data type!",
        sys::QCONF_ERR_DATA_FORMAT => "Illegal data format!",
        sys::QCONF_ERR_NULL_VALUE => "Null value!",
        sys::QCONF_ERR_NOT_FOUND => "Failed to find key on given idc!",
        sys::QCONF_ERR_OPEN_DUMP => "Failed to open dump file!",
        sys::QCONF_ERR_OPEN_TMP_DUMP => "Failed to open tmp dump file!",
        sys::QCONF_ERR_NOT_IN_DUMP => "Failed to find key in dump!",
        sys::QCONF_ERR_RENAME_DUMP => "Failed to rename dump!",
        sys::QCONF_ERR_WRITE_DUMP => "Failed to write dump!",
        sys::QCONF_ERR_SAME_VALUE => "Same with the value in share memory!",
        sys::QCONF_ERR_LEN_NON_POSITIVE => "Length is not positive!",
        sys::QCONF_ERR_TBL_DATA_MESS => "Share memory data is corrupted!",
        sys::QCONF_ERR_OUT_OF_RANGE => "Configure item error : out of range!",
        sys::QCONF_ERR_NOT_NUMBER => "Configure item error : not number!",
        sys::QCONF_ERR_OTHER_CHARACTER => "Configure item error : further characters exists!",
        sys::QCONF_ERR_INVALID_IP => "Configure item error : invalid ip!",
        sys::QCONF_ERR_INVALID_PORT => "Configure item error : invalid port!",
        sys::QCONF_ERR_NO_MESSAGE => "No message exist in message queue!",
        sys::QCONF_ERR_E2BIG => "Length of message in the queue is too large!",
        sys::QCONF_ERR_MSGGET => "Failed to get message queue!",
        sys::QCONF_ERR_MSGSND => "Failed to send message to queue!",
        sys::QCONF_ERR_MSGRCV => "Failed to receive message from queue!",
        sys::QCONF_ERR_MSGIDRM => "Message queue has been removed!",
        sys::QCONF_ERR_HOSTNAME => "Error hostname!",
        sys::QCONF_ERR_CC_NOT_INIT => "Qconf is not initialized!",
        sys::QCONF_ERR_SEND_MSG_FAILED => "Failed to send message to agent!",
        _ => return None,
    };
    Some(text)
}

/// Classifies a nonzero native return code.
pub fn kind_for_code(code: i32) -> ErrorKind {
    match code {
        sys::QCONF_ERR_OTHER => ErrorKind::Internal,
        sys::QCONF_ERR_PARAM | sys::QCONF_ERR_LEN_NON_POSITIVE => ErrorKind::Usage,
        sys::QCONF_ERR_MEM => ErrorKind::ResourceAllocation,
        sys::QCONF_ERR_GET_HOST | sys::QCONF_ERR_HOSTNAME => ErrorKind::HostResolution,
        sys::QCONF_ERR_GET_IDC => ErrorKind::ZoneResolution,
        sys::QCONF_ERR_BUF_NOT_ENOUGH => ErrorKind::BufferTooSmall,
        sys::QCONF_ERR_DATA_TYPE
        | sys::QCONF_ERR_DATA_FORMAT
        | sys::QCONF_ERR_NULL_VALUE
        | sys::QCONF_ERR_OUT_OF_RANGE
        | sys::QCONF_ERR_NOT_NUMBER
        | sys::QCONF_ERR_OTHER_CHARACTER
        | sys::QCONF_ERR_INVALID_IP
        | sys::QCONF_ERR_INVALID_PORT => ErrorKind::MalformedData,
        sys::QCONF_ERR_NOT_FOUND | sys::QCONF_ERR_NOT_IN_DUMP => ErrorKind::NotFound,
        sys::QCONF_ERR_CC_NOT_INIT => ErrorKind::Init,
        sys::QCONF_ERR_TBL_SET
        | sys::QCONF_ERR_OPEN_DUMP
        | sys::QCONF_ERR_OPEN_TMP_DUMP
        | sys::QCONF_ERR_RENAME_DUMP
        | sys::QCONF_ERR_WRITE_DUMP
        | sys::QCONF_ERR_SAME_VALUE
        | sys::QCONF_ERR_TBL_DATA_MESS
        | sys::QCONF_ERR_NO_MESSAGE
        | sys::QCONF_ERR_E2BIG
        | sys::QCONF_ERR_MSGGET
        | sys::QCONF_ERR_MSGSND
        | sys::QCONF_ERR_MSGRCV
        | sys::QCONF_ERR_MSGIDRM
        | sys::QCONF_ERR_SEND_MSG_FAILED => ErrorKind::Store,
        _ => ErrorKind::Unknown,
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    code: Option<i32>,
    key: Option<String>,
    idc: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            code: None,
            key: None,
            idc: None,
            source: None,
        }
    }

    /// Builds an error from a nonzero native return code, with the table reason as message.
    pub fn from_code(code: i32) -> Self {
        let message = match reason(code) {
            Some(text) => text.to_string(),
            None => format!("unknown error {code}"),
        };
        Self::new(kind_for_code(code))
            .with_code(code)
            .with_message(message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn idc(&self) -> Option<&str> {
        self.idc.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_idc(mut self, idc: impl Into<String>) -> Self {
        self.idc = Some(idc.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(code) = self.code {
            write!(f, " (code: {code})")?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {key})")?;
        }
        if let Some(idc) = &self.idc {
            write!(f, " (idc: {idc})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Init => 4,
        ErrorKind::BufferTooSmall => 5,
        ErrorKind::MalformedData => 6,
        ErrorKind::ZoneResolution => 7,
        ErrorKind::HostResolution => 8,
        ErrorKind::ResourceAllocation => 9,
        ErrorKind::Store => 10,
        ErrorKind::Io => 11,
        ErrorKind::Unknown => 12,
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, kind_for_code, reason, to_exit_code};

    #[test]
    fn exit_code_mapping_is_stable() {
        let cases = [
            (ErrorKind::Internal, 1),
            (ErrorKind::Usage, 2),
            (ErrorKind::NotFound, 3),
            (ErrorKind::Init, 4),
            (ErrorKind::BufferTooSmall, 5),
            (ErrorKind::MalformedData, 6),
            (ErrorKind::ZoneResolution, 7),
            (ErrorKind::HostResolution, 8),
            (ErrorKind::ResourceAllocation, 9),
            (ErrorKind::Store, 10),
            (ErrorKind::Io, 11),
            (ErrorKind::Unknown, 12),
        ];

        for (kind, code) in cases {
            assert_eq!(to_exit_code(kind), code);
        }
    }

    #[test]
    fn native_codes_map_to_kinds() {
        let cases = [
            (-1, ErrorKind::Internal),
            (1, ErrorKind::Usage),
            (2, ErrorKind::ResourceAllocation),
            (4, ErrorKind::HostResolution),
            (5, ErrorKind::ZoneResolution),
            (6, ErrorKind::BufferTooSmall),
            (8, ErrorKind::MalformedData),
            (10, ErrorKind::NotFound),
            (13, ErrorKind::NotFound),
            (15, ErrorKind::Store),
            (31, ErrorKind::MalformedData),
            (71, ErrorKind::HostResolution),
            (81, ErrorKind::Init),
            (1234, ErrorKind::Unknown),
        ];

        for (code, kind) in cases {
            assert_eq!(kind_for_code(code), kind, "code {code}");
        }
    }

    #[test]
    fn known_code_carries_reason() {
        let err = Error::from_code(10);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), Some(10));
        assert_eq!(err.message(), Some("Failed to find key on given idc!"));
        assert_eq!(reason(6), Some("Buffer not enough!"));
    }

    #[test]
    fn unknown_code_gets_generic_message() {
        let err = Error::from_code(99);
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.message(), Some("unknown error 99"));
        assert!(reason(99).is_none());
    }

    #[test]
    fn display_includes_context() {
        let err = Error::from_code(5).with_key("/demo/conf").with_idc("corp");
        assert_eq!(
            err.to_string(),
            "ZoneResolution: Failed to get idc! (code: 5) (key: /demo/conf) (idc: corp)"
        );
    }
}
