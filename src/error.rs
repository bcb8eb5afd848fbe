// ─── Error ──────────────────────────────────────────────────────────────────
use crate::types::Guid;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LogPageError>;

/// Exit status used for every decode failure that has no better code.
pub const EXIT_FAILURE: i32 = 1;
/// `EINVAL`, returned for a bad output format like the host tool does.
pub const EXIT_INVALID_ARGUMENT: i32 = 22;

/// Opaque failure from the device transport. Passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("NVMe status: {message} (0x{status:x})")]
pub struct TransportError {
    pub status: i32,
    pub message: String,
}

impl TransportError {
    pub fn new(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogPageError {
    #[error("read of {width} bytes at offset {offset} exceeds buffer of {len} bytes")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },
    #[error("unsupported field width: {0} bytes")]
    InvalidWidth(usize),
    #[error("bit range {bit_offset}+{bit_count} exceeds a {width}-byte word")]
    InvalidBitRange {
        bit_offset: u32,
        bit_count: u32,
        width: usize,
    },
    #[error("log page 0x{log_id:02x} truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        log_id: u8,
        expected: usize,
        actual: usize,
    },
    #[error("unknown GUID in log page data (expected {expected}, actual {actual})")]
    GuidMismatch { expected: Guid, actual: Guid },
    #[error("unsupported version {version} for log page 0x{log_id:02x}")]
    UnsupportedVersion { log_id: u8, version: u16 },
    #[error("unknown output format: {0}")]
    UnsupportedFormat(String),
    #[error("no decoder for log page 0x{0:02x}")]
    UnknownLogId(u8),
    #[error("failed to serialize log page: {0}")]
    Serialize(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl LogPageError {
    #[inline]
    pub fn out_of_bounds(offset: usize, width: usize, len: usize) -> Self {
        Self::OutOfBounds { offset, width, len }
    }

    #[inline]
    pub fn truncated(log_id: u8, expected: usize, actual: usize) -> Self {
        Self::Truncated {
            log_id,
            expected,
            actual,
        }
    }

    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Process exit status the command reports for this error.
    pub fn exit_status(&self) -> i32 {
        match self {
            Self::UnsupportedFormat(_) => EXIT_INVALID_ARGUMENT,
            Self::Transport(e) if e.status > 0 => e.status,
            _ => EXIT_FAILURE,
        }
    }

    /// Diagnostic lines for the user, one per line of stderr.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            Self::GuidMismatch { expected, actual } => vec![
                "ERROR: Unknown GUID in log page data".to_string(),
                format!("ERROR: Expected GUID: {expected}"),
                format!("ERROR: Actual GUID: {actual}"),
            ],
            other => vec![format!("ERROR: {other}")],
        }
    }
}
