use super::{FieldKind, FieldSpec, LogPageSchema};
use crate::types::{LID_SUPPORTED_LOG_PAGES, SUPPORTED_LOG_PAGES_ENTRIES, SUPPORTED_LOG_PAGES_LEN};

// ─── Supported Log Pages ────────────────────────────────────────────────────

const FIELDS: &[FieldSpec] = &[FieldSpec::new(
    "supported:",
    "supported",
    0,
    FieldKind::Directory {
        entries: SUPPORTED_LOG_PAGES_ENTRIES,
    },
)];

/// No GUID trailer and no version: every entry is always present.
pub static SUPPORTED_LOG_PAGES: LogPageSchema = LogPageSchema {
    log_id: LID_SUPPORTED_LOG_PAGES,
    name: "log-page-directory",
    title: "Log Page Directory Log:",
    label_width: 16,
    total_length: SUPPORTED_LOG_PAGES_LEN,
    guid: None,
    guid_offset: 0,
    version: None,
    versions: 0..=0,
    fields: FIELDS,
};
