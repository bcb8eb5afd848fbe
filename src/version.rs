use crate::error::{LogPageError, Result};
use crate::reader::ByteFieldReader;
use crate::schema::{FieldSpec, LogPageSchema};

/// Location of a page's version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionField {
    pub offset: usize,
    pub width: usize,
}

impl VersionField {
    pub const fn u16_at(offset: usize) -> Self {
        Self { offset, width: 2 }
    }
}

/// Resolved version of the page, 0 when the schema has no version field.
pub fn resolve<R: ByteFieldReader + ?Sized>(schema: &LogPageSchema, buf: &R) -> Result<u16> {
    let Some(field) = schema.version else {
        return Ok(0);
    };
    let raw = buf.read_uint(field.offset, field.width)?;
    // Wider version words are clamped so they land outside any accepted range.
    Ok(u16::try_from(raw).unwrap_or(u16::MAX))
}

/// Reject versions the schema does not know how to lay out.
pub fn check(schema: &LogPageSchema, version: u16) -> Result<()> {
    if schema.versions.contains(&version) {
        Ok(())
    } else {
        Err(LogPageError::UnsupportedVersion {
            log_id: schema.log_id,
            version,
        })
    }
}

/// Whether `field` exists in a page of `version`.
#[inline]
pub fn includes(field: &FieldSpec, version: u16) -> bool {
    version >= field.min_version
}
