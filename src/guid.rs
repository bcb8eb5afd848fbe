use crate::error::Result;
use crate::reader::ByteFieldReader;
use crate::types::Guid;

/// Outcome of comparing a page's trailing GUID with the schema identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidCheck {
    Match,
    Mismatch { expected: Guid, actual: Guid },
}

impl GuidCheck {
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, GuidCheck::Match)
    }
}

/// Compare the 16 bytes at `offset` against `expected`.
///
/// Pages without an expected GUID always match and the buffer is not read.
pub fn validate<R: ByteFieldReader + ?Sized>(
    expected: Option<Guid>,
    buf: &R,
    offset: usize,
) -> Result<GuidCheck> {
    let Some(expected) = expected else {
        return Ok(GuidCheck::Match);
    };
    let actual = buf.read_guid(offset)?;
    if actual == expected {
        Ok(GuidCheck::Match)
    } else {
        Ok(GuidCheck::Mismatch { expected, actual })
    }
}
