use crate::error::{LogPageError, Result};
use crate::types::{GUID_LEN, Guid, Timestamp};

/// Bounds-checked little-endian field access over a raw log page.
///
/// Every read checks `offset + width` against the buffer before indexing and
/// returns [`LogPageError::OutOfBounds`] instead of panicking.
pub trait ByteFieldReader {
    fn data_buf(&self) -> &[u8];

    /// Borrow `width` bytes at `offset`.
    #[inline]
    fn read_bytes(&self, offset: usize, width: usize) -> Result<&[u8]> {
        let buf = self.data_buf();
        let end = offset
            .checked_add(width)
            .ok_or_else(|| LogPageError::out_of_bounds(offset, width, buf.len()))?;
        if end > buf.len() {
            return Err(LogPageError::out_of_bounds(offset, width, buf.len()));
        }
        Ok(&buf[offset..end])
    }

    /// Copy `N` bytes at `offset` into a fixed array.
    #[inline]
    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(offset, N)?);
        Ok(out)
    }

    #[inline]
    fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    #[inline]
    fn read_u16(&self, offset: usize) -> Result<u16> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    #[inline]
    fn read_u32(&self, offset: usize) -> Result<u32> {
        self.read_array(offset).map(u32::from_le_bytes)
    }

    #[inline]
    fn read_u64(&self, offset: usize) -> Result<u64> {
        self.read_array(offset).map(u64::from_le_bytes)
    }

    /// Unsigned integer of 1, 2, 4 or 8 bytes, widened to u64.
    fn read_uint(&self, offset: usize, width: usize) -> Result<u64> {
        match width {
            1 => self.read_u8(offset).map(u64::from),
            2 => self.read_u16(offset).map(u64::from),
            4 => self.read_u32(offset).map(u64::from),
            8 => self.read_u64(offset),
            other => Err(LogPageError::InvalidWidth(other)),
        }
    }

    /// 128-bit little-endian counter as `(hi, lo)`.
    #[inline]
    fn read_u128(&self, offset: usize) -> Result<(u64, u64)> {
        // Check the full 16 bytes up front so a half-present value never decodes.
        self.read_bytes(offset, 16)?;
        let lo = self.read_u64(offset)?;
        let hi = self.read_u64(offset + 8)?;
        Ok((hi, lo))
    }

    /// `bit_count` bits starting at `bit_offset` of the `width`-byte word at `offset`.
    fn read_bits(&self, offset: usize, width: usize, bit_offset: u32, bit_count: u32) -> Result<u64> {
        let word_bits = (width as u32).saturating_mul(8);
        if bit_offset.saturating_add(bit_count) > word_bits {
            return Err(LogPageError::InvalidBitRange {
                bit_offset,
                bit_count,
                width,
            });
        }
        let word = self.read_uint(offset, width)?;
        let mask = if bit_count >= 64 {
            u64::MAX
        } else {
            (1u64 << bit_count) - 1
        };
        Ok(word.checked_shr(bit_offset).unwrap_or(0) & mask)
    }

    /// Milliseconds since the Unix epoch; all-ones means not available.
    #[inline]
    fn read_timestamp(&self, offset: usize) -> Result<Timestamp> {
        self.read_u64(offset).map(Timestamp::from)
    }

    #[inline]
    fn read_guid(&self, offset: usize) -> Result<Guid> {
        self.read_array::<GUID_LEN>(offset).map(Guid)
    }
}

impl ByteFieldReader for [u8] {
    #[inline]
    fn data_buf(&self) -> &[u8] {
        self
    }
}

impl ByteFieldReader for Vec<u8> {
    #[inline]
    fn data_buf(&self) -> &[u8] {
        self
    }
}
