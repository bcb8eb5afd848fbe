//! Schema-driven log page decoding.
//!
//! [`decode`] is a pure function of a schema and a buffer: it checks length,
//! version and GUID identity, then extracts every field the resolved version
//! carries in on-wire order.

use crate::error::{LogPageError, Result};
use crate::guid::{self, GuidCheck};
use crate::reader::ByteFieldReader;
use crate::schema::{self, CellKind, Column, FieldKind, FieldSpec, GridSpec, LogPageSchema, MAX_GRID_COLUMNS};
use crate::types::{Guid, lid_to_description};
use crate::value::{DecodedField, DecodedLogPage, DecodedValue, DirectoryEntry, Grid, GridRow};
use crate::version;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

// ─── Outcome ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    Valid,
    /// Fields were extracted but the page belongs to someone else.
    GuidMismatch { expected: Guid, actual: Guid },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPage {
    pub page: DecodedLogPage,
    pub outcome: DecodeOutcome,
}

impl DecodedPage {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.outcome == DecodeOutcome::Valid
    }

    /// The page, or [`LogPageError::GuidMismatch`] when its identity did not check out.
    pub fn into_result(self) -> Result<DecodedLogPage> {
        match self.outcome {
            DecodeOutcome::Valid => Ok(self.page),
            DecodeOutcome::GuidMismatch { expected, actual } => {
                Err(LogPageError::GuidMismatch { expected, actual })
            }
        }
    }
}

// ─── Decode ─────────────────────────────────────────────────────────────────

/// Decode `buf` against `schema`.
///
/// Buffers longer than the schema are decoded over their first
/// `total_length` bytes. Truncation and unsupported versions fail before any
/// field is read; a GUID mismatch is reported through [`DecodeOutcome`].
pub fn decode(schema: &LogPageSchema, buf: &[u8]) -> Result<DecodedPage> {
    if buf.len() < schema.total_length {
        return Err(LogPageError::truncated(schema.log_id, schema.total_length, buf.len()));
    }
    let buf = &buf[..schema.total_length];

    let version = version::resolve(schema, buf)?;
    version::check(schema, version)?;
    debug!(log_id = schema.log_id, version, "resolved log page version");

    let guid = guid::validate(schema.guid, buf, schema.guid_offset)?;
    let outcome = match guid {
        GuidCheck::Match => DecodeOutcome::Valid,
        GuidCheck::Mismatch { expected, actual } => {
            warn!(log_id = schema.log_id, %expected, %actual, "unknown GUID in log page data");
            DecodeOutcome::GuidMismatch { expected, actual }
        }
    };

    let mut fields = Vec::with_capacity(schema.fields.len());
    for spec in schema.fields.iter().filter(|f| version::includes(f, version)) {
        let value = decode_field(spec, buf)?;
        trace!(key = spec.key, offset = spec.offset, ?value, "decoded field");
        fields.push(DecodedField { spec: *spec, value });
    }
    debug!(
        log_id = schema.log_id,
        fields = fields.len(),
        skipped = schema.fields.len() - fields.len(),
        "decoded log page"
    );

    Ok(DecodedPage {
        page: DecodedLogPage {
            log_id: schema.log_id,
            name: schema.name,
            title: schema.title,
            label_width: schema.label_width,
            version,
            guid,
            fields,
        },
        outcome,
    })
}

/// Decode with the registered schema for `log_id`.
pub fn decode_log(log_id: u8, buf: &[u8]) -> Result<DecodedPage> {
    decode(schema::lookup(log_id)?, buf)
}

// ─── Fields ─────────────────────────────────────────────────────────────────

fn decode_field<R: ByteFieldReader + ?Sized>(spec: &FieldSpec, buf: &R) -> Result<DecodedValue> {
    // Whole extent first: a field never decodes from a partial read.
    buf.read_bytes(spec.offset, spec.width())?;

    Ok(match spec.kind {
        FieldKind::Uint { width, mask } => {
            let raw = buf.read_uint(spec.offset, width)?;
            let raw = mask.map_or(raw, |m| raw & m);
            DecodedValue::Uint(spec.scale.apply(raw))
        }
        FieldKind::Uint128 => {
            let (hi, lo) = buf.read_u128(spec.offset)?;
            DecodedValue::Uint128 { hi, lo }
        }
        FieldKind::Bits {
            width,
            bit_offset,
            bit_count,
        } => DecodedValue::Bits(buf.read_bits(spec.offset, width, bit_offset, bit_count)?),
        FieldKind::Bytes { len } => DecodedValue::Bytes(buf.read_bytes(spec.offset, len)?.to_vec()),
        FieldKind::Timestamp => DecodedValue::Timestamp(buf.read_timestamp(spec.offset)?),
        FieldKind::Guid => DecodedValue::Guid(buf.read_guid(spec.offset)?),
        FieldKind::Grid(grid) => DecodedValue::Grid(decode_grid(spec, &grid, buf)?),
        FieldKind::FlagGrid { width, rows, columns } => {
            DecodedValue::Grid(decode_flag_grid(spec.offset, width, rows, columns, buf)?)
        }
        FieldKind::Directory { entries } => {
            DecodedValue::Directory(decode_directory(spec.offset, entries, buf)?)
        }
    })
}

#[inline]
fn shown(columns: &'static [Column]) -> &'static [Column] {
    &columns[..columns.len().min(MAX_GRID_COLUMNS)]
}

fn decode_grid<R: ByteFieldReader + ?Sized>(spec: &FieldSpec, grid: &GridSpec, buf: &R) -> Result<Grid> {
    let columns = shown(grid.columns);
    let cell_width = grid.cell.width();
    let mut rows = Vec::with_capacity(grid.rows);
    for row in 0..grid.rows {
        let mut cells = GridRow::new();
        for col in 0..columns.len() {
            let offset = spec.offset + (row * grid.stride + col) * cell_width;
            let cell = match grid.cell {
                CellKind::Uint(width) => DecodedValue::Uint(spec.scale.apply(buf.read_uint(offset, width)?)),
                CellKind::Timestamp => DecodedValue::Timestamp(buf.read_timestamp(offset)?),
            };
            cells.push(cell);
        }
        rows.push(cells);
    }
    Ok(Grid { columns, rows })
}

fn decode_flag_grid<R: ByteFieldReader + ?Sized>(
    offset: usize,
    width: usize,
    rows: usize,
    columns: &'static [Column],
    buf: &R,
) -> Result<Grid> {
    let columns = shown(columns);
    let mut out = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut cells = GridRow::new();
        for col in 0..columns.len() {
            let bit = (row * columns.len() + col) as u32;
            cells.push(DecodedValue::Bits(buf.read_bits(offset, width, bit, 1)?));
        }
        out.push(cells);
    }
    Ok(Grid { columns, rows: out })
}

fn decode_directory<R: ByteFieldReader + ?Sized>(
    offset: usize,
    entries: usize,
    buf: &R,
) -> Result<Vec<DirectoryEntry>> {
    let mut supported = Vec::new();
    for index in 0..entries {
        let Ok(lid) = u8::try_from(index) else {
            break;
        };
        if buf.read_u32(offset + index * 4)? == 0 {
            continue;
        }
        supported.push(DirectoryEntry {
            lid,
            description: DecodedValue::Label(SmolStr::new_static(lid_to_description(lid))),
        });
    }
    Ok(supported)
}

#[cfg(test)]
mod tests;
