//! Declarative log page layouts.
//!
//! Each supported page is one `static` [`LogPageSchema`]: an ordered table of
//! [`FieldSpec`]s with fixed offsets, consumed by the generic decoder. Adding a
//! page means adding a table, not a decode function.

mod directory;
mod latency;
mod smart;

pub use directory::SUPPORTED_LOG_PAGES;
pub use latency::LATENCY_MONITOR;
pub use smart::SMART_CLOUD_ATTRIBUTES;

use crate::error::{LogPageError, Result};
use crate::types::Guid;
use crate::version::VersionField;
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

// ─── Columns ────────────────────────────────────────────────────────────────

/// One column of a grid: text header and structured key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub key: &'static str,
}

/// Per-operation columns shared by the latency monitor grids.
pub const OPERATION_COLUMNS: &[Column] = &[
    Column { label: "Read", key: "Read" },
    Column { label: "Write", key: "Write" },
    Column { label: "Deallocate/Trim", key: "Trim" },
];

pub const MAX_GRID_COLUMNS: usize = 4;

// ─── Field Kinds ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Uint(usize),
    Timestamp,
}

impl CellKind {
    #[inline]
    pub const fn width(&self) -> usize {
        match self {
            CellKind::Uint(w) => *w,
            CellKind::Timestamp => 8,
        }
    }
}

/// Row-major `rows × stride` table of cells; only the first
/// `columns.len()` cells of each row are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: usize,
    pub stride: usize,
    pub cell: CellKind,
    pub columns: &'static [Column],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 1/2/4/8-byte unsigned integer, optionally masked after decoding.
    Uint { width: usize, mask: Option<u64> },
    /// 16-byte counter decoded as (hi, lo).
    Uint128,
    /// `bit_count` bits at `bit_offset` inside a `width`-byte word.
    Bits {
        width: usize,
        bit_offset: u32,
        bit_count: u32,
    },
    Bytes { len: usize },
    Timestamp,
    Guid,
    Grid(GridSpec),
    /// `rows × columns` single-bit flags packed in one word, bit `row * columns + col`.
    FlagGrid {
        width: usize,
        rows: usize,
        columns: &'static [Column],
    },
    /// `entries` u32 words; a nonzero word at index i marks log id i supported.
    Directory { entries: usize },
}

impl FieldKind {
    /// Bytes the field occupies on the wire.
    pub const fn width(&self) -> usize {
        match self {
            FieldKind::Uint { width, .. } => *width,
            FieldKind::Uint128 => 16,
            FieldKind::Bits { width, .. } => *width,
            FieldKind::Bytes { len } => *len,
            FieldKind::Timestamp => 8,
            FieldKind::Guid => 16,
            FieldKind::Grid(grid) => grid.rows * grid.stride * grid.cell.width(),
            FieldKind::FlagGrid { width, .. } => *width,
            FieldKind::Directory { entries } => *entries * 4,
        }
    }

    /// Bytes that contribute to the value. Smaller than [`width`](Self::width)
    /// only for masked words whose high bytes belong to the next field.
    pub const fn span(&self) -> usize {
        match self {
            FieldKind::Uint {
                width,
                mask: Some(mask),
            } => {
                let bytes = (64 - mask.leading_zeros() as usize).div_ceil(8);
                if bytes < *width { bytes } else { *width }
            }
            other => other.width(),
        }
    }
}

// ─── FieldSpec ──────────────────────────────────────────────────────────────

/// Linear transform applied to an integer: `(raw + add) * mul`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub add: u64,
    pub mul: u64,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { add: 0, mul: 1 };

    #[inline]
    pub fn apply(&self, raw: u64) -> u64 {
        raw.saturating_add(self.add).saturating_mul(self.mul)
    }
}

/// Nests a field under a shared structured-output key, as `{key: {member: value}}`.
/// Members of one group are adjacent in the field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldGroup {
    pub key: &'static str,
    pub member: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Text-report label, printed verbatim.
    pub label: &'static str,
    /// Structured-output key.
    pub key: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
    /// Lowest page version that carries this field.
    pub min_version: u16,
    pub scale: Scale,
    pub unit: Option<&'static str>,
    pub hex: bool,
    pub group: Option<FieldGroup>,
}

impl FieldSpec {
    pub const fn new(label: &'static str, key: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self {
            label,
            key,
            offset,
            kind,
            min_version: 0,
            scale: Scale::IDENTITY,
            unit: None,
            hex: false,
            group: None,
        }
    }

    pub const fn uint(label: &'static str, key: &'static str, offset: usize, width: usize) -> Self {
        Self::new(label, key, offset, FieldKind::Uint { width, mask: None })
    }

    pub const fn masked(
        label: &'static str,
        key: &'static str,
        offset: usize,
        width: usize,
        mask: u64,
    ) -> Self {
        Self::new(label, key, offset, FieldKind::Uint { width, mask: Some(mask) })
    }

    pub const fn uint128(label: &'static str, key: &'static str, offset: usize) -> Self {
        Self::new(label, key, offset, FieldKind::Uint128)
    }

    pub const fn since(self, min_version: u16) -> Self {
        Self { min_version, ..self }
    }

    pub const fn scaled(self, add: u64, mul: u64) -> Self {
        Self {
            scale: Scale { add, mul },
            ..self
        }
    }

    pub const fn unit(self, unit: &'static str) -> Self {
        Self {
            unit: Some(unit),
            ..self
        }
    }

    pub const fn hex(self) -> Self {
        Self { hex: true, ..self }
    }

    pub const fn grouped(self, key: &'static str, member: &'static str) -> Self {
        Self {
            group: Some(FieldGroup { key, member }),
            ..self
        }
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.kind.width()
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.width()
    }
}

// ─── LogPageSchema ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct LogPageSchema {
    pub log_id: u8,
    pub name: &'static str,
    /// First line of the text report.
    pub title: &'static str,
    pub label_width: usize,
    pub total_length: usize,
    pub guid: Option<Guid>,
    pub guid_offset: usize,
    pub version: Option<VersionField>,
    pub versions: RangeInclusive<u16>,
    /// Ascending by offset.
    pub fields: &'static [FieldSpec],
}

impl LogPageSchema {
    /// Fields that lie outside the page, in declaration order.
    pub fn fields_out_of_range(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.end() > self.total_length)
    }
}

// ─── Registry ───────────────────────────────────────────────────────────────

static SCHEMAS: &[&LogPageSchema] = &[&SUPPORTED_LOG_PAGES, &SMART_CLOUD_ATTRIBUTES, &LATENCY_MONITOR];

static REGISTRY: LazyLock<FxHashMap<u8, &'static LogPageSchema>> =
    LazyLock::new(|| SCHEMAS.iter().map(|s| (s.log_id, *s)).collect());

/// Schema for a log id, if this crate can decode it.
pub fn lookup(log_id: u8) -> Result<&'static LogPageSchema> {
    REGISTRY
        .get(&log_id)
        .copied()
        .ok_or(LogPageError::UnknownLogId(log_id))
}

/// All registered schemas, ascending by log id.
pub fn all() -> &'static [&'static LogPageSchema] {
    SCHEMAS
}
