use crate::guid::GuidCheck;
use crate::schema::{Column, FieldSpec, MAX_GRID_COLUMNS};
use crate::types::{Guid, Timestamp, u128_to_string};
use arrayvec::ArrayVec;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;

// ─── DecodedValue ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Uint(u64),
    /// 128-bit little-endian quantity split into halves.
    Uint128 { hi: u64, lo: u64 },
    Bits(u64),
    Bytes(Vec<u8>),
    Timestamp(Timestamp),
    Guid(Guid),
    /// Fixed text looked up from a decoded code, such as a log id description.
    Label(SmolStr),
    Grid(Grid),
    Directory(Vec<DirectoryEntry>),
}

impl DecodedValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DecodedValue::Uint(v) | DecodedValue::Bits(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u128(&self) -> Option<(u64, u64)> {
        match self {
            DecodedValue::Uint128 { hi, lo } => Some((*hi, *lo)),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            DecodedValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_guid(&self) -> Option<Guid> {
        match self {
            DecodedValue::Guid(g) => Some(*g),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            DecodedValue::Label(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&Grid> {
        match self {
            DecodedValue::Grid(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_directory(&self) -> Option<&[DirectoryEntry]> {
        match self {
            DecodedValue::Directory(entries) => Some(entries),
            _ => None,
        }
    }

    /// Scalar rendering shared by both output formats. `None` for compound values.
    pub fn scalar_text(&self, hex: bool) -> Option<String> {
        Some(match self {
            DecodedValue::Uint(v) | DecodedValue::Bits(v) if hex => format!("0x{v:x}"),
            DecodedValue::Uint(v) | DecodedValue::Bits(v) => v.to_string(),
            DecodedValue::Uint128 { hi, lo } => u128_to_string(*hi, *lo),
            DecodedValue::Bytes(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
            DecodedValue::Timestamp(ts) => ts.to_string(),
            DecodedValue::Guid(g) => g.to_string(),
            DecodedValue::Label(s) => s.to_string(),
            DecodedValue::Grid(_) | DecodedValue::Directory(_) => return None,
        })
    }
}

impl From<u64> for DecodedValue {
    fn from(v: u64) -> Self {
        DecodedValue::Uint(v)
    }
}

impl From<Timestamp> for DecodedValue {
    fn from(ts: Timestamp) -> Self {
        DecodedValue::Timestamp(ts)
    }
}

impl From<SmolStr> for DecodedValue {
    fn from(s: SmolStr) -> Self {
        DecodedValue::Label(s)
    }
}

impl From<Guid> for DecodedValue {
    fn from(g: Guid) -> Self {
        DecodedValue::Guid(g)
    }
}

// ─── Grid ───────────────────────────────────────────────────────────────────

pub type GridRow = ArrayVec<DecodedValue, MAX_GRID_COLUMNS>;

/// Per-bucket table; row i is bucket i.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub columns: &'static [Column],
    pub rows: Vec<GridRow>,
}

impl Grid {
    pub fn cell(&self, row: usize, col: usize) -> Option<&DecodedValue> {
        self.rows.get(row)?.get(col)
    }
}

// ─── Directory ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub lid: u8,
    /// Always a [`DecodedValue::Label`].
    pub description: DecodedValue,
}

// ─── DecodedLogPage ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub spec: FieldSpec,
    pub value: DecodedValue,
}

impl DecodedField {
    #[inline]
    pub fn key(&self) -> &'static str {
        self.spec.key
    }

    /// Top-level structured-output key: the group key for grouped fields.
    #[inline]
    pub fn structured_key(&self) -> &'static str {
        self.spec.group.map_or(self.spec.key, |g| g.key)
    }
}

/// Ordered decode result of one page; fields follow the on-wire layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLogPage {
    pub log_id: u8,
    pub name: &'static str,
    pub title: &'static str,
    pub label_width: usize,
    pub version: u16,
    pub guid: GuidCheck,
    pub fields: Vec<DecodedField>,
}

impl DecodedLogPage {
    pub fn get(&self, key: &str) -> Option<&DecodedValue> {
        self.fields.iter().find(|f| f.key() == key).map(|f| &f.value)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(DecodedField::key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────
//
// Hand-written so that map order follows the field sequence. Adjacent fields
// sharing a group collapse into one nested map.

impl Serialize for DecodedLogPage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.fields.chunk_by(same_group).count()))?;
        for run in self.fields.chunk_by(same_group) {
            match run[0].spec.group {
                Some(group) => m.serialize_entry(group.key, &GroupRef(run))?,
                None => m.serialize_entry(run[0].key(), &run[0].value)?,
            }
        }
        m.end()
    }
}

fn same_group(a: &DecodedField, b: &DecodedField) -> bool {
    matches!((a.spec.group, b.spec.group), (Some(x), Some(y)) if x.key == y.key)
}

/// Fields of one group, serialized as `{member: value}`.
struct GroupRef<'a>(&'a [DecodedField]);

impl Serialize for GroupRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.0.len()))?;
        for field in self.0 {
            let member = field.spec.group.map_or(field.key(), |g| g.member);
            m.serialize_entry(member, &field.value)?;
        }
        m.end()
    }
}

impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedValue::Uint(v) | DecodedValue::Bits(v) => serializer.serialize_u64(*v),
            DecodedValue::Uint128 { hi, lo } => {
                let mut m = serializer.serialize_map(Some(2))?;
                m.serialize_entry("hi", hi)?;
                m.serialize_entry("lo", lo)?;
                m.end()
            }
            DecodedValue::Grid(grid) => grid.serialize(serializer),
            DecodedValue::Directory(entries) => {
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for entry in entries {
                    seq.serialize_element(entry)?;
                }
                seq.end()
            }
            DecodedValue::Label(s) => serializer.serialize_str(s),
            DecodedValue::Bytes(_) | DecodedValue::Timestamp(_) | DecodedValue::Guid(_) => {
                // Scalars with a textual form
                let text = self.scalar_text(false).unwrap_or_default();
                serializer.serialize_str(&text)
            }
        }
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.rows.len()))?;
        for (bucket, row) in self.rows.iter().enumerate() {
            m.serialize_entry(&bucket.to_string(), &GridRowRef { columns: self.columns, row })?;
        }
        m.end()
    }
}

struct GridRowRef<'a> {
    columns: &'static [Column],
    row: &'a GridRow,
}

impl Serialize for GridRowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.row.len()))?;
        for (column, cell) in self.columns.iter().zip(self.row.iter()) {
            m.serialize_entry(column.key, cell)?;
        }
        m.end()
    }
}

impl Serialize for DirectoryEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(2))?;
        m.serialize_entry("lid", &self.lid)?;
        m.serialize_entry("description", &self.description)?;
        m.end()
    }
}
