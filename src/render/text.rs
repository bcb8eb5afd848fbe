use super::Render;
use crate::error::Result;
use crate::schema::FieldSpec;
use crate::value::{DecodedField, DecodedLogPage, DecodedValue, DirectoryEntry, Grid};
use std::fmt::Write;

/// Width of the `"<label>: Bucket <n>"` prefix of a grid row.
const BUCKET_PREFIX_WIDTH: usize = 38;
/// Width of one right-aligned grid cell, unit included.
const CELL_WIDTH: usize = 30;
/// Label column of the nested directory listing.
const DIRECTORY_LABEL_WIDTH: usize = 16;

/// Human-readable report: a title line, then one line per field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl Render for TextRenderer {
    fn render(&self, page: &DecodedLogPage) -> Result<String> {
        let mut out = String::with_capacity(64 * page.len());
        out.push_str(page.title);
        out.push('\n');

        for field in &page.fields {
            write_field(&mut out, field, page.label_width);
        }
        out.push('\n');
        Ok(out)
    }
}

fn with_unit(text: String, spec: &FieldSpec) -> String {
    match spec.unit {
        Some(unit) => format!("{text} {unit}"),
        None => text,
    }
}

// Writes into a String cannot fail; the fmt::Result is dropped.
fn write_field(out: &mut String, field: &DecodedField, label_width: usize) {
    let spec = &field.spec;
    match &field.value {
        DecodedValue::Grid(grid) => write_grid(out, spec, grid),
        DecodedValue::Directory(entries) => write_directory(out, spec, entries),
        scalar => {
            let text = scalar.scalar_text(spec.hex).unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<width$}{}",
                spec.label,
                with_unit(text, spec),
                width = label_width
            );
        }
    }
}

fn write_grid(out: &mut String, spec: &FieldSpec, grid: &Grid) {
    let _ = write!(out, "  {:<BUCKET_PREFIX_WIDTH$}", "");
    for column in grid.columns {
        let _ = write!(out, "{:>CELL_WIDTH$}", column.label);
    }
    out.push('\n');

    for (bucket, row) in grid.rows.iter().enumerate() {
        let prefix = format!("{}: Bucket {bucket}", spec.label);
        let _ = write!(out, "  {prefix:<BUCKET_PREFIX_WIDTH$}");
        for cell in row {
            let text = with_unit(cell.scalar_text(spec.hex).unwrap_or_default(), spec);
            let _ = write!(out, "{text:>CELL_WIDTH$}");
        }
        out.push('\n');
    }
}

fn write_directory(out: &mut String, spec: &FieldSpec, entries: &[DirectoryEntry]) {
    let _ = writeln!(out, "  {}", spec.label);
    for entry in entries {
        out.push_str("    log page:\n");
        let _ = writeln!(out, "      {:<DIRECTORY_LABEL_WIDTH$}{}", "lid:", entry.lid);
        let description = entry.description.scalar_text(false).unwrap_or_default();
        let _ = writeln!(
            out,
            "      {:<DIRECTORY_LABEL_WIDTH$}{description}",
            "description:"
        );
    }
}
