use super::Render;
use crate::error::{LogPageError, Result};
use crate::value::DecodedLogPage;

/// Pretty-printed JSON object keyed by field key, in wire order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Render for JsonRenderer {
    fn render(&self, page: &DecodedLogPage) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(page).map_err(|e| LogPageError::Serialize(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}
