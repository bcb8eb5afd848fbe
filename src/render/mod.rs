//! Output of decoded pages.
//!
//! Both renderers walk [`DecodedLogPage::fields`] in order and never read the
//! raw buffer again, so the text and JSON forms always agree on values.

mod json;
mod text;

pub use json::JsonRenderer;
pub use text::TextRenderer;

use crate::error::{LogPageError, Result};
use crate::value::DecodedLogPage;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "normal",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LogPageError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(LogPageError::unsupported_format(other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Render {
    /// Full report for one page, newline terminated.
    fn render(&self, page: &DecodedLogPage) -> Result<String>;
}

pub fn renderer_for(format: OutputFormat) -> &'static dyn Render {
    match format {
        OutputFormat::Text => &TextRenderer,
        OutputFormat::Json => &JsonRenderer,
    }
}

/// Render `page` in `format`.
#[inline]
pub fn render(page: &DecodedLogPage, format: OutputFormat) -> Result<String> {
    renderer_for(format).render(page)
}
