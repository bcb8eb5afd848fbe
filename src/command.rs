//! Command flow shared by every log page subcommand:
//! parse format, look up UUID index, read, decode, render, report.

use crate::decoder::{DecodeOutcome, decode};
use crate::error::{LogPageError, Result, TransportError};
use crate::render::{OutputFormat, render};
use crate::schema::{self, LogPageSchema};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

// ─── Source ─────────────────────────────────────────────────────────────────

/// Where raw log page bytes come from.
pub trait LogPageSource {
    fn read_log_page(
        &mut self,
        log_id: u8,
        len: usize,
        uuid_index: u8,
    ) -> std::result::Result<Vec<u8>, TransportError>;

    /// Best effort; `None` means the caller should use index 0.
    fn uuid_index(&mut self) -> Option<u8>;
}

/// Raw page dump on disk. Reads at most the requested length and carries no
/// UUID list.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: std::io::Error) -> TransportError {
        TransportError::new(
            e.raw_os_error().unwrap_or(0),
            format!("{}: {e}", self.path.display()),
        )
    }
}

impl LogPageSource for FileSource {
    fn read_log_page(
        &mut self,
        log_id: u8,
        len: usize,
        uuid_index: u8,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        debug!(log_id, len, uuid_index, path = %self.path.display(), "reading log page dump");
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;

        let mut buf = Vec::with_capacity(len);
        file.take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| self.io_error(e))?;
        Ok(buf)
    }

    fn uuid_index(&mut self) -> Option<u8> {
        None
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// What a command hands back to the process: exit status, stdout text and
/// stderr lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub status: i32,
    pub output: String,
    pub diagnostics: Vec<String>,
}

impl Report {
    pub fn success(output: String) -> Self {
        Self {
            status: 0,
            output,
            diagnostics: Vec::new(),
        }
    }

    pub fn failure(err: &LogPageError) -> Self {
        Self {
            status: err.exit_status(),
            output: String::new(),
            diagnostics: err.diagnostics(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Render a page even when its GUID did not match. The status stays nonzero.
    pub render_on_mismatch: bool,
    /// Skips the source's UUID index lookup when set.
    pub uuid_index: Option<u8>,
}

// ─── Flow ───────────────────────────────────────────────────────────────────

/// Decode `raw` as page `log_id` and render it in `format`.
pub fn decode_and_render(log_id: u8, raw: &[u8], format: &str) -> Report {
    run(format, |format| {
        let schema = schema::lookup(log_id)?;
        finish(schema, raw, format, &Options::default())
    })
}

/// Read page `log_id` from `source`, then decode and render it.
pub fn fetch_and_render<S: LogPageSource + ?Sized>(
    source: &mut S,
    log_id: u8,
    format: &str,
    options: &Options,
) -> Report {
    run(format, |format| {
        let schema = schema::lookup(log_id)?;
        let uuid_index = match options.uuid_index.or_else(|| source.uuid_index()) {
            Some(index) => index,
            None => {
                debug!(log_id, "UUID index not found, using 0");
                0
            }
        };
        let raw = source.read_log_page(log_id, schema.total_length, uuid_index)?;
        finish(schema, &raw, format, options)
    })
}

/// Format is checked before anything is read or written.
fn run(format: &str, body: impl FnOnce(OutputFormat) -> Result<Report>) -> Report {
    match format.parse::<OutputFormat>().and_then(body) {
        Ok(report) => report,
        Err(err) => Report::failure(&err),
    }
}

fn finish(schema: &LogPageSchema, raw: &[u8], format: OutputFormat, options: &Options) -> Result<Report> {
    let decoded = decode(schema, raw)?;
    match decoded.outcome {
        DecodeOutcome::Valid => Ok(Report::success(render(&decoded.page, format)?)),
        DecodeOutcome::GuidMismatch { expected, actual } => {
            let mut report = Report::failure(&LogPageError::GuidMismatch { expected, actual });
            if options.render_on_mismatch {
                report.output = render(&decoded.page, format)?;
            }
            Ok(report)
        }
    }
}
