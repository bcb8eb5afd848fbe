//! Decoders for OCP and vendor NVMe log pages.
//!
//! Raw page bytes are checked against a static [`schema::LogPageSchema`],
//! decoded into an ordered [`value::DecodedLogPage`] and rendered as text or
//! JSON by [`render`]. [`command`] ties the steps together for a
//! [`command::LogPageSource`].

pub mod command;
pub mod config;
pub mod decoder;
pub mod error;
pub mod guid;
pub mod reader;
pub mod render;
pub mod schema;
pub mod types;
pub mod value;
pub mod version;

pub use decoder::{DecodeOutcome, DecodedPage, decode, decode_log};
pub use error::{LogPageError, Result, TransportError};
pub use render::OutputFormat;
pub use value::{DecodedLogPage, DecodedValue};
