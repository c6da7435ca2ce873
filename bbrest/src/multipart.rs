//! Hand-rolled `multipart/form-data` writer.
//!
//! Fields are written in the order they were added to the form. Each part is
//! a boundary line, one `Content-Disposition` header, a blank line, the raw
//! content and a line break; the body ends with the boundary followed by `--`.

use std::fmt;
use std::io::{self, Read, Write};

use chrono::Utc;

use bbrest_core::constants::MULTIPART_BOUNDARY_PREFIX;

const CRLF: &[u8] = b"\r\n";

/// Content of one form field.
pub enum Part<'a> {
    /// Copied through verbatim. Read once; never closed by the writer, so
    /// passing `&mut file` leaves the file with the caller.
    Reader(Box<dyn Read + Send + 'a>),
    /// Written verbatim.
    Bytes(Vec<u8>),
    /// Written as UTF-8 text.
    Text(String),
}

impl fmt::Debug for Part<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Reader(_) => f.write_str("Reader(..)"),
            Part::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Part::Text(s) => f.debug_tuple("Text").field(s).finish(),
        }
    }
}

/// Ordered list of named form fields.
#[derive(Debug, Default)]
pub struct MultipartForm<'a> {
    fields: Vec<(String, Part<'a>)>,
}

impl<'a> MultipartForm<'a> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a scalar field, written as its `Display` text.
    pub fn text(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.fields.push((name.into(), Part::Text(value.to_string())));
        self
    }

    /// Add a byte-buffer field.
    pub fn bytes(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.fields.push((name.into(), Part::Bytes(bytes.into())));
        self
    }

    /// Add a stream field.
    pub fn reader<R: Read + Send + 'a>(mut self, name: impl Into<String>, reader: R) -> Self {
        self.fields.push((name.into(), Part::Reader(Box::new(reader))));
        self
    }

    /// Field names in write order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Write every part, then the terminator, to `out`.
    ///
    /// Stream parts are consumed here and dropped once copied.
    pub fn write_to<W: Write>(self, out: &mut W, boundary: &str) -> io::Result<()> {
        for (name, part) in self.fields {
            write!(out, "--{boundary}\r\n")?;
            write!(out, "Content-Disposition: form-data; name=\"{name}\"\r\n")?;
            out.write_all(CRLF)?;
            match part {
                Part::Reader(mut reader) => {
                    io::copy(&mut reader, out)?;
                }
                Part::Bytes(bytes) => out.write_all(&bytes)?,
                Part::Text(text) => out.write_all(text.as_bytes())?,
            }
            out.write_all(CRLF)?;
        }
        write!(out, "--{boundary}--")?;
        Ok(())
    }
}

/// Generate a fresh boundary token from the current time in nanoseconds.
pub fn generate_boundary() -> String {
    let now = Utc::now();
    let ticks = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros());
    format!("{MULTIPART_BOUNDARY_PREFIX}{ticks}")
}
