//! GCC-style diagnostic output

use std::io::{self, Write};

use crate::analyzer::names::NULL_NAME;

/// Writes function headers and parameter notes to a diagnostic stream
pub struct Diagnostics<W: Write> {
    /// Destination stream, normally stderr
    out: W,
}

impl<W: Write> Diagnostics<W> {
    /// Wrap a stream
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// `<file>: In function '<name>':`
    pub fn function_header(&mut self, file: &str, name: &str) -> io::Result<()> {
        writeln!(self.out, "{}: In function '{}':", file, name)
    }

    /// `<file>:<line>: note: parameter '<name>' type is not trivial`
    ///
    /// A missing file or name prints as `(null)`, a missing line as `0`.
    pub fn parameter_note(
        &mut self,
        file: Option<&str>,
        line: Option<u64>,
        name: Option<&str>,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "{}:{}: note: parameter '{}' type is not trivial",
            file.unwrap_or(NULL_NAME),
            line.unwrap_or(0),
            name.unwrap_or(NULL_NAME),
        )
    }

    /// Flush the underlying stream
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> W {
        self.out
    }
}
