//! Newline-delimited numeric field streams.
//!
//! Every value occupies one line. Floats are written with Rust's shortest
//! round-trip formatting, so reading a stream back yields bit-identical
//! values.

use crate::error::{IoError, Result};
use std::fmt::Display;
use std::io::Write;
use std::iter::{Enumerate, Peekable};
use std::str::{FromStr, Lines};

/// Writes one field per line.
pub struct FieldWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> FieldWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn field<T: Display>(&mut self, value: T) -> Result<()> {
        writeln!(self.inner, "{value}")?;
        self.written += 1;
        Ok(())
    }

    pub fn flag(&mut self, value: bool) -> Result<()> {
        self.field(u8::from(value))
    }

    pub fn fields(&mut self, values: &[f32]) -> Result<()> {
        values.iter().try_for_each(|v| self.field(v))
    }

    /// Number of fields written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Reads fields back from a whole stream held in memory.
pub struct FieldReader<'a> {
    stream: &'a str,
    lines: Peekable<Enumerate<Lines<'a>>>,
    line: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(stream: &'a str, content: &'a str) -> Self {
        Self {
            stream,
            lines: content.lines().enumerate().peekable(),
            line: 0,
        }
    }

    #[must_use]
    pub fn stream(&self) -> &str {
        self.stream
    }

    /// Line number of the most recently read field.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// True once only blank trailing lines remain.
    pub fn is_exhausted(&mut self) -> bool {
        while let Some((_, text)) = self.lines.peek() {
            if !text.trim().is_empty() {
                return false;
            }
            self.lines.next();
        }
        true
    }

    /// Reads the next field as `T`; `what` names it in error messages.
    pub fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let Some((index, text)) = self.lines.next() else {
            return Err(self.error_at(self.line + 1, format!("missing field `{what}`")));
        };
        self.line = index + 1;
        text.trim()
            .parse()
            .map_err(|_| self.error(format!("invalid `{what}`: {:?}", text.trim())))
    }

    pub fn flag(&mut self, what: &str) -> Result<bool> {
        match self.next::<u8>(what)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.error(format!("`{what}` must be 0 or 1, got {other}"))),
        }
    }

    pub fn floats(&mut self, what: &str, count: usize) -> Result<Vec<f32>> {
        (0..count).map(|_| self.next(what)).collect()
    }

    /// Parse error at the current line.
    #[must_use]
    pub fn error<M: Into<String>>(&self, message: M) -> IoError {
        self.error_at(self.line, message)
    }

    #[must_use]
    pub fn error_at<M: Into<String>>(&self, line: usize, message: M) -> IoError {
        IoError::parse(self.stream, line, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floats_survive_text_form() {
        let values = [0.1_f32, -3.75, 1.0e-7, f32::MAX, 1234.5678];
        let mut writer = FieldWriter::new(Vec::new());
        writer.fields(&values).unwrap();
        assert_eq!(writer.written(), values.len());
        let bytes = writer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut reader = FieldReader::new("test", &text);
        let read = reader.floats("value", values.len()).unwrap();
        for (a, b) in values.iter().zip(&read) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_invalid_field_reports_line() {
        let mut reader = FieldReader::new("cells", "1\n2\nabc\n");
        assert_eq!(reader.next::<u64>("a").unwrap(), 1);
        assert_eq!(reader.next::<u64>("b").unwrap(), 2);
        let err = reader.next::<f32>("c").unwrap_err();
        assert_eq!(err.location(), Some(("cells", 3)));
        assert!(err.to_string().contains("`c`"));
    }

    #[test]
    fn test_missing_field_reports_next_line() {
        let mut reader = FieldReader::new("eggs", "7\n");
        reader.next::<u64>("id").unwrap();
        let err = reader.next::<f32>("x").unwrap_err();
        assert_eq!(err.location(), Some(("eggs", 2)));
    }

    #[test]
    fn test_flags() {
        let mut reader = FieldReader::new("eggs", "0\n1\n2\n");
        assert!(!reader.flag("a").unwrap());
        assert!(reader.flag("b").unwrap());
        assert!(reader.flag("c").is_err());
    }

    #[test]
    fn test_trailing_blank_lines_are_ignored() {
        let mut reader = FieldReader::new("plants", "5\n\n  \n");
        reader.next::<u64>("id").unwrap();
        assert!(reader.is_exhausted());
    }
}
