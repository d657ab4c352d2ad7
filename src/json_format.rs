//! JSON output with configurable separators and indentation.
//!
//! `serde_json` offers compact and pretty output only. `StyledFormatter` also lets the caller
//! choose the separator placed between items and the one between a key and its value.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

/// Separator strings, e.g. `(", ", ": ")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separators {
    pub item: String,
    pub key: String,
}

impl Separators {
    pub fn new(item: &str, key: &str) -> Self {
        Self {
            item: item.to_string(),
            key: key.to_string(),
        }
    }

    /// The separators used when none are given. Items are followed by a line break when
    /// indenting, so the item separator drops its trailing space then.
    pub fn default_for(indent: Option<usize>) -> Self {
        match indent {
            Some(_) => Self::new(",", ": "),
            None => Self::new(", ", ": "),
        }
    }
}

pub struct StyledFormatter<'a> {
    current_indent: usize,
    has_value: bool,
    indent: Option<Vec<u8>>,
    separators: &'a Separators,
}

impl<'a> StyledFormatter<'a> {
    pub fn new(indent: Option<usize>, separators: &'a Separators) -> Self {
        Self {
            current_indent: 0,
            has_value: false,
            indent: indent.map(|n| vec![b' '; n]),
            separators,
        }
    }

    fn newline<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        if let Some(indent) = &self.indent {
            writer.write_all(b"\n")?;
            for _ in 0..self.current_indent {
                writer.write_all(indent)?;
            }
        }
        Ok(())
    }
}

impl Formatter for StyledFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent -= 1;
        if self.has_value {
            self.newline(writer)?;
        }
        writer.write_all(b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if !first {
            writer.write_all(self.separators.item.as_bytes())?;
        }
        self.newline(writer)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent -= 1;
        if self.has_value {
            self.newline(writer)?;
        }
        writer.write_all(b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if !first {
            writer.write_all(self.separators.item.as_bytes())?;
        }
        self.newline(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.separators.key.as_bytes())
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }
}

/// Serialize `value` into `writer` with the given indentation and separators.
pub fn write_styled<W: io::Write, T: ?Sized + Serialize>(
    writer: W,
    value: &T,
    indent: Option<usize>,
    separators: &Separators,
) -> serde_json::Result<()> {
    let mut ser = serde_json::Serializer::with_formatter(writer, StyledFormatter::new(indent, separators));
    value.serialize(&mut ser)
}

#[cfg(test)]
fn to_styled_string<T: ?Sized + Serialize>(
    value: &T,
    indent: Option<usize>,
    separators: &Separators,
) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    write_styled(&mut buf, value, indent, separators)?;
    // The serializer only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
