use crate::domain::model::JsonNode;
use serde_json::ser::{CharEscape, Formatter, PrettyFormatter};
use std::io;

/// Indented output with optional `\uXXXX` escaping of non-ASCII text.
pub struct IndentFormatter<'a> {
    pretty: PrettyFormatter<'a>,
    ensure_ascii: bool,
}

impl<'a> IndentFormatter<'a> {
    pub fn new(indent: &'a [u8], ensure_ascii: bool) -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(indent),
            ensure_ascii,
        }
    }
}

impl Formatter for IndentFormatter<'_> {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.ensure_ascii || fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Emits an encoded tree through `formatter`.
///
/// Non-finite floats are written as the bare `NaN`, `Infinity` and `-Infinity`
/// tokens, which `serde_json::Serializer` cannot produce.
pub fn write_node<W, F>(node: &JsonNode, writer: &mut W, formatter: &mut F) -> io::Result<()>
where
    W: ?Sized + io::Write,
    F: Formatter,
{
    match node {
        JsonNode::Null => formatter.write_null(writer),
        JsonNode::Bool(b) => formatter.write_bool(writer, *b),
        JsonNode::Int(i) => formatter.write_i64(writer, *i),
        JsonNode::UInt(u) => formatter.write_u64(writer, *u),
        JsonNode::Float(f) => formatter.write_f64(writer, *f),
        JsonNode::NonFinite(f) => {
            let token = if f.is_nan() {
                "NaN"
            } else if f.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            formatter.write_raw_fragment(writer, token)
        }
        JsonNode::Str(s) => write_string(s, writer, formatter),
        JsonNode::Array(items) => {
            formatter.begin_array(writer)?;
            for (i, item) in items.iter().enumerate() {
                formatter.begin_array_value(writer, i == 0)?;
                write_node(item, writer, formatter)?;
                formatter.end_array_value(writer)?;
            }
            formatter.end_array(writer)
        }
        JsonNode::Object(entries) => {
            formatter.begin_object(writer)?;
            for (i, (key, value)) in entries.iter().enumerate() {
                formatter.begin_object_key(writer, i == 0)?;
                write_string(key, writer, formatter)?;
                formatter.end_object_key(writer)?;
                formatter.begin_object_value(writer)?;
                write_node(value, writer, formatter)?;
                formatter.end_object_value(writer)?;
            }
            formatter.end_object(writer)
        }
    }
}

fn write_string<W, F>(value: &str, writer: &mut W, formatter: &mut F) -> io::Result<()>
where
    W: ?Sized + io::Write,
    F: Formatter,
{
    formatter.begin_string(writer)?;
    let mut start = 0;
    for (i, byte) in value.bytes().enumerate() {
        let escape = match byte {
            b'"' => CharEscape::Quote,
            b'\\' => CharEscape::ReverseSolidus,
            b'\n' => CharEscape::LineFeed,
            b'\r' => CharEscape::CarriageReturn,
            b'\t' => CharEscape::Tab,
            0x08 => CharEscape::Backspace,
            0x0c => CharEscape::FormFeed,
            0x00..=0x1f => CharEscape::AsciiControl(byte),
            _ => continue,
        };
        if start < i {
            formatter.write_string_fragment(writer, &value[start..i])?;
        }
        formatter.write_char_escape(writer, escape)?;
        start = i + 1;
    }
    if start < value.len() {
        formatter.write_string_fragment(writer, &value[start..])?;
    }
    formatter.end_string(writer)
}
