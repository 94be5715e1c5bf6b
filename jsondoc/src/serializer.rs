//! JSON serialization: escape policy, numeric formatting, and pretty/compact layout.

use crate::document::Document;
use crate::error::SerializeError;
use crate::flags::PrintFlags;
use crate::value::{Value, ValueKind};
use doc_engine::{Array, Object};
use std::io::Write;

struct Sink<W> {
    inner: W,
    written: u64,
}

impl<W: Write> Sink<W> {
    fn raw(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }
}

/// Serializes `doc` to `sink` under `flags`, returning the number of bytes written.
pub(crate) fn write<W: Write>(doc: &Document, flags: PrintFlags, sink: W) -> Result<u64, SerializeError> {
    let mut s = Sink { inner: sink, written: 0 };
    if doc.root().is_nil() {
        // An empty document is the one case where this isn't just "an object with zero entries":
        // there is no root object at all, only the special-cased literal the source always emits.
        s.raw(b"{\n}")?;
    } else {
        write_value(doc, doc.root(), flags, 0, &mut s)?;
    }
    Ok(s.written)
}

fn newline(flags: PrintFlags) -> &'static [u8] {
    if flags.contains(PrintFlags::NEWLINE_WIN) {
        b"\r\n"
    } else {
        b"\n"
    }
}

fn write_indent<W: Write>(s: &mut Sink<W>, depth: usize) -> Result<(), SerializeError> {
    for _ in 0..depth {
        s.raw(b"    ")?;
    }
    Ok(())
}

fn write_value<W: Write>(
    doc: &Document,
    value: Value,
    flags: PrintFlags,
    depth: usize,
    s: &mut Sink<W>,
) -> Result<(), SerializeError> {
    match doc.kind(value) {
        ValueKind::Nil => s.raw(b"null"),
        ValueKind::Bool(true) => s.raw(b"true"),
        ValueKind::Bool(false) => s.raw(b"false"),
        ValueKind::Int(n) => s.raw(n.to_string().as_bytes()),
        ValueKind::Num(n) => s.raw(format_num(n).as_bytes()),
        ValueKind::Str(bytes) => write_string(bytes, flags, s),
        ValueKind::Array(arr) => write_array(doc, arr, flags, depth, s),
        ValueKind::Object(obj) => write_object(doc, obj, flags, depth, s),
    }
}

fn write_object<W: Write>(
    doc: &Document,
    obj: Object,
    flags: PrintFlags,
    depth: usize,
    s: &mut Sink<W>,
) -> Result<(), SerializeError> {
    let pretty = flags.contains(PrintFlags::PRETTY);
    let len = doc.object_len(obj);

    s.raw(b"{")?;
    if pretty && len > 0 {
        s.raw(newline(flags))?;
    }
    for i in 0..len {
        if pretty {
            write_indent(s, depth + 1)?;
        }
        write_string(doc.object_get_key(obj, i).expect("index within len"), flags, s)?;
        s.raw(b":")?;
        if pretty {
            s.raw(b" ")?;
        }
        write_value(doc, doc.object_get_index(obj, i).expect("index within len"), flags, depth + 1, s)?;
        if i + 1 < len {
            s.raw(b",")?;
        }
        if pretty {
            s.raw(newline(flags))?;
        }
    }
    if pretty && len > 0 {
        write_indent(s, depth)?;
    }
    s.raw(b"}")
}

fn write_array<W: Write>(
    doc: &Document,
    arr: Array,
    flags: PrintFlags,
    depth: usize,
    s: &mut Sink<W>,
) -> Result<(), SerializeError> {
    let pretty = flags.contains(PrintFlags::PRETTY);
    let len = doc.array_len(arr);

    s.raw(b"[")?;
    if pretty && len > 0 {
        s.raw(newline(flags))?;
    }
    for i in 0..len {
        if pretty {
            write_indent(s, depth + 1)?;
        }
        write_value(doc, doc.array_get(arr, i).expect("index within len"), flags, depth + 1, s)?;
        if i + 1 < len {
            s.raw(b",")?;
        }
        if pretty {
            s.raw(newline(flags))?;
        }
    }
    if pretty && len > 0 {
        write_indent(s, depth)?;
    }
    s.raw(b"]")
}

/// Formats a float with shortest-round-trip precision, appending `.0` when the result would
/// otherwise look like an integer — preserving the source's "always recognizable as a float"
/// output guarantee without hand-rolling `%.17g`.
fn format_num(n: f64) -> String {
    let mut text = n.to_string();
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}

fn write_string<W: Write>(bytes: &[u8], flags: PrintFlags, s: &mut Sink<W>) -> Result<(), SerializeError> {
    let esc_uni = flags.contains(PrintFlags::ESC_UNI);

    s.raw(b"\"")?;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                s.raw(b"\\\\")?;
                i += 1;
            }
            b'"' => {
                s.raw(b"\\\"")?;
                i += 1;
            }
            // The source unconditionally escapes '/' as '\/', independent of any flag.
            b'/' => {
                s.raw(b"\\/")?;
                i += 1;
            }
            0x08 => {
                s.raw(b"\\b")?;
                i += 1;
            }
            0x0C => {
                s.raw(b"\\f")?;
                i += 1;
            }
            b'\n' => {
                s.raw(b"\\n")?;
                i += 1;
            }
            b'\r' => {
                s.raw(b"\\r")?;
                i += 1;
            }
            b'\t' => {
                s.raw(b"\\t")?;
                i += 1;
            }
            b @ 0x00..=0x1F => {
                write_unicode_escape(s, b as u32)?;
                i += 1;
            }
            b if b < 0x80 => {
                s.raw(&bytes[i..i + 1])?;
                i += 1;
            }
            _ => {
                let (cp, len) = decode_utf8_at(bytes, i);
                if esc_uni {
                    if cp > 0xFFFF {
                        let v = cp - 0x10000;
                        write_unicode_escape(s, 0xD800 + (v >> 10))?;
                        write_unicode_escape(s, 0xDC00 + (v & 0x3FF))?;
                    } else {
                        write_unicode_escape(s, cp)?;
                    }
                } else {
                    s.raw(&bytes[i..i + len])?;
                }
                i += len;
            }
        }
    }
    s.raw(b"\"")
}

fn write_unicode_escape<W: Write>(s: &mut Sink<W>, cp: u32) -> Result<(), SerializeError> {
    s.raw(format!("\\u{cp:04X}").as_bytes())
}

/// Decodes the UTF-8 codepoint starting at `bytes[i]`, returning its value and byte length.
/// Falls back to a single raw byte for non-UTF-8 input rather than panicking, since a document
/// can be built programmatically from bytes the caller did not validate.
fn decode_utf8_at(bytes: &[u8], i: usize) -> (u32, usize) {
    match std::str::from_utf8(&bytes[i..]) {
        Ok(s) => {
            let ch = s.chars().next().expect("non-empty slice starts with a char");
            (ch as u32, ch.len_utf8())
        }
        Err(_) => (bytes[i] as u32, 1),
    }
}
