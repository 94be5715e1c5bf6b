//! Recursive-descent parsing of JSON values, objects, and arrays, and the top-level entry point.

use crate::document::Document;
use crate::error::{ParseError, ParseErrorKind};
use crate::parser::cursor::{Cursor, Mark};
use crate::parser::number::{parse_number, ParsedNumber};
use crate::parser::source::ByteSource;
use crate::parser::string::parse_string;
use bstr::BStr;
use doc_engine::RawValue;

/// Parses a complete document from `source`, identified by `source_name` in any resulting error.
pub(crate) fn parse_document<S: ByteSource>(
    source: S,
    source_name: String,
) -> Result<Document, ParseError> {
    let span = tracing::debug_span!("parse", source = %source_name);
    let _enter = span.enter();

    let mut cur = Cursor::new(source, source_name)?;
    cur.skip_whitespace()?;
    let start = cur.mark();

    let mut doc = Document::new();
    match cur.peek() {
        Some(b'{') | Some(b'[') => {
            let root = parse_value(&mut doc, &mut cur)?;
            doc.root = root;
        }
        _ => {
            return Err(cur.err(ParseErrorKind::InvalidRoot, "root value must be an object or array", start));
        }
    }

    cur.skip_whitespace()?;
    if cur.peek().is_some() {
        return Err(cur.err_here(ParseErrorKind::TrailingGarbage, "unexpected data after root value"));
    }

    tracing::debug!(
        objects = doc.objs.len(),
        arrays = doc.arrays.len(),
        strings = doc.strings.len(),
        "parse complete"
    );
    Ok(doc)
}

fn parse_value<S: ByteSource>(doc: &mut Document, cur: &mut Cursor<S>) -> Result<RawValue, ParseError> {
    cur.skip_whitespace()?;
    match cur.peek() {
        Some(b'{') => parse_object(doc, cur),
        Some(b'[') => parse_array(doc, cur),
        Some(b'"') => {
            let bytes = parse_string(cur)?;
            Ok(doc.make_str(&bytes))
        }
        Some(b't') | Some(b'f') => parse_bool(cur),
        Some(b'n') => parse_null(cur),
        Some(b'-') | Some(b'0'..=b'9') => match parse_number(cur)? {
            ParsedNumber::Int(n) => Ok(doc.make_int(n)),
            ParsedNumber::Float(n) => Ok(doc.make_num(n)),
        },
        Some(_) => Err(cur.err_here(ParseErrorKind::Structural, "unexpected character, expected a value")),
        None => Err(cur.err_here(ParseErrorKind::UnexpectedEof, "unexpected end of input, expected a value")),
    }
}

fn expect_literal<S: ByteSource>(cur: &mut Cursor<S>, literal: &'static [u8], start: Mark) -> Result<(), ParseError> {
    for &want in literal {
        if cur.peek() != Some(want) {
            let text = std::str::from_utf8(literal).unwrap();
            return Err(cur.err(ParseErrorKind::InvalidLiteral, format!("invalid literal, expected \"{text}\""), start));
        }
        cur.advance()?;
    }
    Ok(())
}

fn parse_bool<S: ByteSource>(cur: &mut Cursor<S>) -> Result<RawValue, ParseError> {
    let start = cur.mark();
    if cur.peek() == Some(b't') {
        expect_literal(cur, b"true", start)?;
        Ok(RawValue::bool(true))
    } else {
        expect_literal(cur, b"false", start)?;
        Ok(RawValue::bool(false))
    }
}

fn parse_null<S: ByteSource>(cur: &mut Cursor<S>) -> Result<RawValue, ParseError> {
    let start = cur.mark();
    expect_literal(cur, b"null", start)?;
    Ok(RawValue::NIL)
}

/// Parses `{ ... }`, assuming the cursor is positioned at the opening brace.
fn parse_object<S: ByteSource>(doc: &mut Document, cur: &mut Cursor<S>) -> Result<RawValue, ParseError> {
    let start = cur.mark();
    cur.advance()?;
    let (obj, raw) = doc.new_object_raw();
    tracing::trace!("object open");

    // Only true before the first entry (or right after the opening brace); once a `,` has been
    // consumed, a `}` is a trailing comma rather than a legitimately-empty object.
    let mut allow_close = true;
    loop {
        cur.skip_whitespace()?;
        match cur.peek() {
            Some(b'}') => {
                if !allow_close {
                    return Err(cur.err_here(ParseErrorKind::TrailingComma, "trailing comma before '}'"));
                }
                cur.advance()?;
                break;
            }
            Some(b'"') => {
                let key = parse_string(cur)?;
                cur.skip_whitespace()?;
                if cur.peek() != Some(b':') {
                    return Err(cur.err_here(
                        ParseErrorKind::MissingColon,
                        format!("expected ':' after key {:?}", BStr::new(&key)),
                    ));
                }
                cur.advance()?;
                cur.skip_whitespace()?;

                // Add the (nil-valued) key first, recurse into the value, then fill it in — never
                // hold a `&mut ObjectHeader` borrow across the recursive `parse_value` call.
                let slot = doc
                    .objs
                    .get_mut(obj.index)
                    .expect("object header just created")
                    .add_key(&mut doc.strings, &key);
                let value = parse_value(doc, cur)?;
                doc.objs
                    .get_mut(obj.index)
                    .expect("object header just created")
                    .set_value(slot, value);

                cur.skip_whitespace()?;
                match cur.peek() {
                    Some(b',') => {
                        cur.advance()?;
                        allow_close = false;
                    }
                    Some(b'}') => {
                        cur.advance()?;
                        break;
                    }
                    Some(_) => {
                        return Err(cur.err_here(ParseErrorKind::MissingSeparator, "expected ',' or '}' after object entry"));
                    }
                    None => return Err(cur.err(ParseErrorKind::UnexpectedEof, "unexpected end of input in object", start)),
                }
            }
            Some(_) => return Err(cur.err_here(ParseErrorKind::Structural, "expected a string key or '}'")),
            None => return Err(cur.err(ParseErrorKind::UnexpectedEof, "unexpected end of input in object", start)),
        }
    }

    let header = doc.objs.get_mut(obj.index).expect("object header just created");
    header.truncate_capacity();
    tracing::trace!(len = header.len(), "object close");
    Ok(raw)
}

/// Parses `[ ... ]`, assuming the cursor is positioned at the opening bracket.
fn parse_array<S: ByteSource>(doc: &mut Document, cur: &mut Cursor<S>) -> Result<RawValue, ParseError> {
    let start = cur.mark();
    cur.advance()?;
    let (arr, raw) = doc.new_array_raw();
    tracing::trace!("array open");

    let mut allow_close = true;
    loop {
        cur.skip_whitespace()?;
        match cur.peek() {
            Some(b']') => {
                if !allow_close {
                    return Err(cur.err_here(ParseErrorKind::TrailingComma, "trailing comma before ']'"));
                }
                cur.advance()?;
                break;
            }
            Some(_) => {
                let value = parse_value(doc, cur)?;
                doc.arrays.get_mut(arr.index).expect("array header just created").push(value);

                cur.skip_whitespace()?;
                match cur.peek() {
                    Some(b',') => {
                        cur.advance()?;
                        allow_close = false;
                    }
                    Some(b']') => {
                        cur.advance()?;
                        break;
                    }
                    Some(_) => {
                        return Err(cur.err_here(ParseErrorKind::MissingSeparator, "expected ',' or ']' after array element"));
                    }
                    None => return Err(cur.err(ParseErrorKind::UnexpectedEof, "unexpected end of input in array", start)),
                }
            }
            None => return Err(cur.err(ParseErrorKind::UnexpectedEof, "unexpected end of input in array", start)),
        }
    }

    let header = doc.arrays.get_mut(arr.index).expect("array header just created");
    header.truncate_capacity();
    tracing::trace!(len = header.len(), "array close");
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::PrintFlags;

    fn parse(s: &str) -> Result<Document, ParseError> {
        parse_document(s.as_bytes(), "<test>".to_string())
    }

    #[test]
    fn empty_object_and_array() {
        assert!(parse("{}").is_ok());
        let doc = parse("[]").unwrap();
        let arr = doc.get_array(doc.root()).unwrap();
        assert_eq!(doc.array_len(arr), 0);
    }

    #[test]
    fn nested_structure_round_trips_values() {
        let doc = parse(r#"{"a": [1, 2.5, true, null, "s"], "b": {"c": 1}}"#).unwrap();
        let root = doc.get_obj(doc.root()).unwrap();
        let a = doc.get_array(doc.object_get(root, b"a").unwrap()).unwrap();
        assert_eq!(doc.array_len(a), 5);
        assert_eq!(doc.get_int(doc.array_get(a, 0).unwrap()), Some(1));
        assert_eq!(doc.get_num(doc.array_get(a, 1).unwrap()), Some(2.5));
        assert_eq!(doc.get_bool(doc.array_get(a, 2).unwrap()), Some(true));
        assert!(doc.array_get(a, 3).unwrap().is_nil());
        assert_eq!(doc.get_str(doc.array_get(a, 4).unwrap()), Some(b"s".as_slice()));

        let b = doc.get_obj(doc.object_get(root, b"b").unwrap()).unwrap();
        assert_eq!(doc.get_int(doc.object_get(b, b"c").unwrap()), Some(1));
    }

    #[test]
    fn root_must_be_object_or_array() {
        let err = parse("42").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidRoot);
        let err = parse("\"hi\"").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidRoot);
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = parse("{} 1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingGarbage);
    }

    #[test]
    fn trailing_comma_in_object_is_rejected() {
        let err = parse(r#"{"a": 1,}"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingComma);
    }

    #[test]
    fn trailing_comma_in_array_is_rejected() {
        let err = parse("[1, 2,]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingComma);
    }

    #[test]
    fn missing_colon_is_rejected() {
        let err = parse(r#"{"a" 1}"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingColon);
    }

    #[test]
    fn missing_separator_is_rejected() {
        let err = parse(r#"{"a": 1 "b": 2}"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingSeparator);
    }

    #[test]
    fn duplicate_keys_are_preserved_and_find_returns_first() {
        let doc = parse(r#"{"k": 1, "k": 2}"#).unwrap();
        let root = doc.get_obj(doc.root()).unwrap();
        assert_eq!(doc.object_len(root), 2);
        assert_eq!(doc.get_int(doc.object_get(root, b"k").unwrap()), Some(1));
    }

    #[test]
    fn invalid_literal_is_rejected() {
        let err = parse("[tru]").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidLiteral);
    }

    #[test]
    fn unterminated_object_is_eof() {
        let err = parse(r#"{"a": 1"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn whitespace_between_tokens_is_ignored() {
        let doc = parse(" { \"a\" : [ 1 , 2 ] } ").unwrap();
        assert_eq!(doc.to_string(PrintFlags::empty()).contains("\"a\""), true);
    }
}
