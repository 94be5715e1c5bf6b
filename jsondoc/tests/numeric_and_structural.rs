//! End-to-end parse-failure scenarios: numeric overflow and malformed structure, checked through
//! the public `Document::parse` entry point rather than the parser's internal types.

use jsondoc::{Document, ParseErrorKind};

#[test]
fn overflowing_exponent_fails_with_a_precise_kind_and_position() {
    let err = Document::parse(br#"{"n":1e400}"#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::ExponentOverflow);
    // The error should point inside the number token, not at the start of the document.
    assert!(err.offset > 0);
}

#[test]
fn short_integers_round_trip_through_short_int_storage() {
    // 2^27 - 1 is the largest magnitude that fits in ShortInt; one more promotes to the Int arena,
    // but both print identically.
    let doc = Document::parse(br#"[134217727,134217728,-134217727]"#).unwrap();
    let arr = doc.get_array(doc.root()).unwrap();
    assert_eq!(doc.get_int(doc.array_get(arr, 0).unwrap()), Some(134_217_727));
    assert_eq!(doc.get_int(doc.array_get(arr, 1).unwrap()), Some(134_217_728));
    assert_eq!(doc.get_int(doc.array_get(arr, 2).unwrap()), Some(-134_217_727));
    assert_eq!(doc.to_string(jsondoc::PrintFlags::empty()), "[134217727,134217728,-134217727]");
}

#[test]
fn basic_number_forms_parse_to_the_expected_values() {
    assert_eq!(Document::parse(b"[0]").unwrap().to_string(jsondoc::PrintFlags::empty()), "[0]");
    assert_eq!(Document::parse(b"[-0]").unwrap().to_string(jsondoc::PrintFlags::empty()), "[0]");
    let doc = Document::parse(b"[1e2]").unwrap();
    let arr = doc.get_array(doc.root()).unwrap();
    assert_eq!(doc.get_num(doc.array_get(arr, 0).unwrap()), Some(100.0));
}

#[test]
fn leading_zero_is_rejected() {
    let err = Document::parse(b"[01]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::LeadingZero);
}

#[test]
fn truncated_fraction_is_rejected() {
    let err = Document::parse(b"[1.]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TruncatedNumber);
}

#[test]
fn truncated_exponent_is_rejected() {
    let err = Document::parse(b"[1e]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TruncatedNumber);
}

#[test]
fn escaped_surrogate_pair_decodes_to_the_expected_codepoint() {
    // U+1F600 (grinning face) spelled as a `\u` surrogate pair, exercising the escape-decode path
    // rather than raw UTF-8 passthrough.
    let doc = Document::parse(br#"["\uD83D\uDE00"]"#).unwrap();
    let arr = doc.get_array(doc.root()).unwrap();
    let s = doc.get_str(doc.array_get(arr, 0).unwrap()).unwrap();
    assert_eq!(s, "\u{1F600}".as_bytes());
}

#[test]
fn isolated_low_surrogate_is_rejected() {
    let err = Document::parse(br#"["\uDC00"]"#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnpairedSurrogate);
}

#[test]
fn unescaped_control_character_is_rejected() {
    let err = Document::parse(b"[\"\x01\"]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnescapedControlChar);
}

#[test]
fn trailing_comma_in_object_is_rejected() {
    let err = Document::parse(br#"{"a":1,}"#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TrailingComma);
}

#[test]
fn missing_comma_between_array_elements_is_rejected() {
    let err = Document::parse(b"[1 2]").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingSeparator);
}

#[test]
fn trailing_bytes_after_root_value_are_rejected() {
    let err = Document::parse(b"{}garbage").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TrailingGarbage);
}

#[test]
fn bare_string_root_is_rejected() {
    let err = Document::parse(br#""bare""#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidRoot);
}
