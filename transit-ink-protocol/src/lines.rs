//! Display line payload
//!
//! The endpoint body is normally a JSON array of strings. Any iterable JSON
//! value is accepted the way a dynamic `for line in decoded` loop would walk
//! it: an object yields its keys in document order and a string yields its
//! characters. Numbers, booleans, `null` and arrays holding anything but
//! strings are rejected. There is no limit on the number of lines or their
//! length; lines that do not fit on the panel are clipped when drawn.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::error::ProtocolError;

/// Ordered list of text lines fetched from the endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lines(Vec<String>);

impl Lines {
    /// Create a line list from already decoded strings
    pub fn new(lines: Vec<String>) -> Self {
        Self(lines)
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the endpoint sent `[]`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Line at `index`, if present
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Iterate over the lines top to bottom
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Consume into the underlying vector
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Lines {
    fn from(lines: Vec<String>) -> Self {
        Self(lines)
    }
}

struct LinesVisitor;

impl<'de> Visitor<'de> for LinesVisitor {
    type Value = Lines;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of strings, an object or a string")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Lines, A::Error> {
        let mut lines = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(line) = seq.next_element::<String>()? {
            lines.push(line);
        }
        Ok(Lines(lines))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Lines, A::Error> {
        let mut lines = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            map.next_value::<IgnoredAny>()?;
            lines.push(key);
        }
        Ok(Lines(lines))
    }

    fn visit_str<E: serde::de::Error>(self, text: &str) -> Result<Lines, E> {
        Ok(Lines(text.chars().map(|c| c.to_string()).collect()))
    }
}

impl<'de> Deserialize<'de> for Lines {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LinesVisitor)
    }
}

/// Decode a response body into display lines
pub fn decode_lines(body: &[u8]) -> Result<Lines, ProtocolError> {
    let text = core::str::from_utf8(body).map_err(|_| ProtocolError::InvalidUtf8)?;
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JsonErrorKind;
    use proptest::prelude::*;

    fn json_kind(result: Result<Lines, ProtocolError>) -> JsonErrorKind {
        match result {
            Err(ProtocolError::Json { kind, .. }) => kind,
            other => panic!("Expected JSON error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_lines() {
        let lines = decode_lines(br#"["Richmond", "5, 20 min", "Millbrae", "12 min"]"#).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.get(0), Some("Richmond"));
        assert_eq!(lines.get(3), Some("12 min"));
        assert_eq!(lines.get(4), None);
    }

    #[test]
    fn test_decode_empty_array() {
        let lines = decode_lines(b"[]").unwrap();
        assert!(lines.is_empty());
        assert_eq!(lines.iter().count(), 0);
    }

    #[test]
    fn test_decode_escapes_and_unicode() {
        let lines = decode_lines(br#"["Daly City \"Express\"", "caf\u00e9", "a\nb"]"#).unwrap();
        assert_eq!(lines.get(0), Some("Daly City \"Express\""));
        assert_eq!(lines.get(1), Some("caf\u{e9}"));
        assert_eq!(lines.get(2), Some("a\nb"));
    }

    #[test]
    fn test_reject_invalid_utf8() {
        assert_eq!(decode_lines(&[b'[', b'"', 0xFF, b'"', b']']), Err(ProtocolError::InvalidUtf8));
    }

    #[test]
    fn test_object_yields_keys_in_document_order() {
        let lines = decode_lines(br#"{"Richmond": "5 min", "Millbrae": [1, 2], "Dublin": null}"#).unwrap();
        assert_eq!(lines.into_inner(), vec!["Richmond", "Millbrae", "Dublin"]);

        assert!(decode_lines(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_string_yields_characters() {
        let lines = decode_lines(br#""ab\u00e9""#).unwrap();
        assert_eq!(lines.into_inner(), vec!["a", "b", "\u{e9}"]);

        assert!(decode_lines(br#""""#).unwrap().is_empty());
    }

    #[test]
    fn test_reject_non_iterable_values() {
        assert_eq!(json_kind(decode_lines(b"42")), JsonErrorKind::Data);
        assert_eq!(json_kind(decode_lines(b"true")), JsonErrorKind::Data);
        assert_eq!(json_kind(decode_lines(b"null")), JsonErrorKind::Data);
        assert_eq!(json_kind(decode_lines(br#"["ok", 3]"#)), JsonErrorKind::Data);
        assert_eq!(json_kind(decode_lines(br#"[["nested"]]"#)), JsonErrorKind::Data);
    }

    #[test]
    fn test_reject_non_json() {
        assert_eq!(json_kind(decode_lines(b"Service Unavailable")), JsonErrorKind::Syntax);
        assert_eq!(json_kind(decode_lines(b"")), JsonErrorKind::Eof);
        assert_eq!(json_kind(decode_lines(br#"["unterminated"#)), JsonErrorKind::Eof);
    }

    proptest! {
        #[test]
        fn prop_decodes_any_string_array(items in proptest::collection::vec(".{0,40}", 0..12)) {
            let body = serde_json::to_vec(&items).unwrap();
            let lines = decode_lines(&body).unwrap();
            prop_assert_eq!(lines.into_inner(), items);
        }
    }
}
