//! Purpose: Provide the byte-to-JSON parse boundary for feed documents.
//! Exports: `parse_document`, `decode_feed`, `DEFAULT_MAX_DOCUMENT_BYTES`.
//! Role: Single seam between raw bytes and the JSON value model.
//! Invariants: Runtime document decoding goes through this module.
//! Invariants: Parse diagnostics embed only a size-capped, lossily-decoded snippet.

use bstr::ByteSlice;
use serde_json::Value;

use crate::core::contact::{Contact, decode_contacts};
use crate::core::error::{Error, ErrorKind};

pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 8 * 1024 * 1024;

const MAX_SNIPPET_BYTES: usize = 64;

/// Parse raw feed bytes into a JSON value.
pub fn parse_document(bytes: &[u8]) -> Result<Value, Error> {
    serde_json::from_slice(bytes).map_err(|err| {
        Error::new(ErrorKind::MalformedDocument)
            .with_message("document is not valid json")
            .with_hint(format!(
                "input starts: {}",
                truncate_bytes(bytes, MAX_SNIPPET_BYTES)
            ))
            .with_source(err)
    })
}

/// Parse and decode in one step: raw bytes to contact records.
pub fn decode_feed(bytes: &[u8]) -> Result<Vec<Contact>, Error> {
    let document = parse_document(bytes)?;
    decode_contacts(&document)
}

fn truncate_snippet(input: &str, max: usize) -> String {
    let mut snippet = String::new();
    if input.len() <= max {
        snippet.push_str(input);
        return snippet;
    }
    let suffix = "...";
    if max <= suffix.len() {
        snippet.push_str(&suffix[..max]);
        return snippet;
    }
    let mut take = max - suffix.len();
    while !input.is_char_boundary(take) {
        take -= 1;
    }
    snippet.push_str(&input[..take]);
    snippet.push_str(suffix);
    snippet
}

fn truncate_bytes(input: &[u8], max: usize) -> String {
    let text = input.to_str_lossy();
    truncate_snippet(&text, max)
}

#[cfg(test)]
mod tests {
    use super::{decode_feed, parse_document, truncate_snippet};
    use crate::core::error::ErrorKind;

    #[test]
    fn malformed_bytes_are_rejected_with_snippet_hint() {
        let err = parse_document(b"{\"fname\":").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
        let hint = err.hint().expect("hint");
        assert!(hint.contains("{\"fname\":"));
    }

    #[test]
    fn malformed_utf8_is_rejected() {
        let err = parse_document(&[0xff, 0xfe, b'[', b']']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    }

    #[test]
    fn decode_feed_composes_parse_and_decode() {
        let contacts =
            decode_feed(br#"[{"fname":"A","lname":"B","email":"a@b.com"}]"#).expect("decode");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].primary_email(), Some("a@b.com"));
    }

    #[test]
    fn decode_feed_surfaces_shape_errors() {
        let err = decode_feed(br#"{"not":"an array"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedShape);
    }

    #[test]
    fn snippet_truncates_long_input() {
        let snippet = truncate_snippet("abcdefghijklmnopqrstuvwxyz", 8);
        assert_eq!(snippet.len(), 8);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn snippet_keeps_short_input_whole() {
        assert_eq!(truncate_snippet("[]", 8), "[]");
    }

    #[test]
    fn snippet_backs_off_to_a_char_boundary() {
        let snippet = truncate_snippet("[\"\u{2603}\u{2603}\u{2603}\"]", 8);
        assert!(snippet.ends_with("..."));
        assert!(snippet.len() <= 8);
    }
}
