//! The str-repr value codec: a single field is either bare (copied
//! verbatim) or wrapped in a quote byte, with backslash escapes for the
//! quote itself, a literal backslash, and the usual C escapes. Decoding
//! never fails — malformed input (an unterminated quote, garbage after the
//! closing quote) falls back to returning the input verbatim and reporting
//! `false` so the caller can log a "malformed value" warning without
//! aborting the whole list.

/// Decodes one str-repr encoded value. `quote` is the quote byte in use
/// (`'"'` or `'\''` in practice). Returns the decoded bytes and whether the
/// input was well-formed.
pub fn decode_value(input: &str, quote: u8) -> (Vec<u8>, bool) {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&quote) {
        return (bytes.to_vec(), true);
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 1;
    let mut closed = false;
    while i < bytes.len() {
        let b = bytes[i];
        if b == quote {
            closed = true;
            i += 1;
            break;
        }
        if b == b'\\' && i + 1 < bytes.len() {
            out.push(unescape_byte(bytes[i + 1]));
            i += 2;
            continue;
        }
        out.push(b);
        i += 1;
    }

    if !closed || i != bytes.len() {
        // Unterminated quote, or trailing bytes after the closing quote:
        // fall back to a verbatim copy of the whole field.
        return (bytes.to_vec(), false);
    }
    (out, true)
}

fn unescape_byte(b: u8) -> u8 {
    match b {
        b'b' => 0x08,
        b'f' => 0x0c,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        other => other,
    }
}

fn escape_byte(b: u8) -> Option<&'static [u8]> {
    match b {
        0x08 => Some(b"\\b"),
        0x0c => Some(b"\\f"),
        b'\n' => Some(b"\\n"),
        b'\r' => Some(b"\\r"),
        b'\t' => Some(b"\\t"),
        b'\\' => Some(b"\\\\"),
        _ => None,
    }
}

/// Encodes `bytes` as a str-repr value, quoting with `quote` whenever the
/// value contains the quote byte, a comma, a backslash, whitespace, or is
/// empty (an empty unquoted field would otherwise vanish when re-scanned).
/// Operates on raw bytes rather than `str` so non-UTF-8 payloads round-trip
/// unchanged.
pub fn encode_value(bytes: &[u8], quote: u8) -> Vec<u8> {
    let needs_quoting = bytes.is_empty()
        || bytes.iter().any(|&b| b == quote || b == b',' || b == b'\\' || b.is_ascii_whitespace());
    if !needs_quoting {
        return bytes.to_vec();
    }

    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(quote);
    for &b in bytes {
        if b == quote {
            out.push(b'\\');
            out.push(quote);
        } else if let Some(escaped) = escape_byte(b) {
            out.extend_from_slice(escaped);
        } else {
            out.push(b);
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_value_passes_through_unquoted() {
        assert_eq!(decode_value("hello", b'\''), (b"hello".to_vec(), true));
    }

    #[test]
    fn quoted_value_is_unwrapped() {
        assert_eq!(decode_value("'hello'", b'\''), (b"hello".to_vec(), true));
    }

    #[test]
    fn quoted_value_unescapes_backslash_sequences() {
        assert_eq!(decode_value(r"'a\nb\'c'", b'\''), (b"a\nb'c".to_vec(), true));
    }

    #[test]
    fn unterminated_quote_falls_back_to_verbatim() {
        let (bytes, ok) = decode_value("'oops", b'\'');
        assert!(!ok);
        assert_eq!(bytes, b"'oops");
    }

    #[test]
    fn trailing_garbage_after_close_quote_is_malformed() {
        let (bytes, ok) = decode_value("'a'xyz", b'\'');
        assert!(!ok);
        assert_eq!(bytes, b"'a'xyz");
    }

    #[test]
    fn encode_decode_round_trips_special_bytes() {
        let original = b"a,b'c\td\\e";
        let encoded = encode_value(original, b'\'');
        let (decoded, ok) = decode_value(std::str::from_utf8(&encoded).unwrap(), b'\'');
        assert!(ok);
        assert_eq!(decoded, original);
    }

    #[test]
    fn empty_value_is_quoted_so_it_survives_rescanning() {
        let encoded = encode_value(b"", b'\'');
        assert_eq!(encoded, b"''");
    }
}
