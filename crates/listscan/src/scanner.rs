use crate::codec::{decode_value, encode_value};
use crate::errors::ListScanError;

/// Splits a comma-separated str-repr encoded list into decoded values,
/// skipping empty fields (a run of consecutive commas, or a leading or
/// trailing comma, never yields an empty value). Quoted fields may contain
/// commas; only a top-level, unquoted comma ends a field.
pub struct ListScanner<'a> {
    remaining: Option<&'a str>,
    quote: u8,
}

impl<'a> ListScanner<'a> {
    pub fn new(input: &'a str, quote: u8) -> Self {
        ListScanner { remaining: Some(input), quote }
    }

    /// Like [`ListScanner::new`], but rejects a `quote` byte that is not one
    /// of the two characters syslog-ng-style lists actually use, instead of
    /// silently scanning with a quote byte that can never open a field.
    pub fn try_new(input: &'a str, quote: u8) -> Result<Self, ListScanError> {
        validate_quote(quote)?;
        Ok(ListScanner::new(input, quote))
    }
}

/// `quote` must be `'` or `"`, the only two quote characters the codec's
/// callers (config parsing, template functions) ever pass in.
fn validate_quote(quote: u8) -> Result<(), ListScanError> {
    match quote {
        b'\'' | b'"' => Ok(()),
        other => Err(ListScanError::InvalidQuote(other)),
    }
}

impl<'a> Iterator for ListScanner<'a> {
    /// The decoded value and whether it was well-formed (see
    /// [`crate::codec::decode_value`]).
    type Item = (Vec<u8>, bool);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let input = self.remaining?;
            match find_comma(input, self.quote) {
                Some(idx) => {
                    let field = &input[..idx];
                    self.remaining = Some(&input[idx + 1..]);
                    if field.is_empty() {
                        continue;
                    }
                    return Some(decode_value(field, self.quote));
                }
                None => {
                    self.remaining = None;
                    if input.is_empty() {
                        return None;
                    }
                    return Some(decode_value(input, self.quote));
                }
            }
        }
    }
}

/// Finds the byte offset of the next top-level comma in `input`, skipping
/// over a leading quoted run (honoring backslash escapes inside it). If the
/// leading quote is never closed, falls back to a plain unquoted scan —
/// matching [`decode_value`]'s own malformed-input fallback, the field will
/// simply come back marked malformed when decoded.
fn find_comma(input: &str, quote: u8) -> Option<usize> {
    let bytes = input.as_bytes();
    if bytes.first() == Some(&quote) {
        let mut i = 1;
        let mut closed = false;
        while i < bytes.len() {
            if bytes[i] == quote {
                i += 1;
                closed = true;
                break;
            }
            if bytes[i] == b'\\' && i + 1 < bytes.len() {
                i += 2;
                continue;
            }
            i += 1;
        }
        if closed {
            return bytes[i..].iter().position(|&b| b == b',').map(|p| i + p);
        }
    }
    bytes.iter().position(|&b| b == b',')
}

/// Joins `values` into a single str-repr encoded list, the inverse of
/// [`ListScanner`].
pub fn encode_list(values: &[&[u8]], quote: u8) -> String {
    let encoded: Vec<Vec<u8>> = values.iter().map(|v| encode_value(v, quote)).collect();
    let joined = encoded.join(&b','.to_owned()[..]);
    String::from_utf8_lossy(&joined).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<Vec<u8>> {
        ListScanner::new(input, b'\'').map(|(bytes, _)| bytes).collect()
    }

    #[test]
    fn splits_plain_comma_separated_values() {
        assert_eq!(scan("a,b,c"), vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn try_new_rejects_non_quote_byte() {
        assert!(matches!(ListScanner::try_new("a,b", b'#'), Err(ListScanError::InvalidQuote(b'#'))));
        assert!(ListScanner::try_new("a,b", b'"').is_ok());
    }

    #[test]
    fn skips_empty_fields_between_commas() {
        assert_eq!(scan("a,,b"), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn skips_wholly_empty_trailing_field() {
        assert_eq!(scan("a,b,"), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn skips_leading_empty_field() {
        assert_eq!(scan(",a"), vec![b"a".to_vec()]);
    }

    #[test]
    fn empty_input_yields_no_values() {
        assert_eq!(scan(""), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn quoted_comma_is_not_a_separator() {
        assert_eq!(scan("'a,b',c"), vec![b"a,b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn encode_list_round_trips_through_scanner() {
        let values: Vec<&[u8]> = vec![b"plain", b"has,comma", b""];
        let encoded = encode_list(&values, b'\'');
        let decoded: Vec<Vec<u8>> = ListScanner::new(&encoded, b'\'').map(|(b, ok)| {
            assert!(ok);
            b
        }).collect();
        assert_eq!(decoded, vec![b"plain".to_vec(), b"has,comma".to_vec(), b"".to_vec()]);
    }
}
