use thiserror::Error;

/// Decoding a single value never fails outright: malformed input falls back
/// to a best-effort verbatim copy (see [`crate::decode_value`]). The only
/// hard error in this crate is an encode-side quote character that cannot
/// be represented.
#[derive(Debug, Error)]
pub enum ListScanError {
    #[error("quote byte {0:#04x} is not a valid ASCII quote character")]
    InvalidQuote(u8),
}
