use thiserror::Error;

/// Errors raised while compiling a pattern into the tree. Matching itself
/// never fails — it returns `None` — so this enum is narrower than a
/// general-purpose crate error would be.
#[derive(Debug, Error)]
pub enum RadixError {
    #[error("unterminated parser spec in pattern {pattern:?}")]
    UnterminatedParserSpec { pattern: String },
    #[error("malformed parser spec in pattern {pattern:?}")]
    MalformedPattern { pattern: String },
    #[error("unknown parser kind {kind:?} in pattern {pattern:?}")]
    UnknownKind { kind: String, pattern: String },
    #[error("invalid parameter {param:?} for parser kind {kind} in pattern {pattern:?}")]
    InvalidParam { kind: String, param: String, pattern: String },
    #[error("failed to compile PCRE parser: {0}")]
    Pcre(#[from] fancy_regex::Error),
}
