use thiserror::Error;

/// Compilation is the only fallible operation in this crate; evaluation
/// always produces a string (falling back to empty text for anything it
/// cannot resolve), matching the "no sensible non-error fallback only at
/// construction time" policy the rest of this workspace follows.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unterminated ${{...}} reference in template {template:?}")]
    UnterminatedBrace { template: String },
    #[error("unterminated $(...) function call in template {template:?}")]
    UnterminatedCall { template: String },
    #[error("empty reference name in template {template:?}")]
    EmptyName { template: String },
}
