//! Compiled string templates (`LogTemplate`): literal text, `$NAME`/
//! `${NAME}` value references resolved against an `NvTable`, fixed macros
//! (`$HOST`, `$MSG`, `$ISODATE`, ...) and `$(func args...)` calls.

pub mod errors;
mod template;
mod timestamp;

pub use errors::TemplateError;
pub use template::{EvalOptions, LogTemplate, log_template_hash};
