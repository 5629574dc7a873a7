//! Shared-prefix pattern tree (`RNode`): literal edges plus typed parser
//! edges (IP, number, quoted string, regex, set, MAC, e-mail, hostname,
//! ...), compiled from a small `@KIND[:NAME[:PARAM]]@` pattern grammar.

pub mod errors;
pub mod node;
pub mod parsers;
pub mod pattern;

pub use errors::RadixError;
pub use node::{Capture, RNode};
pub use parsers::{MatchParser, ParserKind, ParserNode};
