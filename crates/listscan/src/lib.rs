//! Quote-aware scanning and str-repr encoding of comma-separated value
//! lists, as produced by list-valued name-value pairs.

pub mod codec;
pub mod errors;
mod scanner;

pub use codec::{decode_value, encode_value};
pub use errors::ListScanError;
pub use scanner::{ListScanner, encode_list};
