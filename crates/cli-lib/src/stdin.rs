use std::io::Read;
use std::path::Path;

/// Reads the whole contents of `path`, or of stdin when `path == "-"`, a
/// common CLI convention for piping input in.
pub fn read_path_or_stdin(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}
