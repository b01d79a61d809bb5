//! File reading and canonicalisation

use crate::{Error, NormalizedPath, Result};
use std::fs;

/// Read the raw content of a file.
///
/// Decoding is left to the caller, since documents declare their own
/// encoding.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Resolve a path to its canonical absolute form.
///
/// Symlinks are resolved and `.`/`..` components removed. On Windows the
/// verbatim `\\?\` prefix is stripped so paths stay comparable with the
/// ones users write in configuration files.
pub fn canonicalize(path: &NormalizedPath) -> Result<NormalizedPath> {
    let native_path = path.to_native();
    dunce::canonicalize(&native_path)
        .map(NormalizedPath::new)
        .map_err(|e| Error::io(&native_path, e))
}
