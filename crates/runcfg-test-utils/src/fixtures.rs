//! Locations of the checked-in configuration fixtures.

use std::path::PathBuf;

/// Root of `test-fixtures/configs` at the workspace root.
pub fn configs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/configs")
}

/// Path of a fixture file below `test-fixtures/configs`.
///
/// # Panics
///
/// Panics if the fixture does not exist, so typos fail loudly instead of
/// surfacing as a not-found error from the code under test.
pub fn config(name: &str) -> PathBuf {
    let path = configs_dir().join(name);
    assert!(path.exists(), "Missing fixture: {}", path.display());
    path
}

