//! Filesystem primitives for run-configuration resolution
//!
//! Provides normalized path handling, text I/O, directory scanning and
//! include-path lookup used by the configuration engine.

pub mod error;
pub mod io;
pub mod path;
pub mod scan;

pub use error::{Error, Result};
pub use path::{NormalizedPath, PATH_SEPARATOR};
pub use scan::{FileFilter, collect_files, resolve_in_include_path};
