//! Error types for runcfg-core

use std::path::PathBuf;

/// Result type for runcfg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort configuration resolution.
///
/// Everything else (bad attribute values, unknown elements, missing
/// sections) degrades to defaults and is reported through
/// [`crate::ValidationError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path does not resolve to a readable document
    #[error("Could not read configuration file {path}")]
    ConfigurationNotFound { path: PathBuf },

    /// A document includes itself, directly or through other documents
    #[error("Cyclic inclusion of configuration files: {}", display_chain(.chain))]
    ConfigurationCycle { chain: Vec<PathBuf> },

    /// The document is not well-formed XML
    #[error("Could not load configuration file {path}: {source}")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Why a document could not be turned into an element tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{source} (at byte {position})")]
    Syntax {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error("Unexpected closing tag")]
    UnexpectedClose,

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Document has more than one root element")]
    MultipleRoots,

    #[error("Document has no root element")]
    NoRoot,
}

fn display_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
