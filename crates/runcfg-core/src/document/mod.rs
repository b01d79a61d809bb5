//! Configuration documents
//!
//! A configuration document is read into a small owned element tree. The
//! tree keeps element names, attributes (in document order) and trimmed
//! text content; comments and processing instructions are dropped.
//!
//! Inclusion directives (`<xi:include href="..." xpointer="..."/>`) are
//! expanded while loading, so every consumer downstream of
//! [`DocumentLoader`] sees one merged tree.

mod element;
mod loader;

pub use element::Element;
pub use loader::{DocumentLoader, LoadedDocument, parse_document};
