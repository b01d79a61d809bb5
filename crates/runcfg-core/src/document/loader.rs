//! Document loading with inclusion support

use super::Element;
use crate::error::ParseError;
use crate::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use runcfg_fs::{NormalizedPath, io};
use std::collections::HashMap;

/// Element name of an inclusion directive.
pub const INCLUDE_ELEMENT: &str = "xi:include";

/// Element name of the fallback content inside an inclusion directive.
pub const FALLBACK_ELEMENT: &str = "xi:fallback";

/// A fully expanded document together with its canonical location.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    /// Root element with all inclusion directives expanded
    pub root: Element,
    /// Canonical path of the document
    pub path: NormalizedPath,
}

impl LoadedDocument {
    /// Directory that relative paths in the document resolve against.
    pub fn base_dir(&self) -> NormalizedPath {
        self.path
            .parent()
            .unwrap_or_else(|| NormalizedPath::new("/"))
    }
}

/// Reads documents and expands inclusion directives.
///
/// Each document is parsed at most once per loader; repeated inclusions of
/// the same file reuse the parsed tree. Inclusion is resolved relative to
/// the directory of the document that contains the directive.
#[derive(Debug, Default)]
pub struct DocumentLoader {
    parsed: HashMap<NormalizedPath, Element>,
    in_progress: Vec<NormalizedPath>,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the document at `path` and expand every inclusion directive.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigurationNotFound`] if `path` (or an included path
    ///   without fallback) is not a readable file
    /// - [`Error::MalformedDocument`] if a document is not well-formed
    /// - [`Error::ConfigurationCycle`] if documents include each other
    pub fn load(&mut self, path: &NormalizedPath) -> Result<LoadedDocument> {
        let canonical = canonical_document_path(path)?;
        let root = self.expand_document(&canonical)?;
        Ok(LoadedDocument {
            root,
            path: canonical,
        })
    }

    fn read(&mut self, path: &NormalizedPath) -> Result<Element> {
        if let Some(element) = self.parsed.get(path) {
            return Ok(element.clone());
        }

        tracing::debug!(%path, "Reading configuration document");
        let content = io::read_bytes(path).map_err(|_| Error::ConfigurationNotFound {
            path: path.to_native(),
        })?;
        let element = parse_document(&content).map_err(|source| Error::MalformedDocument {
            path: path.to_native(),
            source,
        })?;

        self.parsed.insert(path.clone(), element.clone());
        Ok(element)
    }

    fn expand_document(&mut self, path: &NormalizedPath) -> Result<Element> {
        if self.in_progress.contains(path) {
            let mut chain: Vec<_> = self.in_progress.iter().map(NormalizedPath::to_native).collect();
            chain.push(path.to_native());
            return Err(Error::ConfigurationCycle { chain });
        }

        let raw = self.read(path)?;
        let base = path.parent().unwrap_or_else(|| NormalizedPath::new("/"));

        self.in_progress.push(path.clone());
        let expanded = self.expand_children(raw, &base);
        self.in_progress.pop();
        expanded
    }

    fn expand_children(&mut self, mut element: Element, base: &NormalizedPath) -> Result<Element> {
        let children = std::mem::take(&mut element.children);
        for child in children {
            if child.name == INCLUDE_ELEMENT {
                let spliced = self.include(&child, base)?;
                element.children.extend(spliced);
            } else {
                let expanded = self.expand_children(child, base)?;
                element.children.push(expanded);
            }
        }
        Ok(element)
    }

    fn include(&mut self, directive: &Element, base: &NormalizedPath) -> Result<Vec<Element>> {
        let Some(href) = directive.attribute("href").map(str::trim).filter(|h| !h.is_empty()) else {
            tracing::warn!("Ignoring inclusion directive without href");
            return Ok(Vec::new());
        };

        let target = NormalizedPath::new(href).resolve_against(base);
        let loaded = canonical_document_path(&target).and_then(|path| self.expand_document(&path));
        let document = match (loaded, directive.child(FALLBACK_ELEMENT)) {
            (Ok(document), _) => document,
            (Err(Error::ConfigurationNotFound { path }), Some(fallback)) => {
                tracing::debug!(path = %path.display(), "Included document missing, using fallback");
                let fallback = self.expand_children(fallback.clone(), base)?;
                return Ok(fallback.children);
            }
            (Err(e), _) => return Err(e),
        };

        tracing::debug!(%target, "Expanded inclusion directive");
        match directive.attribute("xpointer") {
            Some(pointer) => Ok(select_pointer(&document, pointer)),
            None => Ok(vec![document]),
        }
    }
}

fn canonical_document_path(path: &NormalizedPath) -> Result<NormalizedPath> {
    match io::canonicalize(path) {
        Ok(canonical) if canonical.is_file() => Ok(canonical),
        _ => Err(Error::ConfigurationNotFound {
            path: path.to_native(),
        }),
    }
}

/// Evaluate an `xpointer(/root/child/*)` expression against a document.
///
/// Only absolute child paths with `*` wildcards are supported; anything else
/// selects nothing.
fn select_pointer(document: &Element, pointer: &str) -> Vec<Element> {
    let Some(expression) = pointer
        .trim()
        .strip_prefix("xpointer(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        tracing::warn!(pointer, "Unsupported xpointer expression");
        return Vec::new();
    };

    let mut segments = expression.split('/').filter(|s| !s.is_empty());
    let root_matches = match segments.next() {
        Some(first) => first == "*" || first == document.name,
        None => false,
    };
    if !root_matches {
        return Vec::new();
    }

    let rest: Vec<&str> = segments.collect();
    if rest.is_empty() {
        return vec![document.clone()];
    }
    document
        .select(&rest.join("/"))
        .into_iter()
        .cloned()
        .collect()
}

/// Parse an XML document into an element tree.
///
/// The content is decoded according to its byte order mark or the
/// `encoding` of its XML declaration, defaulting to UTF-8.
pub fn parse_document(content: impl AsRef<[u8]>) -> std::result::Result<Element, ParseError> {
    let mut reader = Reader::from_reader(content.as_ref());
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|source| ParseError::Syntax {
            position: reader.buffer_position(),
            source,
        })?;
        match event {
            Event::Start(start) => stack.push(element_from(&start, &reader)?),
            Event::Empty(start) => {
                let element = element_from(&start, &reader)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(ParseError::UnexpectedClose)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&reader.decoder().decode(&data)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Unclosed(open.name.clone()));
    }
    root.ok_or(ParseError::NoRoot)
}

fn element_from(
    start: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> std::result::Result<Element, ParseError> {
    let decoder = reader.decoder();
    let mut element = Element::new(decoder.decode(start.name().as_ref())?);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = decoder.decode(attribute.key.as_ref())?.into_owned();
        let value = attribute.decode_and_unescape_value(reader)?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> std::result::Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(ParseError::MultipleRoots),
        None => *root = Some(element),
    }
    Ok(())
}
