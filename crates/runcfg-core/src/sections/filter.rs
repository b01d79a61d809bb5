//! Code coverage whitelist declared under `<filter>`

use super::{bool_attribute, string_attribute};
use crate::config::ParseContext;
use crate::document::Element;
use runcfg_fs::NormalizedPath;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterConfig {
    pub whitelist: Whitelist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Whitelist {
    pub add_uncovered_files_from_whitelist: bool,
    pub process_uncovered_files_from_whitelist: bool,
    pub include: FileSet,
    pub exclude: FileSet,
}

impl Default for Whitelist {
    fn default() -> Self {
        Self {
            add_uncovered_files_from_whitelist: true,
            process_uncovered_files_from_whitelist: false,
            include: FileSet::default(),
            exclude: FileSet::default(),
        }
    }
}

/// Directory rules and single files on one side of the whitelist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSet {
    pub directory: Vec<DirectoryRule>,
    pub file: Vec<NormalizedPath>,
}

impl FileSet {
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty() && self.file.is_empty()
    }

    fn parse(element: &Element, ctx: &ParseContext<'_>) -> Self {
        let directory = element
            .children_named("directory")
            .filter_map(|node| {
                let path = node.text()?;
                Some(DirectoryRule {
                    path: ctx.resolve_path(path),
                    prefix: string_attribute(node, "prefix", ""),
                    suffix: string_attribute(node, "suffix", DirectoryRule::DEFAULT_SUFFIX),
                    group: string_attribute(node, "group", DirectoryRule::DEFAULT_GROUP),
                })
            })
            .collect();
        let file = element
            .children_named("file")
            .filter_map(Element::text)
            .map(|path| ctx.resolve_path(path))
            .collect();
        Self { directory, file }
    }
}

/// Files below `path` whose names start with `prefix` and end with `suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryRule {
    pub path: NormalizedPath,
    pub prefix: String,
    pub suffix: String,
    pub group: String,
}

impl DirectoryRule {
    pub const DEFAULT_SUFFIX: &'static str = ".php";
    pub const DEFAULT_GROUP: &'static str = "DEFAULT";
}

impl FilterConfig {
    pub fn parse(filter: Option<&Element>, ctx: &ParseContext<'_>) -> Self {
        let Some(whitelist) = filter.and_then(|filter| filter.child("whitelist")) else {
            return Self::default();
        };

        let defaults = Whitelist::default();
        let include = FileSet::parse(whitelist, ctx);
        let exclude = whitelist
            .child("exclude")
            .map(|exclude| FileSet::parse(exclude, ctx))
            .unwrap_or_default();

        Self {
            whitelist: Whitelist {
                add_uncovered_files_from_whitelist: bool_attribute(
                    whitelist,
                    "addUncoveredFilesFromWhitelist",
                    defaults.add_uncovered_files_from_whitelist,
                ),
                process_uncovered_files_from_whitelist: bool_attribute(
                    whitelist,
                    "processUncoveredFilesFromWhitelist",
                    defaults.process_uncovered_files_from_whitelist,
                ),
                include,
                exclude,
            },
        }
    }
}
