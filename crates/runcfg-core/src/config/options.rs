//! Loader options and the per-document parse context

use runcfg_fs::{NormalizedPath, resolve_in_include_path};
use semver::Version;
use std::collections::BTreeMap;

/// Caller-supplied settings that influence how documents are parsed.
///
/// # Example
///
/// ```
/// use runcfg_core::LoaderOptions;
/// use semver::Version;
///
/// let options = LoaderOptions::new()
///     .with_constant("TEST_FILES_PATH", "/project/tests/_files/")
///     .with_include_path("/usr/share/php")
///     .with_runtime_version(Version::new(8, 1, 0));
///
/// assert_eq!(options.constant("TEST_FILES_PATH"), Some("/project/tests/_files/"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderOptions {
    constants: BTreeMap<String, String>,
    include_path: Vec<NormalizedPath>,
    runtime_version: Option<Version>,
}

impl LoaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a constant visible to `<constant>` arguments.
    pub fn with_constant(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    /// Append a directory to the include-path search list.
    pub fn with_include_path(mut self, dir: impl Into<NormalizedPath>) -> Self {
        self.include_path.push(dir.into());
        self
    }

    /// Runtime version that `phpVersion` constraints are checked against.
    pub fn with_runtime_version(mut self, version: Version) -> Self {
        self.runtime_version = Some(version);
        self
    }

    pub fn constant(&self, name: &str) -> Option<&str> {
        self.constants.get(name).map(String::as_str)
    }

    pub fn constants(&self) -> &BTreeMap<String, String> {
        &self.constants
    }

    pub fn include_path(&self) -> &[NormalizedPath] {
        &self.include_path
    }

    pub fn runtime_version(&self) -> Option<&Version> {
        self.runtime_version.as_ref()
    }
}

/// Everything a section parser needs besides its subtree.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    base_dir: &'a NormalizedPath,
    options: &'a LoaderOptions,
}

impl<'a> ParseContext<'a> {
    pub fn new(base_dir: &'a NormalizedPath, options: &'a LoaderOptions) -> Self {
        Self { base_dir, options }
    }

    /// Directory of the configuration file.
    pub fn base_dir(&self) -> &NormalizedPath {
        self.base_dir
    }

    pub fn options(&self) -> &LoaderOptions {
        self.options
    }

    /// Resolve declared path text against the configuration directory.
    ///
    /// Surrounding whitespace is trimmed; absolute paths and stream URLs are
    /// kept as they are.
    pub fn resolve_path(&self, text: &str) -> NormalizedPath {
        NormalizedPath::new(text.trim()).resolve_against(self.base_dir)
    }

    /// Like [`resolve_path`](Self::resolve_path), but a relative path that
    /// does not exist below the configuration directory is looked up in the
    /// include-path search list.
    pub fn resolve_path_with_include_path(&self, text: &str) -> NormalizedPath {
        let declared = NormalizedPath::new(text.trim());
        let resolved = declared.resolve_against(self.base_dir);
        if declared.is_absolute() || resolved.exists() {
            return resolved;
        }
        resolve_in_include_path(declared.as_str(), &self.options.include_path).unwrap_or(resolved)
    }
}
