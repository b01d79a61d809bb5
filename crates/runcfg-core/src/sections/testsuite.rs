//! Test suite tree and its resolution to concrete test files
//!
//! Suites are declared as `<testsuites><testsuite name="...">` (or, for
//! older documents, `<testsuite>` directly under the root). A suite lists
//! `<directory>`, `<file>` and `<exclude>` specs interleaved with nested
//! `<testsuite>` elements. Resolution walks the tree in document order and
//! scans the file system for matching files.

use super::string_attribute;
use crate::config::ParseContext;
use crate::document::Element;
use runcfg_fs::{FileFilter, NormalizedPath, collect_files, io};
use semver::Version;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Operators accepted by `phpVersionOperator`.
pub const VERSION_OPERATORS: &[&str] = &[
    "<", "lt", "<=", "le", ">", "gt", ">=", "ge", "==", "=", "eq", "!=", "<>", "ne",
];

/// Comparison applied between the runtime version and a declared version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VersionOperator {
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[default]
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl VersionOperator {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "<" | "lt" => Some(Self::Less),
            "<=" | "le" => Some(Self::LessOrEqual),
            ">" | "gt" => Some(Self::Greater),
            ">=" | "ge" => Some(Self::GreaterOrEqual),
            "==" | "=" | "eq" => Some(Self::Equal),
            "!=" | "<>" | "ne" => Some(Self::NotEqual),
            _ => None,
        }
    }

    fn compare(self, left: &Version, right: &Version) -> bool {
        match self {
            Self::Less => left < right,
            Self::LessOrEqual => left <= right,
            Self::Greater => left > right,
            Self::GreaterOrEqual => left >= right,
            Self::Equal => left == right,
            Self::NotEqual => left != right,
        }
    }
}

/// A `phpVersion` / `phpVersionOperator` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionConstraint {
    pub operator: VersionOperator,
    pub version: String,
}

impl VersionConstraint {
    fn parse(element: &Element) -> Option<Self> {
        let version = element.attribute("phpVersion")?.trim().to_string();
        let operator = element
            .attribute("phpVersionOperator")
            .and_then(VersionOperator::parse)
            .unwrap_or_default();
        Some(Self { operator, version })
    }

    /// Check `runtime <operator> version`.
    ///
    /// A declared version that cannot be read as a version number does not
    /// constrain anything.
    pub fn is_satisfied_by(&self, runtime: &Version) -> bool {
        match parse_lenient_version(&self.version) {
            Some(required) => self.operator.compare(runtime, &required),
            None => {
                tracing::warn!(version = %self.version, "Ignoring unreadable version constraint");
                true
            }
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self.operator {
            VersionOperator::Less => "<",
            VersionOperator::LessOrEqual => "<=",
            VersionOperator::Greater => ">",
            VersionOperator::GreaterOrEqual => ">=",
            VersionOperator::Equal => "==",
            VersionOperator::NotEqual => "!=",
        };
        write!(f, "{operator} {}", self.version)
    }
}

/// Read `7`, `7.4` or `7.4.3-dev` as a semantic version, padding missing
/// components with zero. Pre-release and build suffixes are dropped.
pub fn parse_lenient_version(value: &str) -> Option<Version> {
    let core = value
        .trim()
        .split(['-', '+'])
        .next()
        .unwrap_or_default();
    let mut parts = [0u64; 3];
    let mut count = 0;
    for component in core.split('.') {
        if count == parts.len() {
            break;
        }
        parts[count] = component.parse().ok()?;
        count += 1;
    }
    (count > 0).then(|| Version::new(parts[0], parts[1], parts[2]))
}

/// One entry of a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestSpec {
    File {
        path: NormalizedPath,
        #[serde(skip_serializing_if = "Option::is_none")]
        constraint: Option<VersionConstraint>,
    },
    Directory {
        path: NormalizedPath,
        prefix: String,
        suffix: String,
        group: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        constraint: Option<VersionConstraint>,
    },
    Exclude {
        path: NormalizedPath,
    },
}

impl TestSpec {
    pub const DEFAULT_SUFFIX: &'static str = "Test.php";
    pub const DEFAULT_GROUP: &'static str = "DEFAULT";
}

/// A suite entry in declaration order: a spec or a nested suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SuiteEntry {
    Spec(TestSpec),
    Suite(TestSuiteNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSuiteNode {
    pub name: String,
    pub entries: Vec<SuiteEntry>,
}

impl TestSuiteNode {
    /// Specs declared directly in this suite.
    pub fn specs(&self) -> impl Iterator<Item = &TestSpec> {
        self.entries.iter().filter_map(|entry| match entry {
            SuiteEntry::Spec(spec) => Some(spec),
            SuiteEntry::Suite(_) => None,
        })
    }
}

/// A resolved test file and the suite that contributed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestUnit {
    pub suite: String,
    pub file: NormalizedPath,
}

/// The declared suite tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestSuiteConfig {
    pub suites: Vec<TestSuiteNode>,
    #[serde(skip)]
    runtime_version: Option<Version>,
}

impl TestSuiteConfig {
    pub fn parse(root: &Element, ctx: &ParseContext<'_>) -> Self {
        let declared = root.select("testsuites/testsuite");
        let declared = if declared.is_empty() {
            root.children_named("testsuite").collect()
        } else {
            declared
        };

        Self {
            suites: declared.into_iter().map(|suite| parse_suite(suite, ctx)).collect(),
            runtime_version: ctx.options().runtime_version().cloned(),
        }
    }

    /// Top-level suite names exactly as declared.
    pub fn names(&self) -> Vec<String> {
        self.suites.iter().map(|suite| suite.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Every test file of every suite, in document order.
    pub fn tests(&self) -> Vec<TestUnit> {
        let mut units = Vec::new();
        for suite in &self.suites {
            self.collect(suite, &mut units);
        }
        units
    }

    /// Test files of the named top-level suites only.
    pub fn tests_for<S: AsRef<str>>(&self, names: &[S]) -> Vec<TestUnit> {
        let mut units = Vec::new();
        for suite in &self.suites {
            if names.iter().any(|name| name.as_ref().trim() == suite.name) {
                self.collect(suite, &mut units);
            }
        }
        units
    }

    fn collect(&self, suite: &TestSuiteNode, units: &mut Vec<TestUnit>) {
        let excluded: Vec<NormalizedPath> = suite
            .specs()
            .filter_map(|spec| match spec {
                TestSpec::Exclude { path } => Some(path.clone()),
                _ => None,
            })
            .collect();

        let mut seen = HashSet::new();
        for entry in &suite.entries {
            let spec = match entry {
                SuiteEntry::Spec(spec) => spec,
                SuiteEntry::Suite(child) => {
                    self.collect(child, units);
                    continue;
                }
            };
            for file in self.resolve(spec, &excluded) {
                if seen.insert(file.clone()) {
                    units.push(TestUnit {
                        suite: suite.name.clone(),
                        file,
                    });
                }
            }
        }
    }

    fn resolve(&self, spec: &TestSpec, excluded: &[NormalizedPath]) -> Vec<NormalizedPath> {
        match spec {
            TestSpec::Exclude { .. } => Vec::new(),
            TestSpec::File { path, constraint } => {
                if !self.satisfies(constraint.as_ref()) {
                    return Vec::new();
                }
                match io::canonicalize(path) {
                    Ok(file) if file.is_file() => vec![file],
                    _ => {
                        tracing::debug!(%path, "Skipping missing test file");
                        Vec::new()
                    }
                }
            }
            TestSpec::Directory {
                path,
                prefix,
                suffix,
                constraint,
                ..
            } => {
                if !self.satisfies(constraint.as_ref()) {
                    return Vec::new();
                }
                let filter = FileFilter {
                    prefix,
                    suffix,
                    exclude: excluded,
                };
                collect_files(path, &filter).unwrap_or_else(|e| {
                    tracing::warn!(dir = %path, error = %e, "Could not scan test directory");
                    Vec::new()
                })
            }
        }
    }

    fn satisfies(&self, constraint: Option<&VersionConstraint>) -> bool {
        match (constraint, &self.runtime_version) {
            (Some(constraint), Some(runtime)) => constraint.is_satisfied_by(runtime),
            _ => true,
        }
    }
}

fn parse_suite(element: &Element, ctx: &ParseContext<'_>) -> TestSuiteNode {
    let mut entries = Vec::new();

    for child in &element.children {
        if child.name == "testsuite" {
            entries.push(SuiteEntry::Suite(parse_suite(child, ctx)));
            continue;
        }
        let Some(text) = child.text() else {
            continue;
        };
        let path = ctx.resolve_path(text);
        match child.name.as_str() {
            "directory" => entries.push(SuiteEntry::Spec(TestSpec::Directory {
                path,
                prefix: string_attribute(child, "prefix", ""),
                suffix: string_attribute(child, "suffix", TestSpec::DEFAULT_SUFFIX),
                group: string_attribute(child, "group", TestSpec::DEFAULT_GROUP),
                constraint: VersionConstraint::parse(child),
            })),
            "file" => entries.push(SuiteEntry::Spec(TestSpec::File {
                path,
                constraint: VersionConstraint::parse(child),
            })),
            "exclude" => entries.push(SuiteEntry::Spec(TestSpec::Exclude { path })),
            other => tracing::debug!(element = other, "Ignoring unknown suite entry"),
        }
    }

    TestSuiteNode {
        name: element.attribute("name").unwrap_or_default().to_string(),
        entries,
    }
}
