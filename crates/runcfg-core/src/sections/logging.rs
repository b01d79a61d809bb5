//! Report destinations declared under `<logging>`

use super::{bool_attribute, integer_attribute};
use crate::config::ParseContext;
use crate::document::Element;
use runcfg_fs::NormalizedPath;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of report kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogTarget {
    CoverageClover,
    CoverageCrap4j,
    CoverageHtml,
    CoveragePhp,
    CoverageText,
    CoverageXml,
    Json,
    Junit,
    Plain,
    Tap,
    Teamcity,
    TestdoxHtml,
    TestdoxText,
    TestdoxXml,
}

impl LogTarget {
    pub const ALL: [LogTarget; 14] = [
        Self::CoverageClover,
        Self::CoverageCrap4j,
        Self::CoverageHtml,
        Self::CoveragePhp,
        Self::CoverageText,
        Self::CoverageXml,
        Self::Json,
        Self::Junit,
        Self::Plain,
        Self::Tap,
        Self::Teamcity,
        Self::TestdoxHtml,
        Self::TestdoxText,
        Self::TestdoxXml,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CoverageClover => "coverage-clover",
            Self::CoverageCrap4j => "coverage-crap4j",
            Self::CoverageHtml => "coverage-html",
            Self::CoveragePhp => "coverage-php",
            Self::CoverageText => "coverage-text",
            Self::CoverageXml => "coverage-xml",
            Self::Json => "json",
            Self::Junit => "junit",
            Self::Plain => "plain",
            Self::Tap => "tap",
            Self::Teamcity => "teamcity",
            Self::TestdoxHtml => "testdox-html",
            Self::TestdoxText => "testdox-text",
            Self::TestdoxXml => "testdox-xml",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.as_str() == value)
    }
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report destinations plus the options of the coverage reports.
///
/// Thresholds and display flags are only present when the corresponding
/// attribute is declared on the matching `<log>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    pub targets: BTreeMap<LogTarget, NormalizedPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_upper_bound: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_lower_bound: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crap4j_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_text_show_uncovered_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_text_show_only_summary: Option<bool>,
}

impl LoggingConfig {
    pub const DEFAULT_LOW_UPPER_BOUND: u32 = 50;
    pub const DEFAULT_HIGH_LOWER_BOUND: u32 = 90;
    pub const DEFAULT_CRAP4J_THRESHOLD: u32 = 30;

    pub fn parse(logging: Option<&Element>, ctx: &ParseContext<'_>) -> Self {
        let mut config = Self::default();
        let Some(logging) = logging else {
            return config;
        };

        for log in logging.children_named("log") {
            let kind = log.attribute("type").unwrap_or_default();
            let Some(target) = log.attribute("target").filter(|t| !t.trim().is_empty()) else {
                tracing::debug!(kind, "Skipping log without target");
                continue;
            };
            let Some(kind) = LogTarget::parse(kind.trim()) else {
                tracing::warn!(kind, "Skipping log of unknown type");
                continue;
            };

            match kind {
                LogTarget::CoverageHtml => {
                    if let Some(bound) =
                        optional_integer(log, "lowUpperBound", Self::DEFAULT_LOW_UPPER_BOUND)
                    {
                        config.low_upper_bound = Some(bound);
                    }
                    if let Some(bound) =
                        optional_integer(log, "highLowerBound", Self::DEFAULT_HIGH_LOWER_BOUND)
                    {
                        config.high_lower_bound = Some(bound);
                    }
                }
                LogTarget::CoverageCrap4j => {
                    if let Some(threshold) =
                        optional_integer(log, "threshold", Self::DEFAULT_CRAP4J_THRESHOLD)
                    {
                        config.crap4j_threshold = Some(threshold);
                    }
                }
                LogTarget::CoverageText => {
                    if let Some(show) = optional_bool(log, "showUncoveredFiles") {
                        config.coverage_text_show_uncovered_files = Some(show);
                    }
                    if let Some(show) = optional_bool(log, "showOnlySummary") {
                        config.coverage_text_show_only_summary = Some(show);
                    }
                }
                _ => {}
            }

            config.targets.insert(kind, ctx.resolve_path(target));
        }

        config
    }

    pub fn target(&self, kind: LogTarget) -> Option<&NormalizedPath> {
        self.targets.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

fn optional_integer(log: &Element, name: &str, default: u32) -> Option<u32> {
    log.has_attribute(name)
        .then(|| integer_attribute(log, name, default))
}

fn optional_bool(log: &Element, name: &str) -> Option<bool> {
    log.has_attribute(name).then(|| bool_attribute(log, name, false))
}
