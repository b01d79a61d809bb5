//! The resolved configuration model

use super::options::{LoaderOptions, ParseContext};
use super::runtime::{self, ProcessEnvironmentContext};
use crate::document::LoadedDocument;
use crate::sections::{
    ComponentDeclaration, FilterConfig, GroupConfig, LoggingConfig, PhpConfig, PhpUnitOptions,
    TestSuiteConfig,
};
use crate::validation::{self, ValidationError};
use runcfg_fs::NormalizedPath;
use serde::Serialize;

/// A fully parsed configuration document.
///
/// Built once from a [`LoadedDocument`] and never mutated afterwards.
/// Validation errors are kept next to the parsed sections: an invalid
/// document still produces a complete model with defaults wherever values
/// were rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    filename: NormalizedPath,
    validation_errors: Vec<ValidationError>,
    phpunit: PhpUnitOptions,
    filter: FilterConfig,
    groups: GroupConfig,
    testdox_groups: GroupConfig,
    listeners: Vec<ComponentDeclaration>,
    extensions: Vec<ComponentDeclaration>,
    logging: LoggingConfig,
    php: PhpConfig,
    testsuites: TestSuiteConfig,
}

impl Configuration {
    /// Validate and parse a loaded document.
    ///
    /// Relative paths resolve against the directory of the document itself,
    /// including paths that came in through inclusion directives.
    pub fn from_document(document: &LoadedDocument, options: &LoaderOptions) -> Self {
        let base_dir = document.base_dir();
        let ctx = ParseContext::new(&base_dir, options);
        let root = &document.root;

        let validation_errors = validation::validate(root);
        if !validation_errors.is_empty() {
            tracing::debug!(
                path = %document.path,
                count = validation_errors.len(),
                "Configuration has validation errors"
            );
        }

        Self {
            filename: document.path.clone(),
            validation_errors,
            phpunit: PhpUnitOptions::parse(root, &ctx),
            filter: FilterConfig::parse(root.child("filter"), &ctx),
            groups: GroupConfig::parse(root.child("groups")),
            testdox_groups: GroupConfig::parse(root.child("testdoxGroups")),
            listeners: ComponentDeclaration::parse_all(root.child("listeners"), "listener", &ctx),
            extensions: ComponentDeclaration::parse_all(
                root.child("extensions"),
                "extension",
                &ctx,
            ),
            logging: LoggingConfig::parse(root.child("logging"), &ctx),
            php: PhpConfig::parse(root.child("php"), &ctx),
            testsuites: TestSuiteConfig::parse(root, &ctx),
        }
    }

    /// Canonical path of the configuration file.
    pub fn filename(&self) -> &NormalizedPath {
        &self.filename
    }

    pub fn has_validation_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    pub fn phpunit_configuration(&self) -> &PhpUnitOptions {
        &self.phpunit
    }

    pub fn filter_configuration(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn group_configuration(&self) -> &GroupConfig {
        &self.groups
    }

    pub fn testdox_group_configuration(&self) -> &GroupConfig {
        &self.testdox_groups
    }

    pub fn listener_configuration(&self) -> &[ComponentDeclaration] {
        &self.listeners
    }

    pub fn extension_configuration(&self) -> &[ComponentDeclaration] {
        &self.extensions
    }

    pub fn logging_configuration(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn php_configuration(&self) -> &PhpConfig {
        &self.php
    }

    pub fn test_suite_configuration(&self) -> &TestSuiteConfig {
        &self.testsuites
    }

    pub fn test_suite_names(&self) -> Vec<String> {
        self.testsuites.names()
    }

    /// Apply the `<php>` section to `ctx`. See [`runtime::apply`].
    pub fn handle_php_configuration(&self, ctx: &mut ProcessEnvironmentContext) {
        runtime::apply(&self.php, ctx);
    }

    /// JSON representation of one named section, or of the whole model when
    /// `section` is `None`. Returns `None` for an unknown section name.
    pub fn section_json(&self, section: Option<&str>) -> Option<serde_json::Value> {
        let value = match section {
            None => serde_json::to_value(self),
            Some("phpunit") => serde_json::to_value(&self.phpunit),
            Some("filter") => serde_json::to_value(&self.filter),
            Some("groups") => serde_json::to_value(&self.groups),
            Some("testdoxGroups") => serde_json::to_value(&self.testdox_groups),
            Some("listeners") => serde_json::to_value(&self.listeners),
            Some("extensions") => serde_json::to_value(&self.extensions),
            Some("logging") => serde_json::to_value(&self.logging),
            Some("php") => serde_json::to_value(&self.php),
            Some("testsuites") => serde_json::to_value(&self.testsuites),
            Some(_) => return None,
        };
        value.ok()
    }
}

/// Section names accepted by [`Configuration::section_json`].
pub const SECTION_NAMES: &[&str] = &[
    "phpunit",
    "filter",
    "groups",
    "testdoxGroups",
    "listeners",
    "extensions",
    "logging",
    "php",
    "testsuites",
];
