//! Structural validation of configuration documents
//!
//! Validation never aborts resolution. Every violation is collected as a
//! [`ValidationError`] and parsing proceeds with defaults for whatever was
//! rejected.

use crate::document::Element;
use crate::sections::{parse_bool, parse_integer, phpunit::EXECUTION_ORDER_TOKENS};
use crate::sections::testsuite::VERSION_OPERATORS;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Name of the root element of every configuration document.
pub const ROOT_ELEMENT: &str = "phpunit";

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Element path, e.g. `/phpunit/logging/log[2]` or `/phpunit/@colors`
    pub location: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// `true` or `false`, case-insensitive
    Boolean,
    /// Unsigned decimal integer that fits 32 bits
    NonNegativeInteger,
    /// Column count above zero, or the literal `max`
    PositiveIntegerOrMax,
    /// Any text
    Text,
    /// One of a closed set of tokens
    Enum(&'static [&'static str]),
    /// Comma-separated execution order tokens
    ExecutionOrder,
    /// Version comparison operator
    VersionOperator,
}

impl AttributeType {
    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Boolean => parse_bool(value).is_some(),
            Self::NonNegativeInteger => parse_integer::<u32>(value).is_some(),
            Self::PositiveIntegerOrMax => {
                value.trim() == "max" || parse_integer::<u16>(value).is_some_and(|n| n > 0)
            }
            Self::Text => true,
            Self::Enum(tokens) => tokens.contains(&value.trim()),
            Self::ExecutionOrder => value
                .split(',')
                .all(|token| EXECUTION_ORDER_TOKENS.contains(&token.trim())),
            Self::VersionOperator => VERSION_OPERATORS.contains(&value.trim()),
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Boolean => "a boolean".to_string(),
            Self::NonNegativeInteger => "a non-negative integer".to_string(),
            Self::PositiveIntegerOrMax => "a positive integer or 'max'".to_string(),
            Self::Text => "text".to_string(),
            Self::Enum(tokens) => format!("one of {}", tokens.join(", ")),
            Self::ExecutionOrder => {
                format!("a comma-separated list of {}", EXECUTION_ORDER_TOKENS.join(", "))
            }
            Self::VersionOperator => format!("one of {}", VERSION_OPERATORS.join(", ")),
        }
    }
}

#[derive(Debug)]
struct AttributeRule {
    name: &'static str,
    kind: AttributeType,
    required: bool,
}

const fn optional(name: &'static str, kind: AttributeType) -> AttributeRule {
    AttributeRule {
        name,
        kind,
        required: false,
    }
}

const fn required(name: &'static str, kind: AttributeType) -> AttributeRule {
    AttributeRule {
        name,
        kind,
        required: true,
    }
}

/// Allowed content of one element kind. Children are `(element name, rule id)`
/// pairs so the same element name can carry different rules in different
/// places (a `<directory>` in a suite is not a `<directory>` in the filter).
#[derive(Debug)]
struct ElementRule {
    id: &'static str,
    attributes: &'static [AttributeRule],
    children: &'static [(&'static str, &'static str)],
}

use AttributeType::{Boolean, NonNegativeInteger, PositiveIntegerOrMax, Text};

const LOG_TYPES: &[&str] = &[
    "coverage-clover",
    "coverage-crap4j",
    "coverage-html",
    "coverage-php",
    "coverage-text",
    "coverage-xml",
    "json",
    "junit",
    "plain",
    "tap",
    "teamcity",
    "testdox-html",
    "testdox-text",
    "testdox-xml",
];

const ROOT_ATTRIBUTES: &[AttributeRule] = &[
    optional("backupGlobals", Boolean),
    optional("backupStaticAttributes", Boolean),
    optional("beStrictAboutChangesToGlobalState", Boolean),
    optional("beStrictAboutCoversAnnotation", Boolean),
    optional("beStrictAboutOutputDuringTests", Boolean),
    optional("beStrictAboutResourceUsageDuringSmallTests", Boolean),
    optional("beStrictAboutTestsThatDoNotTestAnything", Boolean),
    optional("beStrictAboutTodoAnnotatedTests", Boolean),
    optional("bootstrap", Text),
    optional("cacheResult", Boolean),
    optional("cacheResultFile", Text),
    optional("cacheTokens", Boolean),
    optional("colors", Boolean),
    optional("columns", PositiveIntegerOrMax),
    optional("convertDeprecationsToExceptions", Boolean),
    optional("convertErrorsToExceptions", Boolean),
    optional("convertNoticesToExceptions", Boolean),
    optional("convertWarningsToExceptions", Boolean),
    optional("defaultTestSuite", Text),
    optional("defaultTimeLimit", NonNegativeInteger),
    optional("disableCodeCoverageIgnore", Boolean),
    optional("enforceTimeLimit", Boolean),
    optional("executionOrder", AttributeType::ExecutionOrder),
    optional("extensionsDirectory", Text),
    optional("failOnRisky", Boolean),
    optional("failOnWarning", Boolean),
    optional("forceCoversAnnotation", Boolean),
    optional("ignoreDeprecatedCodeUnitsFromCodeCoverage", Boolean),
    optional("noInteraction", Boolean),
    optional("printerClass", Text),
    optional("printerFile", Text),
    optional("processIsolation", Boolean),
    optional("registerMockObjectsFromTestArgumentsRecursively", Boolean),
    optional("resolveDependencies", Boolean),
    optional("reverseDefectList", Boolean),
    optional("stderr", Boolean),
    optional("stopOnDefect", Boolean),
    optional("stopOnError", Boolean),
    optional("stopOnFailure", Boolean),
    optional("stopOnIncomplete", Boolean),
    optional("stopOnRisky", Boolean),
    optional("stopOnSkipped", Boolean),
    optional("stopOnWarning", Boolean),
    optional("testdox", Boolean),
    optional("testSuiteLoaderClass", Text),
    optional("testSuiteLoaderFile", Text),
    optional("timeoutForLargeTests", NonNegativeInteger),
    optional("timeoutForMediumTests", NonNegativeInteger),
    optional("timeoutForSmallTests", NonNegativeInteger),
    optional("verbose", Boolean),
];

const ARGUMENT_CHILDREN: &[(&str, &str)] = &[
    ("array", "array"),
    ("object", "object"),
    ("string", "scalar"),
    ("integer", "scalar"),
    ("double", "scalar"),
    ("boolean", "scalar"),
    ("null", "empty"),
    ("file", "scalar"),
    ("directory", "scalar"),
    ("constant", "scalar"),
];

const NAMED_VALUE: &[AttributeRule] = &[
    required("name", Text),
    optional("value", Text),
    optional("verbatim", Boolean),
];

const VERSIONED: &[AttributeRule] = &[
    optional("phpVersion", Text),
    optional("phpVersionOperator", AttributeType::VersionOperator),
];

static SCHEMA: &[ElementRule] = &[
    ElementRule {
        id: ROOT_ELEMENT,
        attributes: ROOT_ATTRIBUTES,
        children: &[
            ("testsuites", "testsuites"),
            ("testsuite", "testsuite"),
            ("groups", "groups"),
            ("testdoxGroups", "groups"),
            ("filter", "filter"),
            ("logging", "logging"),
            ("listeners", "listeners"),
            ("extensions", "extensions"),
            ("php", "php"),
        ],
    },
    ElementRule {
        id: "testsuites",
        attributes: &[],
        children: &[("testsuite", "testsuite")],
    },
    ElementRule {
        id: "testsuite",
        attributes: &[required("name", Text)],
        children: &[
            ("directory", "suite-directory"),
            ("file", "suite-file"),
            ("exclude", "scalar"),
            ("testsuite", "testsuite"),
        ],
    },
    ElementRule {
        id: "suite-directory",
        attributes: &[
            optional("prefix", Text),
            optional("suffix", Text),
            optional("group", Text),
            optional("phpVersion", Text),
            optional("phpVersionOperator", AttributeType::VersionOperator),
        ],
        children: &[],
    },
    ElementRule {
        id: "suite-file",
        attributes: VERSIONED,
        children: &[],
    },
    ElementRule {
        id: "groups",
        attributes: &[],
        children: &[("include", "group-list"), ("exclude", "group-list")],
    },
    ElementRule {
        id: "group-list",
        attributes: &[],
        children: &[("group", "scalar")],
    },
    ElementRule {
        id: "filter",
        attributes: &[],
        children: &[("whitelist", "whitelist")],
    },
    ElementRule {
        id: "whitelist",
        attributes: &[
            optional("addUncoveredFilesFromWhitelist", Boolean),
            optional("processUncoveredFilesFromWhitelist", Boolean),
        ],
        children: &[
            ("directory", "filter-directory"),
            ("file", "scalar"),
            ("exclude", "filter-exclude"),
        ],
    },
    ElementRule {
        id: "filter-exclude",
        attributes: &[],
        children: &[("directory", "filter-directory"), ("file", "scalar")],
    },
    ElementRule {
        id: "filter-directory",
        attributes: &[
            optional("prefix", Text),
            optional("suffix", Text),
            optional("group", Text),
        ],
        children: &[],
    },
    ElementRule {
        id: "logging",
        attributes: &[],
        children: &[("log", "log")],
    },
    ElementRule {
        id: "log",
        attributes: &[
            required("type", AttributeType::Enum(LOG_TYPES)),
            optional("target", Text),
            optional("lowUpperBound", NonNegativeInteger),
            optional("highLowerBound", NonNegativeInteger),
            optional("threshold", NonNegativeInteger),
            optional("showUncoveredFiles", Boolean),
            optional("showOnlySummary", Boolean),
        ],
        children: &[],
    },
    ElementRule {
        id: "listeners",
        attributes: &[],
        children: &[("listener", "component")],
    },
    ElementRule {
        id: "extensions",
        attributes: &[],
        children: &[("extension", "component")],
    },
    ElementRule {
        id: "component",
        attributes: &[required("class", Text), optional("file", Text)],
        children: &[("arguments", "arguments")],
    },
    ElementRule {
        id: "arguments",
        attributes: &[],
        children: ARGUMENT_CHILDREN,
    },
    ElementRule {
        id: "array",
        attributes: &[],
        children: &[("element", "array-element")],
    },
    ElementRule {
        id: "array-element",
        attributes: &[optional("key", Text)],
        children: ARGUMENT_CHILDREN,
    },
    ElementRule {
        id: "object",
        attributes: &[required("class", Text)],
        children: &[("arguments", "arguments")],
    },
    ElementRule {
        id: "php",
        attributes: &[],
        children: &[
            ("includePath", "scalar"),
            ("ini", "named-value"),
            ("const", "named-value"),
            ("var", "named-value"),
            ("env", "env"),
            ("post", "named-value"),
            ("get", "named-value"),
            ("cookie", "named-value"),
            ("server", "named-value"),
            ("files", "named-value"),
            ("request", "named-value"),
        ],
    },
    ElementRule {
        id: "named-value",
        attributes: NAMED_VALUE,
        children: &[],
    },
    ElementRule {
        id: "env",
        attributes: &[
            required("name", Text),
            optional("value", Text),
            optional("verbatim", Boolean),
            optional("force", Boolean),
        ],
        children: &[],
    },
    ElementRule {
        id: "scalar",
        attributes: &[],
        children: &[],
    },
    ElementRule {
        id: "empty",
        attributes: &[],
        children: &[],
    },
];

fn rule(id: &str) -> Option<&'static ElementRule> {
    SCHEMA.iter().find(|rule| rule.id == id)
}

fn is_namespace_attribute(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:") || name.starts_with("xsi:")
}

/// Validate a merged document tree.
///
/// Returns the violations in document order; an empty list means the
/// document is well-formed with respect to the schema.
pub fn validate(root: &Element) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let location = format!("/{}", root.name);

    if root.name != ROOT_ELEMENT {
        errors.push(ValidationError {
            location,
            message: format!(
                "Root element '{}' is not expected, expected '{}'",
                root.name, ROOT_ELEMENT
            ),
        });
        return errors;
    }

    if let Some(root_rule) = rule(ROOT_ELEMENT) {
        check_element(root, root_rule, &location, &mut errors);
    }
    tracing::debug!(count = errors.len(), "Validated configuration document");
    errors
}

fn check_element(
    element: &Element,
    element_rule: &ElementRule,
    location: &str,
    errors: &mut Vec<ValidationError>,
) {
    check_attributes(element, element_rule, location, errors);

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for child in &element.children {
        *totals.entry(child.name.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for child in &element.children {
        let index = seen.entry(child.name.as_str()).or_default();
        *index += 1;
        let child_location = if totals.get(child.name.as_str()).copied().unwrap_or(0) > 1 {
            format!("{location}/{}[{index}]", child.name)
        } else {
            format!("{location}/{}", child.name)
        };

        let child_rule = element_rule
            .children
            .iter()
            .find(|(name, _)| *name == child.name)
            .and_then(|(_, id)| rule(id));
        match child_rule {
            Some(child_rule) => check_element(child, child_rule, &child_location, errors),
            None => errors.push(ValidationError {
                location: child_location,
                message: format!("Element '{}' is not expected here", child.name),
            }),
        }
    }
}

fn check_attributes(
    element: &Element,
    element_rule: &ElementRule,
    location: &str,
    errors: &mut Vec<ValidationError>,
) {
    for (name, value) in &element.attributes {
        if is_namespace_attribute(name) {
            continue;
        }
        let attribute_location = format!("{location}/@{name}");
        match element_rule.attributes.iter().find(|rule| rule.name == name) {
            Some(rule) if !rule.kind.accepts(value) => errors.push(ValidationError {
                location: attribute_location,
                message: format!(
                    "'{value}' is not a valid value for attribute '{name}', expected {}",
                    rule.kind.describe()
                ),
            }),
            Some(_) => {}
            None => errors.push(ValidationError {
                location: attribute_location,
                message: format!("Attribute '{name}' is not allowed"),
            }),
        }
    }

    for rule in element_rule.attributes.iter().filter(|rule| rule.required) {
        if !element.has_attribute(rule.name) {
            errors.push(ValidationError {
                location: location.to_string(),
                message: format!("Required attribute '{}' is missing", rule.name),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_referenced_rule_exists() {
        for element_rule in SCHEMA {
            for (name, id) in element_rule.children {
                assert!(rule(id).is_some(), "{} -> {name} refers to missing rule {id}", element_rule.id);
            }
        }
    }

    #[test]
    fn test_minimal_document_is_valid() {
        assert!(validate(&Element::new("phpunit")).is_empty());
    }

    #[test]
    fn test_wrong_root_is_reported() {
        let errors = validate(&Element::new("configuration"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, "/configuration");
    }

    #[test]
    fn test_invalid_boolean_points_at_attribute() {
        let root = Element::new("phpunit").with_attribute("colors", "invalid");
        let errors = validate(&root);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, "/phpunit/@colors");
    }

    #[test]
    fn test_namespace_attributes_are_ignored() {
        let root = Element::new("phpunit")
            .with_attribute("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance")
            .with_attribute("xsi:noNamespaceSchemaLocation", "phpunit.xsd");
        assert!(validate(&root).is_empty());
    }

    #[test]
    fn test_repeated_siblings_are_indexed() {
        let root = Element::new("phpunit").with_child(
            Element::new("logging")
                .with_child(Element::new("log").with_attribute("type", "junit"))
                .with_child(Element::new("log").with_attribute("type", "bogus")),
        );
        let errors = validate(&root);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, "/phpunit/logging/log[2]/@type");
    }

    #[test]
    fn test_missing_required_attribute() {
        let root = Element::new("phpunit")
            .with_child(Element::new("listeners").with_child(Element::new("listener")));
        let errors = validate(&root);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, "/phpunit/listeners/listener");
        assert!(errors[0].message.contains("class"));
    }

    #[test]
    fn test_unknown_element_is_not_descended() {
        let root = Element::new("phpunit").with_child(
            Element::new("coverage").with_child(Element::new("report").with_attribute("x", "y")),
        );
        let errors = validate(&root);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, "/phpunit/coverage");
    }

    #[test]
    fn test_combined_execution_order_is_valid() {
        let root = Element::new("phpunit").with_attribute("executionOrder", "depends,defects");
        assert!(validate(&root).is_empty());

        let root = Element::new("phpunit").with_attribute("executionOrder", "depends,sideways");
        assert_eq!(validate(&root).len(), 1);
    }
}
