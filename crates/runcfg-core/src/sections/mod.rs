//! Section parsers
//!
//! Each section of a configuration document is parsed independently from its
//! own subtree. Parsers never fail: a missing subtree yields the all-defaults
//! record and a malformed attribute yields the default for that attribute
//! only.
//!
//! | section | subtree | record |
//! |---|---|---|
//! | root options | `<phpunit>` attributes | [`PhpUnitOptions`] |
//! | filter | `<filter>` | [`FilterConfig`] |
//! | groups | `<groups>`, `<testdoxGroups>` | [`GroupConfig`] |
//! | components | `<listeners>`, `<extensions>` | [`ComponentDeclaration`] |
//! | logging | `<logging>` | [`LoggingConfig`] |
//! | php | `<php>` | [`PhpConfig`] |
//! | test suites | `<testsuites>` | [`TestSuiteConfig`] |

pub mod components;
pub mod filter;
pub mod groups;
pub mod logging;
pub mod php;
pub mod phpunit;
pub mod testsuite;

pub use components::{ArgumentValue, ArrayElement, ComponentDeclaration, ObjectDeclaration};
pub use filter::{DirectoryRule, FileSet, FilterConfig, Whitelist};
pub use groups::GroupConfig;
pub use logging::{LogTarget, LoggingConfig};
pub use php::{EnvVariable, PhpConfig, PhpValue, RequestVariables};
pub use phpunit::{ColorMode, Columns, DefectsOrder, ExecutionOrder, PhpUnitOptions};
pub use testsuite::{
    SuiteEntry, TestSpec, TestSuiteConfig, TestSuiteNode, TestUnit, VersionConstraint,
    VersionOperator,
};

use crate::document::Element;
use std::str::FromStr;

/// Parse `true`/`false` (case-insensitive, surrounding whitespace ignored).
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse an optionally signed decimal integer that fits `T`.
///
/// Anything other than sign and digits is rejected, so `"12px"` and `"1e3"`
/// are not integers.
pub fn parse_integer<T: FromStr>(value: &str) -> Option<T> {
    let value = value.trim();
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Boolean attribute of `element`, or `default` when absent or invalid.
pub(crate) fn bool_attribute(element: &Element, name: &str, default: bool) -> bool {
    element
        .attribute(name)
        .and_then(parse_bool)
        .unwrap_or(default)
}

/// Integer attribute of `element`, or `default` when absent or invalid.
pub(crate) fn integer_attribute<T: FromStr>(element: &Element, name: &str, default: T) -> T {
    element
        .attribute(name)
        .and_then(parse_integer)
        .unwrap_or(default)
}

/// String attribute of `element`, or `default` when absent.
pub(crate) fn string_attribute(element: &Element, name: &str, default: &str) -> String {
    element.attribute(name).unwrap_or(default).to_string()
}
