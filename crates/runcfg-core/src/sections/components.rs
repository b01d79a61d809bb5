//! Listener and extension declarations
//!
//! A component is declared by class name with an optional source file and
//! constructor arguments. Instantiation happens elsewhere; this module only
//! produces the declarations.

use super::parse_bool;
use crate::config::ParseContext;
use crate::document::Element;
use runcfg_fs::NormalizedPath;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentDeclaration {
    pub class: String,
    pub file: Option<NormalizedPath>,
    pub arguments: Vec<ArgumentValue>,
}

/// A constructor argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Null,
    Array(Vec<ArrayElement>),
    Object(ObjectDeclaration),
    /// `<file>` or `<directory>`, resolved to an absolute path
    Path(NormalizedPath),
}

/// One entry of an `<array>` argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: ArgumentValue,
}

/// An `<object>` argument: a nested declaration without a source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectDeclaration {
    pub class: String,
    pub arguments: Vec<ArgumentValue>,
}

impl ComponentDeclaration {
    /// Parse every `element_name` child of `section` in document order.
    ///
    /// # Arguments
    ///
    /// * `section` - the `<listeners>` or `<extensions>` element, if any
    /// * `element_name` - `listener` or `extension`
    /// * `ctx` - parse context used to resolve paths and constants
    pub fn parse_all(
        section: Option<&Element>,
        element_name: &str,
        ctx: &ParseContext<'_>,
    ) -> Vec<Self> {
        let Some(section) = section else {
            return Vec::new();
        };
        section
            .children_named(element_name)
            .map(|element| Self::parse(element, ctx))
            .collect()
    }

    fn parse(element: &Element, ctx: &ParseContext<'_>) -> Self {
        let file = element
            .attribute("file")
            .filter(|file| !file.trim().is_empty())
            .map(|file| ctx.resolve_path_with_include_path(file));

        Self {
            class: element.attribute("class").unwrap_or_default().to_string(),
            file,
            arguments: parse_arguments(element.child("arguments"), ctx),
        }
    }
}

fn parse_arguments(arguments: Option<&Element>, ctx: &ParseContext<'_>) -> Vec<ArgumentValue> {
    arguments
        .map(|arguments| {
            arguments
                .children
                .iter()
                .map(|argument| parse_value(argument, ctx))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_value(element: &Element, ctx: &ParseContext<'_>) -> ArgumentValue {
    let text = element.text.trim();
    match element.name.as_str() {
        "string" => ArgumentValue::String(element.text.clone()),
        "integer" => ArgumentValue::Integer(leading_integer(text)),
        "double" => ArgumentValue::Double(leading_double(text)),
        "boolean" => ArgumentValue::Boolean(parse_bool(text).unwrap_or(false)),
        "null" => ArgumentValue::Null,
        "file" | "directory" => ArgumentValue::Path(ctx.resolve_path_with_include_path(text)),
        "constant" => match ctx.options().constant(text) {
            Some(value) => ArgumentValue::String(value.to_string()),
            None => {
                tracing::warn!(constant = text, "Undefined constant in component arguments");
                ArgumentValue::Null
            }
        },
        "array" => ArgumentValue::Array(
            element
                .children_named("element")
                .map(|entry| ArrayElement {
                    key: entry.attribute("key").map(str::to_string),
                    value: match entry.children.first() {
                        Some(value) => parse_value(value, ctx),
                        None => ArgumentValue::String(entry.text.clone()),
                    },
                })
                .collect(),
        ),
        "object" => ArgumentValue::Object(ObjectDeclaration {
            class: element.attribute("class").unwrap_or_default().to_string(),
            arguments: parse_arguments(element.child("arguments"), ctx),
        }),
        _ => ArgumentValue::String(element.text.clone()),
    }
}

/// Numeric prefix of `text` as an integer: `"12abc"` is 12, `"abc"` is 0.
/// Values outside the `i64` range saturate.
fn leading_integer(text: &str) -> i64 {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |value, digit| {
            let digit = i64::from(digit - b'0');
            if negative {
                value.saturating_mul(10).saturating_sub(digit)
            } else {
                value.saturating_mul(10).saturating_add(digit)
            }
        })
}

/// Longest numeric prefix of `text` as a float, or 0.0 when there is none.
fn leading_double(text: &str) -> f64 {
    let numeric = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E');
    let end = text.find(|c| !numeric(c)).unwrap_or(text.len());
    let candidate = &text[..end];
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderOptions;
    use crate::document::parse_document;

    fn parse(xml: &str, options: &LoaderOptions) -> Vec<ComponentDeclaration> {
        let root = parse_document(xml).unwrap();
        let base = NormalizedPath::new("/project");
        ComponentDeclaration::parse_all(
            root.child("listeners"),
            "listener",
            &ParseContext::new(&base, options),
        )
    }

    #[test]
    fn test_scalar_arguments() {
        let listeners = parse(
            r#"<phpunit><listeners><listener class="L" file="/L.php"><arguments>
                <integer>42</integer><integer>many</integer><double>19.78</double>
                <boolean>false</boolean><boolean>TRUE</boolean><null/><string>April</string>
            </arguments></listener></listeners></phpunit>"#,
            &LoaderOptions::default(),
        );

        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners[0].file, Some(NormalizedPath::new("/L.php")));
        assert_eq!(
            listeners[0].arguments,
            vec![
                ArgumentValue::Integer(42),
                ArgumentValue::Integer(0),
                ArgumentValue::Double(19.78),
                ArgumentValue::Boolean(false),
                ArgumentValue::Boolean(true),
                ArgumentValue::Null,
                ArgumentValue::String("April".to_string()),
            ]
        );
    }

    #[test]
    fn test_numeric_arguments_use_leading_digits() {
        let listeners = parse(
            r#"<phpunit><listeners><listener class="L"><arguments>
                <integer>12abc</integer><integer>-7 days</integer><integer>99999999999999999999</integer>
                <double>1.5kg</double><double>2e3x</double><double>inf</double>
            </arguments></listener></listeners></phpunit>"#,
            &LoaderOptions::default(),
        );

        assert_eq!(
            listeners[0].arguments,
            vec![
                ArgumentValue::Integer(12),
                ArgumentValue::Integer(-7),
                ArgumentValue::Integer(i64::MAX),
                ArgumentValue::Double(1.5),
                ArgumentValue::Double(2000.0),
                ArgumentValue::Double(0.0),
            ]
        );
    }

    #[test]
    fn test_nested_arguments() {
        let listeners = parse(
            r#"<phpunit><listeners><listener class="L"><arguments>
                <array><element key="name"><string>Sebastian</string></element><element><integer>1</integer></element></array>
                <object class="stdClass"/>
                <directory>reports</directory>
            </arguments></listener></listeners></phpunit>"#,
            &LoaderOptions::default(),
        );

        let arguments = &listeners[0].arguments;
        assert_eq!(
            arguments[0],
            ArgumentValue::Array(vec![
                ArrayElement {
                    key: Some("name".to_string()),
                    value: ArgumentValue::String("Sebastian".to_string()),
                },
                ArrayElement {
                    key: None,
                    value: ArgumentValue::Integer(1),
                },
            ])
        );
        assert_eq!(
            arguments[1],
            ArgumentValue::Object(ObjectDeclaration {
                class: "stdClass".to_string(),
                arguments: vec![],
            })
        );
        assert_eq!(arguments[2], ArgumentValue::Path(NormalizedPath::new("/project/reports")));
        assert_eq!(listeners[0].file, None);
    }

    #[test]
    fn test_constants_resolve_once_at_parse_time() {
        let options = LoaderOptions::new().with_constant("ANSWER", "42");
        let listeners = parse(
            r#"<phpunit><listeners><listener class="L"><arguments>
                <constant>ANSWER</constant><constant>MISSING</constant>
            </arguments></listener></listeners></phpunit>"#,
            &options,
        );
        assert_eq!(
            listeners[0].arguments,
            vec![ArgumentValue::String("42".to_string()), ArgumentValue::Null]
        );
    }

    #[test]
    fn test_argument_json_shape() {
        let value = ArgumentValue::Array(vec![ArrayElement {
            key: None,
            value: ArgumentValue::Null,
        }]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[{"value":null}]"#);
    }
}
