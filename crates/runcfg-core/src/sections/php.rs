//! Runtime environment declared under `<php>`

use super::{bool_attribute, parse_bool};
use crate::config::ParseContext;
use crate::document::Element;
use runcfg_fs::NormalizedPath;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A declared value after boolean coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PhpValue {
    Bool(bool),
    String(String),
}

impl PhpValue {
    /// Coerce `true`/`false` to booleans; everything else stays text.
    pub fn coerce(value: &str) -> Self {
        match parse_bool(value) {
            Some(flag) => Self::Bool(flag),
            None => Self::String(value.to_string()),
        }
    }
}

/// String form used when a value is written to a string-only store:
/// `true` is `"1"` and `false` is empty.
impl fmt::Display for PhpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("1"),
            Self::Bool(false) => Ok(()),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<&str> for PhpValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for PhpValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One `<env>` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVariable {
    pub value: PhpValue,
    pub verbatim: bool,
    /// Overwrite values that already exist in the environment
    pub force: bool,
}

/// The request superglobal maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestVariables {
    pub post: BTreeMap<String, PhpValue>,
    pub get: BTreeMap<String, PhpValue>,
    pub cookie: BTreeMap<String, PhpValue>,
    pub server: BTreeMap<String, PhpValue>,
    pub files: BTreeMap<String, PhpValue>,
    pub request: BTreeMap<String, PhpValue>,
}

impl RequestVariables {
    pub const NAMES: [&'static str; 6] = ["post", "get", "cookie", "server", "files", "request"];

    pub fn map(&self, name: &str) -> Option<&BTreeMap<String, PhpValue>> {
        match name {
            "post" => Some(&self.post),
            "get" => Some(&self.get),
            "cookie" => Some(&self.cookie),
            "server" => Some(&self.server),
            "files" => Some(&self.files),
            "request" => Some(&self.request),
            _ => None,
        }
    }

    pub fn map_mut(&mut self, name: &str) -> Option<&mut BTreeMap<String, PhpValue>> {
        match name {
            "post" => Some(&mut self.post),
            "get" => Some(&mut self.get),
            "cookie" => Some(&mut self.cookie),
            "server" => Some(&mut self.server),
            "files" => Some(&mut self.files),
            "request" => Some(&mut self.request),
            _ => None,
        }
    }

    /// Iterate `(map name, map)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &BTreeMap<String, PhpValue>)> {
        Self::NAMES
            .into_iter()
            .filter_map(move |name| self.map(name).map(|map| (name, map)))
    }
}

/// Parsed `<php>` section.
///
/// Later declarations of the same name replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhpConfig {
    pub include_path: Vec<NormalizedPath>,
    pub ini: BTreeMap<String, String>,
    #[serde(rename = "const")]
    pub constants: BTreeMap<String, PhpValue>,
    #[serde(rename = "var")]
    pub globals: BTreeMap<String, PhpValue>,
    pub env: BTreeMap<String, EnvVariable>,
    #[serde(flatten)]
    pub request: RequestVariables,
}

impl PhpConfig {
    pub fn parse(php: Option<&Element>, ctx: &ParseContext<'_>) -> Self {
        let mut config = Self::default();
        let Some(php) = php else {
            return config;
        };

        for child in &php.children {
            if child.name == "includePath" {
                if let Some(path) = child.text() {
                    config.include_path.push(ctx.resolve_path(path));
                }
                continue;
            }

            let name = child.attribute("name").unwrap_or_default().to_string();
            let raw = child.attribute("value").unwrap_or_default();
            let verbatim = bool_attribute(child, "verbatim", false);
            let value = if verbatim {
                PhpValue::String(raw.to_string())
            } else {
                PhpValue::coerce(raw)
            };

            match child.name.as_str() {
                "ini" => {
                    config.ini.insert(name, raw.to_string());
                }
                "const" => {
                    config.constants.insert(name, PhpValue::coerce(raw));
                }
                "var" => {
                    config.globals.insert(name, value);
                }
                "env" => {
                    let force = bool_attribute(child, "force", false);
                    config.env.insert(
                        name,
                        EnvVariable {
                            value,
                            verbatim,
                            force,
                        },
                    );
                }
                other => match config.request.map_mut(other) {
                    Some(map) => {
                        map.insert(name, value);
                    }
                    None => tracing::debug!(element = other, "Ignoring unknown php setting"),
                },
            }
        }

        config
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
