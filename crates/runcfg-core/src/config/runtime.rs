//! Runtime environment application
//!
//! The `<php>` section describes process-wide state: ini settings, constants,
//! global variables, request superglobals and environment variables. Instead
//! of touching the real process, it is applied to an explicit
//! [`ProcessEnvironmentContext`] which callers can snapshot, inspect and
//! restore.

use crate::sections::{PhpConfig, PhpValue, RequestVariables};
use runcfg_fs::PATH_SEPARATOR;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// Name of the ini setting that holds the include path.
pub const INCLUDE_PATH_SETTING: &str = "include_path";

/// OS-level environment variables, the side channel next to the structured
/// `env` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OsEnvironment {
    vars: BTreeMap<String, String>,
}

impl OsEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the variables of the current process. Variables whose name or
    /// value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OsEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Process-wide state a configuration can modify.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessEnvironmentContext {
    pub ini: BTreeMap<String, String>,
    #[serde(rename = "const")]
    pub constants: BTreeMap<String, PhpValue>,
    #[serde(rename = "var")]
    pub globals: BTreeMap<String, PhpValue>,
    #[serde(flatten)]
    pub request: RequestVariables,
    /// Structured environment map
    pub env: BTreeMap<String, String>,
    /// OS-level environment
    pub os_env: OsEnvironment,
}

/// Saved state of a [`ProcessEnvironmentContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSnapshot(ProcessEnvironmentContext);

impl ProcessEnvironmentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose OS-level environment is a copy of the current process
    /// environment.
    pub fn from_process() -> Self {
        Self {
            os_env: OsEnvironment::from_process(),
            ..Self::default()
        }
    }

    /// Define string constants that exist before any configuration is applied.
    pub fn with_constants<'a>(
        mut self,
        constants: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        for (name, value) in constants {
            self.constants
                .insert(name.clone(), PhpValue::String(value.clone()));
        }
        self
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot(self.clone())
    }

    pub fn restore(&mut self, snapshot: ContextSnapshot) {
        *self = snapshot.0;
    }

    /// Snapshot now and restore automatically when the guard is dropped.
    pub fn scoped(&mut self) -> ScopedContext<'_> {
        let snapshot = self.snapshot();
        ScopedContext {
            context: self,
            snapshot: Some(snapshot),
        }
    }
}

/// Guard returned by [`ProcessEnvironmentContext::scoped`].
///
/// Derefs to the context; every change made through the guard is undone
/// when it goes out of scope.
#[derive(Debug)]
pub struct ScopedContext<'a> {
    context: &'a mut ProcessEnvironmentContext,
    snapshot: Option<ContextSnapshot>,
}

impl Deref for ScopedContext<'_> {
    type Target = ProcessEnvironmentContext;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl DerefMut for ScopedContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl Drop for ScopedContext<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.context.restore(snapshot);
        }
    }
}

/// Apply a `<php>` section to `ctx`.
///
/// Not idempotent: include-path entries are prepended again on every call.
pub fn apply(php: &PhpConfig, ctx: &mut ProcessEnvironmentContext) {
    apply_include_path(php, ctx);

    for (name, value) in &php.ini {
        let value = match ctx.constants.get(value) {
            Some(constant) => constant.to_string(),
            None => value.clone(),
        };
        ctx.ini.insert(name.clone(), value);
    }

    for (name, value) in &php.constants {
        if !ctx.constants.contains_key(name) {
            ctx.constants.insert(name.clone(), value.clone());
        }
    }

    for (name, value) in &php.globals {
        ctx.globals.insert(name.clone(), value.clone());
    }

    for (map_name, values) in php.request.iter() {
        if let Some(target) = ctx.request.map_mut(map_name) {
            for (name, value) in values {
                target.insert(name.clone(), value.clone());
            }
        }
    }

    for (name, variable) in &php.env {
        let value = variable.value.to_string();
        if variable.force {
            ctx.env.insert(name.clone(), value.clone());
            ctx.os_env.set(name.clone(), value);
        } else if ctx.env.contains_key(name) {
            continue;
        } else if let Some(existing) = ctx.os_env.get(name) {
            let existing = existing.to_string();
            ctx.env.insert(name.clone(), existing);
        } else {
            ctx.env.insert(name.clone(), value.clone());
            ctx.os_env.set(name.clone(), value);
        }
    }

    tracing::debug!(
        ini = php.ini.len(),
        constants = php.constants.len(),
        env = php.env.len(),
        "Applied php configuration"
    );
}

fn apply_include_path(php: &PhpConfig, ctx: &mut ProcessEnvironmentContext) {
    if php.include_path.is_empty() {
        return;
    }

    let mut entries: Vec<String> = php.include_path.iter().map(|p| p.to_string()).collect();
    if let Some(existing) = ctx.ini.get(INCLUDE_PATH_SETTING).filter(|v| !v.is_empty()) {
        entries.push(existing.clone());
    }
    ctx.ini.insert(
        INCLUDE_PATH_SETTING.to_string(),
        entries.join(&PATH_SEPARATOR.to_string()),
    );
}
