//! Configuration model, loading and runtime application
//!
//! A configuration is resolved in a fixed pipeline:
//!
//! 1. **Load** - [`DocumentLoader`](crate::document::DocumentLoader) reads the
//!    file and expands inclusion directives
//! 2. **Validate** - [`validate`](crate::validation::validate) collects schema
//!    violations without stopping
//! 3. **Parse** - each section parser reads its own subtree
//! 4. **Cache** - [`ConfigurationLoader`] keeps one [`Configuration`] per
//!    canonical path
//!
//! The `<php>` section is applied on demand to a
//! [`ProcessEnvironmentContext`].
//!
//! # Example
//!
//! ```ignore
//! use runcfg_core::{ConfigurationLoader, LoaderOptions, ProcessEnvironmentContext};
//!
//! let loader = ConfigurationLoader::new(LoaderOptions::default());
//! let config = loader.load("phpunit.xml")?;
//!
//! let mut ctx = ProcessEnvironmentContext::from_process();
//! config.handle_php_configuration(&mut ctx);
//! ```

mod model;
mod options;
mod resolver;
mod runtime;

pub use model::{Configuration, SECTION_NAMES};
pub use options::{LoaderOptions, ParseContext};
pub use resolver::ConfigurationLoader;
pub use runtime::{
    ContextSnapshot, INCLUDE_PATH_SETTING, OsEnvironment, ProcessEnvironmentContext,
    ScopedContext, apply,
};
