//! Run-configuration resolution engine
//!
//! This crate turns an XML run configuration (root element `<phpunit>`) into
//! a validated, typed model:
//!
//! - **Document loading**: XML parsing and inclusion directives, merged into one tree
//! - **Validation**: schema checks that report instead of failing
//! - **Section parsing**: seven independent parsers with documented defaults
//! - **Caching**: one shared model per canonical path
//! - **Runtime application**: the `<php>` section applied to an explicit context
//! - **Suite resolution**: the suite tree flattened to concrete test files
//!
//! # Architecture
//!
//! ```text
//!              runcfg-cli
//!                  |
//!             runcfg-core
//!     +-------+----+------+--------+
//!     |       |           |        |
//! document validation sections config
//!     |                   |
//!     +------ runcfg-fs --+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use runcfg_core::{ConfigurationLoader, LoaderOptions};
//!
//! let loader = ConfigurationLoader::new(LoaderOptions::default());
//! let config = loader.load("phpunit.xml")?;
//! for unit in config.test_suite_configuration().tests() {
//!     println!("{}: {}", unit.suite, unit.file);
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod sections;
pub mod validation;

pub use config::{
    Configuration, ConfigurationLoader, ContextSnapshot, LoaderOptions, OsEnvironment,
    ParseContext, ProcessEnvironmentContext, SECTION_NAMES, ScopedContext,
};
pub use document::{DocumentLoader, Element, LoadedDocument};
pub use error::{Error, ParseError, Result};
pub use sections::{
    ArgumentValue, ColorMode, Columns, ComponentDeclaration, DefectsOrder, EnvVariable,
    ExecutionOrder, FilterConfig, GroupConfig, LogTarget, LoggingConfig, PhpConfig,
    PhpUnitOptions, PhpValue, TestSuiteConfig, TestUnit,
};
pub use validation::{ValidationError, validate};
