//! Shared test utilities for the runcfg workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`] - paths into the checked-in `test-fixtures/configs` tree
//! - [`project`] - [`TestProject`](project::TestProject) builder for
//!   configurations written into a temporary directory

pub mod fixtures;
pub mod project;
