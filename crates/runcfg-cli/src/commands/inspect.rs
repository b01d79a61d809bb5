//! Read-only views of a resolved configuration: show, suites and tests

use std::path::Path;

use colored::Colorize;
use runcfg_core::{LoaderOptions, SECTION_NAMES};

use super::load;
use crate::error::{CliError, Result};

/// Run the show command
pub fn run_show(path: &Path, section: Option<&str>, options: LoaderOptions) -> Result<()> {
    let config = load(path, options)?;
    let value = config.section_json(section).ok_or_else(|| {
        CliError::user(format!(
            "Unknown section '{}', expected one of: {}",
            section.unwrap_or_default(),
            SECTION_NAMES.join(", ")
        ))
    })?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Run the suites command
pub fn run_suites(path: &Path, options: LoaderOptions) -> Result<()> {
    let config = load(path, options)?;
    let names = config.test_suite_names();
    if names.is_empty() {
        println!("{}", "No test suites configured".dimmed());
        return Ok(());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

/// Run the tests command
pub fn run_tests(path: &Path, suites: &[String], options: LoaderOptions) -> Result<()> {
    let config = load(path, options)?;
    let suite_config = config.test_suite_configuration();
    let names = config.test_suite_names();

    if let Some(unknown) = suites
        .iter()
        .find(|name| !names.iter().any(|known| known.as_str() == name.trim()))
    {
        return Err(CliError::user(format!("No test suite named '{}'", unknown.trim())));
    }

    let units = if suites.is_empty() {
        suite_config.tests()
    } else {
        suite_config.tests_for(suites)
    };
    tracing::debug!(count = units.len(), "Resolved test files");

    for unit in &units {
        println!("{}\t{}", unit.suite.cyan(), unit.file);
    }
    Ok(())
}
