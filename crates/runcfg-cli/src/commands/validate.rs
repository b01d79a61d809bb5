//! Validate command implementation

use std::path::Path;

use colored::Colorize;
use runcfg_core::{ConfigurationLoader, LoaderOptions};

use crate::error::{CliError, Result};

/// Run the validate command
///
/// Prints every validation error and fails when there is at least one.
pub fn run_validate(path: &Path, options: LoaderOptions) -> Result<()> {
    let config = ConfigurationLoader::new(options).load(path)?;
    let errors = config.validation_errors();

    if errors.is_empty() {
        println!("{} {}", "OK".green().bold(), config.filename());
        return Ok(());
    }

    for error in errors {
        println!("  {} {}", "x".red(), error);
    }
    Err(CliError::user(format!(
        "{} has {} validation error(s)",
        config.filename(),
        errors.len()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use runcfg_test_utils::fixtures;

    #[test]
    fn test_valid_fixture_passes() {
        let result = run_validate(&fixtures::config("configuration.xml"), LoaderOptions::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_fixture_fails() {
        let result = run_validate(
            &fixtures::config("configuration.colors.invalid.xml"),
            LoaderOptions::default(),
        );
        let message = result.unwrap_err().to_string();
        assert!(message.ends_with("has 1 validation error(s)"), "{message}");
    }
}
