//! Command implementations for runcfg-cli

pub mod env;
pub mod inspect;
pub mod validate;

pub use env::run_env;
pub use inspect::{run_show, run_suites, run_tests};
pub use validate::run_validate;

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use runcfg_core::{Configuration, ConfigurationLoader, LoaderOptions};

use crate::error::Result;

/// Load `path`, reporting validation problems on stderr without failing.
pub(crate) fn load(path: &Path, options: LoaderOptions) -> Result<Arc<Configuration>> {
    let config = ConfigurationLoader::new(options).load(path)?;
    if config.has_validation_errors() {
        eprintln!(
            "{}: {} has {} validation error(s), run {} for details",
            "warning".yellow().bold(),
            path.display(),
            config.validation_errors().len(),
            "runcfg validate".cyan()
        );
    }
    Ok(config)
}
