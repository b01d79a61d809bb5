//! Env command implementation

use std::path::Path;

use runcfg_core::{LoaderOptions, ProcessEnvironmentContext};

use super::load;
use crate::error::Result;

/// Run the env command
///
/// The context starts from the current process environment and the
/// constants given on the command line. Nothing is written back to the
/// real process.
pub fn run_env(path: &Path, options: LoaderOptions) -> Result<()> {
    let mut ctx = ProcessEnvironmentContext::from_process().with_constants(options.constants());
    let config = load(path, options)?;
    config.handle_php_configuration(&mut ctx);
    println!("{}", serde_json::to_string_pretty(&ctx)?);
    Ok(())
}
