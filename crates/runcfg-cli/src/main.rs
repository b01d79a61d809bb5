//! runcfg CLI
//!
//! Command-line front end for resolving test run configuration files.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use runcfg_core::LoaderOptions;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(e.to_string()))?;
        tracing::debug!("Verbose mode enabled");
    }

    let options = loader_options(&cli)?;

    match cli.command {
        Some(cmd) => execute_command(cmd, options),
        None => {
            println!(
                "{} Test run configuration resolver",
                "runcfg".green().bold()
            );
            println!();
            println!("Run {} for available commands.", "runcfg --help".cyan());
            Ok(())
        }
    }
}

fn loader_options(cli: &Cli) -> Result<LoaderOptions> {
    let mut options = LoaderOptions::new();
    for (name, value) in &cli.constants {
        options = options.with_constant(name.clone(), value.clone());
    }
    if !cli.include_path.is_empty() {
        let cwd = std::env::current_dir()?;
        for dir in &cli.include_path {
            options = options.with_include_path(cwd.join(dir));
        }
    }
    Ok(options)
}

fn execute_command(cmd: Commands, options: LoaderOptions) -> Result<()> {
    match cmd {
        Commands::Show { config, section } => {
            commands::run_show(&config, section.as_deref(), options)
        }
        Commands::Validate { config } => commands::run_validate(&config, options),
        Commands::Suites { config } => commands::run_suites(&config, options),
        Commands::Tests { config, testsuite } => {
            commands::run_tests(&config, &testsuite, options)
        }
        Commands::Env { config } => commands::run_env(&config, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_options_from_flags() {
        let cli = Cli::parse_from([
            "runcfg",
            "suites",
            "phpunit.xml",
            "--const",
            "ROOT=/srv",
            "--include-path",
            "/opt/lib",
        ]);
        let options = loader_options(&cli).unwrap();
        assert_eq!(options.constant("ROOT"), Some("/srv"));
        assert_eq!(options.include_path().len(), 1);
        assert_eq!(options.include_path()[0].as_str(), "/opt/lib");
    }

    #[test]
    fn test_relative_include_path_is_anchored_at_cwd() {
        let cli = Cli::parse_from(["runcfg", "suites", "phpunit.xml", "--include-path", "lib"]);
        let options = loader_options(&cli).unwrap();
        assert!(options.include_path()[0].is_absolute());
        assert!(options.include_path()[0].as_str().ends_with("/lib"));
    }
}
