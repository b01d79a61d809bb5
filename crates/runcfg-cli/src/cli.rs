//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// runcfg - Inspect and resolve test run configuration files
#[derive(Parser, Debug)]
#[command(name = "runcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Define a constant available to `<constant>` arguments and ini values
    #[arg(long = "const", value_name = "NAME=VALUE", value_parser = parse_constant, global = true)]
    pub constants: Vec<(String, String)>,

    /// Directory searched for listener and extension files
    #[arg(long = "include-path", value_name = "DIR", global = true)]
    pub include_path: Vec<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved configuration as JSON
    ///
    /// Examples:
    ///   runcfg show phpunit.xml
    ///   runcfg show phpunit.xml --section php
    Show {
        /// Configuration file
        config: PathBuf,

        /// Print only one section (phpunit, filter, groups, php, ...)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Check a configuration against the schema
    ///
    /// Exits with status 1 when the document has validation errors.
    Validate {
        /// Configuration file
        config: PathBuf,
    },

    /// List the top-level test suite names
    Suites {
        /// Configuration file
        config: PathBuf,
    },

    /// List the test files of every suite
    ///
    /// Examples:
    ///   runcfg tests phpunit.xml
    ///   runcfg tests phpunit.xml --testsuite unit,integration
    Tests {
        /// Configuration file
        config: PathBuf,

        /// Only include the named suites
        #[arg(long, value_delimiter = ',')]
        testsuite: Vec<String>,
    },

    /// Apply the `<php>` section to the current environment and print the result
    Env {
        /// Configuration file
        config: PathBuf,
    },
}

fn parse_constant(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{value}'")),
    }
}
