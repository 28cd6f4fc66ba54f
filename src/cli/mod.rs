//! CLI module for the ferry scanner
//!
//! ## Commands
//!
//! - `outline <unit.json>` - Scan a compilation unit and print its outline
//! - `imports <unit.json>...` - Activate units in order and list the static import registry
//!
//! Compilation units are read as JSON (the serde form of `ferry_syntax::ast::CompilationUnit`).
//!
//! ## Design
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::config::{ScanConfig, StaticImportPolicy};
use crate::passes::OutlineStyle;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Scan source-to-source translation units
#[derive(Parser, Debug)]
#[command(name = "ferry")]
#[command(version = VERSION)]
#[command(about = "Scan compilation units with the ferry traversal engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Let handler panics unwind instead of reporting them as internal errors
    #[arg(long, global = true)]
    pub no_catch_panics: bool,

    /// Do not log the scanning stack when an internal error is reported
    #[arg(long, global = true)]
    pub no_stack_dump: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the outline of a compilation unit
    Outline {
        /// Compilation unit (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Inline simple method bodies on the method line
        #[arg(long)]
        compact: bool,
    },

    /// List static imports registered after activating each unit in order
    Imports {
        /// Compilation units (JSON)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
        /// Clear the registry whenever a new unit is activated
        #[arg(long)]
        reset_per_unit: bool,
    },
}

impl Cli {
    fn scan_config(&self) -> ScanConfig {
        ScanConfig::default()
            .with_catch_panics(!self.no_catch_panics)
            .with_dump_stack_on_error(!self.no_stack_dump)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.scan_config();
    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Outline { file, compact } => {
            let style = if compact { OutlineStyle::Compact } else { OutlineStyle::Expanded };
            commands::outline_file(&file, config, style, &mut stdout)
        }
        Command::Imports { files, reset_per_unit } => {
            let policy = if reset_per_unit {
                StaticImportPolicy::ResetPerUnit
            } else {
                StaticImportPolicy::Accumulate
            };
            commands::list_imports(&files, config.with_static_imports(policy), &mut stdout)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_outline() {
        let cli = Cli::try_parse_from(["ferry", "outline", "unit.json", "--compact"]).unwrap();
        if let Command::Outline { file, compact } = &cli.command {
            assert_eq!(file, &PathBuf::from("unit.json"));
            assert!(compact);
        } else {
            panic!("Expected Outline command");
        }
        assert!(cli.scan_config().catch_panics);
    }

    #[test]
    fn test_cli_parse_imports() {
        let cli = Cli::try_parse_from(["ferry", "imports", "a.json", "b.json", "--reset-per-unit"]).unwrap();
        if let Command::Imports { files, reset_per_unit } = cli.command {
            assert_eq!(files.len(), 2);
            assert!(reset_per_unit);
        } else {
            panic!("Expected Imports command");
        }
    }

    #[test]
    fn test_cli_imports_requires_files() {
        assert!(Cli::try_parse_from(["ferry", "imports"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["ferry", "outline", "u.json", "--no-catch-panics", "--no-stack-dump"]).unwrap();
        let config = cli.scan_config();
        assert!(!config.catch_panics);
        assert!(!config.dump_stack_on_error);
    }
}
