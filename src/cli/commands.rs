//! Command implementations for the ferry CLI
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`, and write their regular output to the given writer.

use std::fs;
use std::io::Write;
use std::path::Path;

use ferry_syntax::ast::CompilationUnit;

use super::{CliError, CliResult, ExitCode};
use crate::config::ScanConfig;
use crate::diagnostics::{ConsoleHandler, ErrorCountHandler};
use crate::passes::{OutlinePass, OutlineStyle};
use crate::scan::Scanner;

/// Read a compilation unit from its JSON form.
///
/// A relative source path inside the unit is taken relative to the JSON file's directory, so diagnostics can
/// find the source text next to it.
pub fn load_unit(path: &Path) -> CliResult<CompilationUnit> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))?;
    let mut unit: CompilationUnit = serde_json::from_str(&text)
        .map_err(|e| CliError::failure(format!("Invalid compilation unit '{}': {}", path.display(), e)))?;

    if unit.path.is_relative() {
        if let Some(dir) = path.parent() {
            unit.path = dir.join(&unit.path);
        }
    }
    tracing::debug!(unit = %path.display(), source = %unit.path.display(), "loaded compilation unit");
    Ok(unit)
}

/// Scan one unit with the outline pass and print the outline.
///
/// Fails (exit code 1) when an error diagnostic was reported, after printing whatever was produced.
pub fn outline_file(path: &Path, config: ScanConfig, style: OutlineStyle, out: &mut impl Write) -> CliResult<ExitCode> {
    let unit = load_unit(path)?;

    let handler = ErrorCountHandler::new(ConsoleHandler::stderr());
    let counts = handler.counts();
    let mut scanner = Scanner::new(config).with_handler(handler);
    let mut pass = OutlinePass::new(style);
    scanner
        .run(&mut pass, &unit)
        .map_err(|e| CliError::failure(format!("Error scanning '{}': {}", path.display(), e)))?;

    out.write_all(pass.finish().as_bytes())
        .map_err(|e| CliError::failure(format!("Error writing output: {}", e)))?;

    if counts.has_errors() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Activate each unit in order and print the resulting static import registry, sorted by short name.
pub fn list_imports(paths: &[impl AsRef<Path>], config: ScanConfig, out: &mut impl Write) -> CliResult<ExitCode> {
    let units = paths
        .iter()
        .map(|path| load_unit(path.as_ref()))
        .collect::<CliResult<Vec<_>>>()?;

    let mut scanner = Scanner::new(config);
    for unit in &units {
        scanner.set_compilation_unit(Some(unit));
    }

    let mut entries: Vec<_> = scanner.static_imports().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (short, import) in entries {
        writeln!(out, "{} -> {}", short, import.node.qualified_identifier())
            .map_err(|e| CliError::failure(format!("Error writing output: {}", e)))?;
    }
    Ok(ExitCode::SUCCESS)
}
