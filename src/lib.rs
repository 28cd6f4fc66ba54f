#![forbid(unsafe_code)]
//! ferry: the traversal core of a source-to-source translator
//!
//! A translation pass walks a compilation unit through a [`Scanner`], which keeps the exact path from the root to
//! the node being visited, lets a pass abandon a partially translated subtree and retry from an ancestor
//! (rollback), isolates handler failures as diagnostics, and tracks the static imports of the units it has seen.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `scan` and `cli` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Pass code**: a panicking handler is reported as an internal error at the node being scanned when
//!   [`ScanConfig::catch_panics`] is on; prefer returning a [`Fault`].
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod imports;
pub mod passes;
pub mod position;
pub mod resolve;
pub mod scan;
pub mod source_cache;

pub use ferry_syntax::{Node, NodeKind, ast};

pub use config::{ScanConfig, StaticImportPolicy};
pub use diagnostics::{CollectingHandler, Diagnostic, DiagnosticHandler, Problem, Severity};
pub use error::ScanError;
pub use imports::StaticImports;
pub use position::{PositionService, SourcePosition, SpanPositions};
pub use resolve::{DeclResolver, DeclSymbol, SymbolResolver};
pub use scan::{Fault, Pass, Scanner, Visit, rollback, rollback_with};
