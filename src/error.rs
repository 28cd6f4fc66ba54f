//! Session-level errors.
//!
//! Failures inside a single subtree never reach these types: the engine reports them as diagnostics and keeps
//! going. A [`ScanError`] means the traversal session itself is broken and should be abandoned.

use ferry_syntax::NodeKind;
use ferry_syntax::ast::Span;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScanError {
    /// A rollback was requested for a node that is not on the scanning stack.
    #[error("rollback target {kind} at {span} is not an ancestor of the scanned node")]
    #[diagnostic(
        code(ferry::scan::unhandled_rollback),
        help("rollback targets must be nodes currently being scanned (the current node or one of its ancestors)")
    )]
    UnhandledRollback { kind: NodeKind, span: Span },
}
