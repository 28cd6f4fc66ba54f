//! The scanning engine: stack-maintained traversal, rollback and internal-error isolation.
//!
//! A [`Scanner`] is one traversal session. It owns the scanning stack (the exact path from the root to the node
//! being visited), the active compilation unit, the static import registry, a source text cache and the diagnostic
//! handler. Passes implement [`Pass`] and drive traversal by calling [`Scanner::scan`] on child nodes.
//!
//! ## Notes
//!
//! - **Bracketing**: every `scan` call pushes its node once and pops it once, whatever the handler returns.
//! - **Rollback**: a handler returns [`rollback`] / [`rollback_with`] to abandon work below an ancestor. The
//!   request is forwarded frame by frame until it reaches the frame whose node is the target (by identity), which
//!   runs [`Pass::on_rollbacked`] and the callback with the stack still ending at the target.
//! - **Faults**: any other failure (an `Err(Fault)` or, with [`ScanConfig::catch_panics`], a panic) is reported as
//!   an internal error at the innermost frame and swallowed, so siblings are still scanned.
//! - A rollback whose target is not on the stack escapes the outermost frame; [`Scanner::scan_root`] turns it into
//!   [`ScanError::UnhandledRollback`].
//!
//! ## Examples
//!
//! ```rust
//! use ferry::scan::{Pass, Scanner, Visit};
//! use ferry_syntax::ast::{CompilationUnit, Spanned, Stmt};
//!
//! struct CountStatements(usize);
//!
//! impl<'a> Pass<'a> for CountStatements {
//!     fn visit_stmt(&mut self, cx: &mut Scanner<'a>, stmt: &'a Spanned<Stmt>) -> Visit<'a, Self> {
//!         self.0 += 1;
//!         ferry::scan::walk::walk_stmt(self, cx, stmt)
//!     }
//! }
//!
//! let unit = CompilationUnit { path: "Empty.java".into(), package: None, imports: vec![], types: vec![] };
//! let mut scanner = Scanner::default();
//! let mut pass = CountStatements(0);
//! scanner.run(&mut pass, &unit).unwrap();
//! assert_eq!(pass.0, 0);
//! assert_eq!(scanner.depth(), 0);
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod context;
mod pass;
mod rollback;
pub mod walk;


use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use ferry_syntax::Node;
use ferry_syntax::ast::{CompilationUnit, Span};

use crate::config::ScanConfig;
use crate::diagnostics::{Diagnostic, DiagnosticHandler, Problem};
use crate::error::ScanError;
use crate::imports::StaticImports;
use crate::position::{PositionService, SpanPositions};
use crate::source_cache::SourceCache;

use pass::dispatch;

pub use pass::Pass;
pub use rollback::{Fault, Interrupt, Rollback, RollbackCallback, Visit, rollback, rollback_with};

/// One traversal session over one active compilation unit at a time.
pub struct Scanner<'a> {
    config: ScanConfig,
    stack: Vec<Node<'a>>,
    unit: Option<&'a CompilationUnit>,
    static_imports: StaticImports<'a>,
    sources: SourceCache,
    handler: Option<Box<dyn DiagnosticHandler + 'a>>,
    positions: Box<dyn PositionService + 'a>,
}

impl Default for Scanner<'_> {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl<'a> Scanner<'a> {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            stack: Vec::new(),
            unit: None,
            static_imports: StaticImports::new(),
            sources: SourceCache::new(),
            handler: None,
            positions: Box::new(SpanPositions),
        }
    }

    /// Route diagnostics to `handler` instead of stderr.
    pub fn with_handler(mut self, handler: impl DiagnosticHandler + 'a) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Replace the default span-based positioning service.
    pub fn with_positions(mut self, positions: impl PositionService + 'a) -> Self {
        self.positions = Box::new(positions);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    // ========================================================================
    // Compilation unit lifecycle
    // ========================================================================

    /// Make `unit` the active compilation unit and register its static imports according to
    /// [`ScanConfig::static_imports`]. Passing `None` deactivates the current unit without touching the registry.
    pub fn set_compilation_unit(&mut self, unit: Option<&'a CompilationUnit>) {
        self.unit = unit;
        if let Some(unit) = unit {
            tracing::debug!(path = %unit.path.display(), imports = unit.imports.len(), "activating compilation unit");
            self.static_imports.register_unit(unit, self.config.static_imports);
        }
    }

    /// The compilation unit currently being scanned.
    pub fn compilation_unit(&self) -> Option<&'a CompilationUnit> {
        self.unit
    }

    /// Static imports registered so far.
    pub fn static_imports(&self) -> &StaticImports<'a> {
        &self.static_imports
    }

    /// Source lines of the active unit, if its file can be read.
    pub fn source_lines(&mut self) -> Option<&[String]> {
        let unit = self.unit?;
        self.sources.lines_for(unit)
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Scan the active unit from its root.
    #[tracing::instrument(skip_all, fields(path = %unit.path.display()))]
    pub fn run<P: Pass<'a>>(&mut self, pass: &mut P, unit: &'a CompilationUnit) -> Result<(), ScanError> {
        self.set_compilation_unit(Some(unit));
        self.scan_root(pass, Node::Unit(unit))
    }

    /// Scan `node` as the outermost frame of a session. A rollback that escapes it is fatal to the session.
    #[tracing::instrument(skip_all, fields(kind = %node.kind()))]
    pub fn scan_root<P: Pass<'a>>(&mut self, pass: &mut P, node: Node<'a>) -> Result<(), ScanError> {
        self.scan(pass, node).map_err(|rollback| {
            let target = rollback.target();
            tracing::error!(target_kind = %target.kind(), span = %target.span(), "rollback escaped the scan root");
            ScanError::UnhandledRollback {
                kind: target.kind(),
                span: target.span(),
            }
        })
    }

    /// Scan one node: push it, dispatch to the pass, settle the outcome, pop it.
    ///
    /// Absent nodes are a no-op. Returns `Err` only for a rollback aimed at an ancestor frame, which the caller
    /// must forward (handlers do so with `?`).
    pub fn scan<P: Pass<'a>>(
        &mut self,
        pass: &mut P,
        node: impl Into<Option<Node<'a>>>,
    ) -> Result<(), Rollback<'a, P>> {
        let Some(node) = node.into() else {
            return Ok(());
        };

        self.enter(node);
        let outcome = self.guarded(|cx| dispatch(pass, cx, node));
        let result = match outcome {
            Ok(()) => Ok(()),
            Err(Interrupt::Rollback(rollback)) if rollback.target() == node => self.land(pass, node, rollback),
            Err(Interrupt::Rollback(rollback)) => Err(rollback),
            Err(Interrupt::Fault(fault)) => {
                self.internal_error(node, &fault);
                Ok(())
            }
        };
        self.exit(node);
        result
    }

    fn enter(&mut self, node: Node<'a>) {
        self.stack.push(node);
    }

    fn exit(&mut self, node: Node<'a>) {
        let popped = self.stack.pop();
        debug_assert!(popped.is_some_and(|top| top == node), "scanning stack out of balance");
    }

    /// Run `f`, converting a panic into a fault when configured to. Frames pushed by the panicking code are
    /// discarded so the stack again ends at the caller's frame.
    fn guarded<P>(&mut self, f: impl FnOnce(&mut Self) -> Visit<'a, P>) -> Visit<'a, P> {
        if !self.config.catch_panics {
            return f(self);
        }
        let depth = self.stack.len();
        match panic::catch_unwind(AssertUnwindSafe(|| f(self))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                self.stack.truncate(depth);
                Err(Interrupt::Fault(Fault::from_panic(payload.as_ref())))
            }
        }
    }

    /// Finish a rollback on its target frame.
    fn land<P: Pass<'a>>(
        &mut self,
        pass: &mut P,
        node: Node<'a>,
        rollback: Rollback<'a, P>,
    ) -> Result<(), Rollback<'a, P>> {
        tracing::debug!(kind = %node.kind(), span = %node.span(), depth = self.stack.len(), "rollback landed");
        let callback = rollback.into_callback();
        let outcome = self.guarded(|cx| {
            pass.on_rollbacked(cx, node);
            match callback {
                Some(callback) => callback(pass, cx, node),
                None => Ok(()),
            }
        });
        match outcome {
            Ok(()) => Ok(()),
            // The target frame is finished; a new request can only be for an enclosing frame.
            Err(Interrupt::Rollback(next)) => Err(next),
            Err(Interrupt::Fault(fault)) => {
                self.internal_error(node, &fault);
                Ok(())
            }
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Report `problem` on `node`.
    pub fn report(&mut self, node: Node<'a>, problem: Problem, params: &[&dyn fmt::Display]) {
        self.report_named(node, None, problem, params);
    }

    /// Report `problem` on the element called `name` inside `node` (e.g. one parameter of a method).
    pub fn report_named(&mut self, node: Node<'a>, name: Option<&str>, problem: Problem, params: &[&dyn fmt::Display]) {
        let message = problem.message(params);
        let Some(handler) = self.handler.as_mut() else {
            eprintln!("{}", message);
            return;
        };
        let position = self
            .unit
            .and_then(|unit| self.positions.source_position(unit, node, name));
        handler.report(Diagnostic {
            problem,
            position,
            message,
        });
    }

    fn internal_error(&mut self, node: Node<'a>, fault: &Fault) {
        tracing::error!(kind = %node.kind(), span = %node.span(), error = %fault, "internal error while scanning");
        self.report(node, Problem::InternalTranspilerError, &[fault]);
        if self.config.dump_stack_on_error {
            let trace = self.stack_trace();
            tracing::error!("{}", trace);
        }
    }

    /// Human-readable dump of the scanning stack, innermost frame first.
    ///
    /// Each line shows the node kind, the start of its source text (or a structural label when the source file is
    /// unavailable) and its position.
    pub fn stack_trace(&mut self) -> String {
        let width = self.config.dump_text_width;
        let unit = self.unit;
        let lines = match unit {
            Some(unit) => self.sources.lines_for(unit),
            None => None,
        };

        let mut out = String::from("dumping transpiler's stack trace:");
        for node in self.stack.iter().rev() {
            let (text, cut) = lines
                .and_then(|lines| first_line_at(lines, node.span()))
                .unwrap_or_else(|| (node.label(), false));
            let (text, shortened) = truncate(&text, width);
            let ellipsis = if cut || shortened { "..." } else { "" };

            let position = unit.and_then(|unit| self.positions.source_position(unit, *node, None));
            let at = match (position, lines) {
                (Some(position), Some(lines)) => position.render(lines),
                (Some(position), None) => position.to_string(),
                (None, _) => "unknown position".to_string(),
            };
            out.push_str(&format!("\n   [{}] {}{} ({})", node.kind(), text, ellipsis, at));
        }
        out
    }
}

/// Source text on the line where `span` starts, from its start column, trimmed. The flag tells whether the span
/// continues past that line.
fn first_line_at(lines: &[String], span: Span) -> Option<(String, bool)> {
    let mut line_start = 0;
    for line in lines {
        let line_end = line_start + line.len();
        if span.start <= line_end {
            let from = span.start - line_start;
            let to = span.end.min(line_end).saturating_sub(line_start);
            let text = line.get(from..to.max(from))?.trim();
            if text.is_empty() {
                return None;
            }
            return Some((text.to_string(), span.end > line_end));
        }
        line_start = line_end + 1;
    }
    None
}

fn truncate(text: &str, width: usize) -> (String, bool) {
    match text.char_indices().nth(width) {
        Some((idx, _)) => (text[..idx].trim_end().to_string(), true),
        None => (text.to_string(), false),
    }
}
