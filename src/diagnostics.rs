//! Diagnostics reported while scanning: the problem catalog, the handler seam and the stock handlers.
//!
//! Passes report through [`Scanner::report`](crate::scan::Scanner::report). Without a configured handler the
//! message goes straight to stderr; with one, the scanner resolves a [`SourcePosition`] and forwards a
//! [`Diagnostic`]. What happens next (collecting, printing, counting) is the handler's business.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::io;
use std::rc::Rc;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, MietteDiagnostic, NamedSource, Report};

use crate::position::SourcePosition;
use crate::source_cache::SourceCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Kinds of problems a pass can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Problem {
    /// A handler failed on a node; the subtree produced no output.
    InternalTranspilerError,
    /// `{construct}`
    UnsupportedConstruct,
    /// `{name}`
    UnknownSymbol,
    /// `{strategy}`, `{node}`
    StrategyFallback,
}

impl Problem {
    pub fn severity(self) -> Severity {
        match self {
            Problem::InternalTranspilerError | Problem::UnsupportedConstruct | Problem::UnknownSymbol => {
                Severity::Error
            }
            Problem::StrategyFallback => Severity::Warning,
        }
    }

    /// Stable code, e.g. for filtering or documentation links.
    pub fn code(self) -> &'static str {
        match self {
            Problem::InternalTranspilerError => "ferry::internal",
            Problem::UnsupportedConstruct => "ferry::unsupported",
            Problem::UnknownSymbol => "ferry::unknown_symbol",
            Problem::StrategyFallback => "ferry::fallback",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Problem::InternalTranspilerError => "internal transpiler error: {}",
            Problem::UnsupportedConstruct => "unsupported construct: {}",
            Problem::UnknownSymbol => "cannot resolve symbol '{}'",
            Problem::StrategyFallback => "falling back to {} for {}",
        }
    }

    /// Render the message, substituting `params` for the `{}` placeholders in order.
    ///
    /// Placeholders without a matching parameter are dropped; extra parameters are ignored.
    pub fn message(self, params: &[&dyn fmt::Display]) -> String {
        let mut out = String::new();
        let mut params = params.iter();
        let mut unfilled = false;
        let mut pieces = self.template().split("{}").peekable();
        while let Some(piece) = pieces.next() {
            out.push_str(piece);
            if pieces.peek().is_some() {
                match params.next() {
                    Some(param) => out.push_str(&param.to_string()),
                    None => unfilled = true,
                }
            }
        }
        if unfilled {
            // drop the separator left dangling by a missing trailing parameter
            out.truncate(out.trim_end_matches([' ', ':']).len());
        }
        out
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A reported problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub problem: Problem,
    /// `None` when no compilation unit was active or the position could not be resolved.
    pub position: Option<SourcePosition>,
    pub message: String,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.problem.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{}: {} ({})", self.severity(), self.message, position),
            None => write!(f, "{}: {}", self.severity(), self.message),
        }
    }
}

/// Receives diagnostics from a scanning session.
pub trait DiagnosticHandler {
    fn report(&mut self, diagnostic: Diagnostic);
}

// ============================================================================
// Stock handlers
// ============================================================================

/// Keeps every diagnostic in a list shared between clones, so a caller can hand one clone to the scanner and
/// read the results through another.
#[derive(Debug, Clone, Default)]
pub struct CollectingHandler {
    collected: Rc<RefCell<Vec<Diagnostic>>>,
}

impl CollectingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collected.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.collected.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collected.borrow().is_empty()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.collected.borrow_mut())
    }
}

impl DiagnosticHandler for CollectingHandler {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.collected.borrow_mut().push(diagnostic);
    }
}

/// Error and warning tallies shared between an [`ErrorCountHandler`] and its owner.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCounts {
    errors: Rc<Cell<usize>>,
    warnings: Rc<Cell<usize>>,
}

impl DiagnosticCounts {
    pub fn errors(&self) -> usize {
        self.errors.get()
    }

    pub fn warnings(&self) -> usize {
        self.warnings.get()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }
}

/// Counts diagnostics by severity and forwards them to an inner handler.
pub struct ErrorCountHandler<H> {
    inner: H,
    counts: DiagnosticCounts,
}

impl<H: DiagnosticHandler> ErrorCountHandler<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            counts: DiagnosticCounts::default(),
        }
    }

    pub fn counts(&self) -> DiagnosticCounts {
        self.counts.clone()
    }
}

impl<H: DiagnosticHandler> DiagnosticHandler for ErrorCountHandler<H> {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => self.counts.errors.set(self.counts.errors.get() + 1),
            Severity::Warning => self.counts.warnings.set(self.counts.warnings.get() + 1),
            Severity::Info => {}
        }
        self.inner.report(diagnostic);
    }
}

/// Prints diagnostics with source context, rendered by miette.
///
/// Source text is read through a private [`SourceCache`]; when the file cannot be read the diagnostic is printed
/// as a single line instead.
pub struct ConsoleHandler<W: io::Write> {
    out: W,
    sources: SourceCache,
    renderer: GraphicalReportHandler,
}

impl ConsoleHandler<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: io::Write> ConsoleHandler<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sources: SourceCache::new(),
            renderer: GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor()),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, diagnostic: &Diagnostic) -> String {
        let severity = match diagnostic.severity() {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
            Severity::Info => miette::Severity::Advice,
        };
        let base = MietteDiagnostic::new(diagnostic.message.clone())
            .with_code(diagnostic.problem.code())
            .with_severity(severity);

        let Some(position) = &diagnostic.position else {
            return format!("{}[{}]: {}\n", diagnostic.severity(), diagnostic.problem.code(), diagnostic.message);
        };
        let Some(lines) = self.sources.lines_at(&position.file) else {
            return format!(
                "{}[{}]: {} ({})\n",
                diagnostic.severity(),
                diagnostic.problem.code(),
                diagnostic.message,
                position
            );
        };

        let text = lines.join("\n");
        let start = position.span.start.min(text.len());
        let len = position.span.len().min(text.len() - start);
        let report = Report::new(base.with_label(LabeledSpan::at(start..start + len, "here")))
            .with_source_code(NamedSource::new(position.file.display().to_string(), text));

        let mut rendered = String::new();
        if self.renderer.render_report(&mut rendered, &*report).is_err() {
            rendered = format!("{}: {} ({})\n", diagnostic.severity(), diagnostic.message, position);
        }
        rendered
    }
}

impl<W: io::Write> DiagnosticHandler for ConsoleHandler<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let rendered = self.render(&diagnostic);
        if let Err(err) = self.out.write_all(rendered.as_bytes()) {
            tracing::warn!(error = %err, "failed to write diagnostic");
        }
    }
}
