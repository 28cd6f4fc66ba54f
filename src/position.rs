//! Source positions and the positioning service.
//!
//! A [`SourcePosition`] is a file plus a byte span. Line and column numbers are derived lazily from source lines
//! (see [`SourceCache`](crate::source_cache::SourceCache)) because the tree itself only records byte offsets.

use std::fmt;
use std::path::PathBuf;

use ferry_syntax::Node;
use ferry_syntax::ast::{CompilationUnit, Span};

/// Location of a node in its source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub file: PathBuf,
    pub span: Span,
}

impl SourcePosition {
    pub fn new(file: impl Into<PathBuf>, span: Span) -> Self {
        Self {
            file: file.into(),
            span,
        }
    }

    /// 1-based line and column of the span start within `lines`.
    pub fn start(&self, lines: &[String]) -> LineCol {
        locate(lines, self.span.start)
    }

    /// Render as `file:line:col` using the given lines.
    pub fn render(&self, lines: &[String]) -> String {
        let at = self.start(lines);
        format!("{}:{}:{}", self.file.display(), at.line, at.column)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.file.display(), self.span)
    }
}

/// 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

/// Get line number and column number for a byte offset.
///
/// Lines are separated by a single `\n`; a `\r` before it stays part of the line. Offsets past the end clamp to the end of the last line.
pub fn locate(lines: &[String], offset: usize) -> LineCol {
    let mut line_start = 0;
    for (i, line) in lines.iter().enumerate() {
        let line_end = line_start + line.len();
        if offset <= line_end {
            return LineCol {
                line: i + 1,
                column: offset - line_start + 1,
            };
        }
        line_start = line_end + 1;
    }
    match lines.last() {
        Some(last) => LineCol {
            line: lines.len(),
            column: last.len() + 1,
        },
        None => LineCol { line: 1, column: 1 },
    }
}

/// Maps nodes to source positions within a compilation unit.
pub trait PositionService {
    /// Position of `node` in `unit`, narrowed to the direct child called `name` when one is given and found.
    fn source_position(&self, unit: &CompilationUnit, node: Node<'_>, name: Option<&str>) -> Option<SourcePosition>;
}

/// Default positioning service: uses the spans recorded in the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanPositions;

impl PositionService for SpanPositions {
    fn source_position(&self, unit: &CompilationUnit, node: Node<'_>, name: Option<&str>) -> Option<SourcePosition> {
        let span = name
            .and_then(|name| {
                node.named_children()
                    .into_iter()
                    .find(|(child, _)| *child == name)
                    .map(|(_, span)| span)
            })
            .unwrap_or_else(|| node.span());
        Some(SourcePosition::new(unit.path.clone(), span))
    }
}
