//! Structural outline of a compilation unit.
//!
//! The outline lists imports, type declarations, members and statements, indented by nesting. In
//! [`OutlineStyle::Compact`] a method body is first rendered on the method's own line; when the body turns out to
//! hold a compound statement (`if`, `while`, nested block) the pass rolls back to the method, discards what it wrote
//! for it, reports a [`Problem::StrategyFallback`] and renders that method expanded instead.

use std::collections::HashSet;

use ferry_syntax::ast::{CompilationUnit, Expr, ImportDecl, Member, MethodDecl, Spanned, Stmt, TypeDecl, TypeDeclKind};
use ferry_syntax::{Node, NodeId, NodeKind};

use super::writer::OutlineWriter;
use crate::diagnostics::Problem;
use crate::scan::{Fault, Pass, Scanner, Visit, rollback_with, walk};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlineStyle {
    /// One line per statement.
    #[default]
    Expanded,
    /// Simple method bodies inline on the method line.
    Compact,
}

pub struct OutlinePass {
    style: OutlineStyle,
    writer: OutlineWriter,
    /// Line receiving inlined statements while a compact method body is scanned.
    inline: Option<usize>,
    /// Methods that fell back to the expanded rendering.
    expanded: HashSet<NodeId>,
}

impl OutlinePass {
    pub fn new(style: OutlineStyle) -> Self {
        Self {
            style,
            writer: OutlineWriter::default(),
            inline: None,
            expanded: HashSet::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        self.writer.lines()
    }

    pub fn finish(self) -> String {
        self.writer.finish()
    }

    /// Rollback continuation: drop the partial compact rendering of `node` and redo it expanded.
    fn expand<'a>(&mut self, cx: &mut Scanner<'a>, node: Node<'a>, mark: usize) -> Visit<'a, Self> {
        self.writer.truncate(mark);
        self.inline = None;
        self.expanded.insert(node.id());
        cx.report(node, Problem::StrategyFallback, &[&"expanded outline", &node.label()]);
        match node {
            Node::Member(member) => self.visit_member(cx, member),
            _ => Ok(()),
        }
    }
}

impl Default for OutlinePass {
    fn default() -> Self {
        Self::new(OutlineStyle::default())
    }
}

impl<'a> Pass<'a> for OutlinePass {
    fn visit_unit(&mut self, cx: &mut Scanner<'a>, unit: &'a CompilationUnit) -> Visit<'a, Self> {
        let mut header = format!("unit {}", unit.path.display());
        if let Some(package) = &unit.package {
            header.push_str(&format!(" (package {})", package));
        }
        self.writer.line(level(cx), &header);
        walk::walk_unit(self, cx, unit)
    }

    fn visit_import(&mut self, cx: &mut Scanner<'a>, import: &'a Spanned<ImportDecl>) -> Visit<'a, Self> {
        self.writer.line(level(cx), &Node::Import(import).label());
        Ok(())
    }

    fn visit_type(&mut self, cx: &mut Scanner<'a>, decl: &'a Spanned<TypeDecl>) -> Visit<'a, Self> {
        self.writer.line(level(cx), &type_header(&decl.node));
        walk::walk_type_decl(self, cx, &decl.node)
    }

    fn visit_member(&mut self, cx: &mut Scanner<'a>, member: &'a Spanned<Member>) -> Visit<'a, Self> {
        let level = level(cx);
        match &member.node {
            Member::Field(field) => {
                let prefix = if field.is_static { "static " } else { "" };
                self.writer
                    .line(level, &format!("{}field {}: {}", prefix, field.name, field.ty.node));
                Ok(())
            }
            Member::Type(decl) => {
                self.writer.line(level, &type_header(decl));
                walk::walk_type_decl(self, cx, decl)
            }
            Member::Method(method) => {
                let header = self.writer.line(level, &method_header(method));
                let Some(body) = &method.body else {
                    return Ok(());
                };
                let compact =
                    self.style == OutlineStyle::Compact && !self.expanded.contains(&Node::Member(member).id());
                if !compact {
                    cx.scan(self, Node::Block(body))?;
                    return Ok(());
                }

                self.writer.append(header, " {");
                self.inline = Some(header);
                let scanned = cx.scan(self, Node::Block(body));
                self.inline = None;
                scanned?;
                self.writer.append(header, " }");
                Ok(())
            }
        }
    }

    fn visit_stmt(&mut self, cx: &mut Scanner<'a>, stmt: &'a Spanned<Stmt>) -> Visit<'a, Self> {
        let text = describe(&stmt.node);
        let Some(header) = self.inline else {
            self.writer.line(level(cx), &text);
            return walk::walk_stmt(self, cx, stmt);
        };

        if is_compound(&stmt.node) {
            let method = cx
                .nearest_ancestor_of_kinds(&[NodeKind::Method])
                .ok_or_else(|| Fault::msg("inlined statement outside of a method"))?;
            tracing::debug!(method = %method.label(), "compound statement, expanding method");
            return rollback_with(method, move |pass: &mut OutlinePass, cx: &mut Scanner<'a>, node| {
                pass.expand(cx, node, header)
            });
        }
        self.writer.append(header, &format!(" {};", text));
        Ok(())
    }

    fn visit_expr(&mut self, _cx: &mut Scanner<'a>, _expr: &'a Spanned<Expr>) -> Visit<'a, Self> {
        Ok(())
    }
}

/// Nesting level of the current node, not counting method bodies.
fn level(cx: &Scanner<'_>) -> usize {
    cx.stack()
        .iter()
        .filter(|node| !matches!(node, Node::Block(_)))
        .count()
        .saturating_sub(1)
}

fn type_header(decl: &TypeDecl) -> String {
    let keyword = match decl.kind {
        TypeDeclKind::Class => "class",
        TypeDeclKind::Interface => "interface",
        TypeDeclKind::Enum => "enum",
    };
    format!("{} {}", keyword, decl.name)
}

fn method_header(method: &MethodDecl) -> String {
    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| format!("{}: {}", p.node.name, p.node.ty.node))
        .collect();
    let prefix = if method.is_static { "static " } else { "" };
    let mut header = format!("{}method {}({})", prefix, method.name, params.join(", "));
    if let Some(ret) = &method.return_type {
        header.push_str(&format!(" -> {}", ret.node));
    }
    header
}

fn describe(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Local(local) => match &local.ty {
            Some(ty) => format!("let {}: {}", local.name, ty.node),
            None => format!("let {}", local.name),
        },
        Stmt::Expr(expr) => match &expr.node {
            Expr::Assign(target, value) => format!("{} = {}", Node::Expr(target).label(), Node::Expr(value).label()),
            _ => Node::Expr(expr).label(),
        },
        Stmt::Return(Some(value)) => format!("return {}", Node::Expr(value).label()),
        Stmt::Return(None) => "return".to_string(),
        Stmt::If(_) => "if".to_string(),
        Stmt::While(_) => "while".to_string(),
        Stmt::Block(_) => "block".to_string(),
    }
}

fn is_compound(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::If(_) | Stmt::While(_) | Stmt::Block(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingHandler;
    use ferry_syntax::ast::{Block, IfStmt, Literal, LocalDecl, QualifiedName, Span, TypeRef};

    fn sp<T>(node: T, start: usize, end: usize) -> Spanned<T> {
        Spanned::new(node, Span::new(start, end))
    }

    fn ident(name: &str, at: usize) -> Spanned<Expr> {
        sp(Expr::Ident(name.into()), at, at + name.len())
    }

    fn method(name: &str, stmts: Vec<Spanned<Stmt>>, start: usize) -> Spanned<Member> {
        sp(
            Member::Method(MethodDecl {
                is_static: false,
                name: name.into(),
                params: vec![],
                return_type: Some(sp(TypeRef::simple("int"), start + 1, start + 4)),
                body: Some(sp(Block { stmts }, start + 5, start + 50)),
            }),
            start,
            start + 50,
        )
    }

    /// A class with one straight-line method and one branching method.
    fn unit() -> CompilationUnit {
        let straight = method(
            "simple",
            vec![
                sp(
                    Stmt::Local(LocalDecl {
                        name: "x".into(),
                        ty: Some(sp(TypeRef::simple("int"), 0, 0)),
                        init: Some(sp(Expr::Literal(Literal::Int(1)), 0, 0)),
                    }),
                    20,
                    30,
                ),
                sp(Stmt::Return(Some(ident("x", 31))), 31, 40),
            ],
            10,
        );
        let branching = method(
            "branchy",
            vec![
                sp(Stmt::Expr(ident("log", 70)), 70, 74),
                sp(
                    Stmt::If(IfStmt {
                        condition: ident("ready", 80),
                        then_branch: Box::new(sp(Stmt::Return(Some(ident("one", 90))), 90, 95)),
                        else_branch: None,
                    }),
                    78,
                    96,
                ),
            ],
            60,
        );
        CompilationUnit {
            path: "Demo.java".into(),
            package: Some(QualifiedName::parse("demo")),
            imports: vec![],
            types: vec![sp(
                TypeDecl {
                    kind: TypeDeclKind::Class,
                    name: "Demo".into(),
                    members: vec![straight, branching],
                },
                0,
                120,
            )],
        }
    }

    // ========================================
    // Expanded style
    // ========================================

    #[test]
    fn test_expanded_outline() {
        let unit = unit();
        let mut scanner = Scanner::default();
        let mut pass = OutlinePass::default();
        scanner.run(&mut pass, &unit).unwrap();

        assert_eq!(
            pass.lines(),
            &[
                "unit Demo.java (package demo)",
                "  class Demo",
                "    method simple() -> int",
                "      let x: int",
                "      return x",
                "    method branchy() -> int",
                "      log",
                "      if",
                "        return one",
            ]
        );
    }

    // ========================================
    // Compact style and fallback
    // ========================================

    #[test]
    fn test_compact_falls_back_for_compound_bodies() {
        let unit = unit();
        let handler = CollectingHandler::new();
        let mut scanner = Scanner::default().with_handler(handler.clone());
        let mut pass = OutlinePass::new(OutlineStyle::Compact);
        scanner.run(&mut pass, &unit).unwrap();

        assert_eq!(
            pass.lines(),
            &[
                "unit Demo.java (package demo)",
                "  class Demo",
                "    method simple() -> int { let x: int; return x; }",
                "    method branchy() -> int",
                "      log",
                "      if",
                "        return one",
            ]
        );

        let diagnostics = handler.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].problem, Problem::StrategyFallback);
        assert_eq!(diagnostics[0].message, "falling back to expanded outline for method branchy");
        assert_eq!(diagnostics[0].position.as_ref().unwrap().span, Span::new(60, 110));
        assert_eq!(scanner.depth(), 0);
    }

    #[test]
    fn test_finish_joins_lines() {
        let unit = CompilationUnit {
            path: "Empty.java".into(),
            package: None,
            imports: vec![],
            types: vec![],
        };
        let mut scanner = Scanner::default();
        let mut pass = OutlinePass::default();
        scanner.run(&mut pass, &unit).unwrap();
        assert_eq!(pass.finish(), "unit Empty.java\n");
    }
}
