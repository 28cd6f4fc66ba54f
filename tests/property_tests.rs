//! Property-based tests for the ferry scanning engine
//!
//! These tests use proptest to drive the engine over randomly shaped trees whose handlers succeed, fail, panic or
//! roll back, and check that the scanning stack stays truthful whatever happens.

use std::sync::Once;

use ferry::ast::{
    Block, CompilationUnit, Expr, ImportDecl, Member, MethodDecl, QualifiedName, Span, Spanned, Stmt, TypeDecl,
    TypeDeclKind,
};
use ferry::imports::short_name;
use ferry::scan::walk;
use ferry::{CollectingHandler, Fault, Node, Pass, ScanConfig, ScanError, Scanner, StaticImports, Visit};
use ferry::{StaticImportPolicy, rollback, rollback_with};
use proptest::prelude::*;

// =============================================================================
// Tree generation
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Action {
    Ok,
    Fail,
    Panic,
    /// Roll back to the n-th ancestor of the expression, or to a node that is not on the stack when there is none.
    Rollback(usize),
}

impl Action {
    fn encode(self) -> String {
        match self {
            Action::Ok => "ok".to_string(),
            Action::Fail => "fail".to_string(),
            Action::Panic => "panic".to_string(),
            Action::Rollback(n) => format!("rollback_{}", n),
        }
    }

    fn decode(name: &str) -> Action {
        match name {
            "fail" => Action::Fail,
            "panic" => Action::Panic,
            other => match other.strip_prefix("rollback_").and_then(|n| n.parse().ok()) {
                Some(n) => Action::Rollback(n),
                None => Action::Ok,
            },
        }
    }
}

#[derive(Debug, Clone)]
enum Shape {
    Leaf(Action),
    Nest(Vec<Shape>),
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => Just(Action::Ok),
        1 => Just(Action::Fail),
        1 => Just(Action::Panic),
        1 => (0usize..9).prop_map(Action::Rollback),
    ]
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    action_strategy()
        .prop_map(Shape::Leaf)
        .prop_recursive(4, 48, 4, |inner| prop::collection::vec(inner, 0..4).prop_map(Shape::Nest))
}

fn build_stmt(shape: &Shape) -> Spanned<Stmt> {
    match shape {
        Shape::Leaf(action) => Spanned::new(
            Stmt::Expr(Spanned::new(Expr::Ident(action.encode()), Span::default())),
            Span::default(),
        ),
        Shape::Nest(children) => Spanned::new(
            Stmt::Block(Block {
                stmts: children.iter().map(build_stmt).collect(),
            }),
            Span::default(),
        ),
    }
}

fn build_unit(body: &[Shape]) -> CompilationUnit {
    let method = MethodDecl {
        is_static: false,
        name: "generated".into(),
        params: vec![],
        return_type: None,
        body: Some(Spanned::new(
            Block {
                stmts: body.iter().map(build_stmt).collect(),
            },
            Span::default(),
        )),
    };
    CompilationUnit {
        path: "Generated.java".into(),
        package: None,
        imports: vec![],
        types: vec![Spanned::new(
            TypeDecl {
                kind: TypeDeclKind::Class,
                name: "Generated".into(),
                members: vec![Spanned::new(Member::Method(method), Span::default())],
            },
            Span::default(),
        )],
    }
}

fn empty_unit() -> CompilationUnit {
    CompilationUnit {
        path: "Stray.java".into(),
        package: None,
        imports: vec![],
        types: vec![],
    }
}

fn quiet_panics() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| std::panic::set_hook(Box::new(|_| {})));
}

// =============================================================================
// Chaos pass
// =============================================================================

/// Counts what it does; never asserts inside handlers, since a panic there would be absorbed by the engine.
struct Chaos<'a> {
    stray: Node<'a>,
    faults: usize,
    requested: usize,
    landed: usize,
    misplaced: usize,
}

impl<'a> Chaos<'a> {
    fn new(stray: Node<'a>) -> Self {
        Self {
            stray,
            faults: 0,
            requested: 0,
            landed: 0,
            misplaced: 0,
        }
    }
}

impl<'a> Pass<'a> for Chaos<'a> {
    fn visit_stmt(&mut self, cx: &mut Scanner<'a>, stmt: &'a Spanned<Stmt>) -> Visit<'a, Self> {
        if cx.current() != Some(Node::Stmt(stmt)) {
            self.misplaced += 1;
        }
        walk::walk_stmt(self, cx, stmt)
    }

    fn visit_expr(&mut self, cx: &mut Scanner<'a>, expr: &'a Spanned<Expr>) -> Visit<'a, Self> {
        if cx.current() != Some(Node::Expr(expr)) {
            self.misplaced += 1;
        }
        let Expr::Ident(name) = &expr.node else {
            return Ok(());
        };
        match Action::decode(name) {
            Action::Ok => Ok(()),
            Action::Fail => {
                self.faults += 1;
                Err(Fault::msg("generated failure").into())
            }
            Action::Panic => {
                self.faults += 1;
                panic!("generated panic");
            }
            Action::Rollback(n) => match cx.ancestors().nth(n) {
                Some(target) => {
                    self.requested += 1;
                    rollback_with(target, |pass: &mut Chaos<'a>, cx: &mut Scanner<'a>, node| {
                        pass.landed += 1;
                        if cx.current() != Some(node) {
                            pass.misplaced += 1;
                        }
                        Ok(())
                    })
                }
                None => rollback(self.stray),
            },
        }
    }
}

// =============================================================================
// Engine properties
// =============================================================================

#[cfg(test)]
mod engine_properties {
    use super::*;

    proptest! {
        /// Property: the stack is empty after a session, and every frame saw itself on top of the stack
        #[test]
        fn stack_is_balanced_and_truthful(body in prop::collection::vec(shape_strategy(), 0..6)) {
            quiet_panics();
            let unit = build_unit(&body);
            let stray_unit = empty_unit();
            let handler = CollectingHandler::new();
            let mut scanner = Scanner::new(ScanConfig::default().with_dump_stack_on_error(false))
                .with_handler(handler.clone());
            let mut pass = Chaos::new(Node::Unit(&stray_unit));

            let result = scanner.run(&mut pass, &unit);

            prop_assert_eq!(scanner.depth(), 0);
            prop_assert_eq!(pass.misplaced, 0);
            match result {
                Ok(()) => {}
                Err(ScanError::UnhandledRollback { kind, .. }) => {
                    prop_assert_eq!(kind, ferry::NodeKind::CompilationUnit);
                }
            }
        }

        /// Property: each failure yields exactly one diagnostic, and rollbacks never do
        #[test]
        fn one_diagnostic_per_failure(body in prop::collection::vec(shape_strategy(), 0..6)) {
            quiet_panics();
            let unit = build_unit(&body);
            let stray_unit = empty_unit();
            let handler = CollectingHandler::new();
            let mut scanner = Scanner::default().with_handler(handler.clone());
            let mut pass = Chaos::new(Node::Unit(&stray_unit));

            let _ = scanner.run(&mut pass, &unit);

            prop_assert_eq!(handler.len(), pass.faults);
            prop_assert_eq!(pass.landed, pass.requested);
        }
    }
}

// =============================================================================
// Static import properties
// =============================================================================

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-c][a-z]{0,2}"
}

fn import_strategy() -> impl Strategy<Value = (bool, Vec<String>)> {
    (any::<bool>(), prop::collection::vec(segment_strategy(), 1..4))
}

#[cfg(test)]
mod import_properties {
    use super::*;

    proptest! {
        /// Property: every static import is reachable by its short name unless a later one took the name
        #[test]
        fn last_static_import_wins(imports in prop::collection::vec(import_strategy(), 0..12)) {
            let mut unit = empty_unit();
            for (is_static, segments) in &imports {
                let mut decl = ImportDecl::new(QualifiedName::new(segments.clone()));
                decl.is_static = *is_static;
                unit.imports.push(Spanned::new(decl, Span::default()));
            }

            let mut registry = StaticImports::new();
            registry.register_unit(&unit, StaticImportPolicy::Accumulate);

            for (index, import) in unit.imports.iter().enumerate() {
                if !import.node.is_static {
                    continue;
                }
                let identifier = import.node.qualified_identifier();
                let key = short_name(&identifier);
                let later = unit.imports[index + 1..].iter().any(|other| {
                    other.node.is_static && short_name(&other.node.qualified_identifier()) == key
                });
                let entry = registry.get(key);
                prop_assert!(entry.is_some());
                prop_assert_eq!(entry.is_some_and(|e| std::ptr::eq(e, import)), !later);
            }
            let static_count = unit.imports.iter().filter(|i| i.node.is_static).count();
            prop_assert!(registry.len() <= static_count);
        }
    }
}
