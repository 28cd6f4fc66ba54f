//! Symbol resolution seam used by symbol-level context queries.
//!
//! The engine never builds a semantic model itself; a [`SymbolResolver`] maps syntax nodes of the active unit to
//! whatever symbol type the caller works with. [`DeclResolver`] is the syntax-only default: every declaration node
//! resolves to its own kind and name.

use ferry_syntax::Node;
use ferry_syntax::ast::{CompilationUnit, Member, Span, Stmt, TypeDeclKind};

/// Resolves nodes of a compilation unit to semantic symbols.
pub trait SymbolResolver<'a> {
    type Symbol;

    /// The symbol declared by or referenced by `node`, if any.
    fn resolve(&self, unit: &'a CompilationUnit, node: Node<'a>) -> Option<Self::Symbol>;
}

impl<'a, R: SymbolResolver<'a> + ?Sized> SymbolResolver<'a> for &R {
    type Symbol = R::Symbol;

    fn resolve(&self, unit: &'a CompilationUnit, node: Node<'a>) -> Option<Self::Symbol> {
        (**self).resolve(unit, node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Type(TypeDeclKind),
    Method { is_static: bool },
    Field { is_static: bool },
    Parameter,
    Local,
}

/// A declaration found in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclSymbol<'a> {
    pub kind: SymbolKind,
    pub name: &'a str,
    pub span: Span,
}

impl DeclSymbol<'_> {
    pub fn is_type(&self) -> bool {
        matches!(self.kind, SymbolKind::Type(_))
    }

    pub fn is_static(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Method { is_static: true } | SymbolKind::Field { is_static: true }
        )
    }
}

/// Resolves declaration nodes to [`DeclSymbol`]s without any semantic analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclResolver;

impl<'a> SymbolResolver<'a> for DeclResolver {
    type Symbol = DeclSymbol<'a>;

    fn resolve(&self, _unit: &'a CompilationUnit, node: Node<'a>) -> Option<DeclSymbol<'a>> {
        let span = node.span();
        let (kind, name) = match node {
            Node::Type(decl) => (SymbolKind::Type(decl.node.kind), decl.node.name.as_str()),
            Node::Member(member) => match &member.node {
                Member::Type(decl) => (SymbolKind::Type(decl.kind), decl.name.as_str()),
                Member::Method(method) => (
                    SymbolKind::Method {
                        is_static: method.is_static,
                    },
                    method.name.as_str(),
                ),
                Member::Field(field) => (
                    SymbolKind::Field {
                        is_static: field.is_static,
                    },
                    field.name.as_str(),
                ),
            },
            Node::Param(param) => (SymbolKind::Parameter, param.node.name.as_str()),
            Node::Stmt(stmt) => match &stmt.node {
                Stmt::Local(local) => (SymbolKind::Local, local.name.as_str()),
                _ => return None,
            },
            _ => return None,
        };
        Some(DeclSymbol { kind, name, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_syntax::ast::{Block, Expr, FieldDecl, LocalDecl, MethodDecl, Param, Spanned, TypeDecl, TypeRef};

    fn sp<T>(node: T, start: usize, end: usize) -> Spanned<T> {
        Spanned::new(node, Span::new(start, end))
    }

    fn unit() -> CompilationUnit {
        CompilationUnit {
            path: "Shapes.java".into(),
            package: None,
            imports: vec![],
            types: vec![sp(
                TypeDecl {
                    kind: TypeDeclKind::Class,
                    name: "Circle".into(),
                    members: vec![
                        sp(
                            Member::Field(FieldDecl {
                                is_static: true,
                                name: "PI".into(),
                                ty: sp(TypeRef::simple("double"), 20, 26),
                                init: None,
                            }),
                            13,
                            30,
                        ),
                        sp(
                            Member::Method(MethodDecl {
                                is_static: false,
                                name: "area".into(),
                                params: vec![sp(
                                    Param {
                                        name: "scale".into(),
                                        ty: sp(TypeRef::simple("int"), 45, 48),
                                    },
                                    45,
                                    54,
                                )],
                                return_type: None,
                                body: Some(sp(
                                    Block {
                                        stmts: vec![
                                            sp(
                                                Stmt::Local(LocalDecl {
                                                    name: "r".into(),
                                                    ty: None,
                                                    init: None,
                                                }),
                                                58,
                                                64,
                                            ),
                                            sp(Stmt::Return(None), 65, 72),
                                        ],
                                    },
                                    56,
                                    74,
                                )),
                            }),
                            33,
                            74,
                        ),
                    ],
                },
                0,
                76,
            )],
        }
    }

    // ========================================
    // DeclResolver tests
    // ========================================

    #[test]
    fn test_resolves_type_declaration() {
        let unit = unit();
        let symbol = DeclResolver.resolve(&unit, Node::Type(&unit.types[0])).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Type(TypeDeclKind::Class));
        assert_eq!(symbol.name, "Circle");
        assert_eq!(symbol.span, Span::new(0, 76));
        assert!(symbol.is_type());
    }

    #[test]
    fn test_resolves_members() {
        let unit = unit();
        let members = &unit.types[0].node.members;

        let field = DeclResolver.resolve(&unit, Node::Member(&members[0])).unwrap();
        assert_eq!(field.kind, SymbolKind::Field { is_static: true });
        assert!(field.is_static());

        let method = DeclResolver.resolve(&unit, Node::Member(&members[1])).unwrap();
        assert_eq!(method.kind, SymbolKind::Method { is_static: false });
        assert_eq!(method.name, "area");
        assert!(!method.is_static());
    }

    #[test]
    fn test_resolves_params_and_locals() {
        let unit = unit();
        let Member::Method(method) = &unit.types[0].node.members[1].node else {
            panic!("expected method");
        };
        let param = DeclResolver.resolve(&unit, Node::Param(&method.params[0])).unwrap();
        assert_eq!((param.kind, param.name), (SymbolKind::Parameter, "scale"));

        let body = method.body.as_ref().unwrap();
        let local = DeclResolver.resolve(&unit, Node::Stmt(&body.node.stmts[0])).unwrap();
        assert_eq!((local.kind, local.name), (SymbolKind::Local, "r"));
    }

    #[test]
    fn test_non_declarations_do_not_resolve() {
        let unit = unit();
        let Member::Method(method) = &unit.types[0].node.members[1].node else {
            panic!("expected method");
        };
        let body = method.body.as_ref().unwrap();
        assert!(DeclResolver.resolve(&unit, Node::Stmt(&body.node.stmts[1])).is_none());
        assert!(DeclResolver.resolve(&unit, Node::Block(body)).is_none());
        assert!(DeclResolver.resolve(&unit, Node::Unit(&unit)).is_none());

        let ident = sp(Expr::Ident("r".into()), 0, 1);
        assert!(DeclResolver.resolve(&unit, Node::Expr(&ident)).is_none());
    }
}
