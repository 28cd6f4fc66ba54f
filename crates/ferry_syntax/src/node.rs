//! Borrowed node handles and node-kind discriminants.
//!
//! A [`Node`] is a `Copy` reference into a tree owned by its [`CompilationUnit`]. Two handles are equal only when
//! they point at the same syntactic element (same variant, same address); structurally identical subtrees at
//! different places in the tree are distinct nodes.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ast::{
    Block, CompilationUnit, Expr, FieldDecl, ImportDecl, LambdaBody, Member, MethodDecl, Param, Span, Spanned, Stmt,
    TypeDecl, TypeDeclKind, TypeRef,
};

/// One visitable element of the tree.
#[derive(Clone, Copy)]
pub enum Node<'a> {
    Unit(&'a CompilationUnit),
    Import(&'a Spanned<ImportDecl>),
    /// Top-level type declaration. Nested types are reached as [`Node::Member`].
    Type(&'a Spanned<TypeDecl>),
    Member(&'a Spanned<Member>),
    Param(&'a Spanned<Param>),
    TypeRef(&'a Spanned<TypeRef>),
    Block(&'a Spanned<Block>),
    Stmt(&'a Spanned<Stmt>),
    Expr(&'a Spanned<Expr>),
}

/// Identity of a node: variant tag plus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tag: u8,
    addr: usize,
}

/// Fine-grained discriminant of a node, usable for kind tests in context queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    Import,
    Class,
    Interface,
    Enum,
    Field,
    Method,
    Parameter,
    TypeRef,
    Block,
    LocalVariable,
    ExpressionStatement,
    Return,
    If,
    While,
    Ident,
    Literal,
    FieldAccess,
    Call,
    New,
    Binary,
    Unary,
    Assign,
    Lambda,
    Conditional,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::CompilationUnit => "CompilationUnit",
            NodeKind::Import => "Import",
            NodeKind::Class => "Class",
            NodeKind::Interface => "Interface",
            NodeKind::Enum => "Enum",
            NodeKind::Field => "Field",
            NodeKind::Method => "Method",
            NodeKind::Parameter => "Parameter",
            NodeKind::TypeRef => "TypeRef",
            NodeKind::Block => "Block",
            NodeKind::LocalVariable => "LocalVariable",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::Return => "Return",
            NodeKind::If => "If",
            NodeKind::While => "While",
            NodeKind::Ident => "Ident",
            NodeKind::Literal => "Literal",
            NodeKind::FieldAccess => "FieldAccess",
            NodeKind::Call => "Call",
            NodeKind::New => "New",
            NodeKind::Binary => "Binary",
            NodeKind::Unary => "Unary",
            NodeKind::Assign => "Assign",
            NodeKind::Lambda => "Lambda",
            NodeKind::Conditional => "Conditional",
        }
    }

    fn of_type_decl(kind: TypeDeclKind) -> Self {
        match kind {
            TypeDeclKind::Class => NodeKind::Class,
            TypeDeclKind::Interface => NodeKind::Interface,
            TypeDeclKind::Enum => NodeKind::Enum,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Unit(_) => NodeKind::CompilationUnit,
            Node::Import(_) => NodeKind::Import,
            Node::Type(t) => NodeKind::of_type_decl(t.node.kind),
            Node::Member(m) => match &m.node {
                Member::Field(_) => NodeKind::Field,
                Member::Method(_) => NodeKind::Method,
                Member::Type(t) => NodeKind::of_type_decl(t.kind),
            },
            Node::Param(_) => NodeKind::Parameter,
            Node::TypeRef(_) => NodeKind::TypeRef,
            Node::Block(_) => NodeKind::Block,
            Node::Stmt(s) => match &s.node {
                Stmt::Local(_) => NodeKind::LocalVariable,
                Stmt::Expr(_) => NodeKind::ExpressionStatement,
                Stmt::Return(_) => NodeKind::Return,
                Stmt::If(_) => NodeKind::If,
                Stmt::While(_) => NodeKind::While,
                Stmt::Block(_) => NodeKind::Block,
            },
            Node::Expr(e) => match &e.node {
                Expr::Ident(_) => NodeKind::Ident,
                Expr::Literal(_) => NodeKind::Literal,
                Expr::Field(..) => NodeKind::FieldAccess,
                Expr::Call(..) => NodeKind::Call,
                Expr::New(..) => NodeKind::New,
                Expr::Binary(..) => NodeKind::Binary,
                Expr::Unary(..) => NodeKind::Unary,
                Expr::Assign(..) => NodeKind::Assign,
                Expr::Lambda(..) => NodeKind::Lambda,
                Expr::Conditional(..) => NodeKind::Conditional,
            },
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Unit(u) => u.span(),
            Node::Import(n) => n.span,
            Node::Type(n) => n.span,
            Node::Member(n) => n.span,
            Node::Param(n) => n.span,
            Node::TypeRef(n) => n.span,
            Node::Block(n) => n.span,
            Node::Stmt(n) => n.span,
            Node::Expr(n) => n.span,
        }
    }

    pub fn id(&self) -> NodeId {
        let (tag, addr) = match self {
            Node::Unit(n) => (0, *n as *const CompilationUnit as usize),
            Node::Import(n) => (1, *n as *const Spanned<ImportDecl> as usize),
            Node::Type(n) => (2, *n as *const Spanned<TypeDecl> as usize),
            Node::Member(n) => (3, *n as *const Spanned<Member> as usize),
            Node::Param(n) => (4, *n as *const Spanned<Param> as usize),
            Node::TypeRef(n) => (5, *n as *const Spanned<TypeRef> as usize),
            Node::Block(n) => (6, *n as *const Spanned<Block> as usize),
            Node::Stmt(n) => (7, *n as *const Spanned<Stmt> as usize),
            Node::Expr(n) => (8, *n as *const Spanned<Expr> as usize),
        };
        NodeId { tag, addr }
    }

    /// Identity comparison.
    pub fn same(&self, other: Node<'_>) -> bool {
        self.id() == other.id()
    }

    /// Declared or referenced name carried by the node, if it has one.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Node::Type(t) => Some(t.node.name.as_str()),
            Node::Member(m) => Some(m.node.name()),
            Node::Param(p) => Some(p.node.name.as_str()),
            Node::Import(i) => i.node.name.last(),
            Node::TypeRef(t) => t.node.name.last(),
            Node::Stmt(s) => match &s.node {
                Stmt::Local(local) => Some(local.name.as_str()),
                _ => None,
            },
            Node::Expr(e) => match &e.node {
                Expr::Ident(name) => Some(name.as_str()),
                Expr::Field(_, name) => Some(name.as_str()),
                _ => None,
            },
            Node::Unit(_) | Node::Block(_) => None,
        }
    }

    /// Short structural description, used when no source text is available.
    pub fn label(&self) -> String {
        match *self {
            Node::Unit(u) => u.path.display().to_string(),
            Node::Import(i) => {
                let prefix = if i.node.is_static { "import static" } else { "import" };
                format!("{} {}", prefix, i.node.qualified_identifier())
            }
            Node::TypeRef(t) => t.node.to_string(),
            Node::Expr(e) => match &e.node {
                Expr::Literal(lit) => lit.to_string(),
                Expr::Binary(_, op, _) => format!("_ {} _", op),
                Expr::Unary(op, _) => format!("{}_", op),
                Expr::Call(callee, args) => match &callee.node {
                    Expr::Ident(name) | Expr::Field(_, name) => format!("{}({} args)", name, args.len()),
                    _ => format!("call({} args)", args.len()),
                },
                Expr::New(ty, _) => format!("new {}", ty.node),
                _ => self.name().map(str::to_string).unwrap_or_else(|| self.kind().to_string()),
            },
            _ => match self.name() {
                Some(name) => format!("{} {}", self.kind().name().to_lowercase(), name),
                None => self.kind().name().to_lowercase(),
            },
        }
    }

    pub fn as_unit(&self) -> Option<&'a CompilationUnit> {
        match *self {
            Node::Unit(u) => Some(u),
            _ => None,
        }
    }

    /// Type declaration, top-level or nested.
    pub fn as_type_decl(&self) -> Option<&'a TypeDecl> {
        match *self {
            Node::Type(t) => Some(&t.node),
            Node::Member(m) => match &m.node {
                Member::Type(t) => Some(t),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&'a MethodDecl> {
        match *self {
            Node::Member(m) => match &m.node {
                Member::Method(method) => Some(method),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&'a FieldDecl> {
        match *self {
            Node::Member(m) => match &m.node {
                Member::Field(field) => Some(field),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_stmt(&self) -> Option<&'a Stmt> {
        match *self {
            Node::Stmt(s) => Some(&s.node),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&'a Expr> {
        match *self {
            Node::Expr(e) => Some(&e.node),
            _ => None,
        }
    }

    /// Direct children that carry a name, in source order. Used to narrow positions to a named sub-element.
    pub fn named_children(&self) -> Vec<(&'a str, Span)> {
        match *self {
            Node::Type(t) => members_named(&t.node.members),
            Node::Member(m) => match &m.node {
                Member::Type(t) => members_named(&t.members),
                Member::Method(method) => method.params.iter().map(|p| (p.node.name.as_str(), p.span)).collect(),
                Member::Field(_) => Vec::new(),
            },
            Node::Expr(e) => match &e.node {
                Expr::Lambda(params, _) => params.iter().map(|p| (p.node.name.as_str(), p.span)).collect(),
                _ => Vec::new(),
            },
            Node::Block(b) => block_locals(&b.node),
            Node::Stmt(s) => match &s.node {
                Stmt::Block(b) => block_locals(b),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

fn members_named(members: &[Spanned<Member>]) -> Vec<(&str, Span)> {
    members.iter().map(|m| (m.node.name(), m.span)).collect()
}

fn block_locals(block: &Block) -> Vec<(&str, Span)> {
    block
        .stmts
        .iter()
        .filter_map(|s| match &s.node {
            Stmt::Local(local) => Some((local.name.as_str(), s.span)),
            _ => None,
        })
        .collect()
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.same(*other)
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) @ {}", self.kind(), self.label(), self.span())
    }
}

impl<'a> From<&'a CompilationUnit> for Node<'a> {
    fn from(unit: &'a CompilationUnit) -> Self {
        Node::Unit(unit)
    }
}

impl LambdaBody {
    /// The body as a visitable node.
    pub fn as_node(&self) -> Node<'_> {
        match self {
            LambdaBody::Expr(expr) => Node::Expr(expr),
            LambdaBody::Block(block) => Node::Block(block),
        }
    }
}
