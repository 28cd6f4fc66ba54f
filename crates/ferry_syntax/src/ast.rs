//! Abstract syntax tree for the source language handled by ferry.
//!
//! The shape follows a class-based, statically typed language: a compilation unit holds imports and type
//! declarations, types hold members, and method bodies hold statements and expressions. Every node that can be
//! visited on its own is wrapped in [`Spanned`] so it carries a stable address and a source span.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A dotted name such as `java.util.List` or `pkg.Holder.member`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QualifiedName {
    pub segments: Vec<Ident>,
}

impl QualifiedName {
    pub fn new(segments: Vec<Ident>) -> Self {
        Self { segments }
    }

    /// Split a dotted string into segments. Empty segments are dropped.
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Last segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

// ============================================================================
// Compilation units and imports
// ============================================================================

/// The root of one parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Path of the originating source file.
    pub path: PathBuf,
    #[serde(default)]
    pub package: Option<QualifiedName>,
    #[serde(default)]
    pub imports: Vec<Spanned<ImportDecl>>,
    #[serde(default)]
    pub types: Vec<Spanned<TypeDecl>>,
}

impl CompilationUnit {
    /// Span covering every import and type declaration, or an empty span for an empty unit.
    pub fn span(&self) -> Span {
        let spans = self
            .imports
            .iter()
            .map(|i| i.span)
            .chain(self.types.iter().map(|t| t.span));
        spans.reduce(Span::merge).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    #[serde(default)]
    pub is_static: bool,
    pub name: QualifiedName,
    /// `import pkg.Holder.*`
    #[serde(default)]
    pub wildcard: bool,
}

impl ImportDecl {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            is_static: false,
            name,
            wildcard: false,
        }
    }

    pub fn new_static(name: QualifiedName) -> Self {
        Self {
            is_static: true,
            name,
            wildcard: false,
        }
    }

    /// The imported identifier as written, e.g. `pkg.Holder.member` or `pkg.Holder.*`.
    pub fn qualified_identifier(&self) -> String {
        if self.wildcard {
            format!("{}.*", self.name)
        } else {
            self.name.to_string()
        }
    }
}

// ============================================================================
// Type declarations and members
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: Ident,
    #[serde(default)]
    pub members: Vec<Spanned<Member>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    /// Nested type declaration
    Type(TypeDecl),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(f) => &f.name,
            Member::Method(m) => &m.name,
            Member::Type(t) => &t.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    #[serde(default)]
    pub is_static: bool,
    pub name: Ident,
    pub ty: Spanned<TypeRef>,
    #[serde(default)]
    pub init: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    #[serde(default)]
    pub is_static: bool,
    pub name: Ident,
    #[serde(default)]
    pub params: Vec<Spanned<Param>>,
    /// `None` for constructors
    #[serde(default)]
    pub return_type: Option<Spanned<TypeRef>>,
    /// `None` for abstract and interface methods
    #[serde(default)]
    pub body: Option<Spanned<Block>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: Ident,
    pub ty: Spanned<TypeRef>,
}

/// A reference to a type, e.g. `Map<String, List<Integer>>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: QualifiedName,
    #[serde(default)]
    pub args: Vec<Spanned<TypeRef>>,
}

impl TypeRef {
    pub fn simple(name: &str) -> Self {
        Self {
            name: QualifiedName::parse(name),
            args: Vec::new(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg.node)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Local(LocalDecl),
    Expr(Spanned<Expr>),
    Return(Option<Spanned<Expr>>),
    If(IfStmt),
    While(WhileStmt),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDecl {
    pub name: Ident,
    /// `None` for `var`
    #[serde(default)]
    pub ty: Option<Spanned<TypeRef>>,
    #[serde(default)]
    pub init: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: Spanned<Expr>,
    pub then_branch: Box<Spanned<Stmt>>,
    #[serde(default)]
    pub else_branch: Option<Box<Spanned<Stmt>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub condition: Spanned<Expr>,
    pub body: Box<Spanned<Stmt>>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Ident(Ident),
    Literal(Literal),
    /// `target.name`
    Field(Box<Spanned<Expr>>, Ident),
    /// `callee(args...)`
    Call(Box<Spanned<Expr>>, Vec<Spanned<Expr>>),
    /// `new Type(args...)`
    New(Spanned<TypeRef>, Vec<Spanned<Expr>>),
    Binary(Box<Spanned<Expr>>, BinaryOp, Box<Spanned<Expr>>),
    Unary(UnaryOp, Box<Spanned<Expr>>),
    Assign(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    Lambda(Vec<Spanned<Param>>, LambdaBody),
    /// `cond ? then : otherwise`
    Conditional(Box<Spanned<Expr>>, Box<Spanned<Expr>>, Box<Spanned<Expr>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LambdaBody {
    Expr(Box<Spanned<Expr>>),
    Block(Spanned<Block>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
    Bool(bool),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::Str(s) => write!(f, "{:?}", s),
            Literal::Char(c) => write!(f, "{:?}", c),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}
