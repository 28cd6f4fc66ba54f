//! Shared syntax model for ferry: the source-language AST, node handles and node kinds.
//!
//! The tree is produced by an external front end (typically as a JSON dump) and is never mutated by the translation
//! core. Passes walk it through borrowed [`Node`] handles, which compare by identity rather than structure.
//!
//! ## Examples
//! ```rust
//! use ferry_syntax::ast::{CompilationUnit, ImportDecl, QualifiedName, Span, Spanned};
//! use ferry_syntax::{Node, NodeKind};
//!
//! let unit = CompilationUnit {
//!     path: "Main.java".into(),
//!     package: None,
//!     imports: vec![Spanned::new(
//!         ImportDecl::new_static(QualifiedName::parse("pkg.Holder.member")),
//!         Span::new(0, 32),
//!     )],
//!     types: vec![],
//! };
//! let node = Node::Import(&unit.imports[0]);
//! assert_eq!(node.kind(), NodeKind::Import);
//! assert_eq!(node, Node::Import(&unit.imports[0]));
//! ```

pub mod ast;
pub mod node;

pub use node::{Node, NodeId, NodeKind};
