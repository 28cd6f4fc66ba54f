//! The per-node-kind dispatch table supplied by a pass.
//!
//! Every `visit_*` method defaults to walking the node's children (see [`walk`](super::walk)), so a pass only
//! overrides the kinds it translates. Overrides call back into [`Scanner::scan`] for the children they want
//! visited, in whatever order they choose.

use ferry_syntax::Node;
use ferry_syntax::ast::{Block, CompilationUnit, Expr, ImportDecl, Member, Param, Spanned, Stmt, TypeDecl, TypeRef};

use super::rollback::Visit;
use super::{Scanner, walk};

pub trait Pass<'a>: Sized {
    fn visit_unit(&mut self, cx: &mut Scanner<'a>, unit: &'a CompilationUnit) -> Visit<'a, Self> {
        walk::walk_unit(self, cx, unit)
    }

    fn visit_import(&mut self, _cx: &mut Scanner<'a>, _import: &'a Spanned<ImportDecl>) -> Visit<'a, Self> {
        Ok(())
    }

    fn visit_type(&mut self, cx: &mut Scanner<'a>, decl: &'a Spanned<TypeDecl>) -> Visit<'a, Self> {
        walk::walk_type_decl(self, cx, &decl.node)
    }

    fn visit_member(&mut self, cx: &mut Scanner<'a>, member: &'a Spanned<Member>) -> Visit<'a, Self> {
        walk::walk_member(self, cx, member)
    }

    fn visit_param(&mut self, cx: &mut Scanner<'a>, param: &'a Spanned<Param>) -> Visit<'a, Self> {
        cx.scan(self, Node::TypeRef(&param.node.ty))?;
        Ok(())
    }

    fn visit_type_ref(&mut self, cx: &mut Scanner<'a>, ty: &'a Spanned<TypeRef>) -> Visit<'a, Self> {
        walk::walk_type_ref(self, cx, ty)
    }

    fn visit_block(&mut self, cx: &mut Scanner<'a>, block: &'a Spanned<Block>) -> Visit<'a, Self> {
        walk::walk_block(self, cx, &block.node)
    }

    fn visit_stmt(&mut self, cx: &mut Scanner<'a>, stmt: &'a Spanned<Stmt>) -> Visit<'a, Self> {
        walk::walk_stmt(self, cx, stmt)
    }

    fn visit_expr(&mut self, cx: &mut Scanner<'a>, expr: &'a Spanned<Expr>) -> Visit<'a, Self> {
        walk::walk_expr(self, cx, expr)
    }

    /// Called once each time a rollback lands on a frame of this pass, before the rollback's own callback.
    fn on_rollbacked(&mut self, _cx: &mut Scanner<'a>, _target: Node<'a>) {}
}

pub(crate) fn dispatch<'a, P: Pass<'a>>(pass: &mut P, cx: &mut Scanner<'a>, node: Node<'a>) -> Visit<'a, P> {
    match node {
        Node::Unit(unit) => pass.visit_unit(cx, unit),
        Node::Import(import) => pass.visit_import(cx, import),
        Node::Type(decl) => pass.visit_type(cx, decl),
        Node::Member(member) => pass.visit_member(cx, member),
        Node::Param(param) => pass.visit_param(cx, param),
        Node::TypeRef(ty) => pass.visit_type_ref(cx, ty),
        Node::Block(block) => pass.visit_block(cx, block),
        Node::Stmt(stmt) => pass.visit_stmt(cx, stmt),
        Node::Expr(expr) => pass.visit_expr(cx, expr),
    }
}
