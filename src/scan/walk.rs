//! Default child traversal for each node category.
//!
//! Children are scanned in source order. Each child goes through [`Scanner::scan`], so it is pushed onto the
//! scanning stack and guarded like any other frame; a rollback that is not aimed at a child propagates out of these
//! functions through `?`.

use ferry_syntax::Node;
use ferry_syntax::ast::{Block, CompilationUnit, Expr, Member, Spanned, Stmt, TypeDecl, TypeRef};

use super::Scanner;
use super::pass::Pass;
use super::rollback::Visit;

pub fn walk_unit<'a, P: Pass<'a>>(pass: &mut P, cx: &mut Scanner<'a>, unit: &'a CompilationUnit) -> Visit<'a, P> {
    for import in &unit.imports {
        cx.scan(pass, Node::Import(import))?;
    }
    for decl in &unit.types {
        cx.scan(pass, Node::Type(decl))?;
    }
    Ok(())
}

/// Walk the members of a top-level or nested type declaration.
pub fn walk_type_decl<'a, P: Pass<'a>>(pass: &mut P, cx: &mut Scanner<'a>, decl: &'a TypeDecl) -> Visit<'a, P> {
    for member in &decl.members {
        cx.scan(pass, Node::Member(member))?;
    }
    Ok(())
}

pub fn walk_member<'a, P: Pass<'a>>(pass: &mut P, cx: &mut Scanner<'a>, member: &'a Spanned<Member>) -> Visit<'a, P> {
    match &member.node {
        Member::Field(field) => {
            cx.scan(pass, Node::TypeRef(&field.ty))?;
            cx.scan(pass, field.init.as_ref().map(Node::Expr))?;
        }
        Member::Method(method) => {
            for param in &method.params {
                cx.scan(pass, Node::Param(param))?;
            }
            cx.scan(pass, method.return_type.as_ref().map(Node::TypeRef))?;
            cx.scan(pass, method.body.as_ref().map(Node::Block))?;
        }
        Member::Type(decl) => walk_type_decl(pass, cx, decl)?,
    }
    Ok(())
}

pub fn walk_type_ref<'a, P: Pass<'a>>(pass: &mut P, cx: &mut Scanner<'a>, ty: &'a Spanned<TypeRef>) -> Visit<'a, P> {
    for arg in &ty.node.args {
        cx.scan(pass, Node::TypeRef(arg))?;
    }
    Ok(())
}

pub fn walk_block<'a, P: Pass<'a>>(pass: &mut P, cx: &mut Scanner<'a>, block: &'a Block) -> Visit<'a, P> {
    for stmt in &block.stmts {
        cx.scan(pass, Node::Stmt(stmt))?;
    }
    Ok(())
}

pub fn walk_stmt<'a, P: Pass<'a>>(pass: &mut P, cx: &mut Scanner<'a>, stmt: &'a Spanned<Stmt>) -> Visit<'a, P> {
    match &stmt.node {
        Stmt::Local(local) => {
            cx.scan(pass, local.ty.as_ref().map(Node::TypeRef))?;
            cx.scan(pass, local.init.as_ref().map(Node::Expr))?;
        }
        Stmt::Expr(expr) => cx.scan(pass, Node::Expr(expr))?,
        Stmt::Return(value) => cx.scan(pass, value.as_ref().map(Node::Expr))?,
        Stmt::If(if_stmt) => {
            cx.scan(pass, Node::Expr(&if_stmt.condition))?;
            cx.scan(pass, Node::Stmt(&if_stmt.then_branch))?;
            cx.scan(pass, if_stmt.else_branch.as_deref().map(Node::Stmt))?;
        }
        Stmt::While(while_stmt) => {
            cx.scan(pass, Node::Expr(&while_stmt.condition))?;
            cx.scan(pass, Node::Stmt(&while_stmt.body))?;
        }
        Stmt::Block(block) => walk_block(pass, cx, block)?,
    }
    Ok(())
}

pub fn walk_expr<'a, P: Pass<'a>>(pass: &mut P, cx: &mut Scanner<'a>, expr: &'a Spanned<Expr>) -> Visit<'a, P> {
    match &expr.node {
        Expr::Ident(_) | Expr::Literal(_) => {}
        Expr::Field(target, _) => cx.scan(pass, Node::Expr(target))?,
        Expr::Call(callee, args) => {
            cx.scan(pass, Node::Expr(callee))?;
            for arg in args {
                cx.scan(pass, Node::Expr(arg))?;
            }
        }
        Expr::New(ty, args) => {
            cx.scan(pass, Node::TypeRef(ty))?;
            for arg in args {
                cx.scan(pass, Node::Expr(arg))?;
            }
        }
        Expr::Binary(left, _, right) | Expr::Assign(left, right) => {
            cx.scan(pass, Node::Expr(left))?;
            cx.scan(pass, Node::Expr(right))?;
        }
        Expr::Unary(_, operand) => cx.scan(pass, Node::Expr(operand))?,
        Expr::Lambda(params, body) => {
            for param in params {
                cx.scan(pass, Node::Param(param))?;
            }
            cx.scan(pass, body.as_node())?;
        }
        Expr::Conditional(condition, then_value, else_value) => {
            cx.scan(pass, Node::Expr(condition))?;
            cx.scan(pass, Node::Expr(then_value))?;
            cx.scan(pass, Node::Expr(else_value))?;
        }
    }
    Ok(())
}
