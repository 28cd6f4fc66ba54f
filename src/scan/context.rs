//! Context queries answered from the scanning stack.
//!
//! All queries read the live stack only; nothing re-walks the tree. Ancestor searches start one frame below the
//! current node, except [`Scanner::nearest_ancestor_from`], which starts one frame below the given node.

use ferry_syntax::{Node, NodeKind};

use super::Scanner;
use crate::resolve::SymbolResolver;

impl<'a> Scanner<'a> {
    /// The path from the scan root to the current node.
    pub fn stack(&self) -> &[Node<'a>] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The node being visited.
    pub fn current(&self) -> Option<Node<'a>> {
        self.stack.last().copied()
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.nth_from_top(1)
    }

    pub fn parent_of_parent(&self) -> Option<Node<'a>> {
        self.nth_from_top(2)
    }

    fn nth_from_top(&self, n: usize) -> Option<Node<'a>> {
        let len = self.stack.len();
        if n < len { Some(self.stack[len - 1 - n]) } else { None }
    }

    /// Ancestors of the current node, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'a>> + '_ {
        self.stack.iter().rev().skip(1).copied()
    }

    pub fn nearest_ancestor(&self, mut predicate: impl FnMut(Node<'a>) -> bool) -> Option<Node<'a>> {
        self.ancestors().find(|node| predicate(*node))
    }

    /// First ancestor for which `map` returns `Some`, mapped.
    ///
    /// ```rust,ignore
    /// let method = cx.find_ancestor(|node| node.as_method());
    /// ```
    pub fn find_ancestor<T>(&self, map: impl FnMut(Node<'a>) -> Option<T>) -> Option<T> {
        self.ancestors().find_map(map)
    }

    pub fn nearest_ancestor_of_kinds(&self, kinds: &[NodeKind]) -> Option<Node<'a>> {
        self.nearest_ancestor(|node| kinds.contains(&node.kind()))
    }

    /// Like [`nearest_ancestor`](Self::nearest_ancestor), but relative to `from` instead of the current node.
    ///
    /// `from` is located by identity (innermost occurrence); only the frames enclosing it are searched. Returns
    /// `None` when `from` is not on the stack.
    pub fn nearest_ancestor_from(
        &self,
        mut predicate: impl FnMut(Node<'a>) -> bool,
        from: Node<'a>,
    ) -> Option<Node<'a>> {
        let index = self.stack.iter().rposition(|node| *node == from)?;
        self.stack[..index].iter().rev().copied().find(|node| predicate(*node))
    }

    // ========================================================================
    // Symbol-level queries
    // ========================================================================

    /// Resolve `node` within the active unit.
    pub fn symbol_of<R: SymbolResolver<'a>>(&self, resolver: &R, node: Node<'a>) -> Option<R::Symbol> {
        resolver.resolve(self.unit?, node)
    }

    /// First ancestor whose resolved symbol satisfies `predicate`, returned as the symbol.
    pub fn nearest_ancestor_symbol<R: SymbolResolver<'a>>(
        &self,
        resolver: &R,
        mut predicate: impl FnMut(&R::Symbol) -> bool,
    ) -> Option<R::Symbol> {
        let unit = self.unit?;
        self.ancestors()
            .filter_map(|node| resolver.resolve(unit, node))
            .find(|symbol| predicate(symbol))
    }

    /// Symbol of the nearest ancestor that resolves to one.
    pub fn parent_symbol<R: SymbolResolver<'a>>(&self, resolver: &R) -> Option<R::Symbol> {
        self.nearest_ancestor_symbol(resolver, |_| true)
    }
}
