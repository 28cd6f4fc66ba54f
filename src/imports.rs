//! Static import registry.
//!
//! Maps the short name of each statically imported member (`member` for `import static pkg.Holder.member`) to its
//! import declaration, so later passes can tell whether an unqualified identifier refers to a static import.

use std::collections::HashMap;

use ferry_syntax::ast::{CompilationUnit, ImportDecl, Spanned};

use crate::config::StaticImportPolicy;

#[derive(Debug, Default, Clone)]
pub struct StaticImports<'a> {
    entries: HashMap<String, &'a Spanned<ImportDecl>>,
}

/// Short name of an imported identifier: the text after the last `.`.
pub fn short_name(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(idx) => &qualified[idx + 1..],
        None => qualified,
    }
}

impl<'a> StaticImports<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the static imports of `unit`. A colliding short name is overwritten by the later import.
    pub fn register_unit(&mut self, unit: &'a CompilationUnit, policy: StaticImportPolicy) {
        if policy == StaticImportPolicy::ResetPerUnit {
            self.clear();
        }
        for import in unit.imports.iter().filter(|i| i.node.is_static) {
            let identifier = import.node.qualified_identifier();
            let key = short_name(&identifier).to_string();
            if let Some(previous) = self.entries.insert(key, import) {
                tracing::trace!(
                    replaced = %previous.node.qualified_identifier(),
                    by = %identifier,
                    "static import short name reassigned"
                );
            }
        }
    }

    pub fn get(&self, short_name: &str) -> Option<&'a Spanned<ImportDecl>> {
        self.entries.get(short_name).copied()
    }

    pub fn contains(&self, short_name: &str) -> bool {
        self.entries.contains_key(short_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a Spanned<ImportDecl>)> + '_ {
        self.entries.iter().map(|(name, import)| (name.as_str(), *import))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
