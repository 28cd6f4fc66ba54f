//! Single-slot cache of source lines, used to render positions and node text in diagnostics.
//!
//! Only the most recently requested file is kept: asking for another file evicts it. Missing or unreadable files
//! are reported as `None` and never cached, so diagnostics simply degrade to showing no source context.

use std::fs;
use std::path::{Path, PathBuf};

use ferry_syntax::ast::CompilationUnit;

#[derive(Debug, Default)]
pub struct SourceCache {
    slot: Option<(PathBuf, Vec<String>)>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines of the unit's source file.
    pub fn lines_for(&mut self, unit: &CompilationUnit) -> Option<&[String]> {
        self.lines_at(&unit.path)
    }

    /// Lines of the file at `path`, loading it if it is not the cached one.
    pub fn lines_at(&mut self, path: &Path) -> Option<&[String]> {
        let cached = matches!(&self.slot, Some((cached, _)) if cached == path);
        if !cached {
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "source text unavailable");
                    return None;
                }
            };
            tracing::trace!(path = %path.display(), "loaded source text");
            self.slot = Some((path.to_path_buf(), split_lines(&text)));
        }
        self.slot.as_ref().map(|(_, lines)| lines.as_slice())
    }

}

/// Split on `\n` only, so a line keeps its `\r` and line lengths add up to byte offsets. A final line break does
/// not open an extra empty line.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_loads_and_splits_lines() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = write_file(dir.path(), "A.java", "class A {\n}\n");
        let mut cache = SourceCache::new();
        assert_eq!(cache.lines_at(&f1).unwrap(), ["class A {", "}"]);
    }

    #[test]
    fn test_crlf_lines_keep_carriage_return() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = write_file(dir.path(), "A.java", "class A {\r\n  int x;\r\n}\r\n");
        let mut cache = SourceCache::new();
        let lines = cache.lines_at(&f1).unwrap();
        assert_eq!(lines, ["class A {\r", "  int x;\r", "}\r"]);
        assert_eq!(lines.iter().map(|l| l.len() + 1).sum::<usize>(), 24);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = write_file(dir.path(), "A.java", "a\n\nb");
        let mut cache = SourceCache::new();
        assert_eq!(cache.lines_at(&f1).unwrap(), ["a", "", "b"]);

        let empty = write_file(dir.path(), "Empty.java", "");
        assert!(cache.lines_at(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_same_file_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = write_file(dir.path(), "A.java", "old");
        let mut cache = SourceCache::new();
        assert_eq!(cache.lines_at(&f1).unwrap(), ["old"]);

        write_file(dir.path(), "A.java", "new");
        assert_eq!(cache.lines_at(&f1).unwrap(), ["old"]);
    }

    #[test]
    fn test_single_slot_rereads_after_eviction() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = write_file(dir.path(), "A.java", "first read");
        let f2 = write_file(dir.path(), "B.java", "other");
        let mut cache = SourceCache::new();

        assert_eq!(cache.lines_at(&f1).unwrap(), ["first read"]);
        write_file(dir.path(), "A.java", "second read");
        assert_eq!(cache.lines_at(&f2).unwrap(), ["other"]);
        // f2 evicted f1, so this is a fresh read and sees the new content
        assert_eq!(cache.lines_at(&f1).unwrap(), ["second read"]);
    }

    #[test]
    fn test_missing_file_is_unavailable_and_keeps_slot() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = write_file(dir.path(), "A.java", "a");
        let mut cache = SourceCache::new();
        cache.lines_at(&f1).unwrap();

        assert!(cache.lines_at(&dir.path().join("Missing.java")).is_none());
        // still cached: the rewrite is not seen
        write_file(dir.path(), "A.java", "b");
        assert_eq!(cache.lines_at(&f1).unwrap(), ["a"]);
    }

    #[test]
    fn test_lines_for_unit_uses_unit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "U.java", "package u;");
        let unit = CompilationUnit {
            path,
            package: None,
            imports: vec![],
            types: vec![],
        };
        let mut cache = SourceCache::new();
        assert_eq!(cache.lines_for(&unit).unwrap(), ["package u;"]);
    }
}
