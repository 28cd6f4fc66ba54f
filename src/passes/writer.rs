//! Line-oriented output writer with indentation.
//!
//! Unlike a streaming writer, lines stay addressable until [`finish`](OutlineWriter::finish), so a pass can append
//! to an earlier line or discard everything written since a mark when a rollback lands.

/// Writer that builds indented output line by line
#[derive(Debug, Clone)]
pub struct OutlineWriter {
    lines: Vec<String>,
    indent_width: usize,
}

impl Default for OutlineWriter {
    fn default() -> Self {
        Self::new(2)
    }
}

impl OutlineWriter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            indent_width,
        }
    }

    /// Write `text` on a new line at `level` and return the line's index.
    pub fn line(&mut self, level: usize, text: &str) -> usize {
        let mut line = " ".repeat(level * self.indent_width);
        line.push_str(text);
        self.lines.push(line);
        self.lines.len() - 1
    }

    /// Append to an already written line. Out-of-range indices are ignored.
    pub fn append(&mut self, index: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            line.push_str(text);
        }
    }

    /// Number of lines written so far; usable as a mark for [`truncate`](Self::truncate).
    pub fn mark(&self) -> usize {
        self.lines.len()
    }

    /// Drop every line written after `mark`.
    pub fn truncate(&mut self, mark: usize) {
        self.lines.truncate(mark);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}
