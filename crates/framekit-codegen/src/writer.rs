//! Indented source text builder.

/// Accumulates emitted lines at the current block depth.
#[derive(Debug)]
pub struct SourceWriter {
    buf: String,
    indent_width: usize,
    depth: usize,
    lines: u32,
}

impl SourceWriter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            buf: String::new(),
            indent_width,
            depth: 0,
            lines: 0,
        }
    }

    /// Write one line at the current depth.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.buf
                .extend(std::iter::repeat(' ').take(self.depth * self.indent_width));
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self.lines += 1;
    }

    /// `{` on its own line, then indent.
    pub fn open_block(&mut self) {
        self.line("{");
        self.depth += 1;
    }

    /// Dedent, then `}` on its own line.
    pub fn close_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of lines written so far; the next line is `lines_written() + 1`.
    pub fn lines_written(&self) -> u32 {
        self.lines
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_indent_their_contents() {
        let mut w = SourceWriter::new(4);
        w.line("public void Act()");
        w.open_block();
        w.line("using (var widget = new Demo.Widget())");
        w.open_block();
        w.line("consumer.Take(widget);");
        w.close_block();
        w.close_block();
        assert_eq!(
            w.finish(),
            "public void Act()\n{\n    using (var widget = new Demo.Widget())\n    {\n        consumer.Take(widget);\n    }\n}\n"
        );
    }

    #[test]
    fn counts_lines() {
        let mut w = SourceWriter::new(2);
        w.open_block();
        w.line("");
        assert_eq!(w.lines_written(), 2);
        w.close_block();
        assert_eq!(w.depth(), 0);
        assert_eq!(w.finish(), "{\n\n}\n");
    }
}
