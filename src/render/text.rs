//! Plain text renderer — one line per comment, grep-friendly.
//!
//! `path:line: style [-> declaration] | first body line`

use crate::model::FileReport;
use crate::render::Renderer;

#[derive(Debug)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, report: &FileReport) -> String {
        let mut out = String::new();
        for c in &report.comments {
            out.push_str(&format!("{}:{}: {}", report.file, c.line, c.style.name()));
            if let Some(d) = &c.declaration {
                out.push_str(&format!(" -> {}", d.kind.name()));
                if let Some(name) = &d.name {
                    out.push(' ');
                    out.push_str(name);
                }
            }
            let mut body_lines = c.text.lines();
            if let Some(first) = body_lines.next() {
                if !first.is_empty() {
                    out.push_str(" | ");
                    out.push_str(first);
                    if body_lines.next().is_some() {
                        out.push_str(" ...");
                    }
                }
            }
            out.push('\n');
        }
        for e in &report.errors {
            out.push_str(&format!("{}: error: {}\n", report.file, e));
        }
        out
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn one_line_per_comment() {
        let src = "/* note */\nint x; // trailing\n";
        let report = parse_source("t.c", src);
        let out = TextRenderer.render(&report);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "t.c:1: block -> variable x | note");
        assert_eq!(lines[1], "t.c:2: line -> variable x | trailing");
    }

    #[test]
    fn multiline_body_elided() {
        let src = "/// a\n/// b\nint f(void);\n";
        let report = parse_source("t.c", src);
        let out = TextRenderer.render(&report);
        assert_eq!(out, "t.c:1: doxygen-line -> function f | a ...\n");
    }

    #[test]
    fn errors_appended() {
        let report = parse_source("t.c", "/* open");
        let out = TextRenderer.render(&report);
        assert!(out.contains("t.c: error: unterminated block comment"));
    }
}
