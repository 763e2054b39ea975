//! Markdown renderer — one documentation page per source file.
//!
//! The page opens with the file title and intro (taken from a doc comment
//! carrying `@file`/`@brief`, when one exists), then an index of the
//! documented declarations, then one section per declaration.

use crate::model::{Comment, FileReport, Tag};
use crate::render::Renderer;

#[derive(Debug)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, report: &FileReport) -> String {
        let mut out = String::new();

        let file_doc = report
            .comments
            .iter()
            .find(|c| c.style.is_doc() && c.tag("file").is_some());

        let title = file_doc
            .and_then(|c| c.tag("file"))
            .and_then(|t| t.argument.clone())
            .unwrap_or_else(|| report.file.clone());
        out.push_str(&format!("# {}\n\n", title));

        if let Some(doc) = file_doc {
            if let Some(brief) = doc.tag("brief") {
                if !brief.text.is_empty() {
                    out.push_str(&brief.text);
                    out.push_str("\n\n");
                }
            }
            if !doc.text.is_empty() {
                out.push_str(&doc.text);
                out.push_str("\n\n");
            }
        }

        let documented: Vec<&Comment> = report
            .comments
            .iter()
            .filter(|c| c.style.is_doc() && c.declaration.is_some())
            .filter(|c| file_doc.map_or(true, |fd| fd.span != c.span))
            .collect();

        if !documented.is_empty() {
            out.push_str("## Index\n\n");
            for c in &documented {
                let heading = heading_for(c);
                out.push_str(&format!("* [{}](#{})\n", heading, anchor(&heading)));
            }
            out.push('\n');

            for c in &documented {
                out.push_str(&render_entry(c));
                out.push('\n');
            }
        }

        if !report.errors.is_empty() {
            out.push_str("## Errors\n\n");
            for e in &report.errors {
                out.push_str(&format!("* {}\n", e));
            }
            out.push('\n');
        }

        out
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// Render one documented declaration's section.
fn render_entry(c: &Comment) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("### {}\n", heading_for(c)));

    if let Some(d) = &c.declaration {
        lines.push(format!(
            "> `{}` `{}` (line {})\n",
            d.kind.name(),
            c.style.name(),
            d.line
        ));
    }

    if let Some(brief) = c.tag("brief") {
        if !brief.text.is_empty() {
            lines.push(brief.text.clone());
            lines.push(String::new());
        }
    }

    if !c.text.is_empty() {
        lines.push(c.text.clone());
        lines.push(String::new());
    }

    let params: Vec<&Tag> = c
        .tags
        .iter()
        .filter(|t| t.name == "param" || t.name == "tparam")
        .collect();
    if !params.is_empty() {
        lines.push("#### Parameters\n".to_string());
        for t in params {
            match &t.argument {
                Some(arg) => lines.push(format!("* **{}**: {}", arg, t.text)),
                None => lines.push(format!("* {}", t.text)),
            }
        }
        lines.push(String::new());
    }

    let returns: Vec<&Tag> = c
        .tags
        .iter()
        .filter(|t| matches!(t.name.as_str(), "return" | "returns" | "result" | "retval"))
        .collect();
    if !returns.is_empty() {
        lines.push("#### Returns\n".to_string());
        for t in returns {
            match &t.argument {
                Some(arg) => lines.push(format!("* **{}**: {}", arg, t.text)),
                None => lines.push(format!("* {}", t.text)),
            }
        }
        lines.push(String::new());
    }

    let rest: Vec<&Tag> = c
        .tags
        .iter()
        .filter(|t| {
            !matches!(
                t.name.as_str(),
                "file" | "brief" | "param" | "tparam" | "return" | "returns" | "result"
                    | "retval"
            )
        })
        .collect();
    if !rest.is_empty() {
        lines.push("#### Annotations\n".to_string());
        for t in rest {
            match &t.argument {
                Some(arg) => lines.push(format!("* **{}** `{}`: {}", t.name, arg, t.text)),
                None => lines.push(format!("* **{}**: {}", t.name, t.text)),
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn heading_for(c: &Comment) -> String {
    match &c.declaration {
        Some(d) => d
            .name
            .clone()
            .unwrap_or_else(|| format!("{} (line {})", d.kind.name(), d.line)),
        None => format!("line {}", c.line),
    }
}

/// GitHub heading anchor: lowercase, keep alphanumerics, spaces and
/// hyphens, then spaces to hyphens.
fn anchor(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        if ch.is_alphanumeric() || ch == ' ' || ch == '-' {
            slug.push(ch);
        }
    }
    slug.replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn anchor_slugs() {
        assert_eq!(anchor("set_label"), "setlabel");
        assert_eq!(anchor("operator=="), "operator");
        assert_eq!(anchor("Max With Zero"), "max-with-zero");
    }

    #[test]
    fn page_title_from_file_tag() {
        let src = "/**\n * @file widget.cpp\n * @brief A widget.\n */\n";
        let report = parse_source("src/widget.cpp", src);
        let out = MarkdownRenderer.render(&report);
        assert!(out.starts_with("# widget.cpp\n"));
        assert!(out.contains("A widget."));
    }

    #[test]
    fn page_title_falls_back_to_path() {
        let report = parse_source("src/point.c", "// nothing doc-ish\n");
        let out = MarkdownRenderer.render(&report);
        assert!(out.starts_with("# src/point.c\n"));
    }

    #[test]
    fn documented_declaration_gets_section() {
        let src = "\
/**
 * @brief Add two integers.
 * @param x First addend
 * @param y Second addend
 * @return The sum
 */
int add(int x, int y);
";
        let report = parse_source("add.c", src);
        let out = MarkdownRenderer.render(&report);
        assert!(out.contains("## Index"));
        assert!(out.contains("* [add](#add)"));
        assert!(out.contains("### add"));
        assert!(out.contains("> `function` `doxygen-block` (line 7)"));
        assert!(out.contains("#### Parameters"));
        assert!(out.contains("* **x**: First addend"));
        assert!(out.contains("#### Returns"));
        assert!(out.contains("* The sum"));
    }

    #[test]
    fn other_tags_listed_as_annotations() {
        let src = "/**\n * @brief Init.\n * @note Thread-safe\n */\nvoid init(void);\n";
        let report = parse_source("t.c", src);
        let out = MarkdownRenderer.render(&report);
        assert!(out.contains("#### Annotations"));
        assert!(out.contains("* **note**: Thread-safe"));
    }

    #[test]
    fn errors_section_present() {
        let report = parse_source("broken.c", "/* open");
        let out = MarkdownRenderer.render(&report);
        assert!(out.contains("## Errors"));
        assert!(out.contains("unterminated block comment"));
    }

    #[test]
    fn plain_comments_do_not_get_sections() {
        let report = parse_source("t.c", "/* plain note */\nint x;\n");
        let out = MarkdownRenderer.render(&report);
        assert!(!out.contains("## Index"));
    }
}
