//! Comment classification — style tagging, `///` run merging, body cleanup.

use crate::model::{Comment, Span, Style};
use crate::parser::tags;
use crate::scanner::{Delim, LineIndex, RawKind, RawSpan};

/// Classify raw comment spans into logical comments.
///
/// Adjacent `///` (or `//!`) line comments separated by nothing but a
/// single newline's whitespace merge into one comment, bodies joined in
/// order. Everything else maps one span to one comment. Declarations are
/// attached by the associator afterwards.
pub fn classify(src: &str, spans: &[RawSpan], lines: &LineIndex) -> Vec<Comment> {
    let raw_comments: Vec<(Span, Style)> = spans
        .iter()
        .filter_map(|s| match s.kind {
            RawKind::Comment(delim) => {
                Some((s.span, style_of(delim, &src[s.span.start..s.span.end])))
            }
            RawKind::Code => None,
        })
        .collect();

    let mut out = Vec::new();
    let mut i = 0;
    while i < raw_comments.len() {
        let (first, style) = raw_comments[i];
        let mut parts = vec![first];
        let mut last_end = first.end;
        if matches!(style, Style::DoxygenLine | Style::QtLine) {
            while let Some(&(next, next_style)) = raw_comments.get(i + 1) {
                if next_style == style && mergeable_gap(&src[last_end..next.start]) {
                    parts.push(next);
                    last_end = next.end;
                    i += 1;
                } else {
                    break;
                }
            }
        }

        let span = Span::new(first.start, last_end);
        let body = clean_body(style, src, &parts);
        let (text, tag_list) = if style.is_doc() {
            tags::parse_doc_body(&body)
        } else {
            (body, Vec::new())
        };

        out.push(Comment {
            span,
            line: lines.line_of(span.start),
            style,
            raw: src[span.start..span.end].to_string(),
            text,
            tags: tag_list,
            declaration: None,
        });
        i += 1;
    }
    out
}

/// Decide a comment's style from its opening delimiter.
///
/// `/**/` and `/*** banners ***/` are plain blocks; `////` dividers are
/// plain line comments. Only exactly-`///` and `//!` are line doc styles.
fn style_of(delim: Delim, raw: &str) -> Style {
    match delim {
        Delim::Line => {
            let rest = &raw[2..];
            if rest.starts_with('!') {
                Style::QtLine
            } else if rest.starts_with('/') && !rest.starts_with("//") {
                Style::DoxygenLine
            } else {
                Style::Line
            }
        }
        Delim::Block => {
            let inner = &raw[2..raw.len() - 2];
            if inner.starts_with('!') {
                Style::QtBlock
            } else if inner.len() > 1 && inner.starts_with('*') && !inner.starts_with("**") {
                Style::DoxygenBlock
            } else {
                Style::Block
            }
        }
    }
}

/// Two line comments merge when only whitespace containing exactly one
/// newline separates them — consecutive lines, no blank or code between.
fn mergeable_gap(gap: &str) -> bool {
    gap.chars().all(char::is_whitespace)
        && gap.bytes().filter(|&b| b == b'\n').count() == 1
}

fn clean_body(style: Style, src: &str, parts: &[Span]) -> String {
    match style {
        Style::Block | Style::DoxygenBlock | Style::QtBlock => {
            let first = parts[0];
            clean_block(style, &src[first.start..first.end])
        }
        _ => parts
            .iter()
            .map(|p| clean_line(style, &src[p.start..p.end]))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Strip the delimiter, the optional `<` member marker, and one leading
/// space from a single line comment.
fn clean_line(style: Style, raw: &str) -> String {
    let rest = match style {
        Style::DoxygenLine | Style::QtLine => &raw[3..],
        _ => &raw[2..],
    };
    let rest = if style.is_doc() {
        rest.strip_prefix('<').unwrap_or(rest)
    } else {
        rest
    };
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    rest.trim_end().to_string()
}

/// Strip delimiters and per-line `*` gutters from a block comment.
fn clean_block(style: Style, raw: &str) -> String {
    let mut inner = &raw[2..raw.len() - 2];
    if matches!(style, Style::DoxygenBlock | Style::QtBlock) {
        inner = &inner[1..];
        inner = inner.strip_prefix('<').unwrap_or(inner);
    }
    let mut lines: Vec<String> = inner
        .split('\n')
        .map(|l| {
            let t = l.trim_start().trim_start_matches('*');
            let t = t.strip_prefix(' ').unwrap_or(t);
            t.trim_end().to_string()
        })
        .collect();
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
