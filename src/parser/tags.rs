//! `@tag` / `\tag` directive parsing inside doc comment bodies.
//!
//! Both sigils are equivalent. A directive owns the rest of its line plus
//! any following non-blank lines until the next directive or a blank line.
//! Anything that only looks like a directive (`@` with no identifier)
//! stays in the free-form body — malformed tags are never fatal.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::Tag;

/// Directives whose first word is an argument name rather than body text,
/// e.g. `@param x The value`.
const ARG_TAGS: &[&str] = &[
    "param", "tparam", "retval", "def", "typedef", "struct", "class", "enum",
    "union", "namespace", "var", "fn", "file",
];

// Optional bracket after the name covers `@param[in]` direction suffixes.
static RE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[@\\]([A-Za-z][A-Za-z0-9_]*)(?:\[[^\]]*\])?[ \t]*(.*)$").unwrap()
});

/// Split a cleaned doc body into free-form text and structured directives.
pub fn parse_doc_body(body: &str) -> (String, Vec<Tag>) {
    let mut text_lines: Vec<&str> = Vec::new();
    let mut done: Vec<Tag> = Vec::new();
    let mut open: Option<Tag> = None;

    for line in body.lines() {
        let trimmed = line.trim();

        if let Some(caps) = RE_DIRECTIVE.captures(trimmed) {
            if let Some(tag) = open.take() {
                done.push(tag);
            }
            let name = caps[1].to_string();
            let rest = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            let (argument, text) = if ARG_TAGS.contains(&name.as_str()) {
                match rest.split_once(char::is_whitespace) {
                    Some((arg, tail)) => {
                        (Some(arg.to_string()), tail.trim_start().to_string())
                    }
                    None if !rest.is_empty() => (Some(rest), String::new()),
                    None => (None, String::new()),
                }
            } else {
                (None, rest)
            };
            open = Some(Tag {
                name,
                argument,
                text,
            });
            continue;
        }

        if trimmed.is_empty() {
            if let Some(tag) = open.take() {
                done.push(tag);
            }
            text_lines.push(line);
            continue;
        }

        match open.as_mut() {
            Some(tag) => {
                if tag.text.is_empty() {
                    tag.text = trimmed.to_string();
                } else {
                    tag.text.push('\n');
                    tag.text.push_str(trimmed);
                }
            }
            None => text_lines.push(line),
        }
    }
    if let Some(tag) = open.take() {
        done.push(tag);
    }

    while text_lines.first().is_some_and(|l| l.trim().is_empty()) {
        text_lines.remove(0);
    }
    while text_lines.last().is_some_and(|l| l.trim().is_empty()) {
        text_lines.pop();
    }

    (text_lines.join("\n"), done)
}
