//! Declaration association — maps each comment to the declaration it
//! documents.
//!
//! A trailing comment (code earlier on its own line) associates with a
//! declaration on that same line or nothing. Any other comment associates
//! forward: the first following line that holds code — skipping blanks,
//! other comments, and `template<...>` prefix lines — is tested once
//! against the declaration patterns. No backtracking, so ties cannot
//! happen.
//!
//! Matching runs on a masked copy of the buffer with comment bytes
//! blanked, so the patterns never fire on comment text.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{Comment, DeclKind, Declaration};
use crate::scanner::{LineIndex, RawKind, RawSpan};

// -- Declaration head patterns ------------------------------------------------

static RE_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*define\s+([A-Za-z_]\w*)").unwrap());

static RE_NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:inline\s+)?namespace\s+([A-Za-z_][\w:]*)").unwrap()
});

static RE_RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:typedef\s+)?(struct|class|enum|union)\b(?:\s+(?:class|struct))?\s*([A-Za-z_]\w*)?")
        .unwrap()
});

// Single-line typedef: the alias is the last identifier before the `;`.
static RE_TYPEDEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*typedef\b.*\b([A-Za-z_]\w*)\s*(?:\[[^\]]*\])?\s*;").unwrap()
});

static RE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([A-Za-z_][\w:<>,\*&\s]*?[\s\*&])?(~[A-Za-z_]\w*|operator\S+?|[A-Za-z_][\w:]*)\s*\(",
    )
    .unwrap()
});

static RE_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([A-Za-z_][\w:<>,\*&\s]*?[\s\*&])([A-Za-z_]\w*)\s*(?:\[[^\]]*\])?\s*(?:=[^;]*)?;",
    )
    .unwrap()
});

static RE_ENUMERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_]\w*)\s*(?:=\s*[^,{};]+)?,?\s*$").unwrap()
});

static RE_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*template\s*<").unwrap());

/// Leading keywords that rule a line out as a declaration head.
const STMT_KEYWORDS: &[&str] = &[
    "break", "case", "continue", "delete", "do", "else", "for", "goto", "if",
    "new", "private", "protected", "public", "return", "sizeof", "switch",
    "throw", "using", "while",
];

/// Attach declarations to classified comments.
pub fn associate(src: &str, spans: &[RawSpan], lines: &LineIndex, comments: &mut [Comment]) {
    let masked = mask_comments(src, spans);
    let masked_lines: Vec<&str> = masked.split('\n').collect();

    for comment in comments.iter_mut() {
        comment.declaration = associate_one(comment, &masked_lines, lines);
    }
}

fn associate_one(
    comment: &Comment,
    masked_lines: &[&str],
    lines: &LineIndex,
) -> Option<Declaration> {
    let start_idx = comment.line as usize - 1;
    let start_line = masked_lines.get(start_idx)?;

    // Trailing comment: code earlier on the same line wins, or nothing.
    let col = comment.span.start - lines.line_start(comment.line);
    if !start_line[..col.min(start_line.len())].trim().is_empty() {
        return declaration_at(start_line, comment.line);
    }

    // Forward: rest of the end line first, then following lines.
    let end_line = lines.line_of(comment.span.end - 1);
    let end_idx = end_line as usize - 1;
    let end_col = comment.span.end - lines.line_start(end_line);
    let end_text = masked_lines.get(end_idx)?;
    if !end_text[end_col.min(end_text.len())..].trim().is_empty() {
        return declaration_at(end_text, end_line);
    }

    for idx in end_idx + 1..masked_lines.len() {
        let line = masked_lines[idx];
        if line.trim().is_empty() || RE_TEMPLATE.is_match(line) {
            continue;
        }
        return declaration_at(line, idx as u32 + 1);
    }
    None
}

fn declaration_at(line: &str, line_no: u32) -> Option<Declaration> {
    declaration_of(line).map(|(kind, name)| Declaration {
        kind,
        name,
        line: line_no,
    })
}

/// Recognize a declaration head on a single masked line.
fn declaration_of(line: &str) -> Option<(DeclKind, Option<String>)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = RE_DEFINE.captures(line) {
        return Some((DeclKind::Macro, Some(caps[1].to_string())));
    }
    if trimmed.starts_with('#') {
        return None;
    }

    if let Some(caps) = RE_NAMESPACE.captures(line) {
        return Some((DeclKind::Namespace, Some(caps[1].to_string())));
    }

    if let Some(caps) = RE_RECORD.captures(line) {
        let kind = match &caps[1] {
            "struct" => DeclKind::Struct,
            "class" => DeclKind::Class,
            "enum" => DeclKind::Enum,
            _ => DeclKind::Union,
        };
        return Some((kind, caps.get(2).map(|m| m.as_str().to_string())));
    }

    if trimmed.starts_with("typedef") {
        if let Some(caps) = RE_TYPEDEF.captures(line) {
            return Some((DeclKind::Typedef, Some(caps[1].to_string())));
        }
        return Some((DeclKind::Typedef, None));
    }

    if STMT_KEYWORDS.contains(&first_word(trimmed)) {
        return None;
    }

    if let Some(caps) = RE_FUNCTION.captures(line) {
        let prefix = caps.get(1).map_or("", |m| m.as_str().trim());
        let name = &caps[2];
        // A bare lowercase `name(` with no type prefix is most likely a
        // call, not a signature; constructors, destructors, operators and
        // qualified names are signatures regardless.
        let signature_like = !prefix.is_empty()
            || name.starts_with('~')
            || name.starts_with("operator")
            || name.contains("::")
            || name.chars().next().is_some_and(char::is_uppercase);
        if signature_like {
            return Some((DeclKind::Function, Some(name.to_string())));
        }
    }

    if let Some(caps) = RE_VARIABLE.captures(line) {
        return Some((DeclKind::Variable, Some(caps[2].to_string())));
    }

    if let Some(caps) = RE_ENUMERATOR.captures(line) {
        return Some((DeclKind::Enumerator, Some(caps[1].to_string())));
    }

    None
}

fn first_word(line: &str) -> &str {
    let end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    &line[..end]
}

/// Copy of the source with every comment byte except newlines blanked.
/// Comment spans start and end on ASCII delimiters, so blanking whole
/// spans keeps the copy valid UTF-8 and every line its original length.
fn mask_comments(src: &str, spans: &[RawSpan]) -> String {
    let mut masked = src.as_bytes().to_vec();
    for s in spans {
        if matches!(s.kind, RawKind::Comment(_)) {
            for b in &mut masked[s.span.start..s.span.end] {
                if *b != b'\n' {
                    *b = b' ';
                }
            }
        }
    }
    String::from_utf8_lossy(&masked).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn decl_for(src: &str, comment_idx: usize) -> Option<Declaration> {
        let report = parse_source("t.c", src);
        assert!(report.errors.is_empty(), "unexpected errors");
        report.comments[comment_idx].declaration.clone()
    }

    fn expect_decl(src: &str, kind: DeclKind, name: Option<&str>) {
        let decl = decl_for(src, 0).expect("expected an association");
        assert_eq!(decl.kind, kind, "input: {src}");
        assert_eq!(decl.name.as_deref(), name, "input: {src}");
    }

    #[test]
    fn function_signature() {
        expect_decl("/** doc */\nint add(int x, int y);\n", DeclKind::Function, Some("add"));
    }

    #[test]
    fn static_inline_function() {
        expect_decl(
            "/// doc\nstatic inline int is_valid(int v) {\n",
            DeclKind::Function,
            Some("is_valid"),
        );
    }

    #[test]
    fn constructor() {
        expect_decl("/// doc\nWidget() : x_(0) {}\n", DeclKind::Function, Some("Widget"));
    }

    #[test]
    fn destructor() {
        expect_decl("/// doc\n~Widget();\n", DeclKind::Function, Some("~Widget"));
    }

    #[test]
    fn operator_overload() {
        expect_decl(
            "/*! doc */\nbool operator==(const Widget &a, const Widget &b);\n",
            DeclKind::Function,
            Some("operator=="),
        );
    }

    #[test]
    fn macro_definition() {
        expect_decl("/// Buffer size.\n#define MAX_SIZE 1024\n", DeclKind::Macro, Some("MAX_SIZE"));
    }

    #[test]
    fn struct_with_typedef_prefix() {
        expect_decl("/** doc */\ntypedef struct Point {\n", DeclKind::Struct, Some("Point"));
    }

    #[test]
    fn anonymous_typedef_struct() {
        expect_decl("/** doc */\ntypedef struct {\n", DeclKind::Struct, None);
    }

    #[test]
    fn single_line_typedef() {
        expect_decl("/// alias\ntypedef unsigned long word_t;\n", DeclKind::Typedef, Some("word_t"));
    }

    #[test]
    fn enum_class() {
        expect_decl("/// states\nenum class State {\n", DeclKind::Enum, Some("State"));
    }

    #[test]
    fn namespace_head() {
        expect_decl("/** utils */\nnamespace utils {\n", DeclKind::Namespace, Some("utils"));
    }

    #[test]
    fn variable_declaration() {
        expect_decl("// counter\nstatic int counter = 0;\n", DeclKind::Variable, Some("counter"));
    }

    #[test]
    fn pointer_variable() {
        expect_decl("// name\nconst char *name;\n", DeclKind::Variable, Some("name"));
    }

    #[test]
    fn blank_lines_skipped() {
        expect_decl("/** doc */\n\n\nvoid cleanup(void);\n", DeclKind::Function, Some("cleanup"));
    }

    #[test]
    fn other_comments_skipped() {
        let src = "/* first */\n// second\nint f(void);\n";
        let report = parse_source("t.c", src);
        for c in &report.comments {
            let decl = c.declaration.as_ref().expect("both should associate");
            assert_eq!(decl.name.as_deref(), Some("f"));
        }
    }

    #[test]
    fn template_prefix_line_skipped() {
        expect_decl(
            "/** doc */\ntemplate<typename T>\nT max_with_zero(T value) {\n",
            DeclKind::Function,
            Some("max_with_zero"),
        );
    }

    #[test]
    fn trailing_comment_binds_to_its_own_line() {
        let src = "int x; // first\nint y;\n";
        let decl = decl_for(src, 0).unwrap();
        assert_eq!(decl.kind, DeclKind::Variable);
        assert_eq!(decl.name.as_deref(), Some("x"));
        assert_eq!(decl.line, 1);
    }

    #[test]
    fn trailing_comment_without_declaration_stays_unbound() {
        assert_eq!(decl_for("return 0; // done\nint z;\n", 0), None);
    }

    #[test]
    fn trailing_member_marker() {
        expect_decl("unsigned int port; ///< Server port\n", DeclKind::Variable, Some("port"));
    }

    #[test]
    fn trailing_enumerator() {
        let src = "enum Level {\n    Debug, ///< verbose\n};\n";
        let decl = decl_for(src, 0).unwrap();
        assert_eq!(decl.kind, DeclKind::Enumerator);
        assert_eq!(decl.name.as_deref(), Some("Debug"));
    }

    #[test]
    fn code_after_block_comment_on_same_line() {
        expect_decl("/* doc */ int x;\n", DeclKind::Variable, Some("x"));
    }

    #[test]
    fn call_is_not_a_declaration() {
        assert_eq!(decl_for("/* doc */\nprintf(\"hi\");\n", 0), None);
    }

    #[test]
    fn statement_keyword_is_not_a_declaration() {
        assert_eq!(decl_for("/* doc */\nreturn total;\n", 0), None);
    }

    #[test]
    fn include_line_is_not_a_declaration() {
        assert_eq!(decl_for("/* header */\n#include <stdio.h>\n", 0), None);
    }

    #[test]
    fn no_backtracking_past_first_code_line() {
        // The access specifier is the nearest code line; association stops
        // there even though a function follows.
        assert_eq!(decl_for("/// doc\npublic:\nvoid f(void);\n", 0), None);
    }

    #[test]
    fn comment_at_eof_unbound() {
        assert_eq!(decl_for("int x;\n/* end of file */\n", 0), None);
    }

    #[test]
    fn merged_run_associates_as_one() {
        let src = "/// a\n/// b\nclass Widget {\n";
        let decl = decl_for(src, 0).unwrap();
        assert_eq!(decl.kind, DeclKind::Class);
        assert_eq!(decl.name.as_deref(), Some("Widget"));
    }
}
