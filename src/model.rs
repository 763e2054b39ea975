//! Data model for extracted comments — format-agnostic.

use serde::Serialize;

use crate::error::ExtractError;

/// Byte range within a source buffer, half-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Invariant: `start < end` — a span is never empty.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end);
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Comment style, decided by the opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    /// `/* ... */`, including `/**/` and `/*** ... */` banners
    Block,
    /// `// ...`, including `//// ...` dividers
    Line,
    /// `/** ... */`
    DoxygenBlock,
    /// `/*! ... */`
    QtBlock,
    /// `/// ...` (adjacent lines merge)
    DoxygenLine,
    /// `//! ...` (adjacent lines merge)
    QtLine,
}

impl Style {
    /// Stable name used in rendered output and `--style` filters.
    pub fn name(self) -> &'static str {
        match self {
            Style::Block => "block",
            Style::Line => "line",
            Style::DoxygenBlock => "doxygen-block",
            Style::QtBlock => "qt-block",
            Style::DoxygenLine => "doxygen-line",
            Style::QtLine => "qt-line",
        }
    }

    pub fn from_name(name: &str) -> Option<Style> {
        match name {
            "block" => Some(Style::Block),
            "line" => Some(Style::Line),
            "doxygen-block" => Some(Style::DoxygenBlock),
            "qt-block" => Some(Style::QtBlock),
            "doxygen-line" => Some(Style::DoxygenLine),
            "qt-line" => Some(Style::QtLine),
            _ => None,
        }
    }

    /// Documentation styles carry structured `@tag` directives.
    pub fn is_doc(self) -> bool {
        !matches!(self, Style::Block | Style::Line)
    }
}

/// Structured directive inside a doc comment, e.g. `@param x The value`.
///
/// `argument` is populated only for directives whose first word names a
/// parameter or entity (`@param`, `@tparam`, `@def`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    pub text: String,
}

/// Declaration kind recognized by the associator heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    Function,
    Struct,
    Class,
    Enum,
    Union,
    Typedef,
    Macro,
    Namespace,
    Variable,
    Enumerator,
}

impl DeclKind {
    pub fn name(self) -> &'static str {
        match self {
            DeclKind::Function => "function",
            DeclKind::Struct => "struct",
            DeclKind::Class => "class",
            DeclKind::Enum => "enum",
            DeclKind::Union => "union",
            DeclKind::Typedef => "typedef",
            DeclKind::Macro => "macro",
            DeclKind::Namespace => "namespace",
            DeclKind::Variable => "variable",
            DeclKind::Enumerator => "enumerator",
        }
    }
}

/// A declaration head a comment documents.
///
/// `name` is absent for anonymous heads like `typedef struct {`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub kind: DeclKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub line: u32,
}

/// A single extracted comment.
///
/// `raw` is the exact source slice including delimiters; `text` is the
/// cleaned body with delimiters, `*` gutters, and directive lines removed.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub span: Span,
    /// 1-based line of the comment's first byte.
    pub line: u32,
    pub style: Style,
    pub raw: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<Declaration>,
}

impl Comment {
    /// First tag with the given name, if any.
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }
}

/// Extraction results for one source file: comments plus any errors.
///
/// One file's errors never abort a batch; partial results extracted
/// before an error are kept.
#[derive(Debug, Default, Serialize)]
pub struct FileReport {
    pub file: String,
    pub comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ExtractError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_names_round_trip() {
        for style in [
            Style::Block,
            Style::Line,
            Style::DoxygenBlock,
            Style::QtBlock,
            Style::DoxygenLine,
            Style::QtLine,
        ] {
            assert_eq!(Style::from_name(style.name()), Some(style));
        }
        assert_eq!(Style::from_name("banner"), None);
    }

    #[test]
    fn doc_styles() {
        assert!(Style::DoxygenBlock.is_doc());
        assert!(Style::QtLine.is_doc());
        assert!(!Style::Block.is_doc());
        assert!(!Style::Line.is_doc());
    }

    #[test]
    fn span_len() {
        assert_eq!(Span::new(2, 7).len(), 5);
    }
}
