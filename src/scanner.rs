//! Character-level scanner — splits a source buffer into code and comment
//! spans.
//!
//! Implements the C/C++ lexical rules that matter for comment extraction:
//!
//! - `/* ... */` does not nest; the comment ends at the first `*/`
//! - `// ...` runs to end of line (the newline stays with the code)
//! - string and character literals suppress comment openers
//! - preprocessor-disabled regions (`#if 0`) are ordinary text
//!
//! The scanner yields adjacent, non-overlapping spans in buffer order, so
//! concatenating them reproduces the input byte-for-byte.

use crate::error::ExtractError;
use crate::model::Span;

/// Delimiter family that opened a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delim {
    /// `/* ... */`
    Block,
    /// `// ...` to end of line
    Line,
}

/// Role of a raw span within the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    Code,
    Comment(Delim),
}

/// A contiguous region of the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSpan {
    pub kind: RawKind,
    pub span: Span,
}

/// Single-pass scanner over an immutable source buffer.
///
/// Iterates `Result<RawSpan, ExtractError>`; after yielding a
/// `MalformedComment` error the iterator is exhausted, leaving the spans
/// already produced as the file's partial result.
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Scanner {
            src,
            pos: 0,
            failed: false,
        }
    }

    fn at_comment(&self, i: usize) -> bool {
        let b = self.src.as_bytes();
        b[i] == b'/' && i + 1 < b.len() && (b[i + 1] == b'/' || b[i + 1] == b'*')
    }

    /// Advance through code until the next comment opener outside a string
    /// or character literal. An unclosed quote is abandoned at end of line
    /// so a stray quote cannot swallow the rest of the file.
    fn code_span(&mut self) -> RawSpan {
        let b = self.src.as_bytes();
        let start = self.pos;
        let mut i = start;
        let mut quote: Option<u8> = None;
        while i < b.len() {
            match quote {
                Some(q) => match b[i] {
                    // Skip the escaped byte; a backslash-newline keeps the
                    // literal open across the line break.
                    b'\\' => i += 1,
                    b'\n' => quote = None,
                    c if c == q => quote = None,
                    _ => {}
                },
                None => match b[i] {
                    b'"' => quote = Some(b'"'),
                    b'\'' => quote = Some(b'\''),
                    b'/' if self.at_comment(i) => break,
                    _ => {}
                },
            }
            i += 1;
        }
        self.pos = i;
        RawSpan {
            kind: RawKind::Code,
            span: Span::new(start, i),
        }
    }

    fn line_comment(&mut self) -> RawSpan {
        let start = self.pos;
        let end = match self.src[start..].find('\n') {
            Some(off) => start + off,
            None => self.src.len(),
        };
        self.pos = end;
        RawSpan {
            kind: RawKind::Comment(Delim::Line),
            span: Span::new(start, end),
        }
    }

    fn block_comment(&mut self) -> Result<RawSpan, ExtractError> {
        let start = self.pos;
        match self.src[start + 2..].find("*/") {
            Some(off) => {
                let end = start + 2 + off + 2;
                self.pos = end;
                Ok(RawSpan {
                    kind: RawKind::Comment(Delim::Block),
                    span: Span::new(start, end),
                })
            }
            None => {
                self.failed = true;
                Err(ExtractError::MalformedComment {
                    offset: start,
                    line: line_at(self.src, start),
                })
            }
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<RawSpan, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.src.len() {
            return None;
        }
        let b = self.src.as_bytes();
        let i = self.pos;
        if b[i] == b'/' && i + 1 < b.len() {
            if b[i + 1] == b'*' {
                return Some(self.block_comment());
            }
            if b[i + 1] == b'/' {
                return Some(Ok(self.line_comment()));
            }
        }
        Some(Ok(self.code_span()))
    }
}

/// 1-based line containing `offset`.
fn line_at(src: &str, offset: usize) -> u32 {
    src.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count() as u32
        + 1
}

/// Byte offsets of line starts, for offset-to-line lookups.
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(src: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in src.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        LineIndex { starts }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        match self.starts.binary_search(&offset) {
            Ok(i) => i as u32 + 1,
            Err(i) => i as u32,
        }
    }

    /// Byte offset where the 1-based `line` starts.
    pub fn line_start(&self, line: u32) -> usize {
        self.starts[line as usize - 1]
    }
}
