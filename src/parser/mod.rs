//! Parser module — scan, classify, and associate comments for one file.

pub mod associate;
pub mod classify;
pub mod tags;

use crate::error::ExtractError;
use crate::model::FileReport;
use crate::scanner::{LineIndex, RawSpan, Scanner};

/// File extensions recognized as C/C++ sources.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["c", "h", "cc", "hh", "cpp", "hpp", "cxx", "hxx"];

/// Extract comments from raw file bytes.
///
/// Invalid UTF-8 yields a report with zero comments and a single
/// `Encoding` error; the batch keeps going.
pub fn parse_bytes(file: &str, bytes: &[u8]) -> FileReport {
    match std::str::from_utf8(bytes) {
        Ok(src) => parse_source(file, src),
        Err(e) => FileReport {
            file: file.to_string(),
            comments: Vec::new(),
            errors: vec![ExtractError::Encoding {
                valid_up_to: e.valid_up_to(),
            }],
        },
    }
}

/// Extract comments from a UTF-8 source buffer.
///
/// Scanning stops at the first malformed comment; everything extracted
/// before it is kept as a partial result alongside the error.
pub fn parse_source(file: &str, src: &str) -> FileReport {
    let mut spans: Vec<RawSpan> = Vec::new();
    let mut errors = Vec::new();
    for item in Scanner::new(src) {
        match item {
            Ok(span) => spans.push(span),
            Err(err) => {
                errors.push(err);
                break;
            }
        }
    }

    let lines = LineIndex::new(src);
    let mut comments = classify::classify(src, &spans, &lines);
    associate::associate(src, &spans, &lines, &mut comments);

    FileReport {
        file: file.to_string(),
        comments,
        errors,
    }
}
