//! Typed extraction errors, collected per file.

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced while extracting comments from a single file.
///
/// Every variant is attributable to one file; callers collect them in the
/// file's report and keep processing the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ExtractError {
    /// A `/*` with no matching `*/` before end of file. Scanning of the
    /// file stops at the opener; spans emitted before it remain valid.
    #[error("unterminated block comment starting at offset {offset} (line {line})")]
    MalformedComment { offset: usize, line: u32 },

    /// The input is not valid UTF-8. The file yields no comments.
    #[error("invalid UTF-8 sequence after byte {valid_up_to}")]
    Encoding { valid_up_to: usize },

    /// The file could not be read at all.
    #[error("failed to read file: {message}")]
    Read { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_names_offset_and_line() {
        let err = ExtractError::MalformedComment { offset: 42, line: 3 };
        assert_eq!(
            err.to_string(),
            "unterminated block comment starting at offset 42 (line 3)"
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let err = ExtractError::Encoding { valid_up_to: 7 };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"kind\":\"encoding\""));
        assert!(json.contains("\"valid_up_to\":7"));
    }
}
