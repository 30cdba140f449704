use std::fmt;

use crate::error::AnalyzeError;

/// User text that passed validation: trimmed at both ends and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Trim `input` and reject it if nothing is left.
    ///
    /// Trimming matches the browser's `String.prototype.trim`: Unicode
    /// whitespace plus the byte-order mark, but not NEL (U+0085), which
    /// JavaScript does not treat as whitespace. Inner whitespace and
    /// newlines are kept.
    pub fn parse(input: &str) -> Result<Self, AnalyzeError> {
        let trimmed = input.trim_matches(is_trimmed);
        if trimmed.is_empty() {
            return Err(AnalyzeError::Validation);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_trimmed(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_only_is_rejected() {
        for input in ["", " ", "\t", "\n\n", "  \r\n  ", "\u{feff}", "\u{3000}"] {
            let err = Query::parse(input).unwrap_err();
            assert!(err.is_validation(), "{:?} should be rejected", input);
        }
    }

    #[test]
    fn test_outer_whitespace_is_trimmed() {
        let query = Query::parse("  why am I stuck?\n").unwrap();
        assert_eq!(query.as_str(), "why am I stuck?");
    }

    #[test]
    fn test_inner_whitespace_is_preserved() {
        let query = Query::parse("\tfirst  line\nsecond line  ").unwrap();
        assert_eq!(query.as_str(), "first  line\nsecond line");
        assert_eq!(query.to_string(), "first  line\nsecond line");
    }

    #[test]
    fn test_next_line_char_is_not_trimmed() {
        let query = Query::parse("\u{85}").unwrap();
        assert_eq!(query.as_str(), "\u{85}");

        let query = Query::parse(" \u{85}ask\u{85} ").unwrap();
        assert_eq!(query.as_str(), "\u{85}ask\u{85}");
    }
}
