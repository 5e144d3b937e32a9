//! Protocol errors

use core::fmt;

/// Errors raised while interpreting an endpoint response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Endpoint answered with a status other than 200
    Status(u16),
    /// Body is not valid UTF-8
    InvalidUtf8,
    /// Body is not the expected JSON document
    Json {
        kind: JsonErrorKind,
        line: usize,
        column: usize,
    },
}

/// Coarse classification of a JSON decoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JsonErrorKind {
    /// Not syntactically valid JSON
    Syntax,
    /// Valid JSON of the wrong shape (e.g. a bare number, or a number in the array)
    Data,
    /// Body ended in the middle of a value
    Eof,
    /// Reader failure
    Io,
}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let kind = match e.classify() {
            Category::Syntax => JsonErrorKind::Syntax,
            Category::Data => JsonErrorKind::Data,
            Category::Eof => JsonErrorKind::Eof,
            Category::Io => JsonErrorKind::Io,
        };

        ProtocolError::Json {
            kind,
            line: e.line(),
            column: e.column(),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Status(code) => write!(f, "unexpected HTTP status {}", code),
            ProtocolError::InvalidUtf8 => f.write_str("response body is not UTF-8"),
            ProtocolError::Json { kind, line, column } => {
                write!(f, "JSON {:?} error at {}:{}", kind, line, column)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_classification() {
        let err = serde_json::from_str::<serde_json::Value>("[\"a\",").unwrap_err();
        match ProtocolError::from(err) {
            ProtocolError::Json { kind, .. } => assert_eq!(kind, JsonErrorKind::Eof),
            other => panic!("Wrong error: {:?}", other),
        }

        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        match ProtocolError::from(err) {
            ProtocolError::Json { kind, line, column } => {
                assert_eq!(kind, JsonErrorKind::Syntax);
                assert_eq!(line, 1);
                assert_eq!(column, 1);
            }
            other => panic!("Wrong error: {:?}", other),
        }
    }

    #[test]
    fn test_display_status() {
        let text = format!("{}", ProtocolError::Status(503));
        assert_eq!(text, "unexpected HTTP status 503");
    }
}
