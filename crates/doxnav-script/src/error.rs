//! Error types for reading navigation tree scripts.

use doxnav_tree::Position;

/// What went wrong while tokenizing or parsing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("invalid escape `{0}`")]
    InvalidEscape(String),
    #[error("integer literal too large")]
    IntegerOverflow,
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: &'static str,
        /// Description of the token found instead.
        found: String,
    },
    #[error("literal nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Syntax error with its 1-based source location.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Line of the offending token.
    pub line: usize,
    /// Column of the offending token.
    pub column: usize,
}

/// Script is syntactically valid but does not have the expected shape.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Required declaration is absent.
    #[error("missing declaration `var {0}`")]
    Missing(String),
    /// Declaration holds the wrong kind of value.
    #[error("`{name}` must be {expected}")]
    WrongType {
        /// Declaration name.
        name: String,
        /// Expected value kind.
        expected: &'static str,
    },
    /// Tree entry is malformed.
    #[error("entry {position} {reason}")]
    Entry {
        /// Position of the malformed entry.
        position: Position,
        /// What is wrong with it.
        reason: String,
    },
}

/// Error loading a script: either syntax or shape.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}
