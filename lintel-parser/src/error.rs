//! Parser error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid matcher pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("no token matches at line {line}, column {column}")]
    Lex {
        offset: usize,
        line: usize,
        column: usize,
    },

    #[error("grammar rejected input at offset {offset}")]
    Rejected { offset: usize },

    #[error("unconsumed input at offset {offset} ({found})")]
    TrailingInput { offset: usize, found: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Byte offset of the failure, when it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Lex { offset, .. }
            | ParseError::Rejected { offset }
            | ParseError::TrailingInput { offset, .. } => Some(*offset),
            ParseError::Pattern(_) | ParseError::Io(_) => None,
        }
    }
}

/// Errors from typed access into a parsed desktop entry.
#[derive(Debug, Error, PartialEq)]
pub enum DesktopEntryError {
    #[error("no group named [{0}]")]
    MissingGroup(String),

    #[error("key {0} not present")]
    MissingKey(String),

    #[error("key {key} holds a {found} value, not a {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}
