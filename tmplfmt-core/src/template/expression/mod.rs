//! Boundary to the embedded-expression formatter
//!
//! The renderer hands every embedded code fragment (child interpolations, attribute
//! values, block headers) to an [`ExpressionFormatter`]. Any implementation works as
//! long as it is pure and idempotent and reports invalid code as a [`SyntaxError`].
//! The renderer re-indents multi-line results itself.
//!
//! [`CanonicalFormatter`] is the built-in implementation: a token-level formatter
//! that normalizes spacing, canonicalizes integer literals and breaks overlong
//! bracket groups one element per line.

pub mod canonical;
pub mod lexer;
pub mod literal;

pub use canonical::CanonicalFormatter;

use std::fmt;

/// Formats a code fragment of the host language
pub trait ExpressionFormatter: Send + Sync {
    /// Return the canonical text for `code`, breaking lines to fit `line_length`
    /// where the language allows it.
    fn format(&self, code: &str, line_length: usize) -> Result<String, SyntaxError>;
}

/// Code rejected by an expression formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// Byte offset into the fragment
    pub offset: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        SyntaxError {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at offset {})", self.message, self.offset)
    }
}

impl std::error::Error for SyntaxError {}
