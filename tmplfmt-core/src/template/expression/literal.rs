//! Attribute value helpers
//!
//! Attribute expressions are rendered more compactly than child interpolations:
//! simple literals drop the braces entirely (`disabled={{ true }}` becomes
//! `disabled`, `size={{ 3 }}` becomes `size=3`) and keyword lists or comma lists
//! are written without their surrounding brackets.

use super::lexer::{tokenize, Token};

/// A literal that can be written without interpolation braces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    /// Canonical integer text
    Integer(String),
    /// String contents, without the quotes
    String(String),
}

/// Recognize code consisting of exactly one plain literal.
///
/// Strings qualify only without escapes, `#{}` interpolation or `{{`, since
/// their contents are written into a quoted attribute as is and `{{` there
/// would read back as an interpolation.
pub fn parse_literal(code: &str) -> Option<Literal> {
    let lexemes = tokenize(code).ok()?;
    let [lexeme] = lexemes.as_slice() else {
        return None;
    };
    match lexeme.token {
        Token::Identifier if lexeme.text == "true" => Some(Literal::Bool(true)),
        Token::Identifier if lexeme.text == "false" => Some(Literal::Bool(false)),
        Token::Integer => Some(Literal::Integer(lexeme.text.clone())),
        Token::String => {
            let inner = &lexeme.text[1..lexeme.text.len() - 1];
            if inner.contains('\\') || inner.contains("#{") || inner.contains("{{") {
                None
            } else {
                Some(Literal::String(inner.to_string()))
            }
        }
        _ => None,
    }
}

/// Whether `code` is a bare keyword list or a top-level comma list, which the
/// expression formatter only accepts inside brackets.
pub fn has_invisible_brackets(code: &str) -> bool {
    let Ok(lexemes) = tokenize(code) else {
        return false;
    };
    if lexemes.first().is_some_and(|l| l.token == Token::KeywordKey) {
        return true;
    }
    let mut depth = 0usize;
    for lexeme in &lexemes {
        if lexeme.token.is_open() {
            depth += 1;
        } else if lexeme.token.is_close() {
            depth = depth.saturating_sub(1);
        } else if lexeme.token == Token::Comma && depth == 0 {
            return true;
        }
    }
    false
}

/// Remove the brackets added around an invisible-bracket list after formatting.
pub fn strip_invisible_brackets(formatted: &str) -> String {
    let Some(inner) = formatted
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return formatted.to_string();
    };
    if !inner.contains('\n') {
        return inner.to_string();
    }
    inner
        .trim_matches('\n')
        .lines()
        .map(|line| line.strip_prefix(crate::template::options::TAB).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}
