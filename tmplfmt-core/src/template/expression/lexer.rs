//! Token definitions for embedded host-language expressions
//!
//! The tokens are defined using the logos derive macro. Whitespace is skipped, so
//! the formatter only ever sees significant tokens and re-spaces them itself.

use logos::Logos;

use super::SyntaxError;

/// All tokens the expression formatter understands
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Literals
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    #[regex(r"'([^'\\]|\\.)*'")]
    Charlist,
    #[regex(r"~[a-zA-Z](/([^/\\\n]|\\.)*/|\(([^)\\\n]|\\.)*\)|\[([^\]\\\n]|\\.)*\]|\{([^}\\\n]|\\.)*\}|\|([^|\\\n]|\\.)*\|)[a-zA-Z]*")]
    Sigil,
    #[regex(r"0x[0-9A-Fa-f_]+")]
    #[regex(r"0b[01_]+")]
    #[regex(r"0o[0-7_]+")]
    BasedInteger,
    #[regex(r"[0-9][0-9_]*")]
    Integer,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Float,

    // Names
    /// `key:` in keyword lists and maps
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*[?!]?:")]
    #[regex(r#""([^"\\]|\\.)*":"#)]
    KeywordKey,
    #[regex(r":[A-Za-z_][A-Za-z0-9_]*[?!]?")]
    #[regex(r#":"([^"\\]|\\.)*""#)]
    Atom,
    /// `@name` template assigns
    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*")]
    Assign,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*[?!]?")]
    Identifier,

    #[regex(r"#[^\n]*")]
    Comment,

    // Delimiters
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("%{")]
    OpenMap,
    #[token("%")]
    Percent,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("..")]
    Range,
    #[token("&")]
    Capture,

    // Operators
    #[token("===")]
    #[token("!==")]
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("&&")]
    #[token("||")]
    #[token("|>")]
    #[token("<>")]
    #[token("++")]
    #[token("--")]
    #[token("->")]
    #[token("<-")]
    #[token("=>")]
    #[token("=~")]
    #[token("::")]
    #[token("\\\\")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("<")]
    #[token(">")]
    #[token("=")]
    #[token("|")]
    #[token("!")]
    #[token("^")]
    Operator,
}

/// Words that behave like binary operators.
pub const WORD_OPERATORS: &[&str] = &["and", "or", "in", "when"];

impl Token {
    pub fn is_open(self) -> bool {
        matches!(
            self,
            Token::OpenParen | Token::OpenBracket | Token::OpenBrace | Token::OpenMap
        )
    }

    pub fn is_close(self) -> bool {
        matches!(
            self,
            Token::CloseParen | Token::CloseBracket | Token::CloseBrace
        )
    }

    /// Closing delimiter expected for an opening one.
    pub fn closing(self) -> Option<Token> {
        match self {
            Token::OpenParen => Some(Token::CloseParen),
            Token::OpenBracket => Some(Token::CloseBracket),
            Token::OpenBrace | Token::OpenMap => Some(Token::CloseBrace),
            _ => None,
        }
    }
}

/// A token with its canonical source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub text: String,
    /// Byte offset into the fragment
    pub offset: usize,
}

impl Lexeme {
    pub fn is_word_operator(&self) -> bool {
        self.token == Token::Identifier && WORD_OPERATORS.contains(&self.text.as_str())
    }

    /// Whether an expression can end with this token (so a following operator is binary).
    pub fn ends_operand(&self) -> bool {
        match self.token {
            Token::Identifier => !self.is_word_operator() && self.text != "not",
            Token::String
            | Token::Charlist
            | Token::Sigil
            | Token::BasedInteger
            | Token::Integer
            | Token::Float
            | Token::Atom
            | Token::Assign => true,
            token => token.is_close(),
        }
    }
}

/// Tokenize `code`, canonicalizing literal spellings.
pub fn tokenize(code: &str) -> Result<Vec<Lexeme>, SyntaxError> {
    let mut lexer = Token::lexer(code);
    let mut lexemes = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = result.map_err(|_| {
            SyntaxError::new(format!("unexpected `{}`", &code[span.clone()]), span.start)
        })?;
        let text = match token {
            Token::Integer => group_digits(lexer.slice()),
            _ => lexer.slice().to_string(),
        };
        lexemes.push(Lexeme {
            token,
            text,
            offset: span.start,
        });
    }
    Ok(lexemes)
}

/// Canonical decimal integer: underscores dropped, then re-inserted every three
/// digits for numbers of six digits or more.
pub fn group_digits(literal: &str) -> String {
    let digits: String = literal.chars().filter(|c| *c != '_').collect();
    if digits.len() < 6 {
        return digits;
    }
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('_');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(code: &str) -> Vec<Token> {
        tokenize(code)
            .unwrap()
            .into_iter()
            .map(|lexeme| lexeme.token)
            .collect()
    }

    #[test]
    fn test_keyword_list() {
        assert_eq!(
            tokens("foo:   bar, baz: 1"),
            vec![
                Token::KeywordKey,
                Token::Identifier,
                Token::Comma,
                Token::KeywordKey,
                Token::Integer,
            ]
        );
    }

    #[test]
    fn test_assigns_atoms_and_maps() {
        assert_eq!(
            tokens("%{@a => :b}"),
            vec![
                Token::OpenMap,
                Token::Assign,
                Token::Operator,
                Token::Atom,
                Token::CloseBrace,
            ]
        );
    }

    #[test]
    fn test_range_is_not_two_dots() {
        assert_eq!(
            tokens("1..10"),
            vec![Token::Integer, Token::Range, Token::Integer]
        );
        assert_eq!(tokens("1.5"), vec![Token::Float]);
    }

    #[test]
    fn test_strings_keep_escapes() {
        let lexemes = tokenize(r#""a \" b""#).unwrap();
        assert_eq!(lexemes.len(), 1);
        assert_eq!(lexemes[0].text, r#""a \" b""#);
    }

    #[test]
    fn test_unknown_character_is_an_error() {
        let err = tokenize("a $ b").unwrap_err();
        assert_eq!(err.offset, 2);
        assert!(err.message.contains("`$`"));
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        assert!(tokenize("\"abc").is_err());
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("123"), "123");
        assert_eq!(group_digits("12345"), "12345");
        assert_eq!(group_digits("123456"), "123_456");
        assert_eq!(group_digits("1000000"), "1_000_000");
        assert_eq!(group_digits("1_0000_00"), "1_000_000");
    }
}
