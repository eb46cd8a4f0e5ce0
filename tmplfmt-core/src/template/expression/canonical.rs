//! Built-in token-level expression formatter
//!
//! The fragment is tokenized, bracket groups are matched into a tree and the tokens
//! are joined back with canonical spacing. When the joined line does not fit, the
//! last bracket group on the line is broken open, one element per line, and the
//! same rule is applied to each element.

use super::lexer::{tokenize, Lexeme, Token};
use super::{ExpressionFormatter, SyntaxError};
use crate::template::options::indentation;

/// Default [`ExpressionFormatter`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalFormatter;

impl CanonicalFormatter {
    pub fn new() -> Self {
        CanonicalFormatter
    }
}

impl ExpressionFormatter for CanonicalFormatter {
    fn format(&self, code: &str, line_length: usize) -> Result<String, SyntaxError> {
        let lexemes = tokenize(code)?;
        if let Some(position) = lexemes.iter().position(|l| l.token == Token::Comment) {
            if position + 1 != lexemes.len() {
                return Err(SyntaxError::new(
                    "comments are only supported at the end of an expression",
                    lexemes[position].offset,
                ));
            }
        }
        let items = group(lexemes)?;
        Ok(layout(&items, 0, line_length))
    }
}

#[derive(Debug, Clone)]
enum Item {
    Leaf(Lexeme),
    Group {
        open: Lexeme,
        elements: Vec<Vec<Item>>,
        close: Lexeme,
    },
}

struct Frame {
    open: Option<Lexeme>,
    elements: Vec<Vec<Item>>,
    current: Vec<Item>,
}

impl Frame {
    fn new(open: Option<Lexeme>) -> Self {
        Frame {
            open,
            elements: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Elements of the group; a trailing comma leaves `current` empty and is dropped.
    fn finish(mut self) -> Vec<Vec<Item>> {
        if !self.current.is_empty() {
            self.elements.push(self.current);
        }
        self.elements
    }
}

fn group(lexemes: Vec<Lexeme>) -> Result<Vec<Item>, SyntaxError> {
    let mut stack = vec![Frame::new(None)];
    for lexeme in lexemes {
        if lexeme.token.is_open() {
            stack.push(Frame::new(Some(lexeme)));
        } else if lexeme.token.is_close() {
            let popped = stack
                .pop()
                .and_then(|mut frame| frame.open.take().map(|open| (open, frame)));
            let Some((open, frame)) = popped else {
                return Err(SyntaxError::new(
                    format!("unexpected `{}`", lexeme.text),
                    lexeme.offset,
                ));
            };
            if open.token.closing() != Some(lexeme.token) {
                return Err(SyntaxError::new(
                    format!("`{}` does not close `{}`", lexeme.text, open.text),
                    lexeme.offset,
                ));
            }
            let elements = frame.finish();
            if let Some(parent) = stack.last_mut() {
                parent.current.push(Item::Group {
                    open,
                    elements,
                    close: lexeme,
                });
            }
        } else if lexeme.token == Token::Comma && stack.len() > 1 {
            if let Some(frame) = stack.last_mut() {
                if frame.current.is_empty() {
                    return Err(SyntaxError::new("unexpected `,`", lexeme.offset));
                }
                let element = std::mem::take(&mut frame.current);
                frame.elements.push(element);
            }
        } else if let Some(frame) = stack.last_mut() {
            frame.current.push(Item::Leaf(lexeme));
        }
    }

    if stack.len() > 1 {
        let open = stack.last().and_then(|frame| frame.open.as_ref());
        let (text, offset) = open.map_or(("", 0), |l| (l.text.as_str(), l.offset));
        return Err(SyntaxError::new(format!("unclosed `{}`", text), offset));
    }
    Ok(stack.pop().map(|root| root.current).unwrap_or_default())
}

fn flatten(items: &[Item], out: &mut Vec<Lexeme>) {
    for item in items {
        match item {
            Item::Leaf(lexeme) => out.push(lexeme.clone()),
            Item::Group {
                open,
                elements,
                close,
            } => {
                out.push(open.clone());
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        out.push(comma());
                    }
                    flatten(element, out);
                }
                out.push(close.clone());
            }
        }
    }
}

fn comma() -> Lexeme {
    Lexeme {
        token: Token::Comma,
        text: ",".to_string(),
        offset: 0,
    }
}

fn flat(items: &[Item]) -> String {
    let mut lexemes = Vec::new();
    flatten(items, &mut lexemes);
    join(&lexemes)
}

/// Join tokens on one line with canonical spacing.
fn join(lexemes: &[Lexeme]) -> String {
    let mut out = String::new();
    let mut prev_unary = false;
    for (index, lexeme) in lexemes.iter().enumerate() {
        if index > 0 && space_between(lexemes, index, prev_unary) {
            out.push(' ');
        }
        prev_unary = lexeme.token == Token::Operator
            && !lexemes[..index].last().is_some_and(Lexeme::ends_operand);
        out.push_str(&lexeme.text);
    }
    out
}

fn space_between(lexemes: &[Lexeme], index: usize, prev_unary: bool) -> bool {
    use Token::*;

    let prev = &lexemes[index - 1];
    let next = &lexemes[index];
    let before_prev = index.checked_sub(2).map(|i| &lexemes[i]);

    match (prev.token, next.token) {
        (_, Comma) => false,
        (_, t) if t.is_close() => false,
        (_, Comment) => true,
        (t, _) if t.is_open() => false,
        (Comma, _) | (KeywordKey, _) => true,
        (Dot, _) | (_, Dot) | (Range, _) | (_, Range) => false,
        // `& &1` would read back as `&&`
        (Capture, Capture) => true,
        (Percent, _) | (Capture, _) => false,
        // `&fun/2` and `&Mod.fun/2`
        (Identifier, Operator) if next.text == "/" && captured_name(lexemes, index) => false,
        (Operator, Integer) if prev.text == "/" && captured_name(lexemes, index - 1) => false,
        // `- -1` would read back as `--`
        (Operator, Operator) if prev_unary => true,
        (Operator, _) if prev_unary => false,
        (Operator, _) | (_, Operator) => true,
        (_, OpenParen) => {
            !((prev.token == Identifier && !prev.is_word_operator()) || prev.token.is_close())
        }
        (_, OpenBracket) => !prev.ends_operand(),
        (Identifier, OpenBrace) => !before_prev.is_some_and(|l| l.token == Percent),
        _ => true,
    }
}

/// Whether the `/` at `slash` ends a function name captured with `&`.
fn captured_name(lexemes: &[Lexeme], slash: usize) -> bool {
    let name = lexemes[..slash]
        .iter()
        .rev()
        .take_while(|l| matches!(l.token, Token::Identifier | Token::Dot))
        .count();
    name > 0
        && slash > name
        && lexemes[slash - name - 1].token == Token::Capture
}

fn layout(items: &[Item], depth: usize, line_length: usize) -> String {
    let line = flat(items);
    if indentation(depth).len() + line.chars().count() <= line_length {
        return line;
    }
    let breakable = items.iter().rposition(|item| {
        matches!(item, Item::Group { elements, .. } if !elements.is_empty())
    });
    let Some(position) = breakable else {
        return line;
    };
    let Item::Group {
        open,
        elements,
        close,
    } = &items[position]
    else {
        return line;
    };

    let mut head = Vec::new();
    flatten(&items[..position], &mut head);
    head.push(open.clone());
    let mut tail = vec![close.clone()];
    flatten(&items[position + 1..], &mut tail);

    let inner = indentation(depth + 1);
    let body = elements
        .iter()
        .map(|element| format!("{}{}", inner, layout(element, depth + 1, line_length)))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        "{}\n{}\n{}{}",
        join(&head),
        body,
        indentation(depth),
        join(&tail)
    )
}
