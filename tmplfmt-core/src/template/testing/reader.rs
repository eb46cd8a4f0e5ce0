//! Template source reader
//!
//! Recursive descent over the surface syntax:
//!
//! - elements `<tag attr="v" attr={{ e }} attr=false attr=12 attr>`, `<tag />`,
//!   `</tag>` and void elements without a closing tag;
//! - interpolations `{{ code }}`;
//! - comments `<!-- public -->` and `{{!-- private --}}`;
//! - blocks `{#name expr}` ... `{/name}` with sub-blocks `{#else}`,
//!   `{#elseif expr}` and `{#match expr}`.
//!
//! Text is kept raw. Macro element bodies (`<#Raw>`) are read as a single text
//! child without looking inside.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::template::ast::{
    AttrValue, Attribute, Block, Element, Node, Segment, Visibility, DEFAULT_SUB_BLOCK,
};

/// Block names that continue the enclosing block instead of opening a new one.
pub const SUB_BLOCKS: &[&str] = &["else", "elseif", "match"];

static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?[A-Za-z][A-Za-z0-9_.:-]*").expect("valid regex"));
static ATTR_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^[^\s=>/"']+"#).expect("valid regex"));
static BLOCK_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("valid regex"));
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9][0-9_]*$").expect("valid regex"));

/// Source the reader could not make sense of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    pub message: String,
    /// Byte offset into the source
    pub offset: usize,
}

impl ReadError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        ReadError {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

impl std::error::Error for ReadError {}

/// Read template source into a tree.
pub fn read(source: &str) -> Result<Vec<Node>, ReadError> {
    let mut reader = Reader { source, pos: 0 };
    let (nodes, stop) = reader.read_nodes()?;
    match stop {
        Stop::Eof => Ok(nodes),
        Stop::CloseTag { name, offset } => {
            Err(ReadError::new(format!("unexpected `</{}>`", name), offset))
        }
        Stop::CloseBlock { name, offset } => {
            Err(ReadError::new(format!("unexpected `{{/{}}}`", name), offset))
        }
        Stop::SubBlock { name, offset, .. } => Err(ReadError::new(
            format!("`{{#{}}}` outside of a block", name),
            offset,
        )),
    }
}

/// What ended a run of sibling nodes
enum Stop {
    Eof,
    CloseTag {
        name: String,
        offset: usize,
    },
    CloseBlock {
        name: String,
        offset: usize,
    },
    SubBlock {
        name: String,
        expr: Option<String>,
        offset: usize,
    },
}

struct Reader<'s> {
    source: &'s str,
    pos: usize,
}

impl<'s> Reader<'s> {
    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn read_nodes(&mut self) -> Result<(Vec<Node>, Stop), ReadError> {
        let mut nodes = Vec::new();
        let mut text = String::new();
        loop {
            let rest = self.rest();
            let start = self.pos;
            let Some(c) = rest.chars().next() else {
                flush(&mut text, &mut nodes);
                return Ok((nodes, Stop::Eof));
            };

            if rest.starts_with("{{!--") {
                flush(&mut text, &mut nodes);
                let body = self.read_until(start + 5, "--}}", "private comment")?;
                nodes.push(Node::comment(body, Visibility::Private));
            } else if rest.starts_with("{{") {
                flush(&mut text, &mut nodes);
                let code = self.read_code(start + 2, "}}")?;
                nodes.push(Node::expression(code));
            } else if rest.starts_with("<!--") {
                flush(&mut text, &mut nodes);
                let body = self.read_until(start + 4, "-->", "comment")?;
                nodes.push(Node::comment(body, Visibility::Public));
            } else if rest.starts_with("</") {
                flush(&mut text, &mut nodes);
                let name = self.read_closing(start + 2, '>')?;
                return Ok((nodes, Stop::CloseTag { name, offset: start }));
            } else if rest.starts_with("{/") {
                flush(&mut text, &mut nodes);
                let name = self.read_closing(start + 2, '}')?;
                return Ok((nodes, Stop::CloseBlock { name, offset: start }));
            } else if rest.starts_with("{#") {
                flush(&mut text, &mut nodes);
                let (name, expr) = self.read_block_header()?;
                if SUB_BLOCKS.contains(&name.as_str()) {
                    return Ok((
                        nodes,
                        Stop::SubBlock {
                            name,
                            expr,
                            offset: start,
                        },
                    ));
                }
                nodes.push(self.read_block(name, expr, start)?.into());
            } else if c == '<' && TAG_NAME.is_match(&rest[1..]) {
                flush(&mut text, &mut nodes);
                nodes.push(self.read_element()?.into());
            } else {
                text.push(c);
                self.pos += c.len_utf8();
            }
        }
    }

    /// Raw text from `from` up to `terminator`, leaving the reader after it.
    fn read_until(&mut self, from: usize, terminator: &str, what: &str) -> Result<String, ReadError> {
        let Some(length) = self.source[from..].find(terminator) else {
            return Err(ReadError::new(format!("unterminated {}", what), self.pos));
        };
        self.pos = from + length + terminator.len();
        Ok(self.source[from..from + length].to_string())
    }

    /// Embedded code from `from` up to `terminator` outside of strings and braces.
    fn read_code(&mut self, from: usize, terminator: &str) -> Result<String, ReadError> {
        let Some(length) = scan_code(&self.source[from..], terminator) else {
            return Err(ReadError::new("unterminated expression", self.pos));
        };
        self.pos = from + length + terminator.len();
        Ok(self.source[from..from + length].to_string())
    }

    /// Name of `</name>` or `{/name}`.
    fn read_closing(&mut self, from: usize, close: char) -> Result<String, ReadError> {
        let Some(length) = self.source[from..].find(close) else {
            return Err(ReadError::new("unterminated closing tag", self.pos));
        };
        self.pos = from + length + close.len_utf8();
        Ok(self.source[from..from + length].trim().to_string())
    }

    fn read_block_header(&mut self) -> Result<(String, Option<String>), ReadError> {
        let start = self.pos;
        self.pos += 2;
        let Some(name) = BLOCK_NAME.find(self.rest()) else {
            return Err(ReadError::new("expected a block name", self.pos));
        };
        let name = name.as_str().to_string();
        let from = self.pos + name.len();
        let Some(length) = scan_code(&self.source[from..], "}") else {
            return Err(ReadError::new(format!("unterminated `{{#{}`", name), start));
        };
        self.pos = from + length + 1;
        let expr = self.source[from..from + length].trim();
        let expr = (!expr.is_empty()).then(|| expr.to_string());
        Ok((name, expr))
    }

    fn read_block(
        &mut self,
        name: String,
        expr: Option<String>,
        offset: usize,
    ) -> Result<Block, ReadError> {
        let mut sub_blocks = Vec::new();
        let mut current = Block::new(DEFAULT_SUB_BLOCK, None);
        loop {
            let (children, stop) = self.read_nodes()?;
            current.children = children;
            match stop {
                Stop::SubBlock { name, expr, .. } => {
                    sub_blocks.push(current);
                    current = Block::new(name, expr.as_deref());
                }
                Stop::CloseBlock { name: closing, .. } if closing == name => {
                    sub_blocks.push(current);
                    break;
                }
                Stop::CloseBlock {
                    name: closing,
                    offset,
                } => {
                    return Err(ReadError::new(
                        format!("`{{/{}}}` does not close `{{#{}}}`", closing, name),
                        offset,
                    ))
                }
                Stop::CloseTag { name: tag, offset } => {
                    return Err(ReadError::new(
                        format!("unexpected `</{}>` inside `{{#{}}}`", tag, name),
                        offset,
                    ))
                }
                Stop::Eof => {
                    return Err(ReadError::new(format!("unclosed `{{#{}}}`", name), offset))
                }
            }
        }

        let mut block = Block::new(name, expr.as_deref());
        if sub_blocks.len() == 1 {
            block.children = sub_blocks.remove(0).children;
        } else {
            block = block.with_sub_blocks(sub_blocks);
        }
        Ok(block)
    }

    fn read_element(&mut self) -> Result<Element, ReadError> {
        let start = self.pos;
        self.pos += 1;
        let tag = TAG_NAME
            .find(self.rest())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        self.pos += tag.len();
        let mut element = Element::new(tag);

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(element);
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.is_empty() {
                return Err(ReadError::new(
                    format!("unterminated `<{}`", element.tag),
                    start,
                ));
            }
            let attribute = self.read_attribute()?;
            element.attributes.push(attribute);
        }

        if element.is_void() {
            return Ok(element);
        }
        if element.is_macro() {
            let closing = format!("</{}>", element.tag);
            let body = self.read_until(self.pos, &closing, "macro body")?;
            if !body.is_empty() {
                element.children.push(Node::Text(body));
            }
            return Ok(element);
        }

        let (children, stop) = self.read_nodes()?;
        match stop {
            Stop::CloseTag { name, .. } if name == element.tag => {
                element.children = children;
                Ok(element)
            }
            Stop::CloseTag { name, offset } => Err(ReadError::new(
                format!("`</{}>` does not close `<{}>`", name, element.tag),
                offset,
            )),
            Stop::CloseBlock { name, offset } => Err(ReadError::new(
                format!("unexpected `{{/{}}}` inside `<{}>`", name, element.tag),
                offset,
            )),
            Stop::SubBlock { name, offset, .. } => Err(ReadError::new(
                format!("unexpected `{{#{}}}` inside `<{}>`", name, element.tag),
                offset,
            )),
            Stop::Eof => Err(ReadError::new(format!("unclosed `<{}>`", element.tag), start)),
        }
    }

    fn read_attribute(&mut self) -> Result<Attribute, ReadError> {
        let start = self.pos;
        let Some(name) = ATTR_NAME.find(self.rest()) else {
            return Err(ReadError::new("expected an attribute name", start));
        };
        let name = name.as_str().to_string();
        self.pos += name.len();
        self.skip_whitespace();
        if !self.rest().starts_with('=') {
            return Ok(Attribute::new(name, AttrValue::BoolLiteral(true)));
        }
        self.pos += 1;
        self.skip_whitespace();

        let rest = self.rest();
        let value = if rest.starts_with("{{") {
            AttrValue::Expression(self.read_code(self.pos + 2, "}}")?)
        } else if let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
            self.read_quoted(quote)?
        } else {
            let length = rest
                .find(|c: char| c.is_whitespace() || c == '>')
                .unwrap_or(rest.len());
            let mut bare = &rest[..length];
            if let Some(stripped) = bare.strip_suffix('/') {
                if rest[length..].starts_with('>') {
                    bare = stripped;
                }
            }
            self.pos += bare.len();
            bare_value(bare, start)?
        };
        Ok(Attribute::new(name, value))
    }

    fn read_quoted(&mut self, quote: char) -> Result<AttrValue, ReadError> {
        let start = self.pos;
        let from = self.pos + 1;
        let mut index = from;
        loop {
            let rest = &self.source[index..];
            if rest.starts_with("{{") {
                let Some(length) = scan_code(&rest[2..], "}}") else {
                    return Err(ReadError::new("unterminated expression", index));
                };
                index += 2 + length + 2;
                continue;
            }
            match rest.chars().next() {
                Some(c) if c == quote => break,
                Some(c) => index += c.len_utf8(),
                None => return Err(ReadError::new("unterminated attribute value", start)),
            }
        }
        self.pos = index + 1;
        let value = &self.source[from..index];
        if value.contains("{{") {
            Ok(AttrValue::Mixed(segments(value)))
        } else {
            Ok(AttrValue::StringLiteral(value.to_string()))
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }
}

fn flush(text: &mut String, nodes: &mut Vec<Node>) {
    if !text.is_empty() {
        nodes.push(Node::Text(std::mem::take(text)));
    }
}

fn bare_value(bare: &str, offset: usize) -> Result<AttrValue, ReadError> {
    match bare {
        "true" => Ok(AttrValue::BoolLiteral(true)),
        "false" => Ok(AttrValue::BoolLiteral(false)),
        _ if INTEGER.is_match(bare) => bare
            .replace('_', "")
            .parse()
            .map(AttrValue::IntLiteral)
            .map_err(|_| ReadError::new(format!("integer `{}` out of range", bare), offset)),
        _ => Ok(AttrValue::StringLiteral(bare.to_string())),
    }
}

/// Split a quoted value with interpolations into segments.
fn segments(value: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = value;
    while let Some(open) = rest.find("{{") {
        if open > 0 {
            segments.push(Segment::StringLiteral(rest[..open].to_string()));
        }
        let code = &rest[open + 2..];
        let length = scan_code(code, "}}").unwrap_or(code.len());
        segments.push(Segment::Expression(code[..length].to_string()));
        rest = code.get(length + 2..).unwrap_or("");
    }
    if !rest.is_empty() {
        segments.push(Segment::StringLiteral(rest.to_string()));
    }
    segments
}

/// Byte length of the code before `terminator`, skipping nested braces and strings.
fn scan_code(code: &str, terminator: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut chars = code.char_indices();
    while let Some((index, c)) = chars.next() {
        if let Some(quote) = in_string {
            if c == '\\' {
                chars.next();
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        if depth == 0 && code[index..].starts_with(terminator) {
            return Some(index);
        }
        match c {
            '"' | '\'' => in_string = Some(c),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}
