//! Indentation stage
//!
//! Terminal layout pass. Every `Newline` is followed by an instruction telling the
//! renderer how far to indent the next line:
//!
//! - `Newline, Newline` -> `Newline, Newline, Indent` (the blank line itself carries
//!   no indentation)
//! - a `Newline` ending its list -> `Newline, IndentOneLess` (the closing tag sits one
//!   level left of the children)
//! - any other `Newline` -> `Newline, Indent`
//!
//! Markers are relative: the renderer resolves them against the depth of the list
//! they appear in.

use crate::template::ast::{Block, Node, Whitespace};
use crate::template::error::{FormatError, FormatResult};
use crate::template::transforms::Runnable;

const STAGE: &str = "Indentation";

pub struct Indentation;

impl Indentation {
    pub fn new() -> Self {
        Indentation
    }
}

impl Default for Indentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for Indentation {
    fn run(&self, input: Vec<Node>) -> FormatResult<Vec<Node>> {
        log::trace!("Indentation");
        indent_list(input)
    }
}

fn indent_list(nodes: Vec<Node>) -> FormatResult<Vec<Node>> {
    let mut indented = Vec::with_capacity(nodes.len() * 2);
    let mut iter = nodes.into_iter().peekable();
    while let Some(node) = iter.next() {
        match node {
            Node::Whitespace(Whitespace::Newline) => {
                indented.push(Node::newline());
                match iter.peek() {
                    // The last newline of a run carries the indentation.
                    Some(next) if next.is_newline() => {}
                    Some(_) => indented.push(Node::Whitespace(Whitespace::Indent)),
                    None => indented.push(Node::Whitespace(Whitespace::IndentOneLess)),
                }
            }
            Node::Whitespace(ws) if !ws.is_coarse() => {
                return Err(FormatError::invariant(
                    STAGE,
                    format!("{:?} marker met before indentation", ws),
                ));
            }
            Node::Element(mut element) if !element.is_verbatim() => {
                element.children = indent_list(element.children)?;
                indented.push(Node::Element(element));
            }
            Node::Block(block) => indented.push(Node::Block(indent_block(block)?)),
            other => indented.push(other),
        }
    }
    Ok(indented)
}

fn indent_block(mut block: Block) -> FormatResult<Block> {
    block.children = indent_list(block.children)?;
    if block.has_sub_blocks && block.is_case() {
        hoist_case_dedent(&mut block);
    }
    Ok(block)
}

/// `case` exception.
///
/// Match arms are nested one level deeper than the `case` itself, so the dedent
/// ending the last arm must bring the closing `{/case}` back two levels. The last
/// arm keeps its trailing `Newline`; its `IndentOneLess` moves to the end of the
/// `case` block's own list, where the renderer resolves it one level shallower.
fn hoist_case_dedent(block: &mut Block) {
    let last_arm = block.children.iter_mut().rev().find_map(|node| match node {
        Node::Block(arm) => Some(arm),
        _ => None,
    });
    let Some(arm) = last_arm else {
        return;
    };
    let ends_with_dedent = matches!(
        arm.children.last(),
        Some(Node::Whitespace(Whitespace::IndentOneLess))
    );
    if ends_with_dedent {
        arm.children.pop();
        block
            .children
            .push(Node::Whitespace(Whitespace::IndentOneLess));
    }
}
