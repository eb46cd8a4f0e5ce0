//! Surrounding whitespace normalization stage
//!
//! An element with a line break on one side gets one on the other side too, so it
//! never dangles attached to the text that follows (or precedes) it:
//!
//! - `Newline, Element, Space` -> `Newline, Element, Newline`
//! - `Space, Element, Newline` -> `Newline, Element, Newline`

use crate::template::ast::Node;
use crate::template::error::FormatResult;
use crate::template::transforms::traversal::rewrite_lists;
use crate::template::transforms::Runnable;

pub struct NormalizeSurroundingWhitespace;

impl NormalizeSurroundingWhitespace {
    pub fn new() -> Self {
        NormalizeSurroundingWhitespace
    }
}

impl Default for NormalizeSurroundingWhitespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for NormalizeSurroundingWhitespace {
    fn run(&self, input: Vec<Node>) -> FormatResult<Vec<Node>> {
        log::trace!("NormalizeSurroundingWhitespace");
        rewrite_lists(input, "NormalizeSurroundingWhitespace", &normalize)
    }
}

fn normalize(mut nodes: Vec<Node>) -> Vec<Node> {
    for index in 0..nodes.len() {
        if !nodes[index].is_element() {
            continue;
        }
        let before = index.checked_sub(1);
        let after = (index + 1 < nodes.len()).then_some(index + 1);

        let newline_before = before.is_some_and(|i| nodes[i].is_newline());
        let newline_after = after.is_some_and(|i| nodes[i].is_newline());

        match (before, after) {
            (_, Some(after)) if newline_before && nodes[after].is_space() => {
                nodes[after] = Node::newline();
            }
            (Some(before), _) if newline_after && nodes[before].is_space() => {
                nodes[before] = Node::newline();
            }
            _ => {}
        }
    }
    nodes
}
