//! Edge whitespace conversion stage
//!
//! A space between an opening tag and a first child element (or between a last
//! child element and the closing tag) becomes a newline:
//!
//! `<div> <p>Hello</p> </div>` -> `<div>`, `<p>Hello</p>` and `</div>` on their own lines.

use crate::template::ast::Node;
use crate::template::error::FormatResult;
use crate::template::transforms::traversal::rewrite_lists;
use crate::template::transforms::Runnable;

pub struct ConvertEdgeWhitespace;

impl ConvertEdgeWhitespace {
    pub fn new() -> Self {
        ConvertEdgeWhitespace
    }
}

impl Default for ConvertEdgeWhitespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for ConvertEdgeWhitespace {
    fn run(&self, input: Vec<Node>) -> FormatResult<Vec<Node>> {
        log::trace!("ConvertEdgeWhitespace");
        rewrite_lists(input, "ConvertEdgeWhitespace", &convert_edges)
    }
}

fn convert_edges(mut nodes: Vec<Node>) -> Vec<Node> {
    let len = nodes.len();
    if len < 2 {
        return nodes;
    }
    if nodes[0].is_space() && nodes[1].is_element() {
        nodes[0] = Node::newline();
    }
    if nodes[len - 1].is_space() && nodes[len - 2].is_element() {
        nodes[len - 1] = Node::newline();
    }
    nodes
}
