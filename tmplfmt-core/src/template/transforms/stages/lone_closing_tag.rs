//! Sibling relocation after multi-line elements
//!
//! An element whose children contain a `Newline` renders over several lines; its
//! closing tag must not share a line with the next sibling, so a `Space` after it
//! becomes a `Newline`.

use crate::template::ast::Node;
use crate::template::error::FormatResult;
use crate::template::transforms::traversal::rewrite_lists;
use crate::template::transforms::Runnable;

pub struct RelocateAfterLoneClosingTag;

impl RelocateAfterLoneClosingTag {
    pub fn new() -> Self {
        RelocateAfterLoneClosingTag
    }
}

impl Default for RelocateAfterLoneClosingTag {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for RelocateAfterLoneClosingTag {
    fn run(&self, input: Vec<Node>) -> FormatResult<Vec<Node>> {
        log::trace!("RelocateAfterLoneClosingTag");
        rewrite_lists(input, "RelocateAfterLoneClosingTag", &relocate)
    }
}

fn relocate(mut nodes: Vec<Node>) -> Vec<Node> {
    for index in 0..nodes.len().saturating_sub(1) {
        let multi_line = nodes[index]
            .as_element()
            .is_some_and(|element| element.has_newline_children());
        if multi_line && nodes[index + 1].is_space() {
            nodes[index + 1] = Node::newline();
        }
    }
    nodes
}
