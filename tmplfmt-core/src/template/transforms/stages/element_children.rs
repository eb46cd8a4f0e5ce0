//! Newlines around containers of elements
//!
//! An element that itself contains elements is laid out as a block: a `Space`
//! directly before or after it becomes a `Newline`.

use crate::template::ast::Node;
use crate::template::error::FormatResult;
use crate::template::transforms::traversal::rewrite_lists;
use crate::template::transforms::Runnable;

pub struct EnsureNewlinesAroundElementChildren;

impl EnsureNewlinesAroundElementChildren {
    pub fn new() -> Self {
        EnsureNewlinesAroundElementChildren
    }
}

impl Default for EnsureNewlinesAroundElementChildren {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for EnsureNewlinesAroundElementChildren {
    fn run(&self, input: Vec<Node>) -> FormatResult<Vec<Node>> {
        log::trace!("EnsureNewlinesAroundElementChildren");
        rewrite_lists(input, "EnsureNewlinesAroundElementChildren", &separate_containers)
    }
}

fn separate_containers(mut nodes: Vec<Node>) -> Vec<Node> {
    for index in 0..nodes.len() {
        let is_container = nodes[index]
            .as_element()
            .is_some_and(|element| element.has_element_children());
        if !is_container {
            continue;
        }
        if index > 0 && nodes[index - 1].is_space() {
            nodes[index - 1] = Node::newline();
        }
        if index + 1 < nodes.len() && nodes[index + 1].is_space() {
            nodes[index + 1] = Node::newline();
        }
    }
    nodes
}
