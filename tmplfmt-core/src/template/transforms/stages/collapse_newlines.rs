//! Newline collapsing stage
//!
//! Caps every run of consecutive `Newline` markers at two: at most one blank line
//! between siblings. No later stage adds a newline next to an existing one, so the
//! cap holds through to rendering.

use crate::template::ast::Node;
use crate::template::error::FormatResult;
use crate::template::transforms::traversal::rewrite_lists;
use crate::template::transforms::Runnable;

const MAX_CONSECUTIVE_NEWLINES: usize = 2;

pub struct CollapseNewlines;

impl CollapseNewlines {
    pub fn new() -> Self {
        CollapseNewlines
    }
}

impl Default for CollapseNewlines {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for CollapseNewlines {
    fn run(&self, input: Vec<Node>) -> FormatResult<Vec<Node>> {
        log::trace!("CollapseNewlines");
        rewrite_lists(input, "CollapseNewlines", &collapse)
    }
}

fn collapse(nodes: Vec<Node>) -> Vec<Node> {
    let mut collapsed = Vec::with_capacity(nodes.len());
    let mut run = 0;
    for node in nodes {
        if node.is_newline() {
            run += 1;
            if run > MAX_CONSECUTIVE_NEWLINES {
                continue;
            }
        } else {
            run = 0;
        }
        collapsed.push(node);
    }
    collapsed
}
