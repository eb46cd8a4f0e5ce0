//! Leading and trailing blank line trimming stage
//!
//! No blank line directly inside an opening tag or directly before a closing tag:
//! a child list starting (or ending) with `Newline, Newline` loses one of them.

use crate::template::ast::Node;
use crate::template::error::FormatResult;
use crate::template::transforms::traversal::rewrite_lists;
use crate::template::transforms::Runnable;

pub struct TrimBlankLines;

impl TrimBlankLines {
    pub fn new() -> Self {
        TrimBlankLines
    }
}

impl Default for TrimBlankLines {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for TrimBlankLines {
    fn run(&self, input: Vec<Node>) -> FormatResult<Vec<Node>> {
        log::trace!("TrimBlankLines");
        rewrite_lists(input, "TrimBlankLines", &trim)
    }
}

fn trim(mut nodes: Vec<Node>) -> Vec<Node> {
    if nodes.len() >= 2 && nodes[0].is_newline() && nodes[1].is_newline() {
        nodes.remove(0);
    }
    let len = nodes.len();
    if len >= 2 && nodes[len - 1].is_newline() && nodes[len - 2].is_newline() {
        nodes.pop();
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ast::Block;

    #[test]
    fn test_trims_both_ends() {
        let input = vec![
            Node::newline(),
            Node::newline(),
            Node::text("x"),
            Node::newline(),
            Node::newline(),
        ];
        let output = TrimBlankLines::new().run(input).unwrap();
        assert_eq!(output, vec![Node::newline(), Node::text("x"), Node::newline()]);
    }

    #[test]
    fn test_inner_blank_lines_kept() {
        let input = vec![
            Node::text("a"),
            Node::newline(),
            Node::newline(),
            Node::text("b"),
        ];
        let output = TrimBlankLines::new().run(input.clone()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_block_bodies_trimmed() {
        let input = vec![Block::new("for", Some("x <- @xs"))
            .with_children(vec![
                Node::newline(),
                Node::newline(),
                Node::expression("x"),
                Node::newline(),
            ])
            .into()];
        let output = TrimBlankLines::new().run(input).unwrap();
        assert_eq!(
            output,
            vec![Block::new("for", Some("x <- @xs"))
                .with_children(vec![Node::newline(), Node::expression("x"), Node::newline()])
                .into()]
        );
    }
}
