//! Shared recursion for the rewrite passes
//!
//! The spacing passes each describe a rule over one list of siblings. This helper
//! applies such a rule to every child list in the tree, children first, skipping
//! verbatim elements. It also rejects markers from a later stage: until the
//! indentation pass runs, only `Space` and `Newline` may appear.

use crate::template::ast::Node;
use crate::template::error::{FormatError, FormatResult};

/// Apply `rule` to every sibling list of `nodes`, deepest lists first, then to
/// `nodes` itself.
pub fn rewrite_lists<F>(nodes: Vec<Node>, stage: &str, rule: &F) -> FormatResult<Vec<Node>>
where
    F: Fn(Vec<Node>) -> Vec<Node>,
{
    let mut rewritten = Vec::with_capacity(nodes.len());
    for node in nodes {
        let node = match node {
            Node::Element(mut element) if !element.is_verbatim() => {
                element.children = rewrite_lists(element.children, stage, rule)?;
                Node::Element(element)
            }
            Node::Block(mut block) => {
                block.children = rewrite_lists(block.children, stage, rule)?;
                Node::Block(block)
            }
            Node::Whitespace(ws) if !ws.is_coarse() => {
                return Err(FormatError::invariant(
                    stage,
                    format!("unexpected {:?} marker before indentation", ws),
                ));
            }
            other => other,
        };
        rewritten.push(node);
    }
    Ok(rule(rewritten))
}
