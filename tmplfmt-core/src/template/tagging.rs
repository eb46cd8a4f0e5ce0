//! Whitespace tagging
//!
//! Lifts whitespace out of raw parser text into sibling [`Whitespace`] markers.
//! After this phase `Text` nodes carry content only and every run of inter-node
//! whitespace is one of:
//!
//! - `Space` for a run without line breaks,
//! - `Newline` for a run containing exactly one `\n`,
//! - `Newline, Newline` for a run containing two or more (a paragraph break).
//!
//! Only ASCII whitespace is classified; a non-breaking space is content.
//! Verbatim elements are not entered, their children come back untouched.

use crate::template::ast::{Node, Whitespace};

/// Tag a list of sibling nodes, recursing into non-verbatim elements and blocks.
pub fn tag(nodes: Vec<Node>) -> Vec<Node> {
    let mut tagged = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) => tag_text(&text, &mut tagged),
            Node::Element(mut element) => {
                if !element.is_verbatim() {
                    element.children = tag_children(element.children);
                }
                tagged.push(Node::Element(element));
            }
            Node::Block(mut block) => {
                block.children = tag_children(block.children);
                tagged.push(Node::Block(block));
            }
            Node::Whitespace(ws) => push_marker(&mut tagged, ws),
            other => tagged.push(other),
        }
    }
    tagged
}

/// Tag a whole document.
///
/// The document is formatted as if its source had been trimmed: whitespace before
/// the first node and after the last one is dropped.
pub fn tag_document(nodes: Vec<Node>) -> Vec<Node> {
    let tagged = tag(nodes);
    let start = tagged.iter().position(|node| !matches!(node, Node::Whitespace(_)));
    let Some(start) = start else {
        return Vec::new();
    };
    let end = tagged
        .iter()
        .rposition(|node| !matches!(node, Node::Whitespace(_)))
        .map_or(start, |end| end + 1);
    tagged.into_iter().skip(start).take(end - start).collect()
}

/// Tag the child list of an element or block.
///
/// A child list never opens or closes with a blank line.
fn tag_children(children: Vec<Node>) -> Vec<Node> {
    let mut tagged = tag(children);
    if tagged.len() >= 2 && tagged[0].is_newline() && tagged[1].is_newline() {
        tagged.remove(0);
    }
    let len = tagged.len();
    if len >= 2 && tagged[len - 1].is_newline() && tagged[len - 2].is_newline() {
        tagged.pop();
    }
    tagged
}

fn is_blank(c: char) -> bool {
    c.is_ascii_whitespace()
}

fn tag_text(text: &str, out: &mut Vec<Node>) {
    let rest = text.trim_start_matches(is_blank);
    if rest.is_empty() {
        classify(text, out);
        return;
    }

    let leading = &text[..text.len() - rest.len()];
    let middle = rest.trim_end_matches(is_blank);
    let trailing = &rest[middle.len()..];

    classify(leading, out);
    for (index, line) in middle.split('\n').enumerate() {
        if index > 0 {
            push_marker(out, Whitespace::Newline);
        }
        let line = line.trim_matches(is_blank);
        if !line.is_empty() {
            out.push(Node::Text(line.to_string()));
        }
    }
    classify(trailing, out);
}

/// Classify a whitespace-only run.
fn classify(run: &str, out: &mut Vec<Node>) {
    if run.is_empty() {
        return;
    }
    match run.matches('\n').count() {
        0 => push_marker(out, Whitespace::Space),
        1 => push_marker(out, Whitespace::Newline),
        _ => {
            push_marker(out, Whitespace::Newline);
            push_marker(out, Whitespace::Newline);
        }
    }
}

/// Push a marker, merging it with a directly preceding one.
///
/// Adjacent runs (two raw text nodes side by side) behave as if they were one run:
/// a space next to a newline is absorbed by the newline.
fn push_marker(out: &mut Vec<Node>, ws: Whitespace) {
    match (out.last().and_then(Node::as_whitespace), ws) {
        (Some(Whitespace::Space), Whitespace::Space) => {}
        (Some(Whitespace::Newline), Whitespace::Space) => {}
        (Some(Whitespace::Space), Whitespace::Newline) => {
            out.pop();
            out.push(Node::Whitespace(Whitespace::Newline));
        }
        _ => out.push(Node::Whitespace(ws)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ast::{Block, Element};

    fn nl() -> Node {
        Node::newline()
    }

    fn sp() -> Node {
        Node::space()
    }

    fn text(s: &str) -> Node {
        Node::text(s)
    }

    #[test]
    fn test_whitespace_only_text() {
        assert_eq!(tag(vec![text("   ")]), vec![sp()]);
        assert_eq!(tag(vec![text("  \n  ")]), vec![nl()]);
        assert_eq!(tag(vec![text("\n\n")]), vec![nl(), nl()]);
        assert_eq!(tag(vec![text("\n \n\n\n")]), vec![nl(), nl()]);
        assert_eq!(tag(vec![text("")]), vec![]);
    }

    #[test]
    fn test_text_with_leading_and_trailing_runs() {
        assert_eq!(
            tag(vec![text("\n  Hello world \n")]),
            vec![nl(), text("Hello world"), nl()]
        );
        assert_eq!(
            tag(vec![text(" Hello\n\n")]),
            vec![sp(), text("Hello"), nl(), nl()]
        );
    }

    #[test]
    fn test_internal_newlines_split_text() {
        assert_eq!(
            tag(vec![text("Hello   \n   world")]),
            vec![text("Hello"), nl(), text("world")]
        );
        assert_eq!(
            tag(vec![text("a\n\n\nb")]),
            vec![text("a"), nl(), nl(), nl(), text("b")]
        );
    }

    #[test]
    fn test_internal_spaces_are_kept() {
        assert_eq!(tag(vec![text("a   b")]), vec![text("a   b")]);
    }

    #[test]
    fn test_non_breaking_space_is_content() {
        assert_eq!(tag(vec![text("\u{a0}x")]), vec![text("\u{a0}x")]);
    }

    #[test]
    fn test_element_children_are_tagged() {
        let input = vec![Element::new("div")
            .with_children(vec![text(" "), Element::new("p").into(), text("\n")])
            .into()];
        let expected = vec![Element::new("div")
            .with_children(vec![sp(), Element::new("p").into(), nl()])
            .into()];
        assert_eq!(tag(input), expected);
    }

    #[test]
    fn test_verbatim_children_untouched() {
        let pre = Element::new("pre").with_children(vec![text("  a\n\n\n  b  ")]);
        assert_eq!(tag(vec![pre.clone().into()]), vec![pre.into()]);

        let raw = Element::new("#Raw").with_children(vec![text("\n<div>  </div>\n")]);
        assert_eq!(tag(vec![raw.clone().into()]), vec![raw.into()]);
    }

    #[test]
    fn test_child_list_never_opens_with_blank_line() {
        let input = vec![Element::new("div")
            .with_children(vec![text("\n\n\nHello\n\n")])
            .into()];
        let expected = vec![Element::new("div")
            .with_children(vec![nl(), text("Hello"), nl()])
            .into()];
        assert_eq!(tag(input), expected);
    }

    #[test]
    fn test_adjacent_runs_merge() {
        assert_eq!(
            tag(vec![text("a "), text("\nb")]),
            vec![text("a"), nl(), text("b")]
        );
        assert_eq!(tag(vec![text("a "), text(" b")]), vec![text("a"), sp(), text("b")]);
    }

    #[test]
    fn test_block_bodies_are_tagged() {
        let input = vec![Block::new("if", Some("@show"))
            .with_children(vec![text("\n  Hi\n")])
            .into()];
        let expected = vec![Block::new("if", Some("@show"))
            .with_children(vec![nl(), text("Hi"), nl()])
            .into()];
        assert_eq!(tag(input), expected);
    }

    #[test]
    fn test_document_edges_are_trimmed() {
        assert_eq!(
            tag_document(vec![text("\n\n  Hello\n"), Node::expression("x"), text(" \n")]),
            vec![text("Hello"), nl(), Node::expression("x")]
        );
        assert_eq!(tag_document(vec![text(" \n ")]), vec![]);
    }

    #[test]
    fn test_expressions_are_opaque() {
        assert_eq!(
            tag(vec![text("Hi "), Node::expression("  @name  "), text("!")]),
            vec![text("Hi"), sp(), Node::expression("  @name  "), text("!")]
        );
    }
}
