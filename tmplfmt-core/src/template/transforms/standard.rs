//! Standard transform definitions
//!
//! This module provides the pre-built layout pipeline. Transforms are defined as
//! static references using `once_cell::sync::Lazy`.

use crate::template::ast::Node;
use crate::template::transforms::stages::{
    CollapseNewlines, ConvertEdgeWhitespace, EnsureNewlinesAroundElementChildren, Indentation,
    NormalizeSurroundingWhitespace, RelocateAfterLoneClosingTag, TagWhitespace, TrimBlankLines,
};
use crate::template::transforms::{Transform, UntilStable};
use once_cell::sync::Lazy;

/// Type alias for transforms over sibling lists
pub type NodeTransform = Transform<Vec<Node>, Vec<Node>>;

/// Spacing passes: Vec<Node> → Vec<Node>
///
/// 1. Normalize surrounding whitespace
/// 2. Ensure newlines around element children
/// 3. Convert edge whitespace to newlines
/// 4. Relocate siblings after lone closing tags
///
/// These passes only turn `Space` into `Newline`. One pass can expose a pattern an
/// earlier one handles, so the group is repeated until the tree stops changing;
/// formatting already formatted output then finds nothing left to do.
pub static SPACING: Lazy<NodeTransform> = Lazy::new(|| {
    Transform::from_fn(Ok).then(UntilStable::new(
        "Spacing",
        Transform::from_fn(Ok)
            .then(NormalizeSurroundingWhitespace::new())
            .then(EnsureNewlinesAroundElementChildren::new())
            .then(ConvertEdgeWhitespace::new())
            .then(RelocateAfterLoneClosingTag::new()),
    ))
});

/// Layout transform: parser output → annotated tree ready for rendering
///
/// 1. Whitespace tagging
/// 2. Newline collapsing
/// 3. Spacing passes (see [`SPACING`])
/// 4. Blank line trimming
/// 5. Indentation
pub static LAYOUT: Lazy<NodeTransform> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then(TagWhitespace::new())
        .then(CollapseNewlines::new())
        .then(Transform::from_fn(|nodes| SPACING.run(nodes)))
        .then(TrimBlankLines::new())
        .then(Indentation::new())
});
