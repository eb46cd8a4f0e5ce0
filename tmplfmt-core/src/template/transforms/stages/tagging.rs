//! Whitespace tagging stage
//!
//! Wraps [`tag_document`](crate::template::tagging::tag_document) so tagging is
//! the first stage of the layout pipeline.

use crate::template::ast::Node;
use crate::template::error::FormatResult;
use crate::template::tagging::tag_document;
use crate::template::transforms::Runnable;

/// Whitespace tagging stage
///
/// # Input
/// - `Vec<Node>` - parser output, whitespace still inside `Text`
///
/// # Output
/// - `Vec<Node>` - content-only `Text` with `Space`/`Newline` siblings
pub struct TagWhitespace;

impl TagWhitespace {
    pub fn new() -> Self {
        TagWhitespace
    }
}

impl Default for TagWhitespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Node>, Vec<Node>> for TagWhitespace {
    fn run(&self, input: Vec<Node>) -> FormatResult<Vec<Node>> {
        log::trace!("TagWhitespace: {} top-level node(s)", input.len());
        Ok(tag_document(input))
    }
}
