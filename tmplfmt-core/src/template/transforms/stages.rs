//! Individual transformation stages
//!
//! This module contains the individual stages that can be composed into pipelines.
//! Each stage implements the `Runnable` trait over a list of sibling nodes.

pub mod blank_lines;
pub mod collapse_newlines;
pub mod edge_whitespace;
pub mod element_children;
pub mod indentation;
pub mod lone_closing_tag;
pub mod surrounding_whitespace;
pub mod tagging;

pub use blank_lines::TrimBlankLines;
pub use collapse_newlines::CollapseNewlines;
pub use edge_whitespace::ConvertEdgeWhitespace;
pub use element_children::EnsureNewlinesAroundElementChildren;
pub use indentation::Indentation;
pub use lone_closing_tag::RelocateAfterLoneClosingTag;
pub use surrounding_whitespace::NormalizeSurroundingWhitespace;
pub use tagging::TagWhitespace;
