//! Formatting entry points
//!
//! [`Formatter`] runs the layout pipeline over a parsed tree and renders the result.
//! It is itself a [`Runnable`] so it can be chained after a reader stage.

use std::sync::Arc;

use crate::template::ast::Node;
use crate::template::error::FormatResult;
use crate::template::expression::{CanonicalFormatter, ExpressionFormatter};
use crate::template::options::Options;
use crate::template::rendering::render;
use crate::template::transforms::standard::LAYOUT;
use crate::template::transforms::Runnable;

/// Formats parsed templates
#[derive(Clone)]
pub struct Formatter {
    options: Options,
    expressions: Arc<dyn ExpressionFormatter>,
}

impl Formatter {
    /// A formatter using the built-in [`CanonicalFormatter`] for embedded code.
    pub fn new(options: Options) -> Self {
        Formatter {
            options,
            expressions: Arc::new(CanonicalFormatter::new()),
        }
    }

    /// Replace the embedded-code formatter.
    pub fn with_expression_formatter(mut self, expressions: Arc<dyn ExpressionFormatter>) -> Self {
        self.expressions = expressions;
        self
    }

    /// Format a parsed tree.
    ///
    /// The first invalid expression aborts the call; no partial output is returned.
    pub fn format(&self, nodes: Vec<Node>) -> FormatResult<String> {
        let annotated = LAYOUT.run(nodes)?;
        render(&annotated, self.options, self.expressions.as_ref())
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Runnable<Vec<Node>, String> for Formatter {
    fn run(&self, input: Vec<Node>) -> FormatResult<String> {
        self.format(input)
    }
}

/// Format a parsed tree with the built-in expression formatter.
pub fn format_nodes(nodes: Vec<Node>, options: Options) -> FormatResult<String> {
    Formatter::new(options).format(nodes)
}
