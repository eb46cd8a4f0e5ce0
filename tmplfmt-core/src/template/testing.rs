//! Testing utilities
//!
//!     The formatter consumes a tree produced by an upstream parser. Writing such trees
//!     by hand is fine for a single pass, but whole-pipeline tests read much better
//!     when they start from template source. The [reader] turns source into the same
//!     tree shape the parser produces, so tests can be written as
//!
//!     ```rust,ignore
//!     use tmplfmt_core::template::testing::format_source;
//!
//!     let output = format_source("<div> <p>Hello</p> </div>\n", Options::new(), expressions)?;
//!     assert_eq!(output, "<div>\n  <p>Hello</p>\n</div>\n");
//!     ```
//!
//!     The reader is deliberately small: it does not validate markup, keeps text
//!     exactly as written and only knows enough about embedded code to find where an
//!     interpolation or block header ends.
//!
//!     The CLI uses the same reader to format files from disk.

pub mod reader;

pub use reader::{read, ReadError};

use std::fmt;
use std::sync::Arc;

use crate::template::error::FormatError;
use crate::template::expression::ExpressionFormatter;
use crate::template::formatter::Formatter;
use crate::template::options::Options;

/// Failure to format template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    Read(ReadError),
    Format(FormatError),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Read(err) => write!(f, "{}", err),
            SourceError::Format(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<ReadError> for SourceError {
    fn from(err: ReadError) -> Self {
        SourceError::Read(err)
    }
}

impl From<FormatError> for SourceError {
    fn from(err: FormatError) -> Self {
        SourceError::Format(err)
    }
}

/// Read and format template source.
///
/// Outer whitespace is dropped; the output ends with a newline exactly when the
/// source did.
pub fn format_source(
    source: &str,
    options: Options,
    expressions: Arc<dyn ExpressionFormatter>,
) -> Result<String, SourceError> {
    let nodes = read(source)?;
    let options = options.with_trailing_newline(source.ends_with('\n'));
    let formatter = Formatter::new(options).with_expression_formatter(expressions);
    Ok(formatter.format(nodes)?)
}
