//! # tmplfmt
//!
//! A pretty-printer for component templates: markup with embedded host-language
//! expressions and control blocks.
//!
//! File Layout
//!
//! The formatter is a pipeline over a node tree produced by an upstream parser:
//!
//! src/template
//!   ├── ast          The node tree consumed and produced by every phase
//!   ├── tagging      Lifts raw whitespace out of text into marker nodes
//!   ├── transforms   Ordered layout passes (the `Runnable`/`Transform` machinery)
//!   ├── rendering    Turns the annotated tree into text
//!   ├── expression   Boundary to the embedded-expression formatter
//!   └── testing      Fixture reader for template source used by tests and the CLI
//!
//! The entry points live in [`template::formatter`].

pub mod template;

pub use template::error::FormatError;
pub use template::expression::{CanonicalFormatter, ExpressionFormatter, SyntaxError};
pub use template::formatter::{format_nodes, Formatter};
pub use template::options::Options;
