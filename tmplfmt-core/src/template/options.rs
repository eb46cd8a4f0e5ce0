//! Formatting options threaded through every render call

/// One indentation level.
pub const TAB: &str = "  ";

pub const DEFAULT_LINE_LENGTH: usize = 98;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Budget for opening tags and embedded expressions.
    pub line_length: usize,
    /// Indentation level of the first line (templates embedded in host code).
    pub indent: usize,
    /// End the output with exactly one `\n`.
    pub trailing_newline: bool,
}

impl Options {
    pub fn new() -> Self {
        Options {
            line_length: DEFAULT_LINE_LENGTH,
            indent: 0,
            trailing_newline: true,
        }
    }

    pub fn with_line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

/// Indentation string for `depth` levels.
pub fn indentation(depth: usize) -> String {
    TAB.repeat(depth)
}
