//! Error types for formatting operations

use std::fmt;

/// Where an embedded expression sits in the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Value of attribute `name` on `<tag>`
    Attribute { tag: String, name: String },
    /// Interpolation among the children of `parent` (`None` at the top level)
    Child { parent: Option<String> },
    /// Header expression of a `{#name ...}` block
    Block { name: String },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Attribute { tag, name } => write!(f, "attribute `{}` of <{}>", name, tag),
            Location::Child { parent: Some(tag) } => write!(f, "interpolation inside <{}>", tag),
            Location::Child { parent: None } => write!(f, "top-level interpolation"),
            Location::Block { name } => write!(f, "header of {{#{}}}", name),
        }
    }
}

/// Errors that abort a format invocation
///
/// The first error aborts the whole render; callers never receive partial output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The expression formatter rejected an embedded code fragment
    Expression {
        fragment: String,
        location: Location,
        message: String,
    },
    /// A pass met a node stream it cannot have been given by the previous pass
    Invariant { stage: String, message: String },
}

impl FormatError {
    pub fn invariant(stage: &str, message: impl Into<String>) -> Self {
        FormatError::Invariant {
            stage: stage.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Expression {
                fragment,
                location,
                message,
            } => {
                write!(
                    f,
                    "Invalid expression in {}: {}\n\n    {}\n",
                    location,
                    message,
                    fragment.trim()
                )
            }
            FormatError::Invariant { stage, message } => {
                write!(f, "Stage '{}' failed: {}", stage, message)
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Type alias for results of formatting operations
pub type FormatResult<T> = Result<T, FormatError>;
