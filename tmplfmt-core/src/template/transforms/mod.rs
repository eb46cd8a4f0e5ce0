//! Transform pipeline infrastructure
//!
//! Every formatting phase is a stage implementing [`Runnable`]. Stages are chained
//! into a [`Transform`] with `.then()`, and the compiler checks that each stage's
//! input type matches the previous stage's output:
//!
//! ```rust,ignore
//! let layout = Transform::from_fn(Ok)
//!     .then(TagWhitespace::new())       // Vec<Node> -> Vec<Node>
//!     .then(CollapseNewlines::new())
//!     .then(Indentation::new());
//! ```
//!
//! Pre-built pipelines are static references in [`standard`].
//!
//! # Module Organization
//!
//! - [`stages`]: individual passes (tagging, newline collapsing, ..., indentation)
//! - [`standard`]: the layout pipeline in its required order
//! - [`traversal`]: shared recursion over element and block child lists

pub mod stages;
pub mod standard;
pub mod traversal;

use crate::template::error::{FormatError, FormatResult};

/// Trait for anything that can transform an input to an output
///
/// This is implemented by individual transformation stages.
/// The `Transform` struct composes multiple `Runnable` implementations.
pub trait Runnable<I, O> {
    /// Execute this transformation on the input
    fn run(&self, input: I) -> Result<O, FormatError>;
}

/// A composable transformation pipeline
///
/// `Transform<I, O>` represents a transformation from type `I` to type `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> FormatResult<O> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    /// Create a transform from a function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> FormatResult<O> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Add a stage to this transform, returning a new transform with extended output type
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Execute this transform on the given input
    pub fn run(&self, input: I) -> FormatResult<O> {
        (self.run_fn)(input)
    }
}

// Implement Runnable for Transform so transforms can be used as stages
impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> FormatResult<O> {
        Transform::run(self, input)
    }
}

/// Re-run an endomorphic transform until its output equals its input
///
/// Only use this with transforms that are monotone over a finite measure; the
/// spacing passes qualify because they only ever turn `Space` markers into
/// `Newline` markers.
pub struct UntilStable<T> {
    name: &'static str,
    inner: Transform<T, T>,
}

impl<T> UntilStable<T> {
    pub fn new(name: &'static str, inner: Transform<T, T>) -> Self {
        UntilStable { name, inner }
    }
}

impl<T> Runnable<T, T> for UntilStable<T>
where
    T: Clone + PartialEq + 'static,
{
    fn run(&self, input: T) -> FormatResult<T> {
        let mut current = input;
        let mut rounds = 1;
        loop {
            let next = self.inner.run(current.clone())?;
            if next == current {
                log::trace!("{} stable after {} round(s)", self.name, rounds);
                return Ok(next);
            }
            current = next;
            rounds += 1;
        }
    }
}
