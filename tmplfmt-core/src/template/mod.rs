//! Main module for template formatting functionality

pub mod ast;
pub mod error;
pub mod expression;
pub mod formatter;
pub mod options;
pub mod rendering;
pub mod tagging;
pub mod testing;
pub mod transforms;
