//! Attribute rendering

use std::borrow::Cow;

use super::{reindent, Renderer};
use crate::template::ast::{AttrValue, Attribute, Segment};
use crate::template::error::{FormatResult, Location};
use crate::template::expression::literal::{
    has_invisible_brackets, parse_literal, strip_invisible_brackets, Literal,
};

impl Renderer<'_> {
    /// Render `name=value` for an attribute of `<tag>` whose line sits at `depth`.
    pub(super) fn render_attribute(
        &self,
        attribute: &Attribute,
        tag: &str,
        depth: usize,
    ) -> FormatResult<String> {
        let name = &attribute.name;
        let location = || Location::Attribute {
            tag: tag.to_string(),
            name: name.clone(),
        };
        let rendered = match &attribute.value {
            AttrValue::StringLiteral(value) => {
                let value = value.trim();
                let quote = quote_for(value);
                format!("{}={}{}{}", name, quote, escape(value, quote), quote)
            }
            AttrValue::BoolLiteral(true) => name.clone(),
            AttrValue::BoolLiteral(false) => format!("{}=false", name),
            AttrValue::IntLiteral(value) => {
                let formatted = self.format_code(&value.to_string(), depth, location())?;
                format!("{}={}", name, formatted)
            }
            AttrValue::Expression(code) => {
                self.render_expression_attribute(name, code, depth, location())?
            }
            AttrValue::Mixed(segments) => {
                let literal: String = segments
                    .iter()
                    .filter_map(|segment| match segment {
                        Segment::StringLiteral(text) => Some(text.as_str()),
                        Segment::Expression(_) => None,
                    })
                    .collect();
                let quote = quote_for(&literal);
                let mut value = String::new();
                for segment in segments {
                    match segment {
                        Segment::StringLiteral(text) => value.push_str(&escape(text, quote)),
                        Segment::Expression(code) => {
                            let formatted = self.format_code(code.trim(), depth, location())?;
                            value.push_str(&interpolate(&reindent(&formatted, depth)));
                        }
                    }
                }
                format!("{}={}{}{}", name, quote, value, quote)
            }
        };
        Ok(rendered)
    }

    fn render_expression_attribute(
        &self,
        name: &str,
        code: &str,
        depth: usize,
        location: Location,
    ) -> FormatResult<String> {
        let code = code.trim();
        match parse_literal(code) {
            Some(Literal::Bool(true)) => return Ok(name.to_string()),
            Some(Literal::Bool(false)) => return Ok(format!("{}=false", name)),
            Some(Literal::Integer(value)) => return Ok(format!("{}={}", name, value)),
            Some(Literal::String(value)) => return Ok(format!("{}=\"{}\"", name, value)),
            None => {}
        }

        let formatted = if has_invisible_brackets(code) {
            let bracketed = self.format_code(&format!("[{}]", code), depth, location)?;
            strip_invisible_brackets(&bracketed)
        } else {
            self.format_code(code, depth, location)?
        };
        Ok(format!("{}={}", name, interpolate(&reindent(&formatted, depth))))
    }
}

/// Quote for a value whose literal text is `literal`.
///
/// Interpolations inside a quoted value are skipped when it is read back, so only
/// the literal text decides.
fn quote_for(literal: &str) -> char {
    if literal.contains('"') && !literal.contains('\'') {
        '\''
    } else {
        '"'
    }
}

/// Literal text made safe inside `quote`; only needed when both quotes appear.
fn escape(text: &str, quote: char) -> Cow<'_, str> {
    if quote == '"' && text.contains('"') {
        Cow::Owned(text.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Wrap formatted code in interpolation braces; multi-line code is not padded.
fn interpolate(code: &str) -> String {
    if code.is_empty() {
        "{{}}".to_string()
    } else if code.contains('\n') {
        format!("{{{{{}}}}}", code)
    } else {
        format!("{{{{ {} }}}}", code)
    }
}
