//! Renderer
//!
//! Final phase of the pipeline: walks the annotated tree and writes text. All layout
//! decisions about line breaks have been made by the passes; the renderer only
//! resolves the relative indentation markers against the depth of the list they
//! sit in, decides whether an opening tag wraps its attributes and hands embedded
//! code to the [`ExpressionFormatter`].
//!
//! Depth rules:
//!
//! - element children and block bodies render one level deeper than their parent;
//! - the arms of a `case` block render two levels deeper (their headers sit on
//!   the `case` block's own list, one level deeper);
//! - verbatim elements render their whole subtree at depth 0, untouched.

mod attributes;

use crate::template::ast::{Block, Comment, Element, Node, Visibility, Whitespace};
use crate::template::error::{FormatError, FormatResult, Location};
use crate::template::expression::ExpressionFormatter;
use crate::template::options::{indentation, Options, TAB};

/// Position of the list being rendered
#[derive(Debug, Clone, Copy)]
struct Context<'a> {
    depth: usize,
    verbatim: bool,
    parent: Option<&'a str>,
}

impl<'a> Context<'a> {
    fn root(depth: usize) -> Self {
        Context {
            depth,
            verbatim: false,
            parent: None,
        }
    }

    fn nested(self, element: &'a Element) -> Self {
        let verbatim = self.verbatim || element.is_verbatim();
        Context {
            depth: if verbatim { 0 } else { self.depth + 1 },
            verbatim,
            parent: Some(&element.tag),
        }
    }

    fn deeper(self, levels: usize) -> Self {
        if self.verbatim {
            return self;
        }
        Context {
            depth: self.depth + levels,
            ..self
        }
    }
}

/// Render an annotated tree to text.
///
/// `nodes` must have been through the layout pipeline.
pub fn render(
    nodes: &[Node],
    options: Options,
    expressions: &dyn ExpressionFormatter,
) -> FormatResult<String> {
    log::debug!("rendering {} top-level nodes", nodes.len());
    let mut renderer = Renderer::new(options, expressions);
    if !nodes.is_empty() {
        renderer.output.push_str(&indentation(options.indent));
    }
    renderer.render_nodes(nodes, Context::root(options.indent))?;

    let mut output = renderer.output;
    if options.trailing_newline && !output.is_empty() {
        let len = output.trim_end_matches('\n').len();
        output.truncate(len);
        output.push('\n');
    }
    Ok(output)
}

struct Renderer<'f> {
    options: Options,
    expressions: &'f dyn ExpressionFormatter,
    output: String,
}

impl<'f> Renderer<'f> {
    fn new(options: Options, expressions: &'f dyn ExpressionFormatter) -> Self {
        Renderer {
            options,
            expressions,
            output: String::new(),
        }
    }

    fn render_nodes(&mut self, nodes: &[Node], ctx: Context<'_>) -> FormatResult<()> {
        for node in nodes {
            self.render_node(node, ctx)?;
        }
        Ok(())
    }

    fn render_node(&mut self, node: &Node, ctx: Context<'_>) -> FormatResult<()> {
        match node {
            Node::Whitespace(ws) => self.render_whitespace(*ws, ctx),
            Node::Text(text) => self.output.push_str(text),
            Node::Expression(code) => {
                let location = Location::Child {
                    parent: ctx.parent.map(str::to_string),
                };
                let rendered = self.render_interpolation(code, ctx, location)?;
                self.output.push_str(&rendered);
            }
            Node::Comment(comment) => self.render_comment(comment, ctx),
            Node::Element(element) => self.render_element(element, ctx)?,
            Node::Block(block) => self.render_block(block, ctx)?,
        }
        Ok(())
    }

    fn render_whitespace(&mut self, ws: Whitespace, ctx: Context<'_>) {
        match ws {
            Whitespace::Space => self.output.push(' '),
            Whitespace::Newline => self.output.push('\n'),
            Whitespace::Indent => self.output.push_str(&indentation(ctx.depth)),
            Whitespace::IndentOneLess => {
                self.output
                    .push_str(&indentation(ctx.depth.saturating_sub(1)))
            }
        }
    }

    /// `{{ code }}` for an interpolation among children
    fn render_interpolation(
        &self,
        code: &str,
        ctx: Context<'_>,
        location: Location,
    ) -> FormatResult<String> {
        let code = code.trim();
        if let Some(comment) = code.strip_prefix('#') {
            return Ok(format!("{{{{!-- {} --}}}}", comment.trim()));
        }
        let formatted = self.format_code(code, ctx.depth, location)?;
        if formatted.is_empty() {
            return Ok("{{}}".to_string());
        }
        Ok(format!("{{{{ {} }}}}", reindent(&formatted, ctx.depth)))
    }

    /// Run the expression formatter, budgeting for the indentation at `depth`.
    fn format_code(&self, code: &str, depth: usize, location: Location) -> FormatResult<String> {
        let width = self
            .options
            .line_length
            .saturating_sub(depth * TAB.len());
        self.expressions
            .format(code, width)
            .map_err(|err| FormatError::Expression {
                fragment: code.to_string(),
                location,
                message: err.to_string(),
            })
    }

    fn render_comment(&mut self, comment: &Comment, ctx: Context<'_>) {
        let (open, close) = match comment.visibility {
            Visibility::Public => ("<!--", "-->"),
            Visibility::Private => ("{{!--", "--}}"),
        };
        self.output.push_str(open);
        if ctx.verbatim || comment.text.contains('\n') {
            self.output.push_str(&comment.text);
        } else {
            let text = comment.text.trim();
            self.output.push(' ');
            if !text.is_empty() {
                self.output.push_str(text);
                self.output.push(' ');
            }
        }
        self.output.push_str(close);
    }

    fn render_element(&mut self, element: &Element, ctx: Context<'_>) -> FormatResult<()> {
        let attributes = element
            .attributes
            .iter()
            .map(|attribute| self.render_attribute(attribute, &element.tag, ctx.depth + 1))
            .collect::<FormatResult<Vec<_>>>()?;

        let self_closing = element.children.is_empty() && !element.is_void();
        let close = if self_closing { "/>" } else { ">" };

        let mut one_line = format!("<{}", element.tag);
        for attribute in &attributes {
            one_line.push(' ');
            one_line.push_str(attribute);
        }
        one_line.push_str(if self_closing { " />" } else { ">" });

        let too_long = indentation(ctx.depth).len() + one_line.chars().count()
            > self.options.line_length;
        let multi_line = attributes.iter().any(|attribute| attribute.contains('\n'));
        if !ctx.verbatim && (multi_line || (too_long && attributes.len() > 1)) {
            let inner = indentation(ctx.depth + 1);
            self.output.push('<');
            self.output.push_str(&element.tag);
            for attribute in &attributes {
                self.output.push('\n');
                self.output.push_str(&inner);
                self.output.push_str(attribute);
            }
            self.output.push('\n');
            self.output.push_str(&indentation(ctx.depth));
            self.output.push_str(close);
        } else {
            self.output.push_str(&one_line);
        }

        if self_closing || (element.is_void() && element.children.is_empty()) {
            return Ok(());
        }
        self.render_nodes(&element.children, ctx.nested(element))?;
        self.output.push_str("</");
        self.output.push_str(&element.tag);
        self.output.push('>');
        Ok(())
    }

    fn render_block(&mut self, block: &Block, ctx: Context<'_>) -> FormatResult<()> {
        self.render_block_header(block, ctx)?;
        if block.has_sub_blocks {
            let body = ctx.deeper(if block.is_case() { 2 } else { 1 });
            for child in &block.children {
                match child {
                    Node::Block(sub_block) => {
                        if !sub_block.is_default() {
                            self.render_block_header(sub_block, ctx.deeper(1))?;
                        }
                        self.render_nodes(&sub_block.children, body)?;
                    }
                    other => self.render_node(other, ctx.deeper(1))?,
                }
            }
        } else {
            self.render_nodes(&block.children, ctx.deeper(1))?;
        }
        self.output.push_str("{/");
        self.output.push_str(&block.name);
        self.output.push('}');
        Ok(())
    }

    /// `{#name}` or `{#name expr}`
    fn render_block_header(&mut self, block: &Block, ctx: Context<'_>) -> FormatResult<()> {
        self.output.push_str("{#");
        self.output.push_str(&block.name);
        let code = block.expr.as_deref().map(str::trim).unwrap_or("");
        if !code.is_empty() {
            let location = Location::Block {
                name: block.name.clone(),
            };
            let formatted = self.format_code(code, ctx.depth, location)?;
            self.output.push(' ');
            self.output.push_str(&reindent(&formatted, ctx.depth));
        }
        self.output.push('}');
        Ok(())
    }
}

/// Indent every line after the first to `depth`. Empty lines stay empty.
fn reindent(text: &str, depth: usize) -> String {
    let prefix = indentation(depth);
    let mut out = String::with_capacity(text.len());
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&prefix);
            }
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ast::{AttrValue, Block};
    use crate::template::expression::CanonicalFormatter;

    fn nl() -> Node {
        Node::newline()
    }

    fn indent() -> Node {
        Node::Whitespace(Whitespace::Indent)
    }

    fn dedent() -> Node {
        Node::Whitespace(Whitespace::IndentOneLess)
    }

    fn render_with(nodes: &[Node], options: Options) -> String {
        render(nodes, options, &CanonicalFormatter).unwrap()
    }

    fn render_default(nodes: &[Node]) -> String {
        render_with(nodes, Options::new().with_trailing_newline(false))
    }

    #[test]
    fn test_markers_resolve_against_depth() {
        let nodes = vec![Element::new("div")
            .with_children(vec![
                nl(),
                indent(),
                Element::new("p")
                    .with_children(vec![Node::text("Hello")])
                    .into(),
                nl(),
                dedent(),
            ])
            .into()];
        assert_eq!(render_default(&nodes), "<div>\n  <p>Hello</p>\n</div>");
    }

    #[test]
    fn test_empty_and_void_elements() {
        let nodes = vec![
            Element::new("div").into(),
            Element::new("br").into(),
            Element::new("img")
                .with_attribute("src", AttrValue::StringLiteral("a.png".into()))
                .into(),
        ];
        assert_eq!(
            render_default(&nodes),
            "<div /><br><img src=\"a.png\">"
        );
    }

    #[test]
    fn test_child_expression_is_padded() {
        let nodes = vec![Node::expression("  @user.name ")];
        assert_eq!(render_default(&nodes), "{{ @user.name }}");
    }

    #[test]
    fn test_hash_expression_becomes_private_comment() {
        let nodes = vec![Node::expression("# TODO fix")];
        assert_eq!(render_default(&nodes), "{{!-- TODO fix --}}");
    }

    #[test]
    fn test_comments() {
        let nodes = vec![
            Node::comment("  hi  ", Visibility::Public),
            Node::comment("secret", Visibility::Private),
            Node::comment("\n  a\n  b\n", Visibility::Public),
        ];
        assert_eq!(
            render_default(&nodes),
            "<!-- hi -->{{!-- secret --}}<!--\n  a\n  b\n-->"
        );
    }

    #[test]
    fn test_verbatim_children_render_flush() {
        let pre = Element::new("pre").with_children(vec![Node::text("\n  keep   this\n")]);
        let nodes = vec![Element::new("div")
            .with_children(vec![nl(), indent(), pre.into(), nl(), dedent()])
            .into()];
        assert_eq!(
            render_default(&nodes),
            "<div>\n  <pre>\n  keep   this\n</pre>\n</div>"
        );
    }

    #[test]
    fn test_wraps_long_opening_tag_with_several_attributes() {
        let element = Element::new("Button")
            .with_attribute("class", AttrValue::StringLiteral("primary large".into()))
            .with_attribute("click", AttrValue::Expression("save".into()))
            .with_children(vec![Node::text("Save")]);
        let options = Options::new()
            .with_line_length(30)
            .with_trailing_newline(false);
        assert_eq!(
            render_with(&[element.into()], options),
            "<Button\n  class=\"primary large\"\n  click={{ save }}\n>Save</Button>"
        );
    }

    #[test]
    fn test_single_long_attribute_does_not_wrap() {
        let element = Element::new("img").with_attribute(
            "src",
            AttrValue::StringLiteral("https://example.com/a/very/long/path.png".into()),
        );
        let options = Options::new()
            .with_line_length(20)
            .with_trailing_newline(false);
        assert_eq!(
            render_with(&[element.into()], options),
            "<img src=\"https://example.com/a/very/long/path.png\">"
        );
    }

    #[test]
    fn test_block_with_sub_blocks() {
        let block = Block::new("if", Some(" @a ")).with_sub_blocks(vec![
            Block::new(":default", None).with_children(vec![
                nl(),
                indent(),
                Node::text("x"),
                nl(),
                dedent(),
            ]),
            Block::new("else", None).with_children(vec![
                nl(),
                indent(),
                Node::text("y"),
                nl(),
                dedent(),
            ]),
        ]);
        assert_eq!(
            render_default(&[block.into()]),
            "{#if @a}\n  x\n{#else}\n  y\n{/if}"
        );
    }

    #[test]
    fn test_case_arms_render_two_levels_deep() {
        let mut block = Block::new("case", Some("@v")).with_sub_blocks(vec![
            Block::new(":default", None).with_children(vec![nl(), dedent()]),
            Block::new("match", Some(":a")).with_children(vec![
                nl(),
                indent(),
                Node::text("A"),
                nl(),
                dedent(),
            ]),
            Block::new("match", Some("_")).with_children(vec![
                nl(),
                indent(),
                Node::text("B"),
                nl(),
            ]),
        ]);
        block.children.push(dedent());
        assert_eq!(
            render_default(&[block.into()]),
            "{#case @v}\n  {#match :a}\n    A\n  {#match _}\n    B\n{/case}"
        );
    }

    #[test]
    fn test_trailing_newline_and_indent_options() {
        let nodes = vec![Node::text("x")];
        let options = Options::new().with_indent(2);
        assert_eq!(render_with(&nodes, options), "    x\n");
        assert_eq!(render_with(&[], options), "");
    }

    #[test]
    fn test_invalid_expression_names_location() {
        let nodes = vec![Element::new("p")
            .with_children(vec![Node::expression("foo(")])
            .into()];
        let err = render(&nodes, Options::new(), &CanonicalFormatter).unwrap_err();
        match err {
            FormatError::Expression {
                fragment, location, ..
            } => {
                assert_eq!(fragment, "foo(");
                assert_eq!(
                    location,
                    Location::Child {
                        parent: Some("p".to_string())
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reindent_skips_empty_lines() {
        assert_eq!(reindent("a\n\nb", 1), "a\n\n  b");
    }
}
