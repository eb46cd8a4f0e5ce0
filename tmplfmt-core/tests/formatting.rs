//! End-to-end formatting of template source
//!
//! Every case starts from source text, goes through the reader, the layout pipeline
//! and the renderer, and is checked for idempotence on the way out.

use std::sync::Arc;

use rstest::rstest;
use tmplfmt_core::template::error::Location;
use tmplfmt_core::template::testing::{format_source, SourceError};
use tmplfmt_core::{CanonicalFormatter, FormatError, Options};

fn format_with(source: &str, options: Options) -> String {
    let output = format_source(source, options, Arc::new(CanonicalFormatter))
        .unwrap_or_else(|err| panic!("formatting failed: {err}\n\nsource:\n{source}"));
    let again = format_source(&output, options, Arc::new(CanonicalFormatter)).unwrap();
    assert_eq!(again, output, "formatting is not idempotent for:\n{source}");
    output
}

fn format(source: &str) -> String {
    format_with(source, Options::new())
}

fn format_error(source: &str) -> FormatError {
    match format_source(source, Options::new(), Arc::new(CanonicalFormatter)) {
        Err(SourceError::Format(err)) => err,
        other => panic!("expected a formatting error, got {other:?}"),
    }
}

#[rstest]
#[case::nested_lines(
    "<div>\n<p>\nHello\n</p>\n</div>\n",
    "<div>\n  <p>\n    Hello\n  </p>\n</div>\n"
)]
#[case::edge_spaces(
    "<div> <p>Hello</p> </div>\n",
    "<div>\n  <p>Hello</p>\n</div>\n"
)]
#[case::no_whitespace_stays_inline("<div><p>Hello</p></div>\n", "<div><p>Hello</p></div>\n")]
#[case::blank_lines_collapse("<p>a</p>\n\n\n\n<p>b</p>\n", "<p>a</p>\n\n<p>b</p>\n")]
#[case::inline_text_kept("<p>Hello <b>world</b>!</p>\n", "<p>Hello <b>world</b>!</p>\n")]
#[case::space_after_element_on_own_line(
    "<div>\n <b>x</b> y\n</div>\n",
    "<div>\n  <b>x</b>\n  y\n</div>\n"
)]
#[case::outer_whitespace_trimmed("\n\n  <p>x</p>  \n\n", "<p>x</p>\n")]
#[case::no_trailing_newline("<p>x</p>", "<p>x</p>")]
#[case::text_lines_reindented(
    "<p>\n      one   two\n   three\n</p>\n",
    "<p>\n  one   two\n  three\n</p>\n"
)]
#[case::blank_line_inside_tag_trimmed(
    "<div>\n\n<p>x</p>\n\n</div>\n",
    "<div>\n  <p>x</p>\n</div>\n"
)]
#[case::nbsp_is_content("<p>\u{a0}x</p>\n", "<p>\u{a0}x</p>\n")]
fn test_whitespace_layout(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(format(source), expected);
}

#[rstest]
#[case::child_padding("<p>{{@name}}</p>\n", "<p>{{ @name }}</p>\n")]
#[case::operators("<p>{{ a+b*2 }}</p>\n", "<p>{{ a + b * 2 }}</p>\n")]
#[case::hash_comment("<p>{{ # later }}</p>\n", "<p>{{!-- later --}}</p>\n")]
#[case::comments(
    "<!--   public   -->\n{{!--private--}}\n",
    "<!-- public -->\n{{!-- private --}}\n"
)]
fn test_expressions_and_comments(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(format(source), expected);
}

#[rstest]
#[case::keyword_list("<div class={{ foo:   bar }}>x</div>\n", "<div class={{ foo: bar }}>x</div>\n")]
#[case::true_literal("<input disabled={{true}}>\n", "<input disabled>\n")]
#[case::false_literal("<input disabled={{false}}>\n", "<input disabled=false>\n")]
#[case::string_literal("<input name={{\"x\"}}>\n", "<input name=\"x\">\n")]
#[case::int_literal("<input size={{123}}>\n", "<input size=123>\n")]
#[case::grouped_int("<Counter start=1000000 />\n", "<Counter start=1_000_000 />\n")]
#[case::bare_true("<input checked>\n", "<input checked>\n")]
#[case::quoted_trimmed("<p class=\"  lead  \">x</p>\n", "<p class=\"lead\">x</p>\n")]
#[case::mixed(
    "<p class=\"btn-{{@kind}} big\">x</p>\n",
    "<p class=\"btn-{{ @kind }} big\">x</p>\n"
)]
#[case::single_quoted_keeps_inner_quotes(
    "<a title='say \"hi\"'>x</a>\n",
    "<a title='say \"hi\"'>x</a>\n"
)]
#[case::single_quoted_without_inner_quotes("<a title='hi'>x</a>\n", "<a title=\"hi\">x</a>\n")]
#[case::apostrophe_in_double_quotes(
    "<a title=\"it's\">x</a>\n",
    "<a title=\"it's\">x</a>\n"
)]
#[case::string_with_braces_stays_code(
    "<a title={{ \"{{x}}\" }}>x</a>\n",
    "<a title={{ \"{{x}}\" }}>x</a>\n"
)]
#[case::comma_list("<Table cols={{ @a,@b }} />\n", "<Table cols={{ @a, @b }} />\n")]
#[case::order_kept(
    "<a z=\"1\" a=\"2\" m>x</a>\n",
    "<a z=\"1\" a=\"2\" m>x</a>\n"
)]
fn test_attributes(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(format(source), expected);
}

#[test]
fn test_long_opening_tag_wraps_attributes() {
    let source = "<Button class=\"primary large\" click={{ save }} id=\"main\">Save</Button>\n";
    let options = Options::new().with_line_length(40);
    assert_eq!(
        format_with(source, options),
        "<Button\n  class=\"primary large\"\n  click={{ save }}\n  id=\"main\"\n>Save</Button>\n"
    );
}

#[test]
fn test_wrapped_self_closing_tag() {
    let source = "<div>\n<Card title=\"A fairly long title\" subtitle=\"and more\" />\n</div>\n";
    let options = Options::new().with_line_length(40);
    assert_eq!(
        format_with(source, options),
        "<div>\n  <Card\n    title=\"A fairly long title\"\n    subtitle=\"and more\"\n  />\n</div>\n"
    );
}

#[test]
fn test_single_long_attribute_never_wraps() {
    let source = "<img src=\"https://example.com/a/very/long/path/to/an/image.png\">\n";
    let options = Options::new().with_line_length(20);
    assert_eq!(format_with(source, options), source);
}

#[test]
fn test_multi_line_attribute_expression() {
    let source = "<Grid opts={{ alpha: 1, beta: 2, gamma: 3 }} />\n";
    let options = Options::new().with_line_length(20);
    assert_eq!(
        format_with(source, options),
        "<Grid\n  opts={{alpha: 1,\n  beta: 2,\n  gamma: 3}}\n/>\n"
    );
}

#[rstest]
#[case::verbatim_pre("<pre>\n  a   b\n    c\n</pre>\n")]
#[case::verbatim_code("<code> x  =  1 </code>\n")]
#[case::macro_body("<#Raw>\n   <b> {{ not parsed </#Raw>\n")]
fn test_verbatim_content_untouched(#[case] source: &str) {
    assert_eq!(format(source), source);
}

#[test]
fn test_verbatim_inside_indented_parent_is_flush() {
    assert_eq!(
        format("<div>\n<pre>\n  x\n</pre>\n</div>\n"),
        "<div>\n  <pre>\n  x\n</pre>\n</div>\n"
    );
}

#[test]
fn test_if_else_block() {
    assert_eq!(
        format("{#if @a}\n<p>x</p>\n{#else}\ny\n{/if}\n"),
        "{#if @a}\n  <p>x</p>\n{#else}\n  y\n{/if}\n"
    );
}

#[test]
fn test_inline_block() {
    assert_eq!(format("{#if   @a}x{/if}\n"), "{#if @a}x{/if}\n");
}

#[test]
fn test_block_inside_element() {
    assert_eq!(
        format("<ul>\n{#for x <- @xs}\n<li>{{x}}</li>\n{/for}\n</ul>\n"),
        "<ul>\n  {#for x <- @xs}\n    <li>{{ x }}</li>\n  {/for}\n</ul>\n"
    );
}

#[test]
fn test_case_block() {
    assert_eq!(
        format("{#case @v}\n{#match :a}\nA\n{#match _}\nB\n{/case}\n"),
        "{#case @v}\n  {#match :a}\n    A\n  {#match _}\n    B\n{/case}\n"
    );
}

#[test]
fn test_nested_case_block() {
    assert_eq!(
        format("<div>\n{#case @v}\n{#match 1}\n<p>one</p>\n{#match _}\nother\n{/case}\n</div>\n"),
        "<div>\n  {#case @v}\n    {#match 1}\n      <p>one</p>\n    {#match _}\n      other\n  {/case}\n</div>\n"
    );
}

#[test]
fn test_indent_option() {
    let options = Options::new().with_indent(1);
    assert_eq!(
        format_with("<div>\n<p>x</p>\n</div>\n", options),
        "  <div>\n    <p>x</p>\n  </div>\n"
    );
}

#[test]
fn test_empty_source() {
    assert_eq!(format(""), "");
    assert_eq!(format("  \n\n"), "");
}

#[test]
fn test_invalid_child_expression() {
    let err = format_error("<p>{{ foo( }}</p>");
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
fn test_invalid_attribute_expression() {
    let err = format_error("<Button click={{ save( }}>x</Button>");
    assert!(matches!(
        err,
        FormatError::Expression {
            location: Location::Attribute { .. },
            ..
        }
    ));
    assert!(err.to_string().contains("attribute `click` of <Button>"));
}

#[test]
fn test_invalid_block_header() {
    let err = format_error("{#if foo(}x{/if}");
    assert!(err.to_string().contains("header of {#if}"));
}

#[test]
fn test_read_error() {
    let result = format_source("<div>", Options::new(), Arc::new(CanonicalFormatter));
    assert!(matches!(result, Err(SourceError::Read(_))));
}

#[test]
fn test_snapshot_page() {
    let source = r#"<section class="page">
<h1>   {{@title}}   </h1>
    {#if @items != []}
<ul>
{#for item <- @items}
<li class="item-{{item.kind}}">{{ item.name }}</li>
{/for}
</ul>
{#else}
<p>Nothing here</p>
    {/if}



<footer> <small>Generated</small> </footer>
</section>
"#;
    insta::assert_snapshot!(format(source), @r#"
    <section class="page">
      <h1> {{ @title }} </h1>
      {#if @items != []}
        <ul>
          {#for item <- @items}
            <li class="item-{{ item.kind }}">{{ item.name }}</li>
          {/for}
        </ul>
      {#else}
        <p>Nothing here</p>
      {/if}

      <footer>
        <small>Generated</small>
      </footer>
    </section>
    "#);
}
