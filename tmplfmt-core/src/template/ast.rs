//! Template node tree
//!
//! This is the shape produced by the upstream parser and threaded through every
//! formatting phase. Parser output never contains [`Node::Whitespace`]; those
//! markers are introduced by [tagging](crate::template::tagging) and rewritten by
//! the layout passes until the renderer consumes them.
//!
//! All types serialize to JSON (adjacently tagged, snake_case) so trees from an
//! external parser can be fed to the CLI:
//!
//! ```json
//! {"type": "element", "value": {"tag": "p", "children": [{"type": "text", "value": "Hi"}]}}
//! ```

use serde::{Deserialize, Serialize};

/// Prefix marking a macro tag (`<#Raw>`); macro bodies are verbatim.
pub const MACRO_SIGIL: char = '#';

/// HTML tags whose text content is reproduced byte for byte.
pub const VERBATIM_TAGS: &[&str] = &["pre", "code"];

/// HTML elements that never have a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Name of the implicit first body of a block with sub-blocks.
pub const DEFAULT_SUB_BLOCK: &str = ":default";

/// Blocks whose sub-blocks (match arms) are nested one level deeper.
pub const CASE_BLOCK: &str = "case";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Node {
    /// Literal content. Raw parser text may contain whitespace; after tagging it never
    /// starts or ends with any.
    Text(String),
    /// Embedded host-language expression (`{{ code }}`).
    Expression(String),
    Comment(Comment),
    Element(Element),
    Block(Block),
    /// Pipeline-only spacing marker.
    Whitespace(Whitespace),
}

/// Classified spacing between sibling nodes.
///
/// `Space` and `Newline` are produced by tagging and rewritten by the layout passes;
/// `Indent` and `IndentOneLess` only exist after the indentation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Whitespace {
    Space,
    Newline,
    Indent,
    IndentOneLess,
}

impl Whitespace {
    /// Whether this marker belongs to the tagging/rewrite stages.
    pub fn is_coarse(self) -> bool {
        matches!(self, Whitespace::Space | Whitespace::Newline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Rendered into the page (`<!-- -->`).
    Public,
    /// Only visible in the template source (`{{!-- --}}`).
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    #[serde(default)]
    pub expr: Option<String>,
    #[serde(default)]
    pub children: Vec<Node>,
    /// When set, `children` are sub-blocks (`:default`, `else`, `match`, ...).
    #[serde(default)]
    pub has_sub_blocks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    StringLiteral(String),
    BoolLiteral(bool),
    IntLiteral(i64),
    Expression(String),
    /// Literal text interleaved with interpolations (`class="a {{ b }} c"`).
    Mixed(Vec<Segment>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Segment {
    StringLiteral(String),
    Expression(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn expression(code: impl Into<String>) -> Self {
        Node::Expression(code.into())
    }

    pub fn space() -> Self {
        Node::Whitespace(Whitespace::Space)
    }

    pub fn newline() -> Self {
        Node::Whitespace(Whitespace::Newline)
    }

    pub fn comment(text: impl Into<String>, visibility: Visibility) -> Self {
        Node::Comment(Comment {
            text: text.into(),
            visibility,
        })
    }

    pub fn as_whitespace(&self) -> Option<Whitespace> {
        match self {
            Node::Whitespace(ws) => Some(*ws),
            _ => None,
        }
    }

    pub fn is_space(&self) -> bool {
        matches!(self, Node::Whitespace(Whitespace::Space))
    }

    pub fn is_newline(&self) -> bool {
        matches!(self, Node::Whitespace(Whitespace::Newline))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value,
        });
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn is_macro(&self) -> bool {
        self.tag.starts_with(MACRO_SIGIL)
    }

    /// Macro tags, `pre` and `code` keep their content byte for byte.
    pub fn is_verbatim(&self) -> bool {
        self.is_macro() || VERBATIM_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// A container of containers: at least one direct child is an element.
    pub fn has_element_children(&self) -> bool {
        self.children.iter().any(Node::is_element)
    }

    /// Whether a direct child is a newline marker, i.e. the element renders over
    /// several lines.
    pub fn has_newline_children(&self) -> bool {
        self.children.iter().any(Node::is_newline)
    }
}

impl Block {
    pub fn new(name: impl Into<String>, expr: Option<&str>) -> Self {
        Block {
            name: name.into(),
            expr: expr.map(str::to_string),
            children: Vec::new(),
            has_sub_blocks: false,
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_sub_blocks(mut self, sub_blocks: Vec<Block>) -> Self {
        self.children = sub_blocks.into_iter().map(Node::Block).collect();
        self.has_sub_blocks = true;
        self
    }

    pub fn is_case(&self) -> bool {
        self.name == CASE_BLOCK
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_SUB_BLOCK
    }
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttrValue) -> Self {
        Attribute {
            name: name.into(),
            value,
        }
    }
}
