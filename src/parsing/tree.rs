//! Parse tree node definitions
//!
//! A [`Tree`] is one immutable generation of the parse tree: a structural
//! edit never mutates a tree in place, it re-parses the document and installs
//! a fresh generation. The document is a flat ordered sequence of nodes; tag
//! nesting is a presentation concern and is deliberately not modeled.
//!
//! Every node carries byte spans into the source text the tree was built
//! from. Spans are what the manipulation layer anchors insertions on, so they
//! are mandatory on every node and every name token.

use std::ops::Range;

/// One immutable generation of the parse tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    /// Document children in source order
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Iterate over the opening and self-closing tags, in source order.
    ///
    /// These are the nodes that own attribute collections; closing tags and
    /// text runs are skipped.
    pub fn tags(&self) -> impl Iterator<Item = &TagNode> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Tag(tag) => Some(tag),
            _ => None,
        })
    }

    /// Get the tag at the given tag index (counting tags only)
    pub fn tag(&self, index: usize) -> Option<&TagNode> {
        self.tags().nth(index)
    }

    /// Number of attribute-owning tags in the document
    pub fn tag_count(&self) -> usize {
        self.tags().count()
    }
}

/// A document-level node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Opening or self-closing tag
    Tag(TagNode),
    /// Closing tag (`</Name>`)
    Closing(ClosingTagNode),
    /// Text run between tags (may contain braced expressions)
    Text(TextNode),
}

impl Node {
    /// The full byte span of this node
    pub fn span(&self) -> Range<usize> {
        match self {
            Node::Tag(tag) => tag.span.clone(),
            Node::Closing(closing) => closing.span.clone(),
            Node::Text(text) => text.span.clone(),
        }
    }
}

/// An opening or self-closing tag with its attribute collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    /// Full span from `<` to `>` or `/>` inclusive
    pub span: Range<usize>,
    /// Tag name text
    pub name: String,
    /// Span of the name token; insertions at index 0 anchor on its end
    pub name_span: Range<usize>,
    /// Ordered attribute collection (source order, duplicates permitted)
    pub attributes: Vec<AttributeNode>,
    /// Whether the tag ends with `/>`
    pub self_closing: bool,
}

/// A closing tag (`</Name>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingTagNode {
    /// Full span from `</` to `>` inclusive
    pub span: Range<usize>,
    /// Tag name text
    pub name: String,
    /// Span of the name token
    pub name_span: Range<usize>,
}

/// A text run between tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    /// Full span of the run
    pub span: Range<usize>,
    /// Text content (verbatim source slice)
    pub text: String,
}

/// One attribute of a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNode {
    /// Span from the name start to the initializer end (or name end)
    pub span: Range<usize>,
    /// Attribute name text
    pub name: String,
    /// Span of the name token
    pub name_span: Range<usize>,
    /// Optional initializer
    pub initializer: Option<InitializerNode>,
}

/// The initializer of an attribute (`="..."`, `='...'`, or `={...}`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerNode {
    /// Span of the value token (not including the `=`)
    pub span: Range<usize>,
    /// Verbatim value text, delimiters included
    pub text: String,
    /// Whether the value is a quoted string or a braced expression
    pub kind: InitializerKind,
}

/// Initializer value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerKind {
    /// `"..."` or `'...'`
    String,
    /// `{...}`
    Expression,
}
