//! Parsing for the markup format
//!
//! This module provides the complete pipeline from source text to parse tree:
//!     1. Lexing: tokenization of source text. See the [lexing](crate::lexing) module.
//!     2. Parsing: a single pass over the token stream that builds the flat
//!        document tree, with byte spans carried from tokens to nodes.
//!
//! The parser is total over syntactically valid input and fails with a
//! structured [`ParseError`] otherwise. It is a pure function of the source
//! text: the same input always produces the same tree.
//!
//! Grammar, informally:
//!
//!     document  = (tag | closing | text)*
//!     tag       = "<" name attribute* (">" | "/>")
//!     closing   = "</" name ">"
//!     attribute = name ("=" (string | braced))?
//!     text      = anything up to the next "<" or "</"

pub mod tree;

use std::fmt;
use std::ops::Range;

use crate::lexing::{tokenize, LexError, Token};

pub use tree::{
    AttributeNode, ClosingTagNode, InitializerKind, InitializerNode, Node, TagNode, TextNode, Tree,
};

/// Errors that can occur during parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Tokenization failure
    Lex(LexError),
    /// A token that does not fit the grammar at this position
    UnexpectedToken {
        /// Verbatim source text of the offending token
        found: String,
        /// Byte offset of the token
        offset: usize,
        /// What the parser was in the middle of
        context: &'static str,
    },
    /// Input ended in the middle of a construct
    UnexpectedEnd { context: &'static str },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(err) => write!(f, "{}", err),
            ParseError::UnexpectedToken {
                found,
                offset,
                context,
            } => write!(
                f,
                "unexpected {:?} at byte offset {} while parsing {}",
                found, offset, context
            ),
            ParseError::UnexpectedEnd { context } => {
                write!(f, "unexpected end of input while parsing {}", context)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}

/// Parse source text into one tree generation.
///
/// This is the primary entry point of the module and the "external parser"
/// the manipulation engine re-runs after every splice.
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    let tokens = tokenize(source)?;
    Parser {
        source,
        tokens,
        pos: 0,
    }
    .parse_document()
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&(Token, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn slice(&self, span: &Range<usize>) -> &str {
        &self.source[span.clone()]
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((token, _)) if token.is_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consume a token of the expected kind or fail with a positioned error.
    fn expect(&mut self, expected: Token, context: &'static str) -> Result<Range<usize>, ParseError> {
        match self.peek() {
            Some((token, span)) if *token == expected => {
                let span = span.clone();
                self.pos += 1;
                Ok(span)
            }
            Some((_, span)) => Err(ParseError::UnexpectedToken {
                found: self.slice(span).to_string(),
                offset: span.start,
                context,
            }),
            None => Err(ParseError::UnexpectedEnd { context }),
        }
    }

    fn unexpected(&self, context: &'static str) -> ParseError {
        match self.peek() {
            Some((_, span)) => ParseError::UnexpectedToken {
                found: self.slice(span).to_string(),
                offset: span.start,
                context,
            },
            None => ParseError::UnexpectedEnd { context },
        }
    }

    fn parse_document(mut self) -> Result<Tree, ParseError> {
        let mut nodes = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some((Token::TagOpen, _)) => nodes.push(Node::Tag(self.parse_tag()?)),
                Some((Token::CloseTagOpen, _)) => {
                    nodes.push(Node::Closing(self.parse_closing_tag()?))
                }
                Some(_) => nodes.push(Node::Text(self.parse_text_run())),
            }
        }
        Ok(Tree { nodes })
    }

    /// Coalesce every token up to the next tag start into a single text run.
    fn parse_text_run(&mut self) -> TextNode {
        let start = self.tokens[self.pos].1.start;
        let mut end = start;
        while let Some((token, span)) = self.peek() {
            if token.starts_tag() {
                break;
            }
            end = span.end;
            self.pos += 1;
        }
        TextNode {
            span: start..end,
            text: self.source[start..end].to_string(),
        }
    }

    fn parse_tag(&mut self) -> Result<TagNode, ParseError> {
        let open_span = self.expect(Token::TagOpen, "tag start")?;
        let name_span = self.expect(Token::Name, "tag name")?;
        let name = self.slice(&name_span).to_string();

        let mut attributes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some((Token::Name, _)) => attributes.push(self.parse_attribute()?),
                Some((Token::TagEnd, span)) => {
                    let end = span.end;
                    self.pos += 1;
                    return Ok(TagNode {
                        span: open_span.start..end,
                        name,
                        name_span,
                        attributes,
                        self_closing: false,
                    });
                }
                Some((Token::SelfCloseEnd, span)) => {
                    let end = span.end;
                    self.pos += 1;
                    return Ok(TagNode {
                        span: open_span.start..end,
                        name,
                        name_span,
                        attributes,
                        self_closing: true,
                    });
                }
                Some(_) => return Err(self.unexpected("tag attributes")),
                None => return Err(ParseError::UnexpectedEnd { context: "tag attributes" }),
            }
        }
    }

    fn parse_attribute(&mut self) -> Result<AttributeNode, ParseError> {
        let name_span = self.expect(Token::Name, "attribute name")?;
        let name = self.slice(&name_span).to_string();

        // Whitespace after the name belongs to the next attribute unless an
        // `=` follows, so remember where the name ended before probing.
        let checkpoint = self.pos;
        self.skip_whitespace();
        if !matches!(self.peek(), Some((Token::Equals, _))) {
            self.pos = checkpoint;
            return Ok(AttributeNode {
                span: name_span.clone(),
                name,
                name_span,
                initializer: None,
            });
        }
        self.pos += 1;
        self.skip_whitespace();

        let (kind, value_span) = match self.peek() {
            Some((Token::StringLiteral, span)) => (InitializerKind::String, span.clone()),
            Some((Token::BracedExpression, span)) => (InitializerKind::Expression, span.clone()),
            _ => return Err(self.unexpected("attribute initializer")),
        };
        self.pos += 1;

        let text = self.slice(&value_span).to_string();
        Ok(AttributeNode {
            span: name_span.start..value_span.end,
            name,
            name_span,
            initializer: Some(InitializerNode {
                span: value_span,
                text,
                kind,
            }),
        })
    }

    fn parse_closing_tag(&mut self) -> Result<ClosingTagNode, ParseError> {
        let open_span = self.expect(Token::CloseTagOpen, "closing tag start")?;
        let name_span = self.expect(Token::Name, "closing tag name")?;
        let name = self.slice(&name_span).to_string();
        self.skip_whitespace();
        let end_span = self.expect(Token::TagEnd, "closing tag end")?;
        Ok(ClosingTagNode {
            span: open_span.start..end_span.end,
            name,
            name_span,
        })
    }
}
